//! Directory-change hook: run one transition and print shell code for `eval`
//!
//! The process is short lived, so the session is rebuilt on every call from
//! `VIRTUAL_ENV` and `UV_AUTOENV_ACTIVATED`. Procedures and hooks do not touch
//! the shell directly; they append lines to a script that the shell
//! integration evaluates.

use crate::cli::CliError;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, instrument};
use uv_autoenv_core::config::Config;
use uv_autoenv_core::hooks::{self, Hook, HookContext, HookEvent};
use uv_autoenv_core::shell::{ACTIVATED_FLAG_VAR, VIRTUAL_ENV_VAR};
use uv_autoenv_core::{ActivationState, Deactivation, Procedures, Session, Shell, Transition};

/// Lines of shell code collected during one transition
type Script = Rc<RefCell<Vec<String>>>;

/// Activation procedures expressed as shell code
struct ShellProcedures {
    shell: Shell,
    script: Script,
}

impl Procedures for ShellProcedures {
    fn activate(&mut self, environment: &Path) -> uv_autoenv_core::Result<()> {
        let activate_script = self.shell.activate_script(environment);
        if !activate_script.is_file() {
            return Err(uv_autoenv_core::Error::procedure(
                "activate",
                environment,
                format!("{} does not exist", activate_script.display()),
            ));
        }

        let mut script = self.script.borrow_mut();
        script.push(self.shell.source_activate(environment));
        script.push(self.shell.export(ACTIVATED_FLAG_VAR, "1"));
        Ok(())
    }

    fn deactivate(&mut self, _environment: &Path) -> uv_autoenv_core::Result<Deactivation> {
        let mut script = self.script.borrow_mut();
        script.push(self.shell.deactivate_if_defined().to_string());
        script.push(self.shell.unset(VIRTUAL_ENV_VAR));
        script.push(self.shell.export(ACTIVATED_FLAG_VAR, "0"));
        Ok(Deactivation::Invoked)
    }
}

/// A hook that contributes one line of shell code
struct ShellHook {
    name: String,
    line: String,
    script: Script,
}

impl Hook for ShellHook {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, context: &HookContext<'_>) -> hooks::Result<()> {
        debug!(hook = %self.name, event = %context.event, "Emitting hook");
        self.script.borrow_mut().push(self.line.clone());
        Ok(())
    }
}

/// Read the session state the shell currently holds
pub fn state_from_env() -> ActivationState {
    let active = std::env::var_os(VIRTUAL_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    ActivationState::from_parts(active, flag_from_env())
}

fn flag_from_env() -> bool {
    std::env::var(ACTIVATED_FLAG_VAR).is_ok_and(|value| value == "1")
}

/// Compute the shell code for a change into `cwd`.
///
/// `flag_set` is the shell's current `UV_AUTOENV_ACTIVATED` value; a stale
/// flag is reset when no transition happens.
pub fn render(
    shell: Shell,
    cwd: &Path,
    state: ActivationState,
    flag_set: bool,
    config: &Config,
) -> uv_autoenv_core::Result<String> {
    let script: Script = Rc::new(RefCell::new(Vec::new()));
    let procedures = ShellProcedures {
        shell,
        script: Rc::clone(&script),
    };
    let mut session = Session::resume(config.search()?, procedures, state);

    for event in [HookEvent::Activate, HookEvent::Deactivate] {
        let runner = ShellHook {
            name: format!("shell {event} hooks"),
            line: shell.run_shell_hooks(event),
            script: Rc::clone(&script),
        };
        let commands = match event {
            HookEvent::Activate => &config.hooks.on_activate,
            HookEvent::Deactivate => &config.hooks.on_deactivate,
        };
        session.hooks_mut().register(event, runner);
        for command in commands {
            session.hooks_mut().register(
                event,
                ShellHook {
                    name: command.clone(),
                    line: shell.isolate(command),
                    script: Rc::clone(&script),
                },
            );
        }
    }

    let transition = session.on_directory_change(cwd)?;
    if matches!(transition, Transition::Unchanged | Transition::Preserved { .. })
        && flag_set != session.auto_activated()
    {
        debug!("Resetting stale activation flag");
        let value = if session.auto_activated() { "1" } else { "0" };
        script.borrow_mut().push(shell.export(ACTIVATED_FLAG_VAR, value));
    }

    let lines = script.take();
    if lines.is_empty() {
        return Ok(format!("{}\n", shell.no_op()));
    }
    let mut output = lines.join("\n");
    output.push('\n');
    Ok(output)
}

/// Execute the hook command for `dir`
#[instrument(level = "debug", skip(marker))]
pub fn execute_hook(shell: Shell, dir: &Path, marker: Option<String>) -> Result<String, CliError> {
    let config = Config::load_default()?.with_marker_override(marker);
    let state = state_from_env();
    debug!(state = ?state, "Resuming session from shell environment");
    Ok(render(shell, dir, state, flag_from_env(), &config)?)
}
