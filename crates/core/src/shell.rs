//! Shell type definitions and code rendering for uv-autoenv
//!
//! This module provides the snippets the directory-change hook prints for the
//! shell to evaluate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uv_autoenv_hooks::HookEvent;

/// Variable holding the active virtual environment, set by activate scripts
pub const VIRTUAL_ENV_VAR: &str = "VIRTUAL_ENV";

/// Variable recording that the active environment was activated by uv-autoenv
pub const ACTIVATED_FLAG_VAR: &str = "UV_AUTOENV_ACTIVATED";

/// Supported shell types for environment integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    /// Bash shell
    #[default]
    Bash,
    /// Z shell
    Zsh,
    /// Fish shell
    Fish,
}

impl Shell {
    /// Get the name of the shell
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
        }
    }

    /// Activation script inside a virtual environment for this shell
    pub fn activate_script(&self, environment: &Path) -> std::path::PathBuf {
        let name = match self {
            Self::Bash | Self::Zsh => "activate",
            Self::Fish => "activate.fish",
        };
        environment.join("bin").join(name)
    }

    /// Quote a value so the shell reads it literally
    pub fn quote(&self, value: &str) -> String {
        match self {
            Self::Bash | Self::Zsh => format!("'{}'", value.replace('\'', r"'\''")),
            Self::Fish => format!(
                "'{}'",
                value.replace('\\', r"\\").replace('\'', r"\'")
            ),
        }
    }

    /// Source the environment's activation script
    pub fn source_activate(&self, environment: &Path) -> String {
        let script = self.activate_script(environment);
        format!("source {}", self.quote(&script.to_string_lossy()))
    }

    /// Call `deactivate` only when the environment defined it
    pub const fn deactivate_if_defined(&self) -> &'static str {
        match self {
            Self::Bash => "if declare -F deactivate >/dev/null 2>&1; then deactivate; fi",
            Self::Zsh => "if (( $+functions[deactivate] )); then deactivate; fi",
            Self::Fish => "if functions -q deactivate; deactivate; end",
        }
    }

    /// Export a variable
    pub fn export(&self, key: &str, value: &str) -> String {
        match self {
            Self::Bash | Self::Zsh => format!("export {key}={}", self.quote(value)),
            Self::Fish => format!("set -gx {key} {}", self.quote(value)),
        }
    }

    /// Remove a variable
    pub fn unset(&self, key: &str) -> String {
        match self {
            Self::Bash | Self::Zsh => format!("unset {key}"),
            Self::Fish => format!("set -e {key}"),
        }
    }

    /// Run the hooks registered from the shell for `event`
    pub fn run_shell_hooks(&self, event: HookEvent) -> String {
        format!("__uv_autoenv_run_hooks {event}")
    }

    /// Wrap a command line so its failure does not affect what follows
    pub fn isolate(&self, command: &str) -> String {
        match self {
            Self::Bash | Self::Zsh => format!("{{ {command}\n}} || :"),
            Self::Fish => format!("begin; {command}\nend; or true"),
        }
    }

    /// A command that does nothing
    pub const fn no_op(&self) -> &'static str {
        match self {
            Self::Bash | Self::Zsh => ":",
            Self::Fish => "true",
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
