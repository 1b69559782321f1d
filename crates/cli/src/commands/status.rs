//! `uv-autoenv status`: report the activation state held by the shell

use super::Outcome;
use super::hook::state_from_env;
use crate::cli::{CliError, EXIT_FALSE, EXIT_OK, OutputFormat};
use uv_autoenv_core::ActivationState;

/// Describe `state` in the requested format.
///
/// Exit code is 0 when an environment is active and 1 otherwise.
pub fn describe(state: &ActivationState, format: OutputFormat) -> Result<Outcome, CliError> {
    let exit_code = if state.environment().is_some() {
        EXIT_OK
    } else {
        EXIT_FALSE
    };

    let stdout = match format {
        OutputFormat::Text => match state {
            ActivationState::Inactive => "inactive\n".to_string(),
            ActivationState::ActiveAuto(path) => format!("active (auto): {}\n", path.display()),
            ActivationState::ActiveManual(path) => {
                format!("active (manual): {}\n", path.display())
            }
        },
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(state)
                .map_err(|e| CliError::runtime(format!("Failed to serialize status: {e}")))?;
            json.push('\n');
            json
        }
    };

    Ok(Outcome::with_exit_code(stdout, exit_code))
}

pub fn execute_status(format: OutputFormat) -> Result<Outcome, CliError> {
    describe(&state_from_env(), format)
}
