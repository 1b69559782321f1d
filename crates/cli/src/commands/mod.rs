pub mod find;
pub mod hook;
pub mod init;
pub mod status;
pub mod version;

use crate::cli::{CliError, EXIT_OK, OutputFormat};
use std::path::PathBuf;
use tracing::instrument;
use uv_autoenv_core::Shell;

#[derive(Debug, Clone)]
pub enum Command {
    Version,
    Init {
        shell: Shell,
    },
    Hook {
        shell: Shell,
        dir: Option<PathBuf>,
        marker: Option<String>,
    },
    Status {
        format: OutputFormat,
    },
    Find {
        dir: Option<PathBuf>,
        marker: Option<String>,
    },
}

impl Command {
    /// Output printed in place of a result when the command fails.
    ///
    /// The directory-change hook is evaluated by the host shell, so it must
    /// always leave valid shell code on stdout.
    #[must_use]
    pub const fn fallback_output(&self) -> Option<&'static str> {
        match self {
            Self::Hook { shell, .. } => Some(shell.no_op()),
            _ => None,
        }
    }
}

/// What a command printed and how the process should exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub stdout: String,
    pub exit_code: i32,
}

impl Outcome {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code: EXIT_OK,
        }
    }

    pub fn with_exit_code(stdout: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code,
        }
    }
}

/// Resolve the directory a command operates on
pub(crate) fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match dir {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().map_err(|e| CliError::Runtime {
            message: format!("Failed to read the current directory: {e}"),
            help: Some("Pass --dir explicitly".to_string()),
        }),
    }
}

#[instrument(level = "debug", skip_all, fields(command = ?command))]
pub fn execute(command: Command) -> Result<Outcome, CliError> {
    match command {
        Command::Version => Ok(Outcome::ok(version::get_version_info())),
        Command::Init { shell } => Ok(Outcome::ok(init::execute_init(shell))),
        Command::Hook { shell, dir, marker } => {
            let dir = resolve_dir(dir)?;
            hook::execute_hook(shell, &dir, marker).map(Outcome::ok)
        }
        Command::Status { format } => status::execute_status(format),
        Command::Find { dir, marker } => {
            let dir = resolve_dir(dir)?;
            find::execute_find(&dir, marker)
        }
    }
}
