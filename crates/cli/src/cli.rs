//! Command-line definition, exit codes and error reporting for uv-autoenv

use crate::commands::Command;
use clap::{Parser, Subcommand, ValueEnum};
use miette::{Diagnostic, Report};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use uv_autoenv_core::Shell;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Queried condition is false (no environment active, none found)
pub const EXIT_FALSE: i32 = 1;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Filesystem probe or other runtime error exit code
pub const EXIT_RUNTIME: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(uv_autoenv::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Runtime error such as a failed filesystem probe (exit code 3)
    #[error("Runtime error: {message}")]
    #[diagnostic(code(uv_autoenv::cli::runtime))]
    Runtime {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new runtime error
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
            help: None,
        }
    }
}

/// Map library errors onto CLI categories.
///
/// Configuration problems exit with 2, everything else with 3.
impl From<uv_autoenv_core::Error> for CliError {
    fn from(err: uv_autoenv_core::Error) -> Self {
        match err {
            uv_autoenv_core::Error::Configuration { message, help } => {
                Self::Config { message, help }
            }
            uv_autoenv_core::Error::Probe { .. } => Self::Runtime {
                message: err.to_string(),
                help: Some("Check the permissions of the directory and its parents".to_string()),
            },
            uv_autoenv_core::Error::Procedure { .. } | uv_autoenv_core::Error::Io { .. } => {
                Self::runtime(err.to_string())
            }
        }
    }
}

/// Get the exit code for an error
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Runtime { .. } => EXIT_RUNTIME,
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    status: &'static str,
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'a str>,
}

/// Render error appropriately based on JSON flag.
///
/// Errors always go to stderr; stdout is reserved for shell code.
pub fn render_error(err: &CliError, json_mode: bool) {
    let mut stderr = io::stderr().lock();
    if json_mode {
        let (code, help) = match err {
            CliError::Config { help, .. } => ("config", help.as_deref()),
            CliError::Runtime { help, .. } => ("runtime", help.as_deref()),
        };
        let envelope = ErrorEnvelope {
            status: "error",
            code,
            message: err.to_string(),
            help,
        };
        match serde_json::to_string(&envelope) {
            Ok(json) => {
                let _ = writeln!(stderr, "{json}");
            }
            Err(_) => {
                let _ = writeln!(stderr, "Error serializing error response");
            }
        }
    } else {
        let report = Report::new(err.clone());
        let _ = writeln!(stderr, "{report:?}");
    }
    let _ = stderr.flush();
}

/// Output format for command results
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output format
    Json,
}

/// Supported shell types for integration
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellType {
    /// Fish shell
    Fish,
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
}

impl From<ShellType> for Shell {
    fn from(shell: ShellType) -> Self {
        match shell {
            ShellType::Fish => Self::Fish,
            ShellType::Bash => Self::Bash,
            ShellType::Zsh => Self::Zsh,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "uv-autoenv")]
#[command(
    about = "Activate Python virtual environments automatically as you change directories"
)]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: crate::tracing::LogLevel,

    #[arg(long, global = true, help = "Output logs and errors in JSON format")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Show version information")]
    Version,

    #[command(about = "Print the shell integration script")]
    Init {
        #[arg(help = "Shell type", value_enum)]
        shell: ShellType,
    },

    #[command(about = "Handle a directory change and print shell code to evaluate")]
    Hook {
        #[arg(long, short = 's', help = "Shell type", value_enum)]
        shell: ShellType,
        #[arg(long, short = 'd', help = "Directory to evaluate (defaults to the current directory)")]
        dir: Option<PathBuf>,
        #[arg(
            long,
            env = "UV_AUTOENV_MARKER",
            help = "Name of the virtual environment directory to look for"
        )]
        marker: Option<String>,
    },

    #[command(about = "Report whether a virtual environment is active (exit 0) or not (exit 1)")]
    Status {
        #[arg(long, help = "Output format", value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    #[command(about = "Print the nearest virtual environment (exit 1 when none is found)")]
    Find {
        #[arg(long, short = 'd', help = "Directory to search from (defaults to the current directory)")]
        dir: Option<PathBuf>,
        #[arg(
            long,
            env = "UV_AUTOENV_MARKER",
            help = "Name of the virtual environment directory to look for"
        )]
        marker: Option<String>,
    },
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Version => Self::Version,
            Commands::Init { shell } => Self::Init {
                shell: shell.into(),
            },
            Commands::Hook { shell, dir, marker } => Self::Hook {
                shell: shell.into(),
                dir,
                marker,
            },
            Commands::Status { format } => Self::Status { format },
            Commands::Find { dir, marker } => Self::Find { dir, marker },
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
