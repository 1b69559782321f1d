//! Error types for uv-autoenv-core

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for environment discovery and activation
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(uv_autoenv::config::invalid))]
    Configuration {
        /// The error message describing the configuration issue
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },

    /// Filesystem probe failed while searching for an environment marker
    #[error("Failed to probe {}: {source}", .path.display())]
    #[diagnostic(
        code(uv_autoenv::search::probe),
        help("Check the permissions of the directory and its parents")
    )]
    Probe {
        /// The candidate path that could not be checked
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An activation or deactivation procedure failed
    #[error("{operation} procedure failed for {}: {message}", .environment.display())]
    #[diagnostic(code(uv_autoenv::procedure::failed))]
    Procedure {
        /// "activate" or "deactivate"
        operation: String,
        /// Environment the procedure was run for
        environment: PathBuf,
        /// The error message describing the failure
        message: String,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(uv_autoenv::io::error))]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred, if applicable
        path: Option<Box<Path>>,
        /// Description of the operation that failed
        operation: String,
    },
}

impl Error {
    /// Create a configuration error with a message and help text
    pub fn configuration_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a probe error for a candidate path
    pub fn probe(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Probe {
            path: path.into(),
            source,
        }
    }

    /// Create a procedure failure
    pub fn procedure(
        operation: impl Into<String>,
        environment: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::Procedure {
            operation: operation.into(),
            environment: environment.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.map(PathBuf::into_boxed_path),
            operation: operation.into(),
        }
    }
}

/// Result type for uv-autoenv-core operations
pub type Result<T> = std::result::Result<T, Error>;
