//! Error types for the uv-autoenv-hooks crate

use miette::Diagnostic;
use thiserror::Error;

/// Error returned by a single hook invocation
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The hook body failed
    #[error("Hook '{name}' failed: {message}")]
    #[diagnostic(code(uv_autoenv_hooks::hook::failed))]
    Failed {
        /// Name of the hook that failed
        name: String,
        /// The error message describing the failure
        message: String,
    },
}

impl Error {
    /// Create a hook failure with a message
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type for hook invocations
pub type Result<T> = std::result::Result<T, Error>;
