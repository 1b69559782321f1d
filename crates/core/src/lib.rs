//! Core of uv-autoenv: find a Python virtual environment near the working
//! directory and switch it on and off as the directory changes.
//!
//! The pieces, leaves first:
//! - [`search`]: upward search for the marker directory (`.venv` by default)
//! - [`session`]: the activation state machine driven by directory changes
//! - [`procedures`]: the activate/deactivate side effects the host supplies
//! - [`shell`]: rendering of those side effects as shell code
//! - [`config`]: the TOML configuration file
//!
//! Hooks live in the `uv-autoenv-hooks` crate and are re-exported here.
//!
//! ```no_run
//! use std::path::Path;
//! use uv_autoenv_core::{AncestorSearch, Deactivation, Procedures, Session};
//!
//! struct Noop;
//!
//! impl Procedures for Noop {
//!     fn activate(&mut self, _: &Path) -> uv_autoenv_core::Result<()> {
//!         Ok(())
//!     }
//!     fn deactivate(&mut self, _: &Path) -> uv_autoenv_core::Result<Deactivation> {
//!         Ok(Deactivation::Unavailable)
//!     }
//! }
//!
//! let mut session = Session::new(AncestorSearch::default(), Noop);
//! session.on_directory_change(Path::new("/tmp/proj/src"))?;
//! # Ok::<(), uv_autoenv_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod procedures;
pub mod search;
pub mod session;
pub mod shell;

pub use config::Config;
pub use error::{Error, Result};
pub use procedures::{Deactivation, Procedures};
pub use search::{AncestorSearch, DEFAULT_MARKER, EnvironmentMarker};
pub use session::{ActivationState, Session, Transition};
pub use shell::Shell;
pub use uv_autoenv_hooks as hooks;
