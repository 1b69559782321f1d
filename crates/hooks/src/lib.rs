//! Hook registry for uv-autoenv
//!
//! Hooks are callbacks fired after a virtual environment is activated or
//! deactivated by the directory-change state machine:
//! - `activate` hooks run after an environment was activated
//! - `deactivate` hooks run after an environment was deactivated
//!
//! Hooks for an event run in registration order. A failing hook is logged and
//! never prevents the hooks registered after it from running.

pub mod error;
pub mod registry;
pub mod types;

pub use error::{Error, Result};
pub use registry::{Hook, HookRegistry, NamedHook};
pub use types::{HookContext, HookEvent, HookRunSummary};
