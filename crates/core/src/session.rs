//! Directory-change driven activation state machine
//!
//! A [`Session`] tracks whether a virtual environment is active and whether
//! this tool activated it. Only environments the session activated itself are
//! ever deactivated or replaced; an environment activated by the user is left
//! alone until something outside the session changes it.

use crate::procedures::{Deactivation, Procedures};
use crate::search::AncestorSearch;
use crate::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uv_autoenv_hooks::{Hook, HookEvent, HookRegistry};

/// Activation state as seen by the session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "environment", rename_all = "snake_case")]
pub enum ActivationState {
    /// No environment is active
    #[default]
    Inactive,
    /// An environment activated by this session
    ActiveAuto(PathBuf),
    /// An environment activated by someone else
    ActiveManual(PathBuf),
}

impl ActivationState {
    /// Rebuild state from an externally held reference and ownership flag.
    ///
    /// A set flag without a reference collapses to `Inactive`.
    #[must_use]
    pub fn from_parts(active: Option<PathBuf>, auto_activated: bool) -> Self {
        match active {
            None => Self::Inactive,
            Some(path) if auto_activated => Self::ActiveAuto(path),
            Some(path) => Self::ActiveManual(path),
        }
    }

    /// The active environment, if any
    #[must_use]
    pub fn environment(&self) -> Option<&Path> {
        match self {
            Self::Inactive => None,
            Self::ActiveAuto(path) | Self::ActiveManual(path) => Some(path),
        }
    }

    /// Whether the active environment was activated by this session
    #[must_use]
    pub const fn auto_activated(&self) -> bool {
        matches!(self, Self::ActiveAuto(_))
    }
}

/// What a directory-change event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to do
    Unchanged,
    /// A manually activated environment was left in place
    Preserved {
        /// The manual environment
        environment: PathBuf,
    },
    /// An environment was activated
    Activated {
        /// The environment now active
        environment: PathBuf,
    },
    /// The auto-activated environment was deactivated
    Deactivated {
        /// The environment that was active
        environment: PathBuf,
    },
    /// The auto-activated environment was replaced by another one
    Switched {
        /// The environment that was active
        from: PathBuf,
        /// The environment now active
        to: PathBuf,
    },
}

impl Transition {
    /// Whether any side effect was performed
    #[must_use]
    pub const fn is_change(&self) -> bool {
        matches!(
            self,
            Self::Activated { .. } | Self::Deactivated { .. } | Self::Switched { .. }
        )
    }
}

/// Per-shell-session activation context
pub struct Session<P> {
    search: AncestorSearch,
    state: ActivationState,
    hooks: HookRegistry,
    procedures: P,
}

impl<P: Procedures> Session<P> {
    /// Start a session with nothing active
    pub fn new(search: AncestorSearch, procedures: P) -> Self {
        Self::resume(search, procedures, ActivationState::Inactive)
    }

    /// Continue a session from previously observed state
    pub fn resume(search: AncestorSearch, procedures: P, state: ActivationState) -> Self {
        Self {
            search,
            state,
            hooks: HookRegistry::new(),
            procedures,
        }
    }

    /// Register a hook fired after every activation
    pub fn register_activate_hook(&mut self, hook: impl Hook + 'static) {
        self.hooks.register(HookEvent::Activate, hook);
    }

    /// Register a hook fired after every deactivation
    pub fn register_deactivate_hook(&mut self, hook: impl Hook + 'static) {
        self.hooks.register(HookEvent::Deactivate, hook);
    }

    /// Mutable access to the hook registry
    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// Whether any environment is currently active
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.environment().is_some()
    }

    /// The currently active environment
    #[must_use]
    pub fn active_environment(&self) -> Option<&Path> {
        self.state.environment()
    }

    /// Whether the active environment was activated by this session
    #[must_use]
    pub const fn auto_activated(&self) -> bool {
        self.state.auto_activated()
    }

    /// Current activation state
    #[must_use]
    pub const fn state(&self) -> &ActivationState {
        &self.state
    }

    /// The search used to locate environments
    #[must_use]
    pub const fn search(&self) -> &AncestorSearch {
        &self.search
    }

    /// Reconcile with the externally owned active-environment reference.
    ///
    /// Long-lived sessions call this before each event so that a manual
    /// `deactivate` or activation outside the session is noticed.
    pub fn sync_external(&mut self, active: Option<PathBuf>) {
        let next = match (active, &self.state) {
            (None, _) => ActivationState::Inactive,
            (Some(path), ActivationState::ActiveAuto(current)) if same_path(&path, current) => {
                return;
            }
            (Some(path), _) => ActivationState::ActiveManual(path),
        };
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "Active environment changed externally");
            self.state = next;
        }
    }

    /// Handle a working-directory change.
    ///
    /// A probe failure is returned as an error and leaves state untouched.
    pub fn on_directory_change(&mut self, cwd: &Path) -> Result<Transition> {
        let found = self.search.find(cwd)?;

        let transition = match (self.state.clone(), found) {
            (ActivationState::ActiveManual(environment), _) => {
                debug!(
                    environment = %environment.display(),
                    "Manually activated environment, leaving it alone"
                );
                Transition::Preserved { environment }
            }
            (ActivationState::Inactive, None) => Transition::Unchanged,
            (ActivationState::Inactive, Some(marker)) => {
                self.activate(&marker.path);
                Transition::Activated {
                    environment: marker.path,
                }
            }
            (ActivationState::ActiveAuto(current), None) => {
                self.deactivate(&current);
                Transition::Deactivated {
                    environment: current,
                }
            }
            (ActivationState::ActiveAuto(current), Some(marker)) => {
                if same_path(&current, &marker.path) {
                    debug!(environment = %current.display(), "Environment already active");
                    Transition::Unchanged
                } else {
                    self.deactivate(&current);
                    self.activate(&marker.path);
                    Transition::Switched {
                        from: current,
                        to: marker.path,
                    }
                }
            }
        };

        if transition.is_change() {
            info!(cwd = %cwd.display(), transition = ?transition, "Environment transition");
        }
        Ok(transition)
    }

    fn activate(&mut self, environment: &Path) {
        if let Err(e) = self.procedures.activate(environment) {
            warn!(
                environment = %environment.display(),
                error = %e,
                "Activation procedure failed; recording environment as active"
            );
        }
        self.state = ActivationState::ActiveAuto(environment.to_path_buf());
        self.hooks.run(HookEvent::Activate, environment);
    }

    fn deactivate(&mut self, environment: &Path) {
        match self.procedures.deactivate(environment) {
            Ok(Deactivation::Invoked) => {}
            Ok(Deactivation::Unavailable) => {
                debug!(
                    environment = %environment.display(),
                    "No deactivation procedure available, skipping"
                );
            }
            Err(e) => {
                warn!(
                    environment = %environment.display(),
                    error = %e,
                    "Deactivation procedure failed; recording environment as inactive"
                );
            }
        }
        self.state = ActivationState::Inactive;
        self.hooks.run(HookEvent::Deactivate, environment);
    }
}

impl<P> std::fmt::Debug for Session<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("search", &self.search)
            .field("state", &self.state)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Compare two environment paths, falling back to canonical forms
fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
