//! Type definitions for hook events and invocation context

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lifecycle event a hook is registered for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HookEvent {
    /// Fired after an environment was activated
    Activate,
    /// Fired after an environment was deactivated
    Deactivate,
}

impl HookEvent {
    /// Lowercase name used in logs and shell integration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }
}

impl std::fmt::Display for HookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Information handed to every hook invocation
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// The event being fired
    pub event: HookEvent,
    /// Environment directory that was activated or deactivated
    pub environment: &'a Path,
}

impl<'a> HookContext<'a> {
    /// Create a context for an event on the given environment
    #[must_use]
    pub const fn new(event: HookEvent, environment: &'a Path) -> Self {
        Self { event, environment }
    }
}

/// Outcome of running every hook registered for one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookRunSummary {
    /// Number of hooks invoked
    pub invoked: usize,
    /// Number of hooks that returned an error
    pub failed: usize,
}

impl HookRunSummary {
    /// Whether every invoked hook succeeded
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        assert_eq!(HookEvent::Activate.to_string(), "activate");
        assert_eq!(HookEvent::Deactivate.to_string(), "deactivate");
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&HookEvent::Deactivate).unwrap();
        assert_eq!(json, "\"deactivate\"");
        let event: HookEvent = serde_json::from_str("\"activate\"").unwrap();
        assert_eq!(event, HookEvent::Activate);
    }

    #[test]
    fn test_summary_all_succeeded() {
        assert!(HookRunSummary::default().all_succeeded());
        let summary = HookRunSummary {
            invoked: 3,
            failed: 1,
        };
        assert!(!summary.all_succeeded());
    }
}
