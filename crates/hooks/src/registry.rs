//! Ordered hook registry with per-hook failure isolation

use crate::Result;
use crate::types::{HookContext, HookEvent, HookRunSummary};
use std::path::Path;
use tracing::{debug, warn};

/// A callback fired after an environment transition.
///
/// Any `FnMut(&HookContext) -> Result<()>` closure implements this trait.
pub trait Hook {
    /// Name used in logs when the hook fails
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Run the hook for one event
    fn invoke(&mut self, context: &HookContext<'_>) -> Result<()>;
}

impl<F> Hook for F
where
    F: FnMut(&HookContext<'_>) -> Result<()>,
{
    fn invoke(&mut self, context: &HookContext<'_>) -> Result<()> {
        self(context)
    }
}

/// A closure hook carrying an explicit name
pub struct NamedHook<F> {
    name: String,
    callback: F,
}

impl<F> NamedHook<F>
where
    F: FnMut(&HookContext<'_>) -> Result<()>,
{
    /// Wrap a closure with a name for diagnostics
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<F> Hook for NamedHook<F>
where
    F: FnMut(&HookContext<'_>) -> Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, context: &HookContext<'_>) -> Result<()> {
        (self.callback)(context)
    }
}

/// Append-only lists of post-activate and post-deactivate hooks
#[derive(Default)]
pub struct HookRegistry {
    on_activate: Vec<Box<dyn Hook>>,
    on_deactivate: Vec<Box<dyn Hook>>,
}

impl HookRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook to the list for `event`.
    ///
    /// Registering the same hook twice yields two invocations.
    pub fn register(&mut self, event: HookEvent, hook: impl Hook + 'static) {
        debug!(event = %event, hook = hook.name(), "Registering hook");
        self.hooks_mut(event).push(Box::new(hook));
    }

    /// Append a post-activate hook
    pub fn register_activate(&mut self, hook: impl Hook + 'static) {
        self.register(HookEvent::Activate, hook);
    }

    /// Append a post-deactivate hook
    pub fn register_deactivate(&mut self, hook: impl Hook + 'static) {
        self.register(HookEvent::Deactivate, hook);
    }

    /// Number of hooks registered for `event`
    #[must_use]
    pub fn len(&self, event: HookEvent) -> usize {
        match event {
            HookEvent::Activate => self.on_activate.len(),
            HookEvent::Deactivate => self.on_deactivate.len(),
        }
    }

    /// Whether no hooks are registered for either event
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.on_activate.is_empty() && self.on_deactivate.is_empty()
    }

    /// Invoke every hook registered for `event` in registration order.
    ///
    /// A failing hook is logged and skipped; the remaining hooks still run.
    pub fn run(&mut self, event: HookEvent, environment: &Path) -> HookRunSummary {
        let context = HookContext::new(event, environment);
        let mut summary = HookRunSummary::default();

        for hook in self.hooks_mut(event).iter_mut() {
            summary.invoked += 1;
            if let Err(e) = hook.invoke(&context) {
                summary.failed += 1;
                warn!(
                    event = %event,
                    hook = hook.name(),
                    environment = %environment.display(),
                    error = %e,
                    "Hook failed, continuing with remaining hooks"
                );
            }
        }

        debug!(
            event = %event,
            invoked = summary.invoked,
            failed = summary.failed,
            "Hooks finished"
        );
        summary
    }

    fn hooks_mut(&mut self, event: HookEvent) -> &mut Vec<Box<dyn Hook>> {
        match event {
            HookEvent::Activate => &mut self.on_activate,
            HookEvent::Deactivate => &mut self.on_deactivate,
        }
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("on_activate", &self.on_activate.len())
            .field("on_deactivate", &self.on_deactivate.len())
            .finish()
    }
}
