//! Directory-change behavior of the activation session

// Integration tests can use unwrap/expect for cleaner assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;
use uv_autoenv_core::hooks::{self, HookContext};
use uv_autoenv_core::{
    ActivationState, AncestorSearch, Deactivation, Error, Procedures, Session, Transition,
};

/// Records every procedure call in a log shared with hooks
#[derive(Default)]
struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
    fail_activate: bool,
    deactivate_unavailable: bool,
}

impl Recorder {
    fn with_log(log: &Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            log: Rc::clone(log),
            ..Self::default()
        }
    }
}

impl Procedures for Recorder {
    fn activate(&mut self, environment: &Path) -> uv_autoenv_core::Result<()> {
        self.log
            .borrow_mut()
            .push(format!("activate {}", environment.display()));
        if self.fail_activate {
            return Err(Error::procedure("activate", environment, "script missing"));
        }
        Ok(())
    }

    fn deactivate(&mut self, environment: &Path) -> uv_autoenv_core::Result<Deactivation> {
        if self.deactivate_unavailable {
            return Ok(Deactivation::Unavailable);
        }
        self.log
            .borrow_mut()
            .push(format!("deactivate {}", environment.display()));
        Ok(Deactivation::Invoked)
    }
}

struct Fixture {
    _temp: TempDir,
    root: PathBuf,
}

impl Fixture {
    /// `proj/.venv`, `proj/src/nested`, `other/`, `second/.venv`
    fn new() -> Self {
        let temp = tempfile::Builder::new()
            .prefix("uv_autoenv_test_")
            .tempdir()
            .unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("proj/.venv")).unwrap();
        fs::create_dir_all(root.join("proj/src/nested")).unwrap();
        fs::create_dir_all(root.join("other")).unwrap();
        fs::create_dir_all(root.join("second/.venv")).unwrap();
        Self { _temp: temp, root }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }
}

fn logging_hook(log: &Rc<RefCell<Vec<String>>>, label: &'static str) -> impl hooks::Hook + 'static {
    let log = Rc::clone(log);
    move |ctx: &HookContext<'_>| -> hooks::Result<()> {
        log.borrow_mut().push(format!("{label} {}", ctx.event));
        Ok(())
    }
}

#[test]
fn test_activate_then_deactivate_scenario() {
    let fx = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(AncestorSearch::default(), Recorder::with_log(&log));

    let transition = session
        .on_directory_change(&fx.path("proj/src/nested"))
        .unwrap();
    assert_eq!(
        transition,
        Transition::Activated {
            environment: fx.path("proj/.venv")
        }
    );
    assert_eq!(session.active_environment(), Some(fx.path("proj/.venv").as_path()));
    assert!(session.auto_activated());

    let transition = session.on_directory_change(&fx.path("other")).unwrap();
    assert_eq!(
        transition,
        Transition::Deactivated {
            environment: fx.path("proj/.venv")
        }
    );
    assert_eq!(session.active_environment(), None);
    assert!(!session.auto_activated());

    let deactivations = log
        .borrow()
        .iter()
        .filter(|line| line.starts_with("deactivate"))
        .count();
    assert_eq!(deactivations, 1);
}

#[test]
fn test_same_directory_twice_is_idempotent() {
    let fx = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(AncestorSearch::default(), Recorder::with_log(&log));
    session.register_activate_hook(logging_hook(&log, "hook"));

    session.on_directory_change(&fx.path("proj")).unwrap();
    let calls_after_first = log.borrow().len();

    let transition = session.on_directory_change(&fx.path("proj")).unwrap();
    assert_eq!(transition, Transition::Unchanged);
    assert_eq!(log.borrow().len(), calls_after_first);

    // Moving deeper inside the same project changes nothing either
    let transition = session
        .on_directory_change(&fx.path("proj/src/nested"))
        .unwrap();
    assert_eq!(transition, Transition::Unchanged);
    assert_eq!(log.borrow().len(), calls_after_first);
}

#[test]
fn test_manual_environment_is_left_alone() {
    let fx = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let manual = PathBuf::from("/manual/venv/path");
    let mut session = Session::resume(
        AncestorSearch::default(),
        Recorder::with_log(&log),
        ActivationState::from_parts(Some(manual.clone()), false),
    );
    session.register_activate_hook(logging_hook(&log, "on"));
    session.register_deactivate_hook(logging_hook(&log, "off"));

    let transition = session.on_directory_change(&fx.path("proj")).unwrap();
    assert_eq!(
        transition,
        Transition::Preserved {
            environment: manual.clone()
        }
    );

    let transition = session.on_directory_change(&fx.path("other")).unwrap();
    assert_eq!(
        transition,
        Transition::Preserved {
            environment: manual.clone()
        }
    );

    assert!(log.borrow().is_empty());
    assert_eq!(session.state(), &ActivationState::ActiveManual(manual));
    assert!(!session.auto_activated());
}

#[test]
fn test_nothing_found_while_inactive() {
    let fx = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(AncestorSearch::default(), Recorder::with_log(&log));

    let transition = session.on_directory_change(&fx.path("other")).unwrap();
    assert_eq!(transition, Transition::Unchanged);
    assert!(!session.is_active());
    assert!(log.borrow().is_empty());
}

#[test]
fn test_switch_between_projects_fires_both_hook_sets() {
    let fx = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(AncestorSearch::default(), Recorder::with_log(&log));
    session.register_activate_hook(logging_hook(&log, "hook"));
    session.register_deactivate_hook(logging_hook(&log, "hook"));

    session.on_directory_change(&fx.path("proj")).unwrap();
    log.borrow_mut().clear();

    let transition = session.on_directory_change(&fx.path("second")).unwrap();
    assert_eq!(
        transition,
        Transition::Switched {
            from: fx.path("proj/.venv"),
            to: fx.path("second/.venv"),
        }
    );
    assert_eq!(
        *log.borrow(),
        vec![
            format!("deactivate {}", fx.path("proj/.venv").display()),
            "hook deactivate".to_string(),
            format!("activate {}", fx.path("second/.venv").display()),
            "hook activate".to_string(),
        ]
    );
    assert_eq!(
        session.active_environment(),
        Some(fx.path("second/.venv").as_path())
    );
}

#[test]
fn test_hooks_run_in_order_after_procedure() {
    let fx = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(AncestorSearch::default(), Recorder::with_log(&log));
    session.register_activate_hook(logging_hook(&log, "h1"));
    session.register_activate_hook(logging_hook(&log, "h2"));

    session.on_directory_change(&fx.path("proj")).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            format!("activate {}", fx.path("proj/.venv").display()),
            "h1 activate".to_string(),
            "h2 activate".to_string(),
        ]
    );
}

#[test]
fn test_failed_activation_is_recorded_optimistically() {
    let fx = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let recorder = Recorder {
        fail_activate: true,
        ..Recorder::with_log(&log)
    };
    let mut session = Session::new(AncestorSearch::default(), recorder);
    session.register_activate_hook(logging_hook(&log, "hook"));

    let transition = session.on_directory_change(&fx.path("proj")).unwrap();
    assert!(transition.is_change());
    assert!(session.auto_activated());
    assert!(log.borrow().contains(&"hook activate".to_string()));
}

#[test]
fn test_missing_deactivate_procedure_is_skipped() {
    let fx = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let recorder = Recorder {
        deactivate_unavailable: true,
        ..Recorder::with_log(&log)
    };
    let mut session = Session::new(AncestorSearch::default(), recorder);
    session.register_deactivate_hook(logging_hook(&log, "hook"));

    session.on_directory_change(&fx.path("proj")).unwrap();
    let transition = session.on_directory_change(&fx.path("other")).unwrap();

    assert!(matches!(transition, Transition::Deactivated { .. }));
    assert!(!session.is_active());
    assert!(log.borrow().contains(&"hook deactivate".to_string()));
}

#[test]
fn test_failing_hook_does_not_abort_transition() {
    let fx = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(AncestorSearch::default(), Recorder::with_log(&log));
    session.register_activate_hook(|_: &HookContext<'_>| -> hooks::Result<()> {
        Err(hooks::Error::failed("bad", "boom"))
    });
    session.register_activate_hook(logging_hook(&log, "after"));

    session.on_directory_change(&fx.path("proj")).unwrap();

    assert!(session.auto_activated());
    assert!(log.borrow().contains(&"after activate".to_string()));
}

#[test]
fn test_resume_flag_without_reference_is_inactive() {
    let fx = Fixture::new();
    let mut session = Session::resume(
        AncestorSearch::default(),
        Recorder::default(),
        ActivationState::from_parts(None, true),
    );
    assert!(!session.is_active());

    let transition = session.on_directory_change(&fx.path("proj")).unwrap();
    assert!(matches!(transition, Transition::Activated { .. }));
}

#[test]
fn test_resumed_auto_environment_deactivates_on_exit() {
    let fx = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::resume(
        AncestorSearch::default(),
        Recorder::with_log(&log),
        ActivationState::from_parts(Some(fx.path("proj/.venv")), true),
    );

    let transition = session.on_directory_change(&fx.path("other")).unwrap();
    assert!(matches!(transition, Transition::Deactivated { .. }));
    assert_eq!(
        *log.borrow(),
        vec![format!("deactivate {}", fx.path("proj/.venv").display())]
    );
}

#[test]
fn test_sync_external_changes() {
    let fx = Fixture::new();
    let mut session = Session::new(AncestorSearch::default(), Recorder::default());
    session.on_directory_change(&fx.path("proj")).unwrap();

    // Same path reported back keeps ownership
    session.sync_external(Some(fx.path("proj/.venv")));
    assert!(session.auto_activated());

    // User ran `deactivate` themselves
    session.sync_external(None);
    assert_eq!(session.state(), &ActivationState::Inactive);

    // User activated something by hand
    session.sync_external(Some(PathBuf::from("/elsewhere/.venv")));
    assert_eq!(
        session.state(),
        &ActivationState::ActiveManual(PathBuf::from("/elsewhere/.venv"))
    );
}

#[test]
fn test_custom_marker() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.path("custom/venv")).unwrap();
    let mut session = Session::new(AncestorSearch::new("venv").unwrap(), Recorder::default());

    let transition = session.on_directory_change(&fx.path("custom")).unwrap();
    assert_eq!(
        transition,
        Transition::Activated {
            environment: fx.path("custom/venv")
        }
    );
}

#[cfg(unix)]
#[test]
fn test_probe_failure_aborts_and_keeps_state() {
    use std::os::unix::fs::PermissionsExt;

    let fx = Fixture::new();
    let locked = fx.path("proj/locked");
    let inner = locked.join("inner");
    fs::create_dir_all(&inner).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can traverse anyway; nothing to test then
    let privileged = fs::metadata(&inner).is_ok();

    let mut session = Session::new(AncestorSearch::default(), Recorder::default());
    let result = session.on_directory_change(&inner);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if privileged {
        return;
    }
    let err = result.unwrap_err();
    assert!(matches!(err, Error::Probe { .. }), "unexpected error: {err}");
    assert_eq!(session.state(), &ActivationState::Inactive);
}
