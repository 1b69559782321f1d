//! Activation and deactivation procedures supplied by the host integration

use crate::Result;
use std::path::Path;

/// Whether a deactivation procedure actually ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deactivation {
    /// The environment's deactivation procedure was invoked
    Invoked,
    /// The environment provides no deactivation procedure; nothing was done
    Unavailable,
}

/// Side-effecting operations that switch an environment on and off.
///
/// The session calls each procedure at most once per transition and records
/// the new state whether or not the procedure reports success.
pub trait Procedures {
    /// Activate the environment at `environment`
    fn activate(&mut self, environment: &Path) -> Result<()>;

    /// Deactivate the environment at `environment`
    fn deactivate(&mut self, environment: &Path) -> Result<Deactivation>;
}

impl<P: Procedures + ?Sized> Procedures for &mut P {
    fn activate(&mut self, environment: &Path) -> Result<()> {
        (**self).activate(environment)
    }

    fn deactivate(&mut self, environment: &Path) -> Result<Deactivation> {
        (**self).deactivate(environment)
    }
}

impl<P: Procedures + ?Sized> Procedures for Box<P> {
    fn activate(&mut self, environment: &Path) -> Result<()> {
        (**self).activate(environment)
    }

    fn deactivate(&mut self, environment: &Path) -> Result<Deactivation> {
        (**self).deactivate(environment)
    }
}
