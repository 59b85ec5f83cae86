//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or stepping a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition at t={t}: {what}")]
    NonPhysical { what: &'static str, t: f64 },

    #[error("Convergence failed at t={t}: {what}")]
    ConvergenceFailed { what: &'static str, t: f64 },

    #[error("Cancelled after {completed} of {total} time points")]
    Cancelled { completed: usize, total: usize },
}

impl SimError {
    /// True for failures of the numerical solver itself, as opposed to bad
    /// input or cancellation.
    pub fn is_integration_failure(&self) -> bool {
        matches!(
            self,
            SimError::NonPhysical { .. } | SimError::ConvergenceFailed { .. }
        )
    }
}

pub type SimResult<T> = Result<T, SimError>;

// Core errors only arise while validating parameters.
impl From<pd_core::CoreError> for SimError {
    fn from(e: pd_core::CoreError) -> Self {
        SimError::InvalidConfig {
            what: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_integration_failures() {
        assert!(SimError::NonPhysical { what: "x", t: 0.0 }.is_integration_failure());
        assert!(SimError::ConvergenceFailed { what: "x", t: 0.0 }.is_integration_failure());
        assert!(!SimError::InvalidArg { what: "dt" }.is_integration_failure());
        assert!(
            !SimError::Cancelled {
                completed: 1,
                total: 2
            }
            .is_integration_failure()
        );
    }

    #[test]
    fn core_error_maps_to_config() {
        let err: SimError = pd_core::CoreError::OutOfRange {
            what: "length",
            value: -1.0,
        }
        .into();
        assert!(matches!(err, SimError::InvalidConfig { .. }));
        assert!(err.to_string().contains("length"));
    }
}
