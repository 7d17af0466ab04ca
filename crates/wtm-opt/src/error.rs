//! Optimizer error types.

use thiserror::Error;
use wtm_core::WtmError;

/// Errors surfaced by the maintenance scheduling optimizer.
#[derive(Error, Debug, Clone)]
pub enum MaintenanceError {
    /// Malformed cost parameters (negative costs, months outside 1-12).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input tables inconsistent with the requested domain (missing month
    /// classification, conflicting months for a day).
    #[error("Model construction error: {0}")]
    ModelConstruction(String),

    /// The solver proved no assignment satisfies the constraints. Cannot
    /// occur with the current coverage/exclusivity pair (internal-only is
    /// always feasible) but is handled for robustness against future
    /// constraint changes.
    #[error("Model infeasible: {0}")]
    Infeasible(String),

    /// The solver terminated abnormally (unbounded, crash, resource
    /// exhaustion).
    #[error("Solver error: {0}")]
    Solver(String),
}

/// Convenience alias for optimizer results.
pub type MaintenanceResult<T> = Result<T, MaintenanceError>;

impl From<MaintenanceError> for WtmError {
    fn from(err: MaintenanceError) -> Self {
        match err {
            MaintenanceError::Config(msg) => WtmError::Config(msg),
            MaintenanceError::ModelConstruction(msg) => WtmError::Validation(msg),
            MaintenanceError::Infeasible(msg) | MaintenanceError::Solver(msg) => {
                WtmError::Solver(msg)
            }
        }
    }
}
