//! Error types for the CLI service layer.

/// Unified error for every command, wrapping the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<pd_project::ProjectError> for AppError {
    fn from(err: pd_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<pd_sim::SimError> for AppError {
    fn from(err: pd_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<pd_results::ResultsError> for AppError {
    fn from(err: pd_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
