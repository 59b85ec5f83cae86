//! pd-results: run cache and trajectory storage.

pub mod export;
pub mod hash;
pub mod store;
pub mod summary;
pub mod types;

pub use export::{CSV_HEADER, export_csv};
pub use hash::compute_run_id;
pub use store::RunStore;
pub use summary::{RunSummary, summarize};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    #[error("Run {run_id} has no trajectory records")]
    EmptyRun { run_id: String },
}
