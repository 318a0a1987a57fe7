//! Error type shared by the diagnostics layer.

use thiserror::Error;

/// Failures inside the diagnostic logger. None of these ever reach a foreign caller.
#[derive(Error, Debug)]
pub enum DiagnosticsError {
    #[error("failed to build diagnostic thread pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write diagnostic record: {0}")]
    Emit(#[from] std::io::Error),

    #[error("diagnostic task panicked: {0}")]
    Panicked(String),
}

/// Result type alias using DiagnosticsError
pub type Result<T> = std::result::Result<T, DiagnosticsError>;
