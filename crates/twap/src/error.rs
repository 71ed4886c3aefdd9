//! Application-wide error types using thiserror.

use twap_common::TwapError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration, cache, API or chart failure.
    #[error(transparent)]
    Twap(#[from] TwapError),

    /// Logging could not be set up.
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
