use thiserror::Error;

/// Application-level error type.
///
/// Everything the pipeline itself can hit is a data-quality problem and
/// degrades in place (empty strings, absent dates, skipped records); the
/// variants here cover the one contract violation the pipeline surfaces
/// (a non-object profile) and the I/O the CLI does around it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
