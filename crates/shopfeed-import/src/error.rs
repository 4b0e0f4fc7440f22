use thiserror::Error;

/// Errors raised while setting up an [`ImportClient`](crate::ImportClient).
///
/// Failures of individual batches are not errors; they are recorded in the
/// [`ImportSummary`](crate::ImportSummary).
#[derive(Debug, Error)]
pub enum ImportError {
    /// The underlying HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid import base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
