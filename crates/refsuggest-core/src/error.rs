// crates/refsuggest-core/src/error.rs

use thiserror::Error;

/// Errors raised while acquiring or decoding reference data.
///
/// None of these are fatal to a widget: the provider and resolver log them and
/// degrade to "no suggestions" / "default partition". They surface only through
/// the explicit `try_*` entry points.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, LookupError>;
