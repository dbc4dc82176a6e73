use serde_json::{json, Value};
use thiserror::Error;

/// Errors surfaced to callers of the studio.
///
/// AI copy failures are deliberately absent: they are degraded to a
/// placeholder inside [`crate::copy::generate_copy`] and never reach here.
#[derive(Debug, Error)]
pub enum StudioError {
    /// User-correctable input problem (missing fields, name too long).
    #[error("{0}")]
    Validation(String),

    /// Unknown, expired, or already-downloaded blob id.
    #[error("file not found or already downloaded")]
    NotFound,

    /// Too many copy requests from one client address.
    #[error("limit reached: at most 10 descriptions per hour, try again later")]
    RateLimited {
        /// Seconds until the caller's window resets.
        retry_after: u64,
    },

    /// Image decode/encode failures and anything else unexpected.
    #[error("{0}")]
    Internal(String),
}

impl StudioError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StudioError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        StudioError::Internal(msg.into())
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            StudioError::Validation(_) => 400,
            StudioError::NotFound => 404,
            StudioError::RateLimited { .. } => 429,
            StudioError::Internal(_) => 500,
        }
    }

    /// `Retry-After` value in seconds, when one applies.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            StudioError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// JSON body in the `{ "error": "..." }` shape the form UI expects.
    pub fn to_json(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

impl From<image::ImageError> for StudioError {
    fn from(err: image::ImageError) -> Self {
        StudioError::Internal(err.to_string())
    }
}
