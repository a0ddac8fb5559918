use thiserror::Error;

/// Errors raised at the host boundary (decoding form state, naming fields).
///
/// A recomputation pass itself never fails: bad numbers become zero and
/// degenerate divisors resolve to zero.
#[derive(Debug, Error)]
pub enum RgmError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RgmError {
    fn from(e: serde_json::Error) -> Self {
        RgmError::SerializationError(e.to_string())
    }
}
