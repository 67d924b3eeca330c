use thiserror::Error;

/// Errors produced while parsing identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string {input:?}: {reason}")]
    InvalidHex { input: String, reason: String },

    #[error("invalid hash length for {input:?}: expected {expected} hex chars, got {actual}")]
    InvalidLength {
        input: String,
        expected: usize,
        actual: usize,
    },
}
