//! Error types for the object codec.

use thiserror::Error;

/// Errors that can occur while producing encoded object text.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Errors that can occur while decoding object text back into a value.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Envelope truncated: only {0} bytes")]
    Truncated(usize),

    #[error("Unsupported envelope version: {0}")]
    UnsupportedVersion(u8),

    #[error("Checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    Corrupted { stored: u32, computed: u32 },

    #[error("Type mismatch: stored '{stored}', requested '{requested}'")]
    TypeMismatch { stored: String, requested: String },

    #[error("Deserialization error: {0}")]
    Deserialize(String),
}
