//! Error types for the preferences store.

use thiserror::Error;

use crate::codec::{DecodeError, EncodeError};

use super::types::ValueKind;

/// Errors that can occur during preferences store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Store not initialized at {0}")]
    NotInitialized(String),

    #[error("Store version mismatch: expected {expected}, got {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Type mismatch for key '{key}': requested {expected}, stored {found}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Object encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Object decoding error: {0}")]
    Decode(#[from] DecodeError),
}
