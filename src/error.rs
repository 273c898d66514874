//! Unified error type for the pref-kv library.
//!
//! This module provides a single [`Error`] type that encompasses all
//! errors that can occur in the library, making it easier to handle
//! errors in application code.

use thiserror::Error;

use crate::codec::{DecodeError, EncodeError};
use crate::prefs::StoreError;

/// Unified error type for all pref-kv operations.
///
/// # Example
///
/// ```ignore
/// use pref_kv::{PrefStore, Result};
///
/// fn do_something() -> Result<()> {
///     let store = PrefStore::open(".pref-kv", "settings")?;
///     store.put_int("count", 5)?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Error from preferences store operations.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Error producing encoded object text.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Error decoding object text.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a store error.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Returns `true` if this is a codec error, either direction.
    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Encode(_) | Self::Decode(_))
    }

    /// Returns `true` if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
