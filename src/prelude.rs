//! Convenient re-exports for common usage patterns.
//!
//! A single import to bring the store, value types, codec, and error
//! types into scope.
//!
//! # Example
//!
//! ```ignore
//! use pref_kv::prelude::*;
//!
//! let store = PrefStore::init(".pref-kv", "settings")?;
//! store.put_int("count", 5)?;
//! assert_eq!(store.get_int_or("count", 0)?, 5);
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Object codec
pub use crate::codec::{self, DecodeError, EncodeError};

// Preferences store types
pub use crate::prefs::{PrefStore, PrefValue, StoreError, ValueKind};
