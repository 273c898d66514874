//! Persistent typed preferences storage with portable object encoding.
//!
//! This library provides a named, persistent key-value namespace for
//! typed scalar preferences, plus a codec that turns any serializable
//! value into base64 text that can be stored alongside the scalars.
//! Every mutation is committed to disk before the call returns.
//!
//! # Quick Start
//!
//! ```ignore
//! use pref_kv::prelude::*;
//!
//! // Initialize a preferences namespace
//! let store = PrefStore::init(".pref-kv", "settings")?;
//!
//! // Store and retrieve typed scalars
//! store.put_int("count", 5)?;
//! assert_eq!(store.get_int_or("count", 0)?, 5);
//!
//! // Store and retrieve whole serializable values
//! store.put_object("window", &window_config)?;
//! let config: WindowConfig = store.get_object("window")?.unwrap();
//! ```
//!
//! # Modules
//!
//! - [`codec`] - Object codec: serializable values to printable text and back
//! - [`prefs`] - Preferences store backed by fjall
//!
//! # Feature Flags
//!
//! - `cli` - Enable the command-line interface binary
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `full` - Enable all features

pub mod codec;
mod logging;
pub mod prefs;
pub mod prelude;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export codec types at crate root for convenience
pub use codec::{DecodeError, EncodeError};

// Re-export store types at crate root for convenience
pub use prefs::{PrefStore, PrefValue, StoreError, ValueKind};
