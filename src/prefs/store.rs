//! Preferences store implementation using fjall.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec;
use crate::logging;

use super::error::StoreError;
use super::format::{decode_value, encode_value};
use super::types::{PrefValue, ValueKind};

/// Metadata keyspace and the key holding the store version.
const META_KEYSPACE: &str = "_meta";
const META_CONFIG_KEY: &str = "config";

/// Data keyspace prefix; one keyspace per namespace.
const DATA_PREFIX: &str = "prefs_";

/// Current store version.
const STORE_VERSION: u32 = 1;

/// A named preferences namespace backed by fjall.
///
/// Every mutation is persisted synchronously before the call returns;
/// there is no write batching and no atomicity across keys. The handle
/// holds no mutable state of its own, but concurrent writers to the same
/// key race at the storage layer (last commit wins).
pub struct PrefStore {
    db: fjall::Database,
    data: Keyspace,
    namespace: String,
}

impl PrefStore {
    /// Open an existing store at the given path.
    pub fn open(path: impl AsRef<Path>, namespace: &str) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::NotInitialized(path.display().to_string()));
        }

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        // Verify store version
        match meta.get(META_CONFIG_KEY)? {
            Some(config) => {
                let found = u32::from_le_bytes(
                    config.as_ref().try_into().map_err(|_| {
                        StoreError::InvalidFormat("Invalid config format".to_string())
                    })?,
                );
                if found != STORE_VERSION {
                    return Err(StoreError::VersionMismatch {
                        expected: STORE_VERSION,
                        found,
                    });
                }
            }
            None => return Err(StoreError::NotInitialized(path.display().to_string())),
        }

        Self::with_db(db, namespace)
    }

    /// Initialize a new store at the given path.
    ///
    /// Initializing a path that already holds a store of the current
    /// version opens it and leaves its data untouched.
    pub fn init(path: impl AsRef<Path>, namespace: &str) -> Result<Self, StoreError> {
        let db = fjall::Database::builder(path.as_ref()).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        if let Some(config) = meta.get(META_CONFIG_KEY)? {
            let found = u32::from_le_bytes(
                config.as_ref().try_into().map_err(|_| {
                    StoreError::InvalidFormat("Invalid config format".to_string())
                })?,
            );
            if found != STORE_VERSION {
                return Err(StoreError::VersionMismatch {
                    expected: STORE_VERSION,
                    found,
                });
            }
        } else {
            meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;
            db.persist(PersistMode::SyncAll)?;
        }

        Self::with_db(db, namespace)
    }

    fn with_db(db: fjall::Database, namespace: &str) -> Result<Self, StoreError> {
        let keyspace_name = format!("{}{}", DATA_PREFIX, namespace);
        let data = db.keyspace(&keyspace_name, KeyspaceCreateOptions::default)?;

        logging::info!(namespace = namespace, "opened preferences namespace");

        Ok(Self {
            db,
            data,
            namespace: namespace.to_string(),
        })
    }

    /// Namespace this handle operates on.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Store a value under a key, replacing any previous value.
    pub fn put(&self, key: &str, value: PrefValue) -> Result<(), StoreError> {
        logging::debug!(key = key, kind = %value.kind(), "put");
        self.data.insert(key, encode_value(&value))?;
        self.commit()
    }

    /// Read the value stored under a key, whatever its kind.
    pub fn get(&self, key: &str) -> Result<Option<PrefValue>, StoreError> {
        match self.data.get(key)? {
            Some(buffer) => Ok(Some(decode_value(buffer.as_ref())?)),
            None => Ok(None),
        }
    }

    /// True if the key is present.
    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.data.get(key)?.is_some())
    }

    /// Remove a key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        logging::debug!(key = key, "remove");
        self.data.remove(key)?;
        self.commit()
    }

    /// Remove every key in the namespace.
    pub fn clear(&self) -> Result<(), StoreError> {
        let keys: Vec<Vec<u8>> = self
            .data
            .iter()
            .filter_map(|kv| kv.key().ok().map(|k| k.to_vec()))
            .collect();
        logging::debug!(count = keys.len(), "clear");
        for key in keys {
            self.data.remove(&key)?;
        }
        self.commit()
    }

    /// List keys, optionally filtered by prefix and capped at `limit`.
    pub fn keys(&self, prefix: Option<&str>, limit: Option<usize>) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();

        for kv in self.data.prefix(prefix.unwrap_or("")) {
            let Ok(key_bytes) = kv.key() else {
                continue;
            };
            keys.push(String::from_utf8_lossy(&key_bytes).into_owned());

            if let Some(l) = limit {
                if keys.len() >= l {
                    break;
                }
            }
        }

        Ok(keys)
    }

    /// Snapshot of every key and value in the namespace.
    pub fn get_all(&self) -> Result<BTreeMap<String, PrefValue>, StoreError> {
        let mut all = BTreeMap::new();
        for key in self.keys(None, None)? {
            if let Some(value) = self.get(&key)? {
                all.insert(key, value);
            }
        }
        Ok(all)
    }

    // Typed accessors. A present value of a different kind is an error,
    // never a coercion.

    /// Read a boolean. Returns `None` when the key is absent.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Bool(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Bool, &other)),
        }
    }

    /// Read a boolean, falling back to `default` when the key is absent.
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, StoreError> {
        Ok(self.get_bool(key)?.unwrap_or(default))
    }

    /// Store a boolean.
    pub fn put_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.put(key, PrefValue::Bool(value))
    }

    /// Read an integer. Returns `None` when the key is absent.
    pub fn get_int(&self, key: &str) -> Result<Option<i32>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Int(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Int, &other)),
        }
    }

    /// Read an integer, falling back to `default` when the key is absent.
    pub fn get_int_or(&self, key: &str, default: i32) -> Result<i32, StoreError> {
        Ok(self.get_int(key)?.unwrap_or(default))
    }

    /// Store an integer.
    pub fn put_int(&self, key: &str, value: i32) -> Result<(), StoreError> {
        self.put(key, PrefValue::Int(value))
    }

    /// Read a float. Returns `None` when the key is absent.
    pub fn get_float(&self, key: &str) -> Result<Option<f64>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Float(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Float, &other)),
        }
    }

    /// Read a float, falling back to `default` when the key is absent.
    pub fn get_float_or(&self, key: &str, default: f64) -> Result<f64, StoreError> {
        Ok(self.get_float(key)?.unwrap_or(default))
    }

    /// Store a float.
    pub fn put_float(&self, key: &str, value: f64) -> Result<(), StoreError> {
        self.put(key, PrefValue::Float(value))
    }

    /// Read a long. Returns `None` when the key is absent.
    pub fn get_long(&self, key: &str) -> Result<Option<i64>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Long(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Long, &other)),
        }
    }

    /// Read a long, falling back to `default` when the key is absent.
    pub fn get_long_or(&self, key: &str, default: i64) -> Result<i64, StoreError> {
        Ok(self.get_long(key)?.unwrap_or(default))
    }

    /// Store a long.
    pub fn put_long(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.put(key, PrefValue::Long(value))
    }

    /// Read a string. Returns `None` when the key is absent.
    pub fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Text(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Text, &other)),
        }
    }

    /// Read a string, falling back to `default` when the key is absent.
    pub fn get_string_or(&self, key: &str, default: &str) -> Result<String, StoreError> {
        Ok(self
            .get_string(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Store a string.
    pub fn put_string(&self, key: &str, value: impl Into<String>) -> Result<(), StoreError> {
        self.put(key, PrefValue::Text(value.into()))
    }

    /// Read a string set. Returns `None` when the key is absent.
    pub fn get_string_set(&self, key: &str) -> Result<Option<BTreeSet<String>>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::TextSet(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::TextSet, &other)),
        }
    }

    /// Read a string set, falling back to `default` when the key is absent.
    pub fn get_string_set_or(
        &self,
        key: &str,
        default: BTreeSet<String>,
    ) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.get_string_set(key)?.unwrap_or(default))
    }

    /// Store a string set.
    pub fn put_string_set(&self, key: &str, value: BTreeSet<String>) -> Result<(), StoreError> {
        self.put(key, PrefValue::TextSet(value))
    }

    /// Serialize a value with [`codec::encode`] and store the result.
    pub fn put_object<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = codec::encode(value)?;
        self.put(key, PrefValue::Object(text))
    }

    /// Read back an object stored with [`put_object`](Self::put_object).
    ///
    /// Returns `None` when the key is absent. A stored value of a
    /// different kind, or object text whose recorded type does not match
    /// `T`, is an error.
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Object(text)) => Ok(Some(codec::decode(&text)?)),
            Some(other) => Err(mismatch(key, ValueKind::Object, &other)),
        }
    }

    /// Durably persist pending writes. Runs after every mutation.
    fn commit(&self) -> Result<(), StoreError> {
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

fn mismatch(key: &str, expected: ValueKind, found: &PrefValue) -> StoreError {
    StoreError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
