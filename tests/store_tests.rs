//! Integration tests for the preferences store.
//!
//! Each test gets its own store directory via tempfile; nothing here
//! depends on test ordering.

use std::collections::BTreeSet;

use pref_kv::{DecodeError, PrefStore, PrefValue, StoreError, ValueKind};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

fn temp_store() -> anyhow::Result<(TempDir, PrefStore)> {
    let dir = TempDir::new()?;
    let store = PrefStore::init(dir.path().join("db"), "settings")?;
    Ok((dir, store))
}

fn string_set(entries: &[&str]) -> BTreeSet<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WindowConfig {
    width: u32,
    height: u32,
    title: String,
    maximized: bool,
}

fn sample_config() -> WindowConfig {
    WindowConfig {
        width: 1280,
        height: 720,
        title: "main".to_string(),
        maximized: false,
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_open_missing_store_fails() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let result = PrefStore::open(dir.path().join("missing"), "settings");

    assert!(matches!(result, Err(StoreError::NotInitialized(_))));
    Ok(())
}

#[test]
fn test_reopen_preserves_values() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("db");

    {
        let store = PrefStore::init(&path, "settings")?;
        store.put_int("count", 5)?;
    }

    let store = PrefStore::open(&path, "settings")?;
    assert_eq!(store.get_int_or("count", 0)?, 5);
    Ok(())
}

#[test]
fn test_reinit_preserves_values() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("db");

    {
        let store = PrefStore::init(&path, "settings")?;
        store.put_bool("ready", true)?;
    }

    let store = PrefStore::init(&path, "settings")?;
    assert_eq!(store.get_bool_or("ready", false)?, true);
    Ok(())
}

#[test]
fn test_namespaces_are_isolated() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("db");

    let store = PrefStore::init(&path, "alpha")?;
    store.put_int("count", 1)?;
    drop(store);

    let other = PrefStore::open(&path, "beta")?;
    assert_eq!(other.get_int("count")?, None);
    assert_eq!(other.namespace(), "beta");
    Ok(())
}

// =============================================================================
// Typed scalars
// =============================================================================

#[test]
fn test_scalar_roundtrips() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;

    store.put_bool("flag", true)?;
    store.put_int("count", -7)?;
    store.put_float("ratio", 0.25)?;
    store.put_long("stamp", 1_700_000_000_000)?;
    store.put_string("name", "zed")?;
    store.put_string_set("tags", string_set(&["a", "b"]))?;

    assert_eq!(store.get_bool("flag")?, Some(true));
    assert_eq!(store.get_int("count")?, Some(-7));
    assert_eq!(store.get_float("ratio")?, Some(0.25));
    assert_eq!(store.get_long("stamp")?, Some(1_700_000_000_000));
    assert_eq!(store.get_string("name")?, Some("zed".to_string()));
    assert_eq!(store.get_string_set("tags")?, Some(string_set(&["a", "b"])));
    Ok(())
}

#[test]
fn test_missing_key_returns_default() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;

    assert!(!store.contains("absent")?);
    assert_eq!(store.get_bool_or("absent", true)?, true);
    assert_eq!(store.get_int_or("absent", 42)?, 42);
    assert_eq!(store.get_float_or("absent", 1.5)?, 1.5);
    assert_eq!(store.get_long_or("absent", -1)?, -1);
    assert_eq!(store.get_string_or("absent", "fallback")?, "fallback");
    assert_eq!(
        store.get_string_set_or("absent", string_set(&["x"]))?,
        string_set(&["x"])
    );
    Ok(())
}

#[test]
fn test_overwrite_returns_latest() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;

    store.put_string("theme", "light")?;
    store.put_string("theme", "dark")?;

    assert_eq!(store.get_string("theme")?, Some("dark".to_string()));
    Ok(())
}

#[test]
fn test_put_is_idempotent() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;

    store.put_int("count", 5)?;
    store.put_int("count", 5)?;

    assert_eq!(store.get_int("count")?, Some(5));
    assert_eq!(store.keys(None, None)?, vec!["count".to_string()]);
    Ok(())
}

#[test]
fn test_typed_get_rejects_wrong_kind() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;
    store.put_string("name", "zed")?;

    let err = store.get_int("name").unwrap_err();
    match err {
        StoreError::TypeMismatch {
            key,
            expected,
            found,
        } => {
            assert_eq!(key, "name");
            assert_eq!(expected, ValueKind::Int);
            assert_eq!(found, ValueKind::Text);
        }
        other => anyhow::bail!("expected type mismatch, got {:?}", other),
    }

    // The stored value is untouched by the failed read
    assert_eq!(store.get_string("name")?, Some("zed".to_string()));
    Ok(())
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn test_remove_key() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;

    store.put_int("count", 5)?;
    store.remove("count")?;

    assert!(!store.contains("count")?);
    assert_eq!(store.get_int_or("count", 0)?, 0);

    // Removing an absent key is fine
    store.remove("count")?;
    Ok(())
}

#[test]
fn test_clear_removes_everything() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;

    store.put_int("a", 1)?;
    store.put_string("b", "two")?;
    store.put_bool("c", true)?;

    store.clear()?;

    assert!(store.get_all()?.is_empty());
    assert!(!store.contains("a")?);
    Ok(())
}

// =============================================================================
// Listing
// =============================================================================

#[test]
fn test_keys_with_prefix_and_limit() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;

    store.put_int("net.timeout", 30)?;
    store.put_int("net.retries", 3)?;
    store.put_bool("ui.dark", true)?;

    let net_keys = store.keys(Some("net."), None)?;
    assert_eq!(net_keys.len(), 2);
    assert!(net_keys.iter().all(|k| k.starts_with("net.")));

    assert_eq!(store.keys(None, Some(1))?.len(), 1);
    assert_eq!(store.keys(None, None)?.len(), 3);
    Ok(())
}

#[test]
fn test_get_all_snapshot() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;

    store.put_int("count", 5)?;
    store.put_string("name", "zed")?;

    let all = store.get_all()?;
    assert_eq!(all.len(), 2);
    assert_eq!(all.get("count"), Some(&PrefValue::Int(5)));
    assert_eq!(all.get("name"), Some(&PrefValue::Text("zed".to_string())));
    Ok(())
}

// =============================================================================
// Objects
// =============================================================================

#[test]
fn test_object_roundtrip() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;
    let config = sample_config();

    store.put_object("window", &config)?;

    assert_eq!(store.get_object::<WindowConfig>("window")?, Some(config));
    Ok(())
}

#[test]
fn test_object_missing_key() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;

    assert_eq!(store.get_object::<WindowConfig>("absent")?, None);
    Ok(())
}

#[test]
fn test_object_survives_reopen() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("db");
    let config = sample_config();

    {
        let store = PrefStore::init(&path, "settings")?;
        store.put_object("window", &config)?;
    }

    let store = PrefStore::open(&path, "settings")?;
    assert_eq!(store.get_object::<WindowConfig>("window")?, Some(config));
    Ok(())
}

#[test]
fn test_object_wrong_type_fails_fast() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Telemetry {
        width: u32,
        height: u32,
        title: String,
        maximized: bool,
    }

    store.put_object("window", &sample_config())?;

    let err = store.get_object::<Telemetry>("window").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Decode(DecodeError::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_object_getter_rejects_scalar_value() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;
    store.put_int("count", 5)?;

    let err = store.get_object::<WindowConfig>("count").unwrap_err();
    assert!(matches!(
        err,
        StoreError::TypeMismatch {
            expected: ValueKind::Object,
            ..
        }
    ));
    Ok(())
}

#[test]
fn test_scalar_getter_rejects_object_value() -> anyhow::Result<()> {
    let (_dir, store) = temp_store()?;
    store.put_object("window", &sample_config())?;

    let err = store.get_string("window").unwrap_err();
    assert!(matches!(
        err,
        StoreError::TypeMismatch {
            found: ValueKind::Object,
            ..
        }
    ));
    Ok(())
}
