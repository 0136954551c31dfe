//! Key-value persistence for generated settings types.
//!
//! This module provides:
//!
//! - [`Store`] — Trait over a string-keyed store of JSON values. Keys are
//!   exactly the generated key enumeration's `as_str` values, which are
//!   identical to the field names of the annotated struct.
//!
//! - [`MemoryStore`] — In-process implementation backed by a `RwLock`ed map,
//!   the "standard store" most applications construct and pass explicitly.
//!
//! - [`read_or`] / [`persist`] — Typed helpers called by generated code. The
//!   read path never fails hard: a missing key or a stored value of the wrong
//!   shape silently falls back to the captured default.
//!
//! - [`StoreError`] — Error type for the fallible [`try_persist`] surface.

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// A string-keyed store of JSON values.
///
/// Implementations are internally synchronized so a store can be shared
/// between a settings instance and its change subscriptions via `Arc`.
pub trait Store: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value);
}

/// Error type for persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serialization to the store's JSON representation failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// In-memory [`Store`] backed by a `RwLock`ed map.
///
/// # Example
///
/// ```
/// use prefs_runtime::store::{MemoryStore, Store};
///
/// let store = MemoryStore::new();
/// store.set("volume", serde_json::json!(11));
/// assert_eq!(store.get("volume"), Some(serde_json::json!(11)));
/// assert_eq!(store.get("missing"), None);
/// ```
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.entries.write().insert(key.to_string(), value);
    }
}

/// Reads `key` from the store, deserializing into `T`.
///
/// Falls back to `fallback()` when the key is missing or the stored value
/// does not match the expected shape. The fallback is silent by design;
/// a shape mismatch is logged at `debug` level only.
pub fn read_or<T, F>(store: &dyn Store, key: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.get(key) {
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(key, %err, "stored value has unexpected shape, using default");
                fallback()
            }
        },
        None => fallback(),
    }
}

/// Serializes `value` and stores it under `key`.
///
/// Returns an error if the value cannot be represented as JSON.
pub fn try_persist<T>(store: &dyn Store, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.set(key, value);
    Ok(())
}

/// Infallible wrapper around [`try_persist`] used by generated code.
///
/// A serialization failure is logged at `warn` level and otherwise ignored;
/// the store path never fails hard at runtime.
pub fn persist<T>(store: &dyn Store, key: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    if let Err(err) = try_persist(store, key, value) {
        tracing::warn!(key, %err, "failed to persist setting");
    }
}
