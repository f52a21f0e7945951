//! Session preference port: one raw JSON document per key.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

use crate::StorageError;

/// Boxed future returned by [`PrefsStore`] methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Key/value store holding the desktop session (theme, wallpaper, settings map).
///
/// Values are opaque JSON text; typed access goes through [`load_pref_with`] and
/// [`save_pref_with`].
pub trait PrefsStore {
    /// Returns the raw JSON stored under `key`, if any.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>>;

    /// Replaces the value stored under `key`.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>>;

    /// Removes `key`. Removing an absent key succeeds.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), StorageError>>;
}

#[derive(Debug, Clone, Default)]
/// Process-local preference store used when no durable location is configured.
///
/// Clones share one map, which lets a test hand the same store to two successive contexts.
pub struct MemoryPrefsStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>> {
        let value = self.entries.borrow().get(key).cloned();
        Box::pin(async move { Ok(value) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), raw_json.to_owned());
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        self.entries.borrow_mut().remove(key);
        Box::pin(async { Ok(()) })
    }
}

/// Reads `key` from `store` and decodes it as `T`.
///
/// # Errors
///
/// Propagates store failures and reports undecodable JSON as [`StorageError::Serialization`].
pub async fn load_pref_with<S, T>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: PrefsStore + ?Sized,
    T: DeserializeOwned,
{
    match store.load_pref(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and writes it under `key`.
///
/// # Errors
///
/// Propagates encoding and store failures.
pub async fn save_pref_with<S, T>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: PrefsStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.save_pref(key, &raw).await
}
