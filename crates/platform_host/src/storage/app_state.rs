//! Per-application data port.
//!
//! Applications never share a key space with the session store or with each other: every payload
//! lives under [`app_namespace`] of its owner, wrapped in a versioned [`AppStateEnvelope`].

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    rc::Rc,
    time::{SystemTime, UNIX_EPOCH},
};

use desktop_app_contract::ApplicationId;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::StorageError;

/// Current layout of [`AppStateEnvelope`].
pub const APP_STATE_ENVELOPE_VERSION: u32 = 1;

thread_local! {
    static LAST_STAMP_MS: Cell<u64> = const { Cell::new(0) };
}

/// Unix milliseconds, bumped so consecutive stamps on one thread never repeat.
fn next_stamp_ms() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64);
    LAST_STAMP_MS.with(|last| {
        let next = now.max(last.get().saturating_add(1));
        last.set(next);
        next
    })
}

/// Storage namespace owned by `app_id`.
pub fn app_namespace(app_id: &ApplicationId) -> String {
    format!("app.{app_id}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Stored form of one application's data.
pub struct AppStateEnvelope {
    /// Layout version of the envelope itself.
    pub envelope_version: u32,
    /// Owning namespace, see [`app_namespace`].
    pub namespace: String,
    /// Version of the payload as declared by the application.
    pub schema_version: u32,
    /// Write time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Application payload.
    pub payload: Value,
}

impl AppStateEnvelope {
    /// Wraps an already-encoded payload, stamping the write time.
    pub fn new(namespace: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: APP_STATE_ENVELOPE_VERSION,
            namespace: namespace.into(),
            schema_version,
            updated_at_unix_ms: next_stamp_ms(),
            payload,
        }
    }

    /// Encodes `payload` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] when `payload` has no JSON form.
    pub fn encode<T: Serialize + ?Sized>(
        namespace: impl Into<String>,
        schema_version: u32,
        payload: &T,
    ) -> Result<Self, StorageError> {
        Ok(Self::new(
            namespace,
            schema_version,
            serde_json::to_value(payload)?,
        ))
    }

    /// Decodes the payload as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] when the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        Ok(T::deserialize(&self.payload)?)
    }
}

/// Boxed future returned by [`AppStateStore`] methods.
pub type AppStateStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Namespaced envelope store.
pub trait AppStateStore {
    /// Returns the envelope stored under `namespace`, if any.
    fn load_app_state_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<Option<AppStateEnvelope>, StorageError>>;

    /// Stores `envelope` under its own namespace, replacing any previous one.
    fn save_app_state_envelope<'a>(
        &'a self,
        envelope: &'a AppStateEnvelope,
    ) -> AppStateStoreFuture<'a, Result<(), StorageError>>;

    /// Removes whatever is stored under `namespace`.
    fn delete_app_state<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<(), StorageError>>;

    /// Namespaces with stored data, sorted.
    fn list_app_state_namespaces<'a>(
        &'a self,
    ) -> AppStateStoreFuture<'a, Result<Vec<String>, StorageError>>;
}

#[derive(Debug, Clone, Default)]
/// Process-local envelope store; clones share contents.
pub struct MemoryAppStateStore {
    envelopes: Rc<RefCell<BTreeMap<String, AppStateEnvelope>>>,
}

impl AppStateStore for MemoryAppStateStore {
    fn load_app_state_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<Option<AppStateEnvelope>, StorageError>> {
        let envelope = self.envelopes.borrow().get(namespace).cloned();
        Box::pin(async move { Ok(envelope) })
    }

    fn save_app_state_envelope<'a>(
        &'a self,
        envelope: &'a AppStateEnvelope,
    ) -> AppStateStoreFuture<'a, Result<(), StorageError>> {
        self.envelopes
            .borrow_mut()
            .insert(envelope.namespace.clone(), envelope.clone());
        Box::pin(async { Ok(()) })
    }

    fn delete_app_state<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<(), StorageError>> {
        self.envelopes.borrow_mut().remove(namespace);
        Box::pin(async { Ok(()) })
    }

    fn list_app_state_namespaces<'a>(
        &'a self,
    ) -> AppStateStoreFuture<'a, Result<Vec<String>, StorageError>> {
        let namespaces = self.envelopes.borrow().keys().cloned().collect();
        Box::pin(async move { Ok(namespaces) })
    }
}

/// Encodes `payload` and stores it under `namespace`.
///
/// # Errors
///
/// Propagates encoding and store failures.
pub async fn save_app_state_with<S, T>(
    store: &S,
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<(), StorageError>
where
    S: AppStateStore + ?Sized,
    T: Serialize + ?Sized,
{
    let envelope = AppStateEnvelope::encode(namespace, schema_version, payload)?;
    store.save_app_state_envelope(&envelope).await
}

/// Loads the envelope under `namespace` and decodes its payload as `T`.
///
/// # Errors
///
/// Propagates store failures and payload mismatches.
pub async fn load_app_state_typed_with<S, T>(
    store: &S,
    namespace: &str,
) -> Result<Option<T>, StorageError>
where
    S: AppStateStore + ?Sized,
    T: DeserializeOwned,
{
    store
        .load_app_state_envelope(namespace)
        .await?
        .map(|envelope| envelope.decode())
        .transpose()
}
