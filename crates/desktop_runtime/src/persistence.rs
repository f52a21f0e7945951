//! Desktop runtime persistence adapters for boot hydration and session preferences.
//!
//! Every write here is best-effort: callers log failures and keep the in-memory state, which stays
//! authoritative for the running session.

use std::collections::BTreeMap;

use desktop_app_contract::ApplicationId;
use platform_host::{
    app_namespace, load_app_state_typed_with, load_pref_with, save_app_state_with,
    save_pref_with, AppStateStore, PrefsStore, StorageError,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::model::SessionState;

pub const THEME_KEY: &str = "desktop.theme.v1";
pub const WALLPAPER_KEY: &str = "desktop.wallpaper.v1";
pub const SETTINGS_KEY: &str = "desktop.settings.v1";

/// Session values as read back from the preference store, before catalog validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistedSession {
    pub theme_id: Option<String>,
    pub wallpaper_id: Option<String>,
    pub settings: BTreeMap<String, Value>,
}

async fn load_or_warn<T: DeserializeOwned>(prefs: &dyn PrefsStore, key: &str) -> Option<T> {
    match load_pref_with(prefs, key).await {
        Ok(value) => value,
        Err(err) => {
            log::warn!("failed to load {key}: {err}");
            None
        }
    }
}

/// Loads persisted session values; unreadable or corrupt entries are treated as absent.
pub async fn load_session(prefs: &dyn PrefsStore) -> PersistedSession {
    PersistedSession {
        theme_id: load_or_warn(prefs, THEME_KEY).await,
        wallpaper_id: load_or_warn(prefs, WALLPAPER_KEY).await,
        settings: load_or_warn(prefs, SETTINGS_KEY).await.unwrap_or_default(),
    }
}

pub async fn persist_theme(prefs: &dyn PrefsStore, session: &SessionState) -> Result<(), StorageError> {
    save_pref_with(prefs, THEME_KEY, &session.theme_id).await
}

pub async fn persist_wallpaper(
    prefs: &dyn PrefsStore,
    session: &SessionState,
) -> Result<(), StorageError> {
    save_pref_with(prefs, WALLPAPER_KEY, &session.wallpaper_id).await
}

pub async fn persist_settings(
    prefs: &dyn PrefsStore,
    session: &SessionState,
) -> Result<(), StorageError> {
    save_pref_with(prefs, SETTINGS_KEY, &session.settings).await
}

/// Writes all session values, stopping at the first failure.
pub async fn persist_session(
    prefs: &dyn PrefsStore,
    session: &SessionState,
) -> Result<(), StorageError> {
    persist_theme(prefs, session).await?;
    persist_wallpaper(prefs, session).await?;
    persist_settings(prefs, session).await
}

/// Saves application-owned data under the application's namespace.
pub async fn save_app_data<T: Serialize>(
    store: &dyn AppStateStore,
    app_id: &ApplicationId,
    schema_version: u32,
    payload: &T,
) -> Result<(), StorageError> {
    save_app_state_with(store, &app_namespace(app_id), schema_version, payload).await
}

pub async fn load_app_data<T: DeserializeOwned>(
    store: &dyn AppStateStore,
    app_id: &ApplicationId,
) -> Result<Option<T>, StorageError> {
    load_app_state_typed_with(store, &app_namespace(app_id)).await
}
