//! Typed host-domain contracts and adapters consumed by the desktop runtime.
//!
//! This crate is the API-first boundary for platform services. It exposes the persistence port
//! (preference and namespaced app-state stores with durable and in-memory backends), the
//! application discovery collaborator, the appearance catalog, and the style applicator.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod appearance;
pub mod discovery;
pub mod error;
pub mod host;
pub mod storage;
pub mod style;

pub use appearance::{
    AppearanceCatalog, StaticAppearanceCatalog, ThemeDefinition, WallpaperDefinition,
    DEFAULT_THEME_ID, DEFAULT_WALLPAPER_ID,
};
pub use discovery::{
    load_manifest, AppDiscovery, ManifestDirDiscovery, StaticDiscovery, MANIFEST_FILE_SUFFIX,
};
pub use error::{DiscoveryError, StorageError};
pub use host::{HostServices, HostStrategy};
pub use storage::app_state::{
    app_namespace, load_app_state_typed_with, save_app_state_with, AppStateEnvelope,
    AppStateStore, AppStateStoreFuture, MemoryAppStateStore, APP_STATE_ENVELOPE_VERSION,
};
pub use storage::file::{FileAppStateStore, FilePrefsStore};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, PrefsStore, PrefsStoreFuture,
};
pub use style::{MemoryStyleApplicator, NoopStyleApplicator, StyleApplicator};
