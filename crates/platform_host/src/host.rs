//! Host-service bundle injected into the desktop runtime.

use std::rc::Rc;

use crate::{
    AppDiscovery, AppStateStore, AppearanceCatalog, MemoryAppStateStore, MemoryPrefsStore,
    NoopStyleApplicator, PrefsStore, StaticAppearanceCatalog, StaticDiscovery, StyleApplicator,
};

/// Persistence posture selected for the current composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// File-backed durable stores.
    Durable,
    /// In-memory fallback stores; nothing survives the process.
    InMemory,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::InMemory => "in-memory",
        }
    }
}

/// Runtime-selected host service bundle injected into the desktop runtime.
///
/// All environment-specific service selection happens before this bundle crosses into
/// `desktop_runtime`, which keeps the runtime decoupled from backend details.
#[derive(Clone)]
pub struct HostServices {
    /// Session-settings preference store.
    pub prefs: Rc<dyn PrefsStore>,
    /// Namespaced per-application state store.
    pub app_state: Rc<dyn AppStateStore>,
    /// One-shot application discovery collaborator.
    pub discovery: Rc<dyn AppDiscovery>,
    /// Theme/wallpaper catalog used to validate selections.
    pub appearance: Rc<dyn AppearanceCatalog>,
    /// Style-table sink for the rendering surface.
    pub styles: Rc<dyn StyleApplicator>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Builds an all-in-memory bundle with no discovered applications and the built-in catalog.
    pub fn in_memory() -> Self {
        Self {
            prefs: Rc::new(MemoryPrefsStore::default()),
            app_state: Rc::new(MemoryAppStateStore::default()),
            discovery: Rc::new(StaticDiscovery::default()),
            appearance: Rc::new(StaticAppearanceCatalog::builtin()),
            styles: Rc::new(NoopStyleApplicator),
            host_strategy: HostStrategy::InMemory,
        }
    }

    /// Replaces the preference store.
    pub fn with_prefs(mut self, prefs: Rc<dyn PrefsStore>) -> Self {
        self.prefs = prefs;
        self
    }

    /// Replaces the app-state store.
    pub fn with_app_state(mut self, app_state: Rc<dyn AppStateStore>) -> Self {
        self.app_state = app_state;
        self
    }

    /// Replaces the discovery collaborator.
    pub fn with_discovery(mut self, discovery: Rc<dyn AppDiscovery>) -> Self {
        self.discovery = discovery;
        self
    }

    /// Replaces the appearance catalog.
    pub fn with_appearance(mut self, appearance: Rc<dyn AppearanceCatalog>) -> Self {
        self.appearance = appearance;
        self
    }

    /// Replaces the style applicator.
    pub fn with_styles(mut self, styles: Rc<dyn StyleApplicator>) -> Self {
        self.styles = styles;
        self
    }

    /// Sets the reported persistence strategy.
    pub fn with_strategy(mut self, host_strategy: HostStrategy) -> Self {
        self.host_strategy = host_strategy;
        self
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}
