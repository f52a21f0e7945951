//! Host service selection for a [`DesktopConfig`].
//!
//! Durable stores are used when configured and openable; anything else falls back to the
//! in-memory stores so boot never fails for persistence reasons.

use std::rc::Rc;

use platform_host::{
    AppDiscovery, AppStateStore, FileAppStateStore, FilePrefsStore, HostServices, HostStrategy,
    ManifestDirDiscovery, MemoryAppStateStore, MemoryPrefsStore, PrefsStore, StaticDiscovery,
};

use crate::config::DesktopConfig;

fn prefs_store_for(config: &DesktopConfig) -> Option<Rc<dyn PrefsStore>> {
    let path = config.storage.path.as_ref()?;
    match FilePrefsStore::open(path) {
        Ok(store) => Some(Rc::new(store) as Rc<dyn PrefsStore>),
        Err(err) => {
            log::warn!("durable prefs store unavailable, using in-memory fallback: {err}");
            None
        }
    }
}

fn app_state_store_for(config: &DesktopConfig) -> Option<Rc<dyn AppStateStore>> {
    let path = config.storage.app_state_path.as_ref()?;
    match FileAppStateStore::open(path) {
        Ok(store) => Some(Rc::new(store) as Rc<dyn AppStateStore>),
        Err(err) => {
            log::warn!("durable app-state store unavailable, using in-memory fallback: {err}");
            None
        }
    }
}

/// Assembles the host bundle described by `config`.
///
/// The strategy is [`HostStrategy::Durable`] only when the preference store opened from disk.
pub fn host_services_for(config: &DesktopConfig) -> HostServices {
    let discovery: Rc<dyn AppDiscovery> = match &config.discovery.manifest_dir {
        Some(dir) => Rc::new(ManifestDirDiscovery::new(dir)),
        None => Rc::new(StaticDiscovery::default()),
    };
    let (prefs, strategy) = match prefs_store_for(config) {
        Some(prefs) => (prefs, HostStrategy::Durable),
        None => (
            Rc::new(MemoryPrefsStore::default()) as Rc<dyn PrefsStore>,
            HostStrategy::InMemory,
        ),
    };
    let app_state: Rc<dyn AppStateStore> = match app_state_store_for(config) {
        Some(store) => store,
        None => Rc::new(MemoryAppStateStore::default()),
    };

    let host = HostServices::in_memory()
        .with_prefs(prefs)
        .with_app_state(app_state)
        .with_discovery(discovery)
        .with_appearance(Rc::new(config.appearance_catalog()))
        .with_strategy(strategy);
    log::info!("host services ready ({})", strategy.as_str());
    host
}
