//! Explicit runtime effect executor for reducer-emitted side effects.

use desktop_app_contract::DesktopEvent;
use futures::executor::block_on;
use platform_host::{HostServices, StorageError};

use crate::{bus::NotificationBus, model::SessionState, persistence, reducer::RuntimeEffect};

fn log_persist_failure(what: &str, result: Result<(), StorageError>) {
    if let Err(err) = result {
        log::warn!("persist {what} failed: {err}");
    }
}

/// Runs `effects` in emission order against the host ports and the bus.
///
/// Persistence is best-effort: a failed write is logged and never rolls back `session`.
pub fn run_effects(
    host: &HostServices,
    bus: &NotificationBus<DesktopEvent>,
    session: &SessionState,
    effects: &[RuntimeEffect],
) {
    for effect in effects {
        match effect {
            RuntimeEffect::PersistTheme => log_persist_failure(
                "theme",
                block_on(persistence::persist_theme(host.prefs.as_ref(), session)),
            ),
            RuntimeEffect::PersistWallpaper => log_persist_failure(
                "wallpaper",
                block_on(persistence::persist_wallpaper(host.prefs.as_ref(), session)),
            ),
            RuntimeEffect::PersistSettings => log_persist_failure(
                "settings",
                block_on(persistence::persist_settings(host.prefs.as_ref(), session)),
            ),
            RuntimeEffect::ApplyStyles(table) => host.styles.apply_styles(table),
            RuntimeEffect::Publish(event) => {
                bus.publish(event);
            }
        }
    }
}
