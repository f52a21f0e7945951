//! Reducer helpers for theme, wallpaper, and session hydration transitions.

use desktop_app_contract::{DesktopEvent, StyleTable};
use platform_host::{AppearanceCatalog, DEFAULT_THEME_ID, DEFAULT_WALLPAPER_ID};

use crate::{
    model::{DesktopState, SessionState},
    reducer::{DesktopAction, ReducerError, RuntimeEffect},
};

/// Style variable carrying the active theme id.
pub const THEME_STYLE_KEY: &str = "desktop-theme";
/// Style variable carrying the active wallpaper source.
pub const WALLPAPER_STYLE_KEY: &str = "desktop-wallpaper";

/// Flattens the session's theme and wallpaper into the table handed to the style applicator.
///
/// Unknown ids contribute only their id, so the table is total for any session.
pub fn compute_style_table(session: &SessionState, catalog: &dyn AppearanceCatalog) -> StyleTable {
    let mut table = catalog
        .theme(&session.theme_id)
        .map(|theme| theme.styles)
        .unwrap_or_default();
    table.insert(THEME_STYLE_KEY.to_string(), session.theme_id.clone());
    let wallpaper_source = catalog
        .wallpaper(&session.wallpaper_id)
        .map(|wallpaper| wallpaper.source)
        .unwrap_or_else(|| session.wallpaper_id.clone());
    table.insert(WALLPAPER_STYLE_KEY.to_string(), wallpaper_source);
    table
}

pub(super) fn reduce_appearance_action(
    state: &mut DesktopState,
    catalog: &dyn AppearanceCatalog,
    action: &DesktopAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    match action {
        DesktopAction::SetTheme { theme_id } => {
            if catalog.theme(theme_id).is_none() {
                return Err(ReducerError::UnknownTheme(theme_id.clone()));
            }
            state.session.theme_id = theme_id.clone();
            effects.push(RuntimeEffect::PersistTheme);
            effects.push(RuntimeEffect::Publish(DesktopEvent::ThemeChanged {
                theme_id: theme_id.clone(),
            }));
            effects.push(RuntimeEffect::ApplyStyles(compute_style_table(
                &state.session,
                catalog,
            )));
        }
        DesktopAction::SetWallpaper { wallpaper_id } => {
            if catalog.wallpaper(wallpaper_id).is_none() {
                return Err(ReducerError::UnknownWallpaper(wallpaper_id.clone()));
            }
            state.session.wallpaper_id = wallpaper_id.clone();
            effects.push(RuntimeEffect::PersistWallpaper);
            effects.push(RuntimeEffect::Publish(DesktopEvent::WallpaperChanged {
                wallpaper_id: wallpaper_id.clone(),
            }));
            effects.push(RuntimeEffect::ApplyStyles(compute_style_table(
                &state.session,
                catalog,
            )));
        }
        DesktopAction::HydrateSession {
            session,
            default_theme,
            default_wallpaper,
        } => {
            state.session.theme_id = resolve_or_default(
                session.theme_id.as_deref(),
                default_theme,
                DEFAULT_THEME_ID,
                "theme",
                |id| catalog.theme(id).is_some(),
            );
            state.session.wallpaper_id = resolve_or_default(
                session.wallpaper_id.as_deref(),
                default_wallpaper,
                DEFAULT_WALLPAPER_ID,
                "wallpaper",
                |id| catalog.wallpaper(id).is_some(),
            );
            state.session.settings = session.settings.clone();
            effects.push(RuntimeEffect::ApplyStyles(compute_style_table(
                &state.session,
                catalog,
            )));
        }
        _ => return Ok(false),
    }

    Ok(true)
}

/// Picks the persisted id when the catalog knows it, then the configured default, then the
/// built-in fallback.
fn resolve_or_default(
    persisted: Option<&str>,
    configured: &str,
    fallback: &str,
    label: &str,
    exists: impl Fn(&str) -> bool,
) -> String {
    let default_id = if exists(configured) {
        configured
    } else {
        log::warn!(
            "configured default {label} `{configured}` is not in the catalog; using `{fallback}`"
        );
        fallback
    };
    match persisted {
        Some(id) if exists(id) => id.to_string(),
        Some(id) => {
            log::warn!("persisted {label} `{id}` is not in the catalog; using `{default_id}`");
            default_id.to_string()
        }
        None => default_id.to_string(),
    }
}
