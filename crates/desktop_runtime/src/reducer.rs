//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

mod appearance;

use desktop_app_contract::{AppManifest, ApplicationId, DesktopEvent, StyleTable, WindowId};
use platform_host::AppearanceCatalog;
use serde_json::Value;
use thiserror::Error;

pub use self::appearance::compute_style_table;
use crate::{
    apps::{AppDescriptor, RegistryError},
    model::{DesktopState, OpenWindowRequest},
    persistence::PersistedSession,
    window_manager::{
        build_window_record, find_window_mut, raise_window, remove_window, reusable_window,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or raise the existing one for single-instance apps.
    OpenWindow(OpenWindowRequest),
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Focus when minimized, minimize otherwise.
    ToggleMinimize {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Toggle the maximized flag, snapshotting geometry on the way in.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Clear minimized/maximized/hidden, restore geometry, and focus.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Hide a window without minimizing it.
    HideWindow {
        /// Window to hide.
        window_id: WindowId,
    },
    /// Close an exact window.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Close the first window owned by an application, if any.
    CloseApp {
        /// Owning application.
        app_id: ApplicationId,
    },
    /// Close every window owned by an application.
    CloseAllForApp {
        /// Owning application.
        app_id: ApplicationId,
    },
    /// Trusted position write from the presentation layer.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// New x coordinate.
        x: i32,
        /// New y coordinate.
        y: i32,
    },
    /// Trusted size write from the presentation layer.
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// New width.
        w: i32,
        /// New height.
        h: i32,
    },
    /// Register a runtime-installed application.
    InstallApplication {
        /// Manifest of the new application.
        manifest: AppManifest,
    },
    /// Remove an application and close its windows.
    UninstallApplication {
        /// Application to remove.
        app_id: ApplicationId,
    },
    /// Discovery change notification; unknown ids are installed, known ids ignored.
    ApplicationsDiscovered {
        /// Full manifest list reported by the collaborator.
        manifests: Vec<AppManifest>,
    },
    /// Select a catalog theme.
    SetTheme {
        /// Theme id.
        theme_id: String,
    },
    /// Select a catalog wallpaper.
    SetWallpaper {
        /// Wallpaper id.
        wallpaper_id: String,
    },
    /// Write one free-form session setting.
    SetSetting {
        /// Setting key.
        key: String,
        /// JSON value.
        value: Value,
    },
    /// Hydrate session state loaded at boot, falling back to defaults.
    HydrateSession {
        /// Values read from the preference store.
        session: PersistedSession,
        /// Theme used when the persisted one is missing or unknown.
        default_theme: String,
        /// Wallpaper used when the persisted one is missing or unknown.
        default_wallpaper: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the effect executor to run in order.
pub enum RuntimeEffect {
    /// Persist the session theme.
    PersistTheme,
    /// Persist the session wallpaper.
    PersistWallpaper,
    /// Persist the session settings map.
    PersistSettings,
    /// Push a recomputed style table to the style applicator.
    ApplyStyles(StyleTable),
    /// Deliver a notification to bus subscribers.
    Publish(DesktopEvent),
}

impl RuntimeEffect {
    /// Returns the published event, if this effect is a publication.
    pub fn event(&self) -> Option<&DesktopEvent> {
        match self {
            Self::Publish(event) => Some(event),
            _ => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions. Every error leaves the state untouched.
pub enum ReducerError {
    /// Open referenced an application that is not registered.
    #[error("unknown application `{0}`")]
    UnknownApplication(ApplicationId),
    /// Install collided with a registered id.
    #[error("application `{0}` is already installed")]
    DuplicateApplication(ApplicationId),
    /// Uninstall referenced an application that is not registered.
    #[error("application `{0}` is not installed")]
    ApplicationNotFound(ApplicationId),
    /// The target window id was not found in the current state.
    #[error("window `{0}` not found")]
    WindowNotFound(WindowId),
    /// The theme id is not in the appearance catalog.
    #[error("unknown theme `{0}`")]
    UnknownTheme(String),
    /// The wallpaper id is not in the appearance catalog.
    #[error("unknown wallpaper `{0}`")]
    UnknownWallpaper(String),
    /// Session settings require a non-empty key.
    #[error("setting key must not be empty")]
    EmptySettingKey,
}

impl From<RegistryError> for ReducerError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateId(app_id) => Self::DuplicateApplication(app_id),
            RegistryError::NotFound(app_id) => Self::ApplicationNotFound(app_id),
        }
    }
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for window management, the
/// application registry, and session settings. Validation happens before any mutation, so an
/// `Err` always leaves `state` unchanged.
///
/// # Errors
///
/// Returns a [`ReducerError`] when the action references an unknown window, application, theme,
/// or wallpaper, or collides with a registered application.
pub fn reduce_desktop(
    state: &mut DesktopState,
    catalog: &dyn AppearanceCatalog,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    if appearance::reduce_appearance_action(state, catalog, &action, &mut effects)? {
        return Ok(effects);
    }

    match action {
        DesktopAction::OpenWindow(req) => {
            let descriptor = state
                .registry
                .find(&req.app_id)
                .cloned()
                .ok_or_else(|| ReducerError::UnknownApplication(req.app_id.clone()))?;
            if descriptor.single_instance {
                if let Some(window_id) = reusable_window(state, &descriptor.app_id) {
                    log::debug!("reusing single-instance window {window_id}");
                    focus(state, &window_id, &mut effects)?;
                    return Ok(effects);
                }
            }
            let record = build_window_record(state, &descriptor, &req);
            log::debug!("opened window {} at stack order {}", record.id, record.stack_order);
            effects.push(RuntimeEffect::Publish(DesktopEvent::WindowOpened {
                window_id: record.id.clone(),
                stack_order: record.stack_order,
            }));
            state.windows.push(record);
        }
        DesktopAction::FocusWindow { window_id } => {
            focus(state, &window_id, &mut effects)?;
        }
        DesktopAction::MinimizeWindow { window_id } => {
            minimize(state, &window_id, &mut effects)?;
        }
        DesktopAction::ToggleMinimize { window_id } => {
            let minimized = state
                .find_window(&window_id)
                .map(|w| w.minimized)
                .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
            if minimized {
                focus(state, &window_id, &mut effects)?;
            } else {
                minimize(state, &window_id, &mut effects)?;
            }
        }
        DesktopAction::ToggleMaximize { window_id } => {
            let window = find_window_mut(state, &window_id)
                .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
            if window.maximized {
                if let Some(restore_rect) = window.restore_rect.take() {
                    window.rect = restore_rect;
                }
                window.maximized = false;
            } else {
                window.restore_rect = Some(window.rect);
                window.maximized = true;
            }
            effects.push(RuntimeEffect::Publish(DesktopEvent::WindowMaximized {
                window_id,
                maximized: window.maximized,
            }));
        }
        DesktopAction::RestoreWindow { window_id } => {
            let window = find_window_mut(state, &window_id)
                .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
            if window.maximized {
                if let Some(restore_rect) = window.restore_rect.take() {
                    window.rect = restore_rect;
                }
                window.maximized = false;
            }
            window.minimized = false;
            window.hidden = false;
            effects.push(RuntimeEffect::Publish(DesktopEvent::WindowRestored {
                window_id: window_id.clone(),
            }));
            focus(state, &window_id, &mut effects)?;
        }
        DesktopAction::HideWindow { window_id } => {
            let window = find_window_mut(state, &window_id)
                .ok_or(ReducerError::WindowNotFound(window_id))?;
            window.hidden = true;
        }
        DesktopAction::CloseWindow { window_id } => {
            close(state, &window_id, &mut effects)?;
        }
        DesktopAction::CloseApp { app_id } => {
            let first = state.windows_for_app(&app_id).next().map(|w| w.id.clone());
            if let Some(window_id) = first {
                close(state, &window_id, &mut effects)?;
            }
        }
        DesktopAction::CloseAllForApp { app_id } => {
            close_all_for_app(state, &app_id, &mut effects);
        }
        DesktopAction::MoveWindow { window_id, x, y } => {
            let window = find_window_mut(state, &window_id)
                .ok_or(ReducerError::WindowNotFound(window_id))?;
            window.rect = window.rect.with_position(x, y);
        }
        DesktopAction::ResizeWindow { window_id, w, h } => {
            let window = find_window_mut(state, &window_id)
                .ok_or(ReducerError::WindowNotFound(window_id))?;
            window.rect = window.rect.with_size(w, h);
        }
        DesktopAction::InstallApplication { manifest } => {
            let app_id = manifest.app_id.clone();
            state.registry.add(AppDescriptor::from(manifest))?;
            log::info!("installed application {app_id}");
            effects.push(RuntimeEffect::Publish(DesktopEvent::ApplicationInstalled {
                app_id,
            }));
        }
        DesktopAction::UninstallApplication { app_id } => {
            state.registry.remove(&app_id)?;
            close_all_for_app(state, &app_id, &mut effects);
            log::info!("uninstalled application {app_id}");
            effects.push(RuntimeEffect::Publish(DesktopEvent::ApplicationRemoved {
                app_id,
            }));
        }
        DesktopAction::ApplicationsDiscovered { manifests } => {
            for manifest in manifests {
                if state.registry.contains(&manifest.app_id) {
                    continue;
                }
                let app_id = manifest.app_id.clone();
                state.registry.add(AppDescriptor::from(manifest))?;
                log::info!("discovered application {app_id}");
                effects.push(RuntimeEffect::Publish(DesktopEvent::ApplicationInstalled {
                    app_id,
                }));
            }
        }
        DesktopAction::SetSetting { key, value } => {
            if key.trim().is_empty() {
                return Err(ReducerError::EmptySettingKey);
            }
            state.session.settings.insert(key.clone(), value);
            effects.push(RuntimeEffect::PersistSettings);
            effects.push(RuntimeEffect::Publish(DesktopEvent::SettingChanged { key }));
        }
        DesktopAction::SetTheme { .. }
        | DesktopAction::SetWallpaper { .. }
        | DesktopAction::HydrateSession { .. } => {}
    }

    Ok(effects)
}

fn focus(
    state: &mut DesktopState,
    window_id: &WindowId,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let stack_order = raise_window(state, window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
    log::debug!("focused window {window_id} at stack order {stack_order}");
    effects.push(RuntimeEffect::Publish(DesktopEvent::WindowFocused {
        window_id: window_id.clone(),
        stack_order,
    }));
    Ok(())
}

fn minimize(
    state: &mut DesktopState,
    window_id: &WindowId,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let window = find_window_mut(state, window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
    window.minimized = true;
    window.hidden = true;
    effects.push(RuntimeEffect::Publish(DesktopEvent::WindowMinimized {
        window_id: window_id.clone(),
    }));
    Ok(())
}

fn close(
    state: &mut DesktopState,
    window_id: &WindowId,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let record = remove_window(state, window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
    log::debug!("closed window {}", record.id);
    effects.push(RuntimeEffect::Publish(DesktopEvent::WindowClosed {
        window_id: record.id,
    }));
    Ok(())
}

fn close_all_for_app(
    state: &mut DesktopState,
    app_id: &ApplicationId,
    effects: &mut Vec<RuntimeEffect>,
) {
    let (closed, kept) = std::mem::take(&mut state.windows)
        .into_iter()
        .partition::<Vec<_>, _>(|w| w.id.is_owned_by(app_id));
    state.windows = kept;
    for record in closed {
        log::debug!("closed window {}", record.id);
        effects.push(RuntimeEffect::Publish(DesktopEvent::WindowClosed {
            window_id: record.id,
        }));
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::DesktopEventKind;
    use platform_host::StaticAppearanceCatalog;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{apps::AppRegistry, model::WindowPlacement};

    fn id(raw: &str) -> ApplicationId {
        ApplicationId::trusted(raw)
    }

    fn state() -> DesktopState {
        let (registry, _) = AppRegistry::from_manifests(vec![
            AppManifest::new(id("notes"), "Notes"),
            AppManifest::new(id("calc"), "Calculator").single_instance(),
        ]);
        DesktopState::new(registry, WindowPlacement::default())
    }

    fn reduce(
        state: &mut DesktopState,
        action: DesktopAction,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        reduce_desktop(state, &StaticAppearanceCatalog::builtin(), action)
    }

    fn open(state: &mut DesktopState, app: &str) -> WindowId {
        let effects = reduce(
            state,
            DesktopAction::OpenWindow(OpenWindowRequest::new(id(app))),
        )
        .expect("open window");
        effects
            .iter()
            .find_map(|effect| effect.event().and_then(DesktopEvent::window_id).cloned())
            .expect("window event")
    }

    fn kinds(effects: &[RuntimeEffect]) -> Vec<DesktopEventKind> {
        effects
            .iter()
            .filter_map(RuntimeEffect::event)
            .map(DesktopEvent::kind)
            .collect()
    }

    #[test]
    fn open_window_allocates_sequential_ids_and_stack_orders() {
        let mut state = state();
        let first = open(&mut state, "notes");
        let second = open(&mut state, "notes");

        assert_eq!(first.to_string(), "notes-0");
        assert_eq!(second.to_string(), "notes-1");
        assert_eq!(state.windows[0].stack_order, 1000);
        assert_eq!(state.windows[1].stack_order, 1001);
        assert_eq!(state.windows[1].rect, state.windows[0].rect.offset(20, 20));
        assert_eq!(state.topmost_window_id(), Some(&second));
    }

    #[test]
    fn open_unknown_application_fails_without_mutation() {
        let mut state = state();
        let before = state.clone();
        let err = reduce(
            &mut state,
            DesktopAction::OpenWindow(OpenWindowRequest::new(id("paint"))),
        )
        .expect_err("unknown app");
        assert_eq!(err, ReducerError::UnknownApplication(id("paint")));
        assert_eq!(state, before);
    }

    #[test]
    fn single_instance_open_reuses_and_raises_existing_window() {
        let mut state = state();
        let calc = open(&mut state, "calc");
        let _notes = open(&mut state, "notes");
        reduce(
            &mut state,
            DesktopAction::MinimizeWindow {
                window_id: calc.clone(),
            },
        )
        .expect("minimize");

        let effects = reduce(
            &mut state,
            DesktopAction::OpenWindow(OpenWindowRequest::new(id("calc"))),
        )
        .expect("reopen");
        assert_eq!(kinds(&effects), vec![DesktopEventKind::WindowFocused]);
        assert_eq!(state.windows.len(), 2);
        let record = state.find_window(&calc).expect("calc window");
        assert!(record.is_active());
        assert_eq!(record.stack_order, 1002);
        assert_eq!(state.next_sequence, 2);
    }

    #[test]
    fn focus_always_bumps_stack_order() {
        let mut state = state();
        let win = open(&mut state, "notes");
        let effects = reduce(
            &mut state,
            DesktopAction::FocusWindow {
                window_id: win.clone(),
            },
        )
        .expect("focus");
        assert_eq!(
            effects,
            vec![RuntimeEffect::Publish(DesktopEvent::WindowFocused {
                window_id: win.clone(),
                stack_order: 1001,
            })]
        );
        reduce(&mut state, DesktopAction::FocusWindow { window_id: win }).expect("focus again");
        assert_eq!(state.windows[0].stack_order, 1002);
    }

    #[test]
    fn minimize_sets_both_flags_and_keeps_stack_order() {
        let mut state = state();
        let win = open(&mut state, "notes");
        reduce(
            &mut state,
            DesktopAction::MinimizeWindow {
                window_id: win.clone(),
            },
        )
        .expect("minimize");
        let record = state.find_window(&win).expect("window");
        assert!(record.minimized);
        assert!(record.hidden);
        assert_eq!(record.stack_order, 1000);
        assert_eq!(state.topmost_window_id(), None);
    }

    #[test]
    fn toggle_minimize_alternates_between_minimize_and_focus() {
        let mut state = state();
        let win = open(&mut state, "notes");
        let _other = open(&mut state, "notes");

        let effects = reduce(
            &mut state,
            DesktopAction::ToggleMinimize {
                window_id: win.clone(),
            },
        )
        .expect("minimize");
        assert_eq!(kinds(&effects), vec![DesktopEventKind::WindowMinimized]);

        let effects = reduce(
            &mut state,
            DesktopAction::ToggleMinimize {
                window_id: win.clone(),
            },
        )
        .expect("restore");
        assert_eq!(kinds(&effects), vec![DesktopEventKind::WindowFocused]);
        assert_eq!(state.topmost_window_id(), Some(&win));
    }

    #[test]
    fn toggle_maximize_snapshots_and_restores_geometry() {
        let mut state = state();
        let win = open(&mut state, "notes");
        let original = state.windows[0].rect;

        reduce(
            &mut state,
            DesktopAction::ToggleMaximize {
                window_id: win.clone(),
            },
        )
        .expect("maximize");
        assert!(state.windows[0].maximized);
        assert_eq!(state.windows[0].restore_rect, Some(original));

        reduce(
            &mut state,
            DesktopAction::ResizeWindow {
                window_id: win.clone(),
                w: 1920,
                h: 1080,
            },
        )
        .expect("presentation resize");
        let effects = reduce(
            &mut state,
            DesktopAction::ToggleMaximize {
                window_id: win.clone(),
            },
        )
        .expect("unmaximize");
        assert_eq!(
            effects,
            vec![RuntimeEffect::Publish(DesktopEvent::WindowMaximized {
                window_id: win,
                maximized: false,
            })]
        );
        assert_eq!(state.windows[0].rect, original);
        assert_eq!(state.windows[0].restore_rect, None);
    }

    #[test]
    fn restore_clears_flags_then_focuses() {
        let mut state = state();
        let win = open(&mut state, "notes");
        reduce(
            &mut state,
            DesktopAction::ToggleMaximize {
                window_id: win.clone(),
            },
        )
        .expect("maximize");
        reduce(
            &mut state,
            DesktopAction::MinimizeWindow {
                window_id: win.clone(),
            },
        )
        .expect("minimize");

        let effects = reduce(
            &mut state,
            DesktopAction::RestoreWindow {
                window_id: win.clone(),
            },
        )
        .expect("restore");
        assert_eq!(
            kinds(&effects),
            vec![
                DesktopEventKind::WindowRestored,
                DesktopEventKind::WindowFocused
            ]
        );
        let record = state.find_window(&win).expect("window");
        assert!(!record.maximized);
        assert!(record.is_active());
    }

    #[test]
    fn hide_is_independent_of_minimize() {
        let mut state = state();
        let win = open(&mut state, "notes");
        let effects = reduce(
            &mut state,
            DesktopAction::HideWindow {
                window_id: win.clone(),
            },
        )
        .expect("hide");
        assert!(effects.is_empty());
        let record = state.find_window(&win).expect("window");
        assert!(record.hidden);
        assert!(!record.minimized);
        assert!(!record.is_active());
    }

    #[test]
    fn window_operations_on_missing_ids_report_not_found() {
        let mut state = state();
        let ghost = WindowId::new(id("notes"), 42);
        for action in [
            DesktopAction::FocusWindow {
                window_id: ghost.clone(),
            },
            DesktopAction::MinimizeWindow {
                window_id: ghost.clone(),
            },
            DesktopAction::ToggleMaximize {
                window_id: ghost.clone(),
            },
            DesktopAction::CloseWindow {
                window_id: ghost.clone(),
            },
            DesktopAction::MoveWindow {
                window_id: ghost.clone(),
                x: 1,
                y: 1,
            },
        ] {
            assert_eq!(
                reduce(&mut state, action),
                Err(ReducerError::WindowNotFound(ghost.clone()))
            );
        }
        assert_eq!(state.next_stack_order, 1000);
    }

    #[test]
    fn close_app_closes_first_window_only() {
        let mut state = state();
        let first = open(&mut state, "notes");
        let second = open(&mut state, "notes");
        reduce(
            &mut state,
            DesktopAction::FocusWindow {
                window_id: first.clone(),
            },
        )
        .expect("focus");

        let effects = reduce(&mut state, DesktopAction::CloseApp { app_id: id("notes") })
            .expect("close");
        assert_eq!(
            effects,
            vec![RuntimeEffect::Publish(DesktopEvent::WindowClosed {
                window_id: first
            })]
        );
        assert_eq!(state.windows.len(), 1);
        assert_eq!(state.windows[0].id, second);

        let effects = reduce(&mut state, DesktopAction::CloseApp { app_id: id("calc") })
            .expect("close nothing");
        assert!(effects.is_empty());
    }

    #[test]
    fn close_app_does_not_match_other_apps_sharing_a_prefix() {
        let (registry, _) = AppRegistry::from_manifests(vec![
            AppManifest::new(id("note"), "Note"),
            AppManifest::new(id("notes"), "Notes"),
        ]);
        let mut state = DesktopState::new(registry, WindowPlacement::default());
        let _notes = open(&mut state, "notes");
        let effects = reduce(&mut state, DesktopAction::CloseApp { app_id: id("note") })
            .expect("close");
        assert!(effects.is_empty());
        assert_eq!(state.windows.len(), 1);
    }

    #[test]
    fn uninstall_cascades_window_close_then_reports_removal() {
        let mut state = state();
        let _a = open(&mut state, "notes");
        let _calc = open(&mut state, "calc");
        let _b = open(&mut state, "notes");

        let effects = reduce(
            &mut state,
            DesktopAction::UninstallApplication {
                app_id: id("notes"),
            },
        )
        .expect("uninstall");
        assert_eq!(
            kinds(&effects),
            vec![
                DesktopEventKind::WindowClosed,
                DesktopEventKind::WindowClosed,
                DesktopEventKind::ApplicationRemoved
            ]
        );
        assert!(!state.registry.contains(&id("notes")));
        assert_eq!(state.windows.len(), 1);
        assert!(state
            .windows
            .iter()
            .all(|w| state.registry.contains(w.app_id())));

        assert_eq!(
            reduce(
                &mut state,
                DesktopAction::UninstallApplication {
                    app_id: id("notes"),
                },
            ),
            Err(ReducerError::ApplicationNotFound(id("notes")))
        );
    }

    #[test]
    fn install_rejects_duplicates_and_announces_new_apps() {
        let mut state = state();
        assert_eq!(
            reduce(
                &mut state,
                DesktopAction::InstallApplication {
                    manifest: AppManifest::new(id("notes"), "Notes"),
                },
            ),
            Err(ReducerError::DuplicateApplication(id("notes")))
        );
        let effects = reduce(
            &mut state,
            DesktopAction::InstallApplication {
                manifest: AppManifest::new(id("paint"), "Paint"),
            },
        )
        .expect("install");
        assert_eq!(kinds(&effects), vec![DesktopEventKind::ApplicationInstalled]);
        assert_eq!(state.registry.len(), 3);
    }

    #[test]
    fn discovery_updates_only_install_unknown_ids() {
        let mut state = state();
        let effects = reduce(
            &mut state,
            DesktopAction::ApplicationsDiscovered {
                manifests: vec![
                    AppManifest::new(id("notes"), "Notes"),
                    AppManifest::new(id("paint"), "Paint"),
                    AppManifest::new(id("paint"), "Paint Again"),
                ],
            },
        )
        .expect("discovered");
        assert_eq!(
            effects,
            vec![RuntimeEffect::Publish(DesktopEvent::ApplicationInstalled {
                app_id: id("paint")
            })]
        );
        assert_eq!(
            state.registry.find(&id("paint")).map(|d| d.display_name.as_str()),
            Some("Paint")
        );
    }

    #[test]
    fn set_setting_persists_and_notifies() {
        let mut state = state();
        let effects = reduce(
            &mut state,
            DesktopAction::SetSetting {
                key: "clock.format".to_string(),
                value: json!("24h"),
            },
        )
        .expect("set");
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::PersistSettings,
                RuntimeEffect::Publish(DesktopEvent::SettingChanged {
                    key: "clock.format".to_string()
                }),
            ]
        );
        assert_eq!(state.session.settings.get("clock.format"), Some(&json!("24h")));
        assert_eq!(
            reduce(
                &mut state,
                DesktopAction::SetSetting {
                    key: " ".to_string(),
                    value: json!(1),
                },
            ),
            Err(ReducerError::EmptySettingKey)
        );
    }
}
