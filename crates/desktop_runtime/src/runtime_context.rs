//! Explicitly constructed desktop context with an `init`/`shutdown` lifecycle.
//!
//! [`DesktopContext`] owns the reducer state, the host ports, and the notification bus. Every
//! public operation funnels through [`DesktopContext::dispatch`], which applies the reducer and
//! then runs the emitted effects in order. The context is single-threaded (`!Send`); a host with
//! real concurrency wraps the whole value in one mutex.

use desktop_app_contract::{AppManifest, ApplicationId, DesktopEvent, StyleTable, WindowId};
use futures::executor::block_on;
use platform_host::HostServices;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    apps::AppRegistry,
    bus::NotificationBus,
    config::{DesktopConfig, SessionConfig},
    effect_executor::run_effects,
    host::host_services_for,
    model::{DesktopState, OpenWindowRequest, SessionState, TaskbarEntry, WindowRecord},
    persistence,
    reducer::{compute_style_table, reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
};

pub struct DesktopContext {
    host: HostServices,
    state: DesktopState,
    bus: NotificationBus<DesktopEvent>,
    session_defaults: SessionConfig,
}

fn published(effects: &[RuntimeEffect]) -> impl Iterator<Item = &DesktopEvent> {
    effects.iter().filter_map(RuntimeEffect::event)
}

impl DesktopContext {
    /// Boots a context: discovers applications, builds the registry, hydrates the session with
    /// fallbacks, and pushes the initial style table. No window events are emitted.
    pub fn init(config: &DesktopConfig, host: HostServices) -> Self {
        let manifests = match host.discovery.discover() {
            Ok(manifests) => manifests,
            Err(err) => {
                log::warn!("application discovery failed, starting with no applications: {err}");
                Vec::new()
            }
        };
        let (registry, _rejected) = AppRegistry::from_manifests(manifests);
        let mut context = Self {
            state: DesktopState::new(registry, config.windows),
            host,
            bus: NotificationBus::new(),
            session_defaults: config.session.clone(),
        };

        let session = block_on(persistence::load_session(context.host.prefs.as_ref()));
        let hydrate = DesktopAction::HydrateSession {
            session,
            default_theme: context.session_defaults.default_theme.clone(),
            default_wallpaper: context.session_defaults.default_wallpaper.clone(),
        };
        if let Err(err) = context.dispatch(hydrate) {
            log::warn!("session hydration failed: {err}");
        }
        log::info!(
            "desktop ready: {} application(s), theme `{}`, wallpaper `{}`, {} storage",
            context.state.registry.len(),
            context.state.session.theme_id,
            context.state.session.wallpaper_id,
            context.host.host_strategy.as_str()
        );
        context
    }

    /// Boots with host services selected from `config`.
    pub fn from_config(config: &DesktopConfig) -> Self {
        Self::init(config, host_services_for(config))
    }

    /// Persists the session one last time, drops every bus subscription, and returns the final
    /// state.
    pub fn shutdown(self) -> DesktopState {
        if let Err(err) = block_on(persistence::persist_session(
            self.host.prefs.as_ref(),
            &self.state.session,
        )) {
            log::warn!("persist session at shutdown failed: {err}");
        }
        self.bus.clear();
        log::info!("desktop shut down with {} open window(s)", self.state.windows.len());
        self.state
    }

    /// Applies `action` and runs the resulting effects.
    ///
    /// # Errors
    ///
    /// Returns the reducer's error; the state is unchanged and no effect runs.
    pub fn dispatch(&mut self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError> {
        let effects = reduce_desktop(&mut self.state, self.host.appearance.as_ref(), action)
            .map_err(|err| {
                log::debug!("desktop action rejected: {err}");
                err
            })?;
        run_effects(&self.host, &self.bus, &self.state.session, &effects);
        Ok(effects)
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn host(&self) -> &HostServices {
        &self.host
    }

    pub fn bus(&self) -> &NotificationBus<DesktopEvent> {
        &self.bus
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.state.registry
    }

    // Windows

    /// Opens `app_id` with default geometry; single-instance apps return their existing window.
    pub fn open(&mut self, app_id: &ApplicationId) -> Result<WindowId, ReducerError> {
        self.open_with(OpenWindowRequest::new(app_id.clone()))
    }

    pub fn open_with(&mut self, request: OpenWindowRequest) -> Result<WindowId, ReducerError> {
        let app_id = request.app_id.clone();
        let effects = self.dispatch(DesktopAction::OpenWindow(request))?;
        let window_id = published(&effects)
            .find_map(DesktopEvent::window_id)
            .cloned();
        window_id.ok_or(ReducerError::UnknownApplication(app_id))
    }

    pub fn focus(&mut self, window_id: &WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::FocusWindow {
            window_id: window_id.clone(),
        })
        .map(drop)
    }

    pub fn minimize(&mut self, window_id: &WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::MinimizeWindow {
            window_id: window_id.clone(),
        })
        .map(drop)
    }

    pub fn toggle_minimize(&mut self, window_id: &WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::ToggleMinimize {
            window_id: window_id.clone(),
        })
        .map(drop)
    }

    /// Toggles the maximized flag; geometry is left to the presentation layer.
    pub fn maximize(&mut self, window_id: &WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::ToggleMaximize {
            window_id: window_id.clone(),
        })
        .map(drop)
    }

    pub fn restore(&mut self, window_id: &WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::RestoreWindow {
            window_id: window_id.clone(),
        })
        .map(drop)
    }

    pub fn hide(&mut self, window_id: &WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::HideWindow {
            window_id: window_id.clone(),
        })
        .map(drop)
    }

    pub fn move_window(&mut self, window_id: &WindowId, x: i32, y: i32) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::MoveWindow {
            window_id: window_id.clone(),
            x,
            y,
        })
        .map(drop)
    }

    pub fn resize_window(&mut self, window_id: &WindowId, w: i32, h: i32) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::ResizeWindow {
            window_id: window_id.clone(),
            w,
            h,
        })
        .map(drop)
    }

    /// Closes the first window owned by `app_id`. Returns whether a window was closed.
    pub fn close(&mut self, app_id: &ApplicationId) -> bool {
        self.dispatch(DesktopAction::CloseApp {
            app_id: app_id.clone(),
        })
        .map(|effects| published(&effects).next().is_some())
        .unwrap_or(false)
    }

    pub fn close_window(&mut self, window_id: &WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::CloseWindow {
            window_id: window_id.clone(),
        })
        .map(drop)
    }

    /// Closes every window owned by `app_id` and returns how many were closed.
    pub fn close_all(&mut self, app_id: &ApplicationId) -> usize {
        self.dispatch(DesktopAction::CloseAllForApp {
            app_id: app_id.clone(),
        })
        .map(|effects| published(&effects).count())
        .unwrap_or(0)
    }

    pub fn list_windows(&self) -> &[WindowRecord] {
        &self.state.windows
    }

    pub fn find_window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.state.find_window(window_id)
    }

    pub fn taskbar(&self) -> Vec<TaskbarEntry> {
        self.state.taskbar()
    }

    pub fn topmost(&self) -> Option<&WindowRecord> {
        self.state
            .topmost_window_id()
            .and_then(|id| self.state.find_window(id))
    }

    // Applications

    pub fn install(&mut self, manifest: AppManifest) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::InstallApplication { manifest })
            .map(drop)
    }

    /// Removes `app_id` from the registry and closes all of its windows.
    pub fn uninstall(&mut self, app_id: &ApplicationId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::UninstallApplication {
            app_id: app_id.clone(),
        })
        .map(drop)
    }

    /// Change callback for discovery collaborators. Returns the ids that were newly installed.
    pub fn applications_discovered(&mut self, manifests: Vec<AppManifest>) -> Vec<ApplicationId> {
        match self.dispatch(DesktopAction::ApplicationsDiscovered { manifests }) {
            Ok(effects) => published(&effects)
                .filter_map(|event| match event {
                    DesktopEvent::ApplicationInstalled { app_id } => Some(app_id.clone()),
                    _ => None,
                })
                .collect(),
            Err(err) => {
                log::warn!("discovery update failed: {err}");
                Vec::new()
            }
        }
    }

    // Session

    pub fn session(&self) -> &SessionState {
        &self.state.session
    }

    pub fn theme(&self) -> &str {
        &self.state.session.theme_id
    }

    pub fn wallpaper(&self) -> &str {
        &self.state.session.wallpaper_id
    }

    pub fn set_theme(&mut self, theme_id: &str) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::SetTheme {
            theme_id: theme_id.to_string(),
        })
        .map(drop)
    }

    pub fn set_wallpaper(&mut self, wallpaper_id: &str) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::SetWallpaper {
            wallpaper_id: wallpaper_id.to_string(),
        })
        .map(drop)
    }

    pub fn set_setting(&mut self, key: &str, value: Value) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::SetSetting {
            key: key.to_string(),
            value,
        })
        .map(drop)
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.state.session.settings.get(key)
    }

    pub fn style_table(&self) -> StyleTable {
        compute_style_table(&self.state.session, self.host.appearance.as_ref())
    }

    // Per-application data

    /// Saves `payload` under the application's namespace. Failures are logged and reported as
    /// `false`.
    pub fn save_app_data<T: Serialize>(
        &self,
        app_id: &ApplicationId,
        schema_version: u32,
        payload: &T,
    ) -> bool {
        let store = self.host.app_state.as_ref();
        match block_on(persistence::save_app_data(store, app_id, schema_version, payload)) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("persist app data for {app_id} failed: {err}");
                false
            }
        }
    }

    pub fn load_app_data<T: DeserializeOwned>(&self, app_id: &ApplicationId) -> Option<T> {
        match block_on(persistence::load_app_data(self.host.app_state.as_ref(), app_id)) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("load app data for {app_id} failed: {err}");
                None
            }
        }
    }
}

impl std::fmt::Debug for DesktopContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopContext")
            .field("host", &self.host)
            .field("windows", &self.state.windows.len())
            .field("session", &self.state.session)
            .finish_non_exhaustive()
    }
}
