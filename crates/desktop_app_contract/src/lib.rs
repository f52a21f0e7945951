//! Shared contract types between the desktop window manager runtime, its host ports, and the
//! presentation layer.
//!
//! The contract carries canonical string application identifiers (`ApplicationId`), structured
//! window identifiers (`WindowId`), raw application manifests produced by discovery, and the typed
//! notification events the runtime publishes on every state transition.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Manifest schema version accepted by discovery.
pub const APP_MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Flat style-variable table pushed to the style applicator (`name -> value`).
pub type StyleTable = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Contract-level validation failures.
pub enum ContractError {
    /// The raw application identifier does not satisfy the id policy.
    #[error("invalid application id `{0}`; expected lowercase segments of [a-z0-9-.]")]
    InvalidApplicationId(String),
    /// The raw window identifier is not `<app-id>-<sequence>`.
    #[error("invalid window id `{0}`; expected `<app-id>-<sequence>`")]
    InvalidWindowId(String),
}

/// Stable identifier for an installable application.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` conforms to the id policy.
    pub fn new(raw: impl Into<String>) -> Result<Self, ContractError> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(ContractError::InvalidApplicationId(raw))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for compile-time/runtime trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ApplicationId {
    type Error = ContractError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ApplicationId> for String {
    fn from(id: ApplicationId) -> Self {
        id.0
    }
}

impl FromStr for ApplicationId {
    type Err = ContractError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::new(raw)
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 64 {
        return false;
    }

    raw.split('.').all(|part| {
        let bytes = part.as_bytes();
        !bytes.is_empty()
            && bytes[0].is_ascii_lowercase()
            && !part.ends_with('-')
            && bytes
                .iter()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
    })
}

/// Identifier of one live window: the owning application plus a per-session sequence number.
///
/// The pair is compared structurally; the `<app-id>-<sequence>` text form exists only for
/// display and for parsing at text boundaries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId {
    /// Owning application.
    pub app_id: ApplicationId,
    /// Session-wide sequence number assigned at open time.
    pub sequence: u64,
}

impl WindowId {
    /// Creates a window id for `app_id` and `sequence`.
    pub fn new(app_id: ApplicationId, sequence: u64) -> Self {
        Self { app_id, sequence }
    }

    /// Returns whether this window belongs to `app_id`.
    pub fn is_owned_by(&self, app_id: &ApplicationId) -> bool {
        &self.app_id == app_id
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.app_id, self.sequence)
    }
}

impl FromStr for WindowId {
    type Err = ContractError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ContractError::InvalidWindowId(raw.to_string());
        let (app, sequence) = raw.rsplit_once('-').ok_or_else(invalid)?;
        if sequence.is_empty() || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let sequence = sequence.parse::<u64>().map_err(|_| invalid())?;
        let app_id = ApplicationId::new(app).map_err(|_| invalid())?;
        Ok(Self { app_id, sequence })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Optional per-application default window size.
pub struct WindowDefaults {
    /// Default window width in pixels.
    pub width: i32,
    /// Default window height in pixels.
    pub height: i32,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Raw application descriptor produced by the discovery collaborator.
pub struct AppManifest {
    /// Manifest schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Unique application identifier.
    pub app_id: ApplicationId,
    /// Human-readable application name.
    pub display_name: String,
    /// Icon reference resolved by the presentation layer.
    #[serde(default)]
    pub icon_id: String,
    /// Opaque entry-point handle resolved by the rendering collaborator.
    #[serde(default)]
    pub entry: String,
    /// At most one window may exist for this application.
    #[serde(default)]
    pub single_instance: bool,
    /// Listed in the launcher.
    #[serde(default = "default_true")]
    pub show_in_launcher: bool,
    /// Shown as a desktop icon.
    #[serde(default)]
    pub show_on_desktop: bool,
    /// Optional default window size.
    #[serde(default)]
    pub window_defaults: Option<WindowDefaults>,
}

fn default_schema_version() -> u32 {
    APP_MANIFEST_SCHEMA_VERSION
}

impl AppManifest {
    /// Creates a manifest with default flags, using the app id as the icon and entry handle.
    pub fn new(app_id: ApplicationId, display_name: impl Into<String>) -> Self {
        let entry = app_id.as_str().to_string();
        Self {
            schema_version: APP_MANIFEST_SCHEMA_VERSION,
            icon_id: entry.clone(),
            entry,
            app_id,
            display_name: display_name.into(),
            single_instance: false,
            show_in_launcher: true,
            show_on_desktop: false,
            window_defaults: None,
        }
    }

    /// Marks the manifest single-instance.
    pub fn single_instance(mut self) -> Self {
        self.single_instance = true;
        self
    }

    /// Marks the manifest as shown on the desktop.
    pub fn on_desktop(mut self) -> Self {
        self.show_on_desktop = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Event names published on the notification bus.
pub enum DesktopEventKind {
    /// A window was created.
    WindowOpened,
    /// A window was raised to the top of the stack.
    WindowFocused,
    /// A window was minimized.
    WindowMinimized,
    /// A window's maximized flag was toggled.
    WindowMaximized,
    /// A window left the maximized/minimized state.
    WindowRestored,
    /// A window was removed.
    WindowClosed,
    /// The session theme changed.
    ThemeChanged,
    /// The session wallpaper changed.
    WallpaperChanged,
    /// A free-form session setting changed.
    SettingChanged,
    /// An application was added to the registry.
    ApplicationInstalled,
    /// An application was removed from the registry.
    ApplicationRemoved,
}

impl DesktopEventKind {
    /// Returns a stable string token for logging and text boundaries.
    pub const fn token(self) -> &'static str {
        match self {
            Self::WindowOpened => "window-opened",
            Self::WindowFocused => "window-focused",
            Self::WindowMinimized => "window-minimized",
            Self::WindowMaximized => "window-maximized",
            Self::WindowRestored => "window-restored",
            Self::WindowClosed => "window-closed",
            Self::ThemeChanged => "theme-changed",
            Self::WallpaperChanged => "wallpaper-changed",
            Self::SettingChanged => "setting-changed",
            Self::ApplicationInstalled => "application-installed",
            Self::ApplicationRemoved => "application-removed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Typed notification payloads published by the runtime after each transition.
pub enum DesktopEvent {
    /// A window was created.
    WindowOpened {
        /// New window.
        window_id: WindowId,
        /// Stack order assigned at open time.
        stack_order: u64,
    },
    /// A window was raised (also fired when an existing single-instance window is reused).
    WindowFocused {
        /// Focused window.
        window_id: WindowId,
        /// New stack order.
        stack_order: u64,
    },
    /// A window was minimized.
    WindowMinimized {
        /// Minimized window.
        window_id: WindowId,
    },
    /// A window's maximized flag was toggled.
    WindowMaximized {
        /// Affected window.
        window_id: WindowId,
        /// New maximized flag.
        maximized: bool,
    },
    /// A window was restored from maximized/minimized state.
    WindowRestored {
        /// Restored window.
        window_id: WindowId,
    },
    /// A window was removed.
    WindowClosed {
        /// Closed window.
        window_id: WindowId,
    },
    /// The session theme changed.
    ThemeChanged {
        /// New theme id.
        theme_id: String,
    },
    /// The session wallpaper changed.
    WallpaperChanged {
        /// New wallpaper id.
        wallpaper_id: String,
    },
    /// A session setting changed.
    SettingChanged {
        /// Setting key.
        key: String,
    },
    /// An application was added to the registry.
    ApplicationInstalled {
        /// Installed application.
        app_id: ApplicationId,
    },
    /// An application was removed from the registry.
    ApplicationRemoved {
        /// Removed application.
        app_id: ApplicationId,
    },
}

impl DesktopEvent {
    /// Returns the event name this payload is published under.
    pub const fn kind(&self) -> DesktopEventKind {
        match self {
            Self::WindowOpened { .. } => DesktopEventKind::WindowOpened,
            Self::WindowFocused { .. } => DesktopEventKind::WindowFocused,
            Self::WindowMinimized { .. } => DesktopEventKind::WindowMinimized,
            Self::WindowMaximized { .. } => DesktopEventKind::WindowMaximized,
            Self::WindowRestored { .. } => DesktopEventKind::WindowRestored,
            Self::WindowClosed { .. } => DesktopEventKind::WindowClosed,
            Self::ThemeChanged { .. } => DesktopEventKind::ThemeChanged,
            Self::WallpaperChanged { .. } => DesktopEventKind::WallpaperChanged,
            Self::SettingChanged { .. } => DesktopEventKind::SettingChanged,
            Self::ApplicationInstalled { .. } => DesktopEventKind::ApplicationInstalled,
            Self::ApplicationRemoved { .. } => DesktopEventKind::ApplicationRemoved,
        }
    }

    /// Returns the window the event refers to, if any.
    pub fn window_id(&self) -> Option<&WindowId> {
        match self {
            Self::WindowOpened { window_id, .. }
            | Self::WindowFocused { window_id, .. }
            | Self::WindowMinimized { window_id }
            | Self::WindowMaximized { window_id, .. }
            | Self::WindowRestored { window_id }
            | Self::WindowClosed { window_id } => Some(window_id),
            _ => None,
        }
    }
}
