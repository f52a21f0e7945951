use std::collections::BTreeMap;

use desktop_app_contract::{ApplicationId, WindowId};
use platform_host::{DEFAULT_THEME_ID, DEFAULT_WALLPAPER_ID};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::apps::AppRegistry;

pub const DEFAULT_WINDOW_WIDTH: i32 = 420;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;
/// First stack order handed out in a session.
pub const DEFAULT_STACK_BASE: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn with_position(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    pub fn with_size(self, w: i32, h: i32) -> Self {
        Self { w, h, ..self }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 40,
            y: 48,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Cascade and sizing policy for newly opened windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPlacement {
    pub origin_x: i32,
    pub origin_y: i32,
    pub cascade_step_x: i32,
    pub cascade_step_y: i32,
    /// Number of cascade slots before the offset wraps back to the origin.
    pub cascade_wrap: u32,
    pub default_width: i32,
    pub default_height: i32,
    pub stack_base: u64,
}

impl Default for WindowPlacement {
    fn default() -> Self {
        Self {
            origin_x: 40,
            origin_y: 48,
            cascade_step_x: 20,
            cascade_step_y: 20,
            cascade_wrap: 8,
            default_width: DEFAULT_WINDOW_WIDTH,
            default_height: DEFAULT_WINDOW_HEIGHT,
            stack_base: DEFAULT_STACK_BASE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub icon_id: String,
    /// Opaque entry-point handle of the owning application.
    pub entry: String,
    pub rect: WindowRect,
    /// Geometry captured when the window was maximized.
    pub restore_rect: Option<WindowRect>,
    pub stack_order: u64,
    pub minimized: bool,
    pub maximized: bool,
    pub hidden: bool,
}

impl WindowRecord {
    pub fn app_id(&self) -> &ApplicationId {
        &self.id.app_id
    }

    /// A window is active when it is neither minimized nor hidden.
    pub fn is_active(&self) -> bool {
        !self.minimized && !self.hidden
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub theme_id: String,
    pub wallpaper_id: String,
    pub settings: BTreeMap<String, Value>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            theme_id: DEFAULT_THEME_ID.to_string(),
            wallpaper_id: DEFAULT_WALLPAPER_ID.to_string(),
            settings: BTreeMap::new(),
        }
    }
}

/// Read-only taskbar projection of one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskbarEntry {
    pub window_id: WindowId,
    pub title: String,
    pub icon_id: String,
    pub active: bool,
    pub stack_order: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub registry: AppRegistry,
    /// Live windows in creation order.
    pub windows: Vec<WindowRecord>,
    pub session: SessionState,
    pub placement: WindowPlacement,
    pub next_sequence: u64,
    pub next_stack_order: u64,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new(AppRegistry::default(), WindowPlacement::default())
    }
}

impl DesktopState {
    pub fn new(registry: AppRegistry, placement: WindowPlacement) -> Self {
        Self {
            registry,
            windows: Vec::new(),
            session: SessionState::default(),
            placement,
            next_sequence: 0,
            next_stack_order: placement.stack_base,
        }
    }

    pub fn find_window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn windows_for_app<'a>(
        &'a self,
        app_id: &'a ApplicationId,
    ) -> impl Iterator<Item = &'a WindowRecord> + 'a {
        self.windows.iter().filter(move |w| w.id.is_owned_by(app_id))
    }

    /// The active window with the highest stack order.
    pub fn topmost_window_id(&self) -> Option<&WindowId> {
        self.windows
            .iter()
            .filter(|w| w.is_active())
            .max_by_key(|w| w.stack_order)
            .map(|w| &w.id)
    }

    pub fn taskbar(&self) -> Vec<TaskbarEntry> {
        self.windows
            .iter()
            .map(|w| TaskbarEntry {
                window_id: w.id.clone(),
                title: w.title.clone(),
                icon_id: w.icon_id.clone(),
                active: w.is_active(),
                stack_order: w.stack_order,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: ApplicationId,
    pub title: Option<String>,
    pub icon_id: Option<String>,
    /// Position override `(x, y)`.
    pub position: Option<(i32, i32)>,
    /// Size override `(w, h)`.
    pub size: Option<(i32, i32)>,
}

impl OpenWindowRequest {
    pub fn new(app_id: ApplicationId) -> Self {
        Self {
            app_id,
            title: None,
            icon_id: None,
            position: None,
            size: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn sized(mut self, w: i32, h: i32) -> Self {
        self.size = Some((w, h));
        self
    }
}
