//! Appearance catalog contracts: the themes and wallpapers the session may select.
//!
//! The runtime never defines themes itself; it validates selections against an
//! [`AppearanceCatalog`] and applies the chosen theme's flat style table.

use desktop_app_contract::StyleTable;
use serde::{Deserialize, Serialize};

/// Theme id used when nothing valid was persisted.
pub const DEFAULT_THEME_ID: &str = "light";
/// Wallpaper id used when nothing valid was persisted.
pub const DEFAULT_WALLPAPER_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One selectable theme and its style variables.
pub struct ThemeDefinition {
    /// Stable theme id.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Flat style-variable table applied when the theme is active.
    #[serde(default)]
    pub styles: StyleTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One selectable wallpaper.
pub struct WallpaperDefinition {
    /// Stable wallpaper id.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Source reference handed to the presentation layer.
    pub source: String,
}

/// Host service resolving theme and wallpaper ids.
pub trait AppearanceCatalog {
    /// Resolves a theme by id.
    fn theme(&self, theme_id: &str) -> Option<ThemeDefinition>;

    /// Resolves a wallpaper by id.
    fn wallpaper(&self, wallpaper_id: &str) -> Option<WallpaperDefinition>;

    /// Lists all themes in catalog order.
    fn themes(&self) -> Vec<ThemeDefinition>;

    /// Lists all wallpapers in catalog order.
    fn wallpapers(&self) -> Vec<WallpaperDefinition>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Fixed in-memory catalog, usually built from configuration.
pub struct StaticAppearanceCatalog {
    /// Catalog themes.
    #[serde(default)]
    pub themes: Vec<ThemeDefinition>,
    /// Catalog wallpapers.
    #[serde(default)]
    pub wallpapers: Vec<WallpaperDefinition>,
}

fn style_table(entries: &[(&str, &str)]) -> StyleTable {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

impl StaticAppearanceCatalog {
    /// Built-in catalog with `light` and `dark` themes and the `default` wallpaper.
    pub fn builtin() -> Self {
        Self {
            themes: vec![
                ThemeDefinition {
                    id: DEFAULT_THEME_ID.to_string(),
                    display_name: "Light".to_string(),
                    styles: style_table(&[
                        ("--desktop-bg", "#d8dee9"),
                        ("--window-bg", "#ffffff"),
                        ("--window-fg", "#1b1f24"),
                        ("--accent", "#0b5fff"),
                        ("--taskbar-bg", "#eceff4"),
                    ]),
                },
                ThemeDefinition {
                    id: "dark".to_string(),
                    display_name: "Dark".to_string(),
                    styles: style_table(&[
                        ("--desktop-bg", "#1b1f24"),
                        ("--window-bg", "#2e3440"),
                        ("--window-fg", "#eceff4"),
                        ("--accent", "#88c0d0"),
                        ("--taskbar-bg", "#3b4252"),
                    ]),
                },
            ],
            wallpapers: vec![
                WallpaperDefinition {
                    id: DEFAULT_WALLPAPER_ID.to_string(),
                    display_name: "Default".to_string(),
                    source: "wallpapers/default.svg".to_string(),
                },
                WallpaperDefinition {
                    id: "teal-solid".to_string(),
                    display_name: "Teal".to_string(),
                    source: "color:#008080".to_string(),
                },
            ],
        }
    }

    /// Returns whether the catalog defines nothing at all.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty() && self.wallpapers.is_empty()
    }
}

impl AppearanceCatalog for StaticAppearanceCatalog {
    fn theme(&self, theme_id: &str) -> Option<ThemeDefinition> {
        self.themes.iter().find(|theme| theme.id == theme_id).cloned()
    }

    fn wallpaper(&self, wallpaper_id: &str) -> Option<WallpaperDefinition> {
        self.wallpapers
            .iter()
            .find(|wallpaper| wallpaper.id == wallpaper_id)
            .cloned()
    }

    fn themes(&self) -> Vec<ThemeDefinition> {
        self.themes.clone()
    }

    fn wallpapers(&self) -> Vec<WallpaperDefinition> {
        self.wallpapers.clone()
    }
}
