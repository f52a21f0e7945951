//! Typed configuration loading for the desktop runtime.

use std::{fs, marker::PhantomData, path::PathBuf};

use platform_host::{StaticAppearanceCatalog, DEFAULT_THEME_ID, DEFAULT_WALLPAPER_ID};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::model::WindowPlacement;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Generic TOML-backed config loader.
///
/// `ConfigLoader<T>` handles only filesystem access and TOML deserialization. Semantic fallbacks
/// (unknown theme ids, unopenable storage directories) are applied later at boot.
#[derive(Clone, Debug)]
pub struct ConfigLoader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: DeserializeOwned,
{
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Load and deserialize the configuration file.
    ///
    /// # Errors
    ///
    /// Missing or unreadable files surface as [`ConfigError::Read`], TOML failures as
    /// [`ConfigError::Parse`]; both carry the path.
    pub fn load(&self) -> Result<T, ConfigError> {
        let path = self.path.display().to_string();
        let body = fs::read_to_string(&self.path).map_err(|err| ConfigError::Read {
            path: path.clone(),
            message: err.to_string(),
        })?;
        toml::from_str(&body).map_err(|err| ConfigError::Parse {
            path,
            message: err.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory of the durable preference store; in-memory when unset.
    pub path: Option<PathBuf>,
    /// Directory of the durable per-application data store; in-memory when unset.
    pub app_state_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directory scanned for `*.manifest.toml` at boot.
    pub manifest_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub default_theme: String,
    pub default_wallpaper: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_theme: DEFAULT_THEME_ID.to_string(),
            default_wallpaper: DEFAULT_WALLPAPER_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub storage: StorageConfig,
    pub discovery: DiscoveryConfig,
    pub session: SessionConfig,
    pub windows: WindowPlacement,
    /// Inline catalog; the built-in catalog is used when this is empty.
    pub appearance: StaticAppearanceCatalog,
}

impl DesktopConfig {
    /// Loads a config file through [`ConfigLoader`].
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        ConfigLoader::<Self>::at(path).load()
    }

    /// Configured catalog, or the built-in one when the config defines none.
    pub fn appearance_catalog(&self) -> StaticAppearanceCatalog {
        if self.appearance.is_empty() {
            StaticAppearanceCatalog::builtin()
        } else {
            self.appearance.clone()
        }
    }
}
