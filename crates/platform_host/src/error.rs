//! Typed host-port error values.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures reported by persistence backends.
pub enum StorageError {
    /// Backend I/O failed for a key or namespace.
    #[error("storage I/O failed for `{key}`: {message}")]
    Io {
        /// Key or namespace being accessed.
        key: String,
        /// Underlying error text.
        message: String,
    },
    /// A value could not be serialized or deserialized.
    #[error("storage serialization failed: {0}")]
    Serialization(String),
    /// The backend cannot be used at all.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Builds an [`StorageError::Io`] from any displayable error.
    pub fn io(key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            key: key.into(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures reported by the application discovery collaborator.
pub enum DiscoveryError {
    /// A manifest directory or file could not be read.
    #[error("failed to read {path}: {message}")]
    Read {
        /// Path being read.
        path: String,
        /// Underlying error text.
        message: String,
    },
    /// A manifest file is not valid TOML for [`desktop_app_contract::AppManifest`].
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Manifest path.
        path: String,
        /// Underlying error text.
        message: String,
    },
    /// A manifest declares an unsupported schema version.
    #[error("manifest schema mismatch in {path}: expected {expected} found {found}")]
    Schema {
        /// Manifest path.
        path: String,
        /// Supported schema version.
        expected: u32,
        /// Declared schema version.
        found: u32,
    },
}
