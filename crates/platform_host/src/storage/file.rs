//! Durable file-backed persistence backends.
//!
//! Every key (or namespace) maps to one JSON file under a root directory. Writes go to a sibling
//! temp file first and are then renamed over the target, so a reader never observes a partially
//! written value.

use std::{
    fs,
    path::{Path, PathBuf},
};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{
    storage::{
        app_state::{AppStateEnvelope, AppStateStore, AppStateStoreFuture},
        prefs::{PrefsStore, PrefsStoreFuture},
    },
    StorageError,
};

const PREF_FILE_EXTENSION: &str = "json";
const TEMP_FILE_SUFFIX: &str = ".tmp";

fn ensure_dir(root: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(root).map_err(|err| StorageError::Unavailable(format!(
        "cannot create {}: {err}",
        root.display()
    )))
}

/// Bytes kept verbatim in file stems; everything else, `%` included, is percent-encoded.
const KEY_STEM_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'-');

/// Maps a key to a file-name-safe stem. Distinct keys always map to distinct stems.
fn file_stem_for_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_STEM_SET).to_string()
}

fn path_for_key(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{}.{PREF_FILE_EXTENSION}", file_stem_for_key(key)))
}

fn read_optional(path: &Path, key: &str) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StorageError::io(key, err)),
    }
}

fn write_atomically(path: &Path, key: &str, contents: &str) -> Result<(), StorageError> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(TEMP_FILE_SUFFIX);
    let temp = PathBuf::from(temp);
    fs::write(&temp, contents).map_err(|err| StorageError::io(key, err))?;
    fs::rename(&temp, path).map_err(|err| {
        let _ = fs::remove_file(&temp);
        StorageError::io(key, err)
    })
}

fn remove_if_present(path: &Path, key: &str) -> Result<(), StorageError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(StorageError::io(key, err)),
    }
}

#[derive(Debug, Clone)]
/// Durable preference store writing one JSON file per key.
pub struct FilePrefsStore {
    root: PathBuf,
}

impl FilePrefsStore {
    /// Opens (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    /// Returns the store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PrefsStore for FilePrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async move { read_optional(&path_for_key(&self.root, key), key) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { write_atomically(&path_for_key(&self.root, key), key, raw_json) })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { remove_if_present(&path_for_key(&self.root, key), key) })
    }
}

#[derive(Debug, Clone)]
/// Durable app-state store writing one envelope file per namespace.
pub struct FileAppStateStore {
    root: PathBuf,
}

impl FileAppStateStore {
    /// Opens (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }
}

impl AppStateStore for FileAppStateStore {
    fn load_app_state_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<Option<AppStateEnvelope>, StorageError>> {
        Box::pin(async move {
            match read_optional(&path_for_key(&self.root, namespace), namespace)? {
                Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
                None => Ok(None),
            }
        })
    }

    fn save_app_state_envelope<'a>(
        &'a self,
        envelope: &'a AppStateEnvelope,
    ) -> AppStateStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let raw = serde_json::to_string(envelope)?;
            write_atomically(
                &path_for_key(&self.root, &envelope.namespace),
                &envelope.namespace,
                &raw,
            )
        })
    }

    fn delete_app_state<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { remove_if_present(&path_for_key(&self.root, namespace), namespace) })
    }

    fn list_app_state_namespaces<'a>(
        &'a self,
    ) -> AppStateStoreFuture<'a, Result<Vec<String>, StorageError>> {
        Box::pin(async move {
            let entries = fs::read_dir(&self.root)
                .map_err(|err| StorageError::io(self.root.display().to_string(), err))?;
            let mut namespaces = Vec::new();
            for entry in entries {
                let path = entry
                    .map_err(|err| StorageError::io(self.root.display().to_string(), err))?
                    .path();
                if path.extension().and_then(|ext| ext.to_str()) != Some(PREF_FILE_EXTENSION) {
                    continue;
                }
                let Some(raw) = read_optional(&path, &path.display().to_string())? else {
                    continue;
                };
                let envelope: AppStateEnvelope = serde_json::from_str(&raw)?;
                namespaces.push(envelope.namespace);
            }
            namespaces.sort();
            Ok(namespaces)
        })
    }
}
