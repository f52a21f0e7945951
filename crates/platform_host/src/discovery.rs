//! Application discovery collaborator contracts and adapters.
//!
//! Discovery runs once at startup and hands raw [`AppManifest`] values to the runtime, which
//! treats them as validated input apart from duplicate-id rejection.

use std::{
    fs,
    path::{Path, PathBuf},
};

use desktop_app_contract::{AppManifest, APP_MANIFEST_SCHEMA_VERSION};

use crate::DiscoveryError;

/// File-name suffix recognised by [`ManifestDirDiscovery`].
pub const MANIFEST_FILE_SUFFIX: &str = ".manifest.toml";

/// Host service returning the installed application manifests.
pub trait AppDiscovery {
    /// Returns manifests in discovery order.
    fn discover(&self) -> Result<Vec<AppManifest>, DiscoveryError>;
}

#[derive(Debug, Clone, Default)]
/// Discovery adapter returning a fixed manifest list.
pub struct StaticDiscovery {
    manifests: Vec<AppManifest>,
}

impl StaticDiscovery {
    /// Creates a discovery adapter over `manifests`.
    pub fn new(manifests: Vec<AppManifest>) -> Self {
        Self { manifests }
    }
}

impl AppDiscovery for StaticDiscovery {
    fn discover(&self) -> Result<Vec<AppManifest>, DiscoveryError> {
        Ok(self.manifests.clone())
    }
}

#[derive(Debug, Clone)]
/// Discovery adapter scanning a directory for `*.manifest.toml` files, sorted by file name.
pub struct ManifestDirDiscovery {
    dir: PathBuf,
}

impl ManifestDirDiscovery {
    /// Creates a scanner over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn manifest_paths(&self) -> Result<Vec<PathBuf>, DiscoveryError> {
        let read_err = |err: std::io::Error| DiscoveryError::Read {
            path: self.dir.display().to_string(),
            message: err.to_string(),
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            let is_manifest = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(MANIFEST_FILE_SUFFIX));
            if is_manifest && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// Reads and validates one manifest file.
///
/// # Errors
///
/// Returns an error when the file cannot be read, parsed, or declares another schema version.
pub fn load_manifest(path: &Path) -> Result<AppManifest, DiscoveryError> {
    let raw = fs::read_to_string(path).map_err(|err| DiscoveryError::Read {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    let manifest: AppManifest = toml::from_str(&raw).map_err(|err| DiscoveryError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    if manifest.schema_version != APP_MANIFEST_SCHEMA_VERSION {
        return Err(DiscoveryError::Schema {
            path: path.display().to_string(),
            expected: APP_MANIFEST_SCHEMA_VERSION,
            found: manifest.schema_version,
        });
    }
    Ok(manifest)
}

impl ManifestDirDiscovery {
    /// Loads every manifest in the directory, returning the loaded manifests alongside the
    /// per-file failures. A broken file never hides its valid siblings.
    ///
    /// # Errors
    ///
    /// Returns an error only when the directory itself cannot be listed.
    pub fn scan(&self) -> Result<(Vec<AppManifest>, Vec<DiscoveryError>), DiscoveryError> {
        let mut manifests = Vec::new();
        let mut skipped = Vec::new();
        for path in self.manifest_paths()? {
            match load_manifest(&path) {
                Ok(manifest) => manifests.push(manifest),
                Err(err) => skipped.push(err),
            }
        }
        Ok((manifests, skipped))
    }
}

impl AppDiscovery for ManifestDirDiscovery {
    fn discover(&self) -> Result<Vec<AppManifest>, DiscoveryError> {
        let (manifests, skipped) = self.scan()?;
        for err in &skipped {
            log::warn!("skipping manifest: {err}");
        }
        log::debug!(
            "discovered {} manifest(s) in {}, skipped {}",
            manifests.len(),
            self.dir.display(),
            skipped.len()
        );
        Ok(manifests)
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::ApplicationId;
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_manifest(dir: &Path, file: &str, body: &str) {
        fs::write(dir.join(file), body).expect("write manifest");
    }

    #[test]
    fn static_discovery_returns_manifests_in_order() {
        let discovery = StaticDiscovery::new(vec![
            AppManifest::new(ApplicationId::trusted("notes"), "Notes"),
            AppManifest::new(ApplicationId::trusted("calc"), "Calculator").single_instance(),
        ]);
        let ids = discovery
            .discover()
            .expect("discover")
            .into_iter()
            .map(|m| m.app_id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["notes".to_string(), "calc".to_string()]);
    }

    #[test]
    fn manifest_dir_discovery_sorts_by_file_name_and_skips_other_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_manifest(
            dir.path(),
            "20-notes.manifest.toml",
            "app_id = \"notes\"\ndisplay_name = \"Notes\"\n",
        );
        write_manifest(
            dir.path(),
            "10-calc.manifest.toml",
            "app_id = \"calc\"\ndisplay_name = \"Calculator\"\nsingle_instance = true\n",
        );
        write_manifest(dir.path(), "README.md", "not a manifest");

        let manifests = ManifestDirDiscovery::new(dir.path())
            .discover()
            .expect("discover");
        assert_eq!(manifests.len(), 2);
        assert_eq!(manifests[0].app_id.as_str(), "calc");
        assert!(manifests[0].single_instance);
        assert_eq!(manifests[1].app_id.as_str(), "notes");
    }

    #[test]
    fn unknown_schema_is_skipped_and_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_manifest(
            dir.path(),
            "calc.manifest.toml",
            "schema_version = 2\napp_id = \"calc\"\ndisplay_name = \"Calculator\"\n",
        );
        let (manifests, skipped) = ManifestDirDiscovery::new(dir.path())
            .scan()
            .expect("scan");
        assert!(manifests.is_empty());
        assert!(matches!(
            skipped.as_slice(),
            [DiscoveryError::Schema { found: 2, .. }]
        ));
    }

    #[test]
    fn broken_manifest_does_not_hide_valid_siblings() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_manifest(
            dir.path(),
            "10-notes.manifest.toml",
            "app_id = \"notes\"\ndisplay_name = \"Notes\"\n",
        );
        write_manifest(dir.path(), "20-broken.manifest.toml", "app_id = [");
        write_manifest(
            dir.path(),
            "30-calc.manifest.toml",
            "app_id = \"calc\"\ndisplay_name = \"Calculator\"\n",
        );
        let discovery = ManifestDirDiscovery::new(dir.path());

        let (_, skipped) = discovery.scan().expect("scan");
        assert_eq!(skipped.len(), 1);
        assert!(matches!(skipped[0], DiscoveryError::Parse { .. }));
        assert!(skipped[0].to_string().contains("20-broken.manifest.toml"));

        let ids = discovery
            .discover()
            .expect("discover")
            .into_iter()
            .map(|m| m.app_id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["notes".to_string(), "calc".to_string()]);
    }

    #[test]
    fn missing_directory_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ManifestDirDiscovery::new(dir.path().join("absent"))
            .discover()
            .expect_err("missing dir");
        assert!(matches!(err, DiscoveryError::Read { .. }));
    }
}
