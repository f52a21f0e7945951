//! Application registry: built-in applications from discovery followed by runtime installs.

use desktop_app_contract::{AppManifest, ApplicationId, WindowDefaults};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDescriptor {
    pub app_id: ApplicationId,
    pub display_name: String,
    pub icon_id: String,
    /// Opaque entry-point handle resolved by the rendering collaborator.
    pub entry: String,
    pub single_instance: bool,
    pub show_in_launcher: bool,
    pub show_on_desktop: bool,
    pub window_defaults: Option<WindowDefaults>,
}

impl From<AppManifest> for AppDescriptor {
    fn from(manifest: AppManifest) -> Self {
        let icon_id = if manifest.icon_id.trim().is_empty() {
            manifest.app_id.to_string()
        } else {
            manifest.icon_id
        };
        let entry = if manifest.entry.trim().is_empty() {
            manifest.app_id.to_string()
        } else {
            manifest.entry
        };
        Self {
            app_id: manifest.app_id,
            display_name: manifest.display_name,
            icon_id,
            entry,
            single_instance: manifest.single_instance,
            show_in_launcher: manifest.show_in_launcher,
            show_on_desktop: manifest.show_on_desktop,
            window_defaults: manifest.window_defaults,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("application `{0}` is already registered")]
    DuplicateId(ApplicationId),
    #[error("application `{0}` is not registered")]
    NotFound(ApplicationId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppRegistry {
    builtin: Vec<AppDescriptor>,
    installed: Vec<AppDescriptor>,
}

impl AppRegistry {
    /// Builds the built-in set from discovery output, keeping the first of any duplicate ids.
    ///
    /// Returns the registry plus the ids that were rejected as duplicates.
    pub fn from_manifests(manifests: Vec<AppManifest>) -> (Self, Vec<ApplicationId>) {
        let mut registry = Self::default();
        let mut rejected = Vec::new();
        for manifest in manifests {
            if registry.contains(&manifest.app_id) {
                log::warn!("discovery returned duplicate application id `{}`", manifest.app_id);
                rejected.push(manifest.app_id);
                continue;
            }
            registry.builtin.push(AppDescriptor::from(manifest));
        }
        (registry, rejected)
    }

    /// All descriptors: built-ins in discovery order, then runtime installs in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &AppDescriptor> {
        self.builtin.iter().chain(self.installed.iter())
    }

    pub fn find(&self, app_id: &ApplicationId) -> Option<&AppDescriptor> {
        self.list().find(|entry| &entry.app_id == app_id)
    }

    pub fn contains(&self, app_id: &ApplicationId) -> bool {
        self.find(app_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.builtin.len() + self.installed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a runtime-installed application.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] and leaves the registry unchanged when the id exists.
    pub fn add(&mut self, descriptor: AppDescriptor) -> Result<(), RegistryError> {
        if self.contains(&descriptor.app_id) {
            return Err(RegistryError::DuplicateId(descriptor.app_id));
        }
        self.installed.push(descriptor);
        Ok(())
    }

    /// Removes an application from either set.
    ///
    /// Closing the application's windows is the caller's responsibility; the reducer performs that
    /// cascade for `UninstallApplication`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the id is not registered.
    pub fn remove(&mut self, app_id: &ApplicationId) -> Result<AppDescriptor, RegistryError> {
        for set in [&mut self.builtin, &mut self.installed] {
            if let Some(index) = set.iter().position(|entry| &entry.app_id == app_id) {
                return Ok(set.remove(index));
            }
        }
        Err(RegistryError::NotFound(app_id.clone()))
    }

    pub fn launcher_apps(&self) -> Vec<&AppDescriptor> {
        self.list().filter(|entry| entry.show_in_launcher).collect()
    }

    pub fn desktop_icon_apps(&self) -> Vec<&AppDescriptor> {
        self.list().filter(|entry| entry.show_on_desktop).collect()
    }
}
