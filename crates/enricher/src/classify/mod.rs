#![forbid(unsafe_code)]

pub mod host;
mod path;

pub use path::{NormalizedPath, base_name, parent_dir};

use crate::domain::{Category, ModuleDescriptor, ModuleInfo, ModuleKind};
use std::path::Path;
use tracing::trace;

/// Directories and module names that mark a module as part of the OS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemModules {
    directories: Vec<NormalizedPath>,
    names: Vec<String>,
}

impl SystemModules {
    pub fn new<D, N>(directories: D, names: N) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<Path>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let directories = directories
            .into_iter()
            .map(|dir| NormalizedPath::new(&dir.as_ref().to_string_lossy()))
            .filter(|dir| !dir.is_empty())
            .collect();
        let names = names
            .into_iter()
            .map(|name| name.as_ref().to_lowercase())
            .collect();
        Self { directories, names }
    }

    /// No system modules at all; the classifier only tells own from
    /// third-party code.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_config(config: &config::Classifier) -> Self {
        let mut directories = config.system_directories.clone();
        let mut names = config.system_module_names.clone();
        if config.detect_host_system {
            directories.extend(host::system_directory());
            names.extend(host::SYSTEM_MODULE_NAMES.iter().map(|name| name.to_string()));
        }
        Self::new(directories, names)
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.names.is_empty()
    }

    fn matches(&self, path: &NormalizedPath, name: &str) -> bool {
        self.names.iter().any(|known| known == name)
            || self.directories.iter().any(|dir| path.is_in(dir))
    }
}

/// Resolves which module a faulting address belongs to and who ships it.
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    system: SystemModules,
}

impl PathClassifier {
    pub fn new(system: SystemModules) -> Self {
        Self { system }
    }

    /// Classify the module containing `address`.
    ///
    /// System modules win over the executable's own directory, so an OS
    /// library copied next to the executable is still `system`. An address
    /// outside every module yields an empty, `unknown` [`ModuleInfo`].
    pub fn classify(&self, address: u64, modules: &[ModuleDescriptor]) -> ModuleInfo {
        let main_dir = modules
            .iter()
            .find(|module| module.kind == ModuleKind::Executable)
            .and_then(|module| parent_dir(&module.path))
            .map(NormalizedPath::new)
            .unwrap_or_default();

        let Some(module) = modules.iter().find(|module| module.contains(address)) else {
            trace!(address, "faulting address outside every module");
            return ModuleInfo::default();
        };

        let name = base_name(&module.path);
        let path = NormalizedPath::new(&module.path);
        let category = if self.system.matches(&path, &name.to_lowercase()) {
            Category::System
        } else if path.is_in(&main_dir) {
            Category::Own
        } else {
            Category::ThirdParty
        };

        ModuleInfo {
            name: name.to_string(),
            full_path: module.path.clone(),
            category,
        }
    }
}
