use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Classifier {
    /// Directories whose modules are classified as `system`.
    ///
    /// These are added to the directory reported by the host (the Windows
    /// directory on Windows). Comparison is case-insensitive and purely
    /// lexical.
    pub system_directories: Vec<PathBuf>,

    /// Base filenames classified as `system` regardless of location, e.g.
    /// `ntdll.dll`. Compared case-insensitively.
    pub system_module_names: Vec<String>,

    /// Whether the host's own system directory and module list are used in
    /// addition to the lists above.
    ///
    /// # Note
    ///
    /// Disable this when enriching snapshots that were captured on another
    /// machine, where the local system directory means nothing.
    pub detect_host_system: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            system_directories: Vec::new(),
            system_module_names: Vec::new(),
            detect_host_system: true,
        }
    }
}
