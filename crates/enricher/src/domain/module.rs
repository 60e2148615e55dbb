#![forbid(unsafe_code)]

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// The main executable image of the process.
    Executable,
    /// A shared library or any other loaded image.
    Library,
}

/// A module loaded into the snapshotted process.
///
/// `path` is kept as reported by the snapshot producer rather than as a
/// `PathBuf`: a snapshot captured on Windows may be enriched elsewhere, and
/// its `\`-separated paths must still classify the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub base: u64,
    pub size: u64,
    pub path: String,
    pub kind: ModuleKind,
}

impl ModuleDescriptor {
    pub fn new(base: u64, size: u64, path: impl Into<String>, kind: ModuleKind) -> Self {
        Self {
            base,
            size,
            path: path.into(),
            kind,
        }
    }

    /// Whether `address` lies in `[base, base + size)`.
    pub fn contains(&self, address: u64) -> bool {
        address
            .checked_sub(self.base)
            .is_some_and(|offset| offset < self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Shipped with the operating system.
    System,
    /// Shipped alongside the main executable.
    Own,
    /// Loaded from anywhere else.
    ThirdParty,
    #[default]
    Unknown,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::System => "system",
            Category::Own => "own",
            Category::ThirdParty => "third_party",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The module owning a faulting address, as resolved by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleInfo {
    pub name: String,
    pub full_path: String,
    pub category: Category,
}
