#![forbid(unsafe_code)]

//! What the running host considers to be part of the operating system.

use std::path::PathBuf;

#[cfg(windows)]
pub const SYSTEM_MODULE_NAMES: &[&str] = &["ntdll.dll", "kernel32.dll", "kernelbase.dll"];

#[cfg(not(windows))]
pub const SYSTEM_MODULE_NAMES: &[&str] = &[];

/// The Windows directory, as reported by the environment.
#[cfg(windows)]
pub fn system_directory() -> Option<PathBuf> {
    std::env::var_os("SystemRoot")
        .or_else(|| std::env::var_os("windir"))
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

/// Other platforms have no single directory that identifies system modules.
#[cfg(not(windows))]
pub fn system_directory() -> Option<PathBuf> {
    None
}
