#![forbid(unsafe_code)]

#[cfg(target_os = "linux")]
mod procfs_probe;
#[cfg(not(target_os = "linux"))]
mod sysinfo_probe;

#[cfg(target_os = "linux")]
pub use procfs_probe::ProcfsWorkingSet as HostWorkingSet;
#[cfg(not(target_os = "linux"))]
pub use sysinfo_probe::SysinfoWorkingSet as HostWorkingSet;

use crate::error::Error;

/// Resident memory of a live process, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkingSet {
    pub current: Option<u64>,
    pub peak: Option<u64>,
}

/// Queries the working set of a still-running process by id.
///
/// Implementations open whatever query handle they need and release it
/// before returning, on success and failure alike.
pub trait WorkingSetProbe: Send + Sync {
    fn query(&self, pid: u32) -> Result<WorkingSet, Error>;
}
