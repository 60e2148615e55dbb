#![forbid(unsafe_code)]

#[cfg(target_os = "linux")]
mod procfs_capture;

#[cfg(target_os = "linux")]
pub use procfs_capture::ProcfsSnapshot;

use crate::domain::{
    CpuTimes, ExceptionRecord, HandleDescriptor, MemoryRegion, ModuleDescriptor,
    ThreadDescriptor, Timeval,
};

/// Read-only view of a frozen process, provided by the crash handler.
///
/// Accessors return `None` when the producer could not capture that piece
/// of the process. An empty slice means "captured, and there were none".
pub trait ProcessSnapshot {
    fn process_id(&self) -> Option<u32>;
    fn start_time(&self) -> Option<Timeval>;
    /// When the snapshot was taken, i.e. the crash time for crash dumps.
    fn snapshot_time(&self) -> Option<Timeval>;
    fn cpu_times(&self) -> Option<CpuTimes>;
    /// Loaded modules in the producer's order.
    fn modules(&self) -> &[ModuleDescriptor];
    fn threads(&self) -> Option<&[ThreadDescriptor]>;
    fn handles(&self) -> Option<&[HandleDescriptor]>;
    fn memory_regions(&self) -> Option<&[MemoryRegion]>;
    fn exception(&self) -> Option<&ExceptionRecord>;
}

/// An owned snapshot. Producers that do not keep their own representation
/// around fill one of these in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotData {
    pub process_id: Option<u32>,
    pub start_time: Option<Timeval>,
    pub snapshot_time: Option<Timeval>,
    pub cpu_times: Option<CpuTimes>,
    pub modules: Vec<ModuleDescriptor>,
    pub threads: Option<Vec<ThreadDescriptor>>,
    pub handles: Option<Vec<HandleDescriptor>>,
    pub memory_regions: Option<Vec<MemoryRegion>>,
    pub exception: Option<ExceptionRecord>,
}

impl ProcessSnapshot for SnapshotData {
    fn process_id(&self) -> Option<u32> {
        self.process_id
    }

    fn start_time(&self) -> Option<Timeval> {
        self.start_time
    }

    fn snapshot_time(&self) -> Option<Timeval> {
        self.snapshot_time
    }

    fn cpu_times(&self) -> Option<CpuTimes> {
        self.cpu_times
    }

    fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    fn threads(&self) -> Option<&[ThreadDescriptor]> {
        self.threads.as_deref()
    }

    fn handles(&self) -> Option<&[HandleDescriptor]> {
        self.handles.as_deref()
    }

    fn memory_regions(&self) -> Option<&[MemoryRegion]> {
        self.memory_regions.as_deref()
    }

    fn exception(&self) -> Option<&ExceptionRecord> {
        self.exception.as_ref()
    }
}
