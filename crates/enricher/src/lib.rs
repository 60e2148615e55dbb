#![forbid(unsafe_code)]

pub mod classify;
pub mod domain;
pub mod engine;
pub mod error;
pub mod event;
pub mod snapshot;
pub mod telemetry;

pub use classify::{PathClassifier, SystemModules};
pub use domain::{
    Category, CpuTimes, ExceptionRecord, HandleDescriptor, MemoryRegion, ModuleDescriptor,
    ModuleInfo, ModuleKind, RegionPurpose, RegionState, SystemStat, TelemetryMap,
    ThreadDescriptor, Timeval,
};
pub use engine::{Collected, EnrichOutcome, Enricher, Services};
pub use error::Error;
pub use event::{AttachmentFailure, EventMergeWriter, MergeReport, Section};
pub use snapshot::{ProcessSnapshot, SnapshotData};
#[cfg(target_os = "linux")]
pub use snapshot::ProcfsSnapshot;
pub use telemetry::{
    ProcessCollector, SystemSource, WorkingSet, WorkingSetProbe, format_uptime,
};
