#![forbid(unsafe_code)]

mod exception;
mod module;
mod process;
mod region;
mod system_stat;
mod telemetry_map;
mod timeval;

pub use exception::ExceptionRecord;
pub use module::{Category, ModuleDescriptor, ModuleInfo, ModuleKind};
pub use process::{CpuTimes, HandleDescriptor, ThreadDescriptor};
pub use region::{MemoryRegion, RegionPurpose, RegionState};
pub use system_stat::SystemStat;
pub use telemetry_map::TelemetryMap;
pub use timeval::Timeval;
