#![forbid(unsafe_code)]

mod exception;
mod process;
pub mod system;
mod uptime;
pub mod working_set;

pub use exception::collect_exception;
pub use process::{ProcessCollector, RegionStats, RegionTotals};
pub use system::{HostSystemSource, NoSystemSource, SystemSource, collect_system};
pub use uptime::{format_elapsed, format_uptime};
pub use working_set::{HostWorkingSet, WorkingSet, WorkingSetProbe};
