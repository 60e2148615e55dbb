#![forbid(unsafe_code)]

#[cfg(target_os = "linux")]
mod procfs_source;
#[cfg(not(target_os = "linux"))]
mod sysinfo_source;

#[cfg(target_os = "linux")]
pub use procfs_source::ProcfsSystemSource as HostSystemSource;
#[cfg(not(target_os = "linux"))]
pub use sysinfo_source::SysinfoSystemSource as HostSystemSource;

use crate::domain::{SystemStat, TelemetryMap};
use tracing::debug;

/// Samples host-wide counters. Counters the platform does not expose stay
/// `None`; sampling itself never fails.
pub trait SystemSource: Send + Sync {
    fn sample(&self) -> SystemStat;
}

/// A source for hosts without any usable counters.
#[derive(Debug, Default)]
pub struct NoSystemSource;

impl SystemSource for NoSystemSource {
    fn sample(&self) -> SystemStat {
        SystemStat::default()
    }
}

/// Sample `source` into the system section.
pub fn collect_system(source: &dyn SystemSource) -> TelemetryMap {
    let stat = source.sample();
    let mut map = TelemetryMap::new();

    if stat == SystemStat::default() {
        debug!("no system counters available");
        return map;
    }

    map.insert_opt("commit_total", stat.commit_total);
    map.insert_opt("commit_limit", stat.commit_limit);
    map.insert_opt(
        "commit_percent",
        stat.commit_total
            .zip(stat.commit_limit)
            .and_then(|(total, limit)| percent(total, limit)),
    );
    map.insert_opt("physical_total", stat.physical_total);
    map.insert_opt("physical_available", stat.physical_available);
    map.insert_opt(
        "physical_usage",
        stat.physical_available
            .zip(stat.physical_total)
            .and_then(|(available, total)| percent(available, total)),
    );
    map.insert_opt("kernel_paged", stat.kernel_paged);
    map.insert_opt("kernel_nonpaged", stat.kernel_nonpaged);
    map.insert_opt("kernel_total", stat.kernel_total);
    map.insert_opt("system_cache", stat.system_cache);
    map.insert_opt("handle_count", stat.handle_count);
    map.insert_opt("process_count", stat.process_count);
    map.insert_opt("thread_count", stat.thread_count);
    map
}

fn percent(part: u64, whole: u64) -> Option<String> {
    if whole == 0 {
        return None;
    }
    Some(format!("{:.2}%", part as f64 / whole as f64 * 100.0))
}
