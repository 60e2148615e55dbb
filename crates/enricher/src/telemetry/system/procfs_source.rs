#![forbid(unsafe_code)]

use super::SystemSource;
use crate::domain::SystemStat;
use procfs::{Current, LoadAverage, Meminfo};
use tracing::warn;

/// Host counters from `/proc`.
///
/// Linux has no paged/non-paged pool split; reclaimable and unreclaimable
/// slab stand in for them, and commit figures come from the overcommit
/// accounting (`Committed_AS` / `CommitLimit`).
#[derive(Debug, Default)]
pub struct ProcfsSystemSource;

impl SystemSource for ProcfsSystemSource {
    fn sample(&self) -> SystemStat {
        let mut stat = SystemStat::default();

        match Meminfo::current() {
            Ok(mem) => {
                stat.commit_total = Some(mem.committed_as);
                stat.commit_limit = mem.commit_limit;
                stat.physical_total = Some(mem.mem_total);
                stat.physical_available = mem.mem_available;
                stat.kernel_paged = mem.s_reclaimable;
                stat.kernel_nonpaged = mem.s_unreclaim;
                stat.kernel_total = Some(mem.slab);
                stat.system_cache = Some(mem.cached);
            }
            Err(err) => warn!(?err, "failed to read /proc/meminfo"),
        }

        match LoadAverage::current() {
            Ok(load) => stat.thread_count = Some(load.max as u64),
            Err(err) => warn!(?err, "failed to read /proc/loadavg"),
        }

        match procfs::process::all_processes() {
            Ok(processes) => stat.process_count = Some(processes.count() as u64),
            Err(err) => warn!(?err, "failed to list processes"),
        }

        stat.handle_count = procfs::sys::fs::file_nr()
            .map(|state| state.allocated)
            .inspect_err(|err| warn!(?err, "failed to read /proc/sys/fs/file-nr"))
            .ok();
        stat
    }
}
