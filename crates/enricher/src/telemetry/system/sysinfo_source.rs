#![forbid(unsafe_code)]

use super::SystemSource;
use crate::domain::SystemStat;
use sysinfo::{ProcessesToUpdate, System};

/// Host counters through `sysinfo`: physical memory and the process count.
/// Commit, kernel pool and handle counters are left absent.
#[derive(Debug, Default)]
pub struct SysinfoSystemSource;

impl SystemSource for SysinfoSystemSource {
    fn sample(&self) -> SystemStat {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::All, true);

        SystemStat {
            physical_total: Some(system.total_memory()),
            physical_available: Some(system.available_memory()),
            process_count: Some(system.processes().len() as u64),
            ..Default::default()
        }
    }
}
