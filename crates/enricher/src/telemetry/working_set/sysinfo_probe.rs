#![forbid(unsafe_code)]

use super::{WorkingSet, WorkingSetProbe};
use crate::error::Error;
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Resident memory through `sysinfo`. The peak is not exposed there and is
/// always absent.
#[derive(Debug, Default)]
pub struct SysinfoWorkingSet;

impl WorkingSetProbe for SysinfoWorkingSet {
    fn query(&self, pid: u32) -> Result<WorkingSet, Error> {
        let pid = Pid::from_u32(pid);
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let process = system
            .process(pid)
            .ok_or(Error::ProcessNotFound(pid.as_u32()))?;
        Ok(WorkingSet {
            current: Some(process.memory()),
            peak: None,
        })
    }
}
