#![forbid(unsafe_code)]

use super::{WorkingSet, WorkingSetProbe};
use crate::error::Error;
use procfs::process::Process;

/// Reads `VmRSS` and `VmHWM` from `/proc/<pid>/status`.
#[derive(Debug, Default)]
pub struct ProcfsWorkingSet;

impl WorkingSetProbe for ProcfsWorkingSet {
    fn query(&self, pid: u32) -> Result<WorkingSet, Error> {
        // The directory fd behind `process` is closed when it drops.
        let process = Process::new(pid as i32)?;
        let status = process.status()?;
        Ok(WorkingSet {
            current: status.vmrss.map(|kb| kb * 1024),
            peak: status.vmhwm.map(|kb| kb * 1024),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_own_working_set() {
        let working_set = ProcfsWorkingSet.query(std::process::id()).unwrap();
        let current = working_set.current.unwrap();
        let peak = working_set.peak.unwrap();
        assert!(current > 0);
        assert!(peak >= current);
    }
}
