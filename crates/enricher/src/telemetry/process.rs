#![forbid(unsafe_code)]

use super::uptime::format_uptime;
use super::working_set::WorkingSetProbe;
use crate::domain::{MemoryRegion, RegionPurpose, RegionState, TelemetryMap};
use crate::snapshot::ProcessSnapshot;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionTotals {
    pub max: u64,
    pub total: u64,
}

impl RegionTotals {
    fn add(&mut self, size: u64) {
        self.max = self.max.max(size);
        self.total = self.total.saturating_add(size);
    }
}

/// Per-state aggregates over a process' memory regions.
///
/// Built with a single pass of commutative updates, so the result does not
/// depend on the order regions are enumerated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionStats {
    pub free: RegionTotals,
    pub committed: RegionTotals,
    pub reserved: RegionTotals,
    pub committed_image: u64,
    pub committed_mapped: u64,
    pub committed_private: u64,
}

impl RegionStats {
    pub fn from_regions<'a>(regions: impl IntoIterator<Item = &'a MemoryRegion>) -> Self {
        regions.into_iter().fold(Self::default(), |mut stats, region| {
            stats.add(region);
            stats
        })
    }

    fn add(&mut self, region: &MemoryRegion) {
        match region.state {
            RegionState::Free => self.free.add(region.size),
            RegionState::Reserved => self.reserved.add(region.size),
            RegionState::Committed => {
                self.committed.add(region.size);
                let bucket = match region.purpose {
                    Some(RegionPurpose::Image) => &mut self.committed_image,
                    Some(RegionPurpose::Mapped) => &mut self.committed_mapped,
                    Some(RegionPurpose::Private) => &mut self.committed_private,
                    None => return,
                };
                *bucket = bucket.saturating_add(region.size);
            }
        }
    }
}

/// Builds the process section from a snapshot, optionally asking the live
/// process for its working set.
#[derive(Default)]
pub struct ProcessCollector {
    working_set: Option<Box<dyn WorkingSetProbe>>,
}

impl ProcessCollector {
    pub fn new(working_set: Option<Box<dyn WorkingSetProbe>>) -> Self {
        Self { working_set }
    }

    pub fn collect(&self, snapshot: &dyn ProcessSnapshot) -> TelemetryMap {
        let mut map = TelemetryMap::new();

        map.insert_opt(
            "uptime",
            snapshot
                .start_time()
                .zip(snapshot.snapshot_time())
                .map(|(start, end)| format_uptime(start, end)),
        );
        map.insert_opt("thread_count", snapshot.threads().map(<[_]>::len));
        map.insert_opt("handle_count", snapshot.handles().map(<[_]>::len));

        let cpu = snapshot.cpu_times();
        map.insert_opt("cpu_user_time_ms", cpu.map(|cpu| cpu.user.as_millis()));
        map.insert_opt("cpu_kernel_time_ms", cpu.map(|cpu| cpu.kernel.as_millis()));

        if let Some(probe) = &self.working_set {
            self.collect_working_set(probe.as_ref(), snapshot.process_id(), &mut map);
        }

        match snapshot.memory_regions() {
            Some(regions) => {
                let stats = RegionStats::from_regions(regions);
                debug!(regions = regions.len(), ?stats, "memory regions aggregated");
                Self::insert_region_stats(&stats, &mut map);
            }
            None => {
                for key in REGION_KEYS {
                    map.omit(*key);
                }
            }
        }

        map
    }

    fn collect_working_set(
        &self,
        probe: &dyn WorkingSetProbe,
        pid: Option<u32>,
        map: &mut TelemetryMap,
    ) {
        let working_set = match pid {
            Some(pid) => probe
                .query(pid)
                .inspect_err(|err| warn!(pid, %err, "working set query failed"))
                .unwrap_or_default(),
            None => Default::default(),
        };
        map.insert_opt("working_set_size", working_set.current);
        map.insert_opt("peak_working_set_size", working_set.peak);
    }

    fn insert_region_stats(stats: &RegionStats, map: &mut TelemetryMap) {
        map.insert("max_free_region_size", stats.free.max);
        map.insert("total_free_region_size", stats.free.total);
        map.insert("max_reserve_region_size", stats.reserved.max);
        map.insert("total_reserve_region_size", stats.reserved.total);
        map.insert("max_commit_region_size", stats.committed.max);
        map.insert("total_commit_region_size", stats.committed.total);
        map.insert("total_commit_image_size", stats.committed_image);
        map.insert("total_commit_mapped_size", stats.committed_mapped);
        map.insert("total_commit_private_size", stats.committed_private);
    }
}

const REGION_KEYS: &[&str] = &[
    "max_free_region_size",
    "total_free_region_size",
    "max_reserve_region_size",
    "total_reserve_region_size",
    "max_commit_region_size",
    "total_commit_region_size",
    "total_commit_image_size",
    "total_commit_mapped_size",
    "total_commit_private_size",
];
