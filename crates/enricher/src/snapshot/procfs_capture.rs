#![forbid(unsafe_code)]

use crate::domain::{
    CpuTimes, HandleDescriptor, MemoryRegion, ModuleDescriptor, ModuleKind, RegionPurpose,
    ThreadDescriptor, Timeval,
};
use crate::error::Error;
use crate::snapshot::SnapshotData;
use procfs::process::{FDTarget, MMPermissions, MMapPath, MemoryMap, Process};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{trace, warn};

/// Captures a [`SnapshotData`] of a live process from `/proc/<pid>`.
///
/// Whatever cannot be read (usually for lack of permission) is left absent.
/// Only failing to open the process at all is an error.
#[derive(Debug, Default)]
pub struct ProcfsSnapshot;

/// Per-file span of mappings, in address order of first appearance.
struct FileSpan {
    path: PathBuf,
    start: u64,
    end: u64,
    executable: bool,
}

impl ProcfsSnapshot {
    pub fn capture(pid: u32) -> Result<SnapshotData, Error> {
        let process = Process::new(pid as i32)?;
        let mut data = SnapshotData {
            process_id: Some(pid),
            snapshot_time: Some(Timeval::from_system_time(SystemTime::now())),
            ..Default::default()
        };

        match process.stat() {
            Ok(stat) => {
                let ticks = procfs::ticks_per_second();
                data.cpu_times = Some(CpuTimes {
                    user: ticks_to_duration(stat.utime, ticks),
                    kernel: ticks_to_duration(stat.stime, ticks),
                });
                match procfs::boot_time_secs() {
                    Ok(boot) => data.start_time = Some(start_time(boot, stat.starttime, ticks)),
                    Err(err) => warn!(pid, ?err, "failed to read boot time"),
                }
            }
            Err(err) => warn!(pid, ?err, "failed to read process stat"),
        }

        match process.tasks() {
            Ok(tasks) => {
                data.threads = Some(
                    tasks
                        .filter_map(Result::ok)
                        .map(|task| ThreadDescriptor {
                            thread_id: task.tid as u64,
                        })
                        .collect(),
                );
            }
            Err(err) => warn!(pid, ?err, "failed to list threads"),
        }

        match process.fd() {
            Ok(fds) => {
                data.handles = Some(
                    fds.filter_map(Result::ok)
                        .map(|fd| HandleDescriptor {
                            handle: fd.fd as u64,
                            type_name: handle_type(&fd.target),
                        })
                        .collect(),
                );
            }
            Err(err) => warn!(pid, ?err, "failed to list open file descriptors"),
        }

        let exe = match process.exe() {
            Ok(path) => Self::sanitize_path(&path),
            Err(err) => {
                warn!(pid, ?err, "failed to read exe path");
                None
            }
        };

        match process.maps() {
            Ok(maps) => {
                let maps: Vec<MemoryMap> = maps.into_iter().collect();
                let (modules, regions) = Self::layout(&maps, exe.as_deref());
                data.modules = modules;
                data.memory_regions = Some(regions);
            }
            Err(err) => warn!(pid, ?err, "failed to read memory maps"),
        }

        trace!(
            pid,
            modules = data.modules.len(),
            regions = data.memory_regions.as_ref().map(Vec::len),
            "snapshot captured"
        );
        Ok(data)
    }

    fn sanitize_path(path: &Path) -> Option<PathBuf> {
        if !path.has_root() {
            return None;
        }
        let path_str = path.to_str()?;
        let trimmed = path_str.strip_suffix(" (deleted)").unwrap_or(path_str);
        Some(PathBuf::from(trimmed))
    }

    /// Derive the module table and the region list from the address-ordered
    /// mappings. A file with at least one executable mapping is a module
    /// spanning all of its mappings; gaps between mappings are free regions.
    fn layout(maps: &[MemoryMap], exe: Option<&Path>) -> (Vec<ModuleDescriptor>, Vec<MemoryRegion>) {
        let mut spans: Vec<FileSpan> = Vec::new();
        let mut index: HashMap<PathBuf, usize> = HashMap::new();

        for map in maps {
            let MMapPath::Path(path) = &map.pathname else {
                continue;
            };
            let Some(path) = Self::sanitize_path(path) else {
                continue;
            };
            let (start, end) = map.address;
            let executable = map.perms.contains(MMPermissions::EXECUTE);
            match index.get(&path) {
                Some(&i) => {
                    let span = &mut spans[i];
                    span.start = span.start.min(start);
                    span.end = span.end.max(end);
                    span.executable |= executable;
                }
                None => {
                    index.insert(path.clone(), spans.len());
                    spans.push(FileSpan {
                        path,
                        start,
                        end,
                        executable,
                    });
                }
            }
        }

        let modules = spans
            .iter()
            .filter(|span| span.executable)
            .map(|span| {
                let kind = if exe == Some(span.path.as_path()) {
                    ModuleKind::Executable
                } else {
                    ModuleKind::Library
                };
                ModuleDescriptor::new(
                    span.start,
                    span.end.saturating_sub(span.start),
                    span.path.to_string_lossy(),
                    kind,
                )
            })
            .collect();

        let mut regions = Vec::with_capacity(maps.len() * 2);
        let mut previous_end: Option<u64> = None;
        for map in maps {
            let (start, end) = map.address;
            if let Some(previous_end) = previous_end
                && start > previous_end
            {
                regions.push(MemoryRegion::free(start - previous_end));
            }
            previous_end = Some(end);

            let size = end.saturating_sub(start);
            let accessible = map
                .perms
                .intersects(MMPermissions::READ | MMPermissions::WRITE | MMPermissions::EXECUTE);
            if !accessible {
                regions.push(MemoryRegion::reserved(size));
                continue;
            }

            let purpose = match &map.pathname {
                MMapPath::Path(path) => {
                    let is_module = Self::sanitize_path(path)
                        .and_then(|path| index.get(&path).map(|&i| spans[i].executable))
                        .unwrap_or(false);
                    if is_module {
                        RegionPurpose::Image
                    } else {
                        RegionPurpose::Mapped
                    }
                }
                _ => RegionPurpose::Private,
            };
            regions.push(MemoryRegion::committed(size, purpose));
        }

        (modules, regions)
    }
}

fn ticks_to_duration(ticks: u64, per_second: u64) -> Duration {
    if per_second == 0 {
        return Duration::ZERO;
    }
    Duration::from_micros(ticks.saturating_mul(1_000_000) / per_second)
}

fn start_time(boot_secs: u64, start_ticks: u64, per_second: u64) -> Timeval {
    let since_boot = ticks_to_duration(start_ticks, per_second);
    Timeval::new(
        boot_secs as i64 + since_boot.as_secs() as i64,
        since_boot.subsec_micros() as i64,
    )
}

fn handle_type(target: &FDTarget) -> Option<String> {
    match target {
        FDTarget::Path(_) => Some("file".into()),
        FDTarget::Socket(_) => Some("socket".into()),
        FDTarget::Pipe(_) => Some("pipe".into()),
        FDTarget::AnonInode(kind) => Some(kind.clone()),
        _ => None,
    }
}
