#![forbid(unsafe_code)]

use config::Config;
use enricher::domain::SystemStat;
use enricher::event::document;
use enricher::telemetry::NoSystemSource;
use enricher::{
    CpuTimes, EnrichOutcome, Enricher, Error, ExceptionRecord, MemoryRegion, ModuleDescriptor,
    ModuleKind, RegionPurpose, Services, SnapshotData, SystemModules, SystemSource,
    ThreadDescriptor, Timeval, WorkingSet, WorkingSetProbe,
};
use rmpv::Value;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

const EVENT: &str = "__sentry-event";

#[derive(Debug)]
struct StaticSystem(SystemStat);

impl SystemSource for StaticSystem {
    fn sample(&self) -> SystemStat {
        self.0
    }
}

#[derive(Debug)]
struct DeniedWorkingSet;

impl WorkingSetProbe for DeniedWorkingSet {
    fn query(&self, pid: u32) -> Result<WorkingSet, Error> {
        Err(Error::ProcessNotFound(pid))
    }
}

#[derive(Debug)]
struct StaticWorkingSet;

impl WorkingSetProbe for StaticWorkingSet {
    fn query(&self, _pid: u32) -> Result<WorkingSet, Error> {
        Ok(WorkingSet {
            current: Some(1 << 20),
            peak: Some(2 << 20),
        })
    }
}

fn services(working_set: Option<Box<dyn WorkingSetProbe>>) -> Services {
    Services {
        system: Box::new(StaticSystem(SystemStat {
            commit_total: Some(1 << 30),
            commit_limit: Some(4 << 30),
            physical_total: Some(8 << 30),
            physical_available: Some(2 << 30),
            kernel_paged: Some(100),
            kernel_nonpaged: Some(200),
            kernel_total: Some(300),
            system_cache: Some(400),
            handle_count: Some(5000),
            process_count: Some(120),
            thread_count: Some(900),
        })),
        working_set,
        system_modules: SystemModules::new([r"C:\Windows"], ["ntdll.dll"]),
    }
}

fn snapshot() -> SnapshotData {
    SnapshotData {
        process_id: Some(4242),
        start_time: Some(Timeval::new(1_700_000_000, 0)),
        snapshot_time: Some(Timeval::new(1_700_000_000, 1_500)),
        cpu_times: Some(CpuTimes {
            user: Duration::from_millis(30),
            kernel: Duration::from_millis(10),
        }),
        modules: vec![ModuleDescriptor::new(
            0x1000,
            0x1000,
            r"C:\App\own.exe",
            ModuleKind::Executable,
        )],
        threads: Some(vec![ThreadDescriptor { thread_id: 7 }]),
        handles: Some(Vec::new()),
        memory_regions: Some(vec![
            MemoryRegion::committed(0x1000, RegionPurpose::Image),
            MemoryRegion::free(0x10000),
        ]),
        exception: Some(ExceptionRecord::new(0x1500, 0xC000_0005)),
    }
}

fn section<'a>(root: &'a [(Value, Value)], label: &str) -> &'a [(Value, Value)] {
    let contexts = root
        .iter()
        .find(|(k, _)| k.as_str() == Some("contexts"))
        .and_then(|(_, v)| v.as_map())
        .expect("contexts map");
    contexts
        .iter()
        .find(|(k, _)| k.as_str() == Some(label))
        .and_then(|(_, v)| v.as_map())
        .map(Vec::as_slice)
        .unwrap_or_else(|| panic!("missing section {label}"))
}

fn value<'a>(section: &'a [(Value, Value)], key: &str) -> Option<&'a str> {
    section
        .iter()
        .find(|(k, _)| k.as_str() == Some(key))
        .and_then(|(_, v)| v.as_str())
}

fn read(path: &Path) -> Vec<(Value, Value)> {
    document::decode(&std::fs::read(path).unwrap()).expect("valid document")
}

#[test]
fn crash_in_own_module_creates_event_document() {
    let dir = tempdir().unwrap();
    let event = dir.path().join(EVENT);
    let enricher = Enricher::new(
        &Config::default(),
        services(Some(Box::new(StaticWorkingSet))),
    );

    let outcome = enricher.enrich(&snapshot(), &[event.clone()]);

    let merged = match outcome {
        EnrichOutcome::Complete { merged } => merged,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(merged, vec![event.clone()]);

    let root = read(&event);
    let exception = section(&root, "Exception Details");
    assert_eq!(value(exception, "exception_module_category"), Some("own"));
    assert_eq!(value(exception, "exception_module_name"), Some("own.exe"));
    assert_eq!(value(exception, "exception_code"), Some("3221225477"));

    let process = section(&root, "Process Details");
    assert_eq!(value(process, "uptime"), Some("1ms"));
    assert_eq!(value(process, "thread_count"), Some("1"));
    assert_eq!(value(process, "working_set_size"), Some("1048576"));
    assert_eq!(value(process, "total_free_region_size"), Some("65536"));

    let system = section(&root, "System Details");
    assert_eq!(value(system, "commit_percent"), Some("25.00%"));
    assert_eq!(value(system, "physical_usage"), Some("25.00%"));
    assert_eq!(value(system, "process_count"), Some("120"));
}

#[test]
fn existing_producers_keep_their_keys() {
    let dir = tempdir().unwrap();
    let event = dir.path().join(EVENT);
    let existing = vec![
        (Value::from("event_id"), Value::from("0123")),
        (
            Value::from("contexts"),
            Value::Map(vec![(
                Value::from("os"),
                Value::Map(vec![(Value::from("name"), Value::from("Windows"))]),
            )]),
        ),
        (Value::from("level"), Value::from("fatal")),
    ];
    std::fs::write(&event, document::encode(existing).unwrap()).unwrap();

    let enricher = Enricher::new(&Config::default(), services(None));
    enricher.enrich(&snapshot(), &[&event]);
    let once = std::fs::read(&event).unwrap();
    enricher.enrich(&snapshot(), &[&event]);
    let twice = std::fs::read(&event).unwrap();
    assert_eq!(once, twice);

    let root = read(&event);
    let keys: Vec<_> = root.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, [Some("event_id"), Some("contexts"), Some("level")]);
    assert_eq!(value(section(&root, "os"), "name"), Some("Windows"));
    assert_eq!(
        value(section(&root, "Exception Details"), "exception_module_category"),
        Some("own")
    );
}

#[test]
fn denied_working_set_is_partial() {
    let dir = tempdir().unwrap();
    let event = dir.path().join(EVENT);
    let enricher = Enricher::new(
        &Config::default(),
        services(Some(Box::new(DeniedWorkingSet))),
    );

    let outcome = enricher.enrich(&snapshot(), &[&event]);

    let (merged, omitted, failed) = match outcome {
        EnrichOutcome::Partial {
            merged,
            omitted,
            failed,
        } => (merged, omitted, failed),
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(merged.len(), 1);
    assert!(failed.is_empty());
    assert_eq!(omitted, ["working_set_size", "peak_working_set_size"]);

    let root = read(&event);
    let process = section(&root, "Process Details");
    assert_eq!(value(process, "working_set_size"), None);
    assert_eq!(value(process, "thread_count"), Some("1"));
}

#[test]
fn corrupt_attachment_is_rewritten_with_new_sections_only() {
    let dir = tempdir().unwrap();
    let event = dir.path().join(EVENT);
    std::fs::write(&event, [0xdc, 0x00, 0x05, 0x01]).unwrap();

    let enricher = Enricher::new(&Config::default(), services(None));
    let outcome = enricher.enrich(&snapshot(), &[&event]);
    assert_eq!(outcome.merged(), [event.clone()]);

    let root = read(&event);
    assert_eq!(root.len(), 1);
    let contexts = root[0].1.as_map().unwrap();
    let labels: Vec<_> = contexts.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        labels,
        [
            Some("Exception Details"),
            Some("Process Details"),
            Some("System Details")
        ]
    );
}

#[test]
fn other_attachments_are_noop() {
    let dir = tempdir().unwrap();
    let dump = dir.path().join("upload_file_minidump");
    std::fs::write(&dump, b"MDMP").unwrap();

    let enricher = Enricher::new(&Config::default(), services(None));
    let outcome = enricher.enrich(&snapshot(), &[&dump]);

    assert!(matches!(outcome, EnrichOutcome::NoOp));
    assert_eq!(std::fs::read(&dump).unwrap(), b"MDMP");
}

#[test]
fn configured_names_are_honoured() {
    let dir = tempdir().unwrap();
    let mut config = Config::default();
    config.event.attachment_name = "event.msgpack".into();
    config.event.section_key = "extra".into();
    config.event.system_label = "Host".into();
    let event = dir.path().join("event.msgpack");

    let services = Services {
        system: Box::new(NoSystemSource),
        working_set: None,
        system_modules: SystemModules::none(),
    };
    let enricher = Enricher::new(&config, services);
    enricher.enrich(&snapshot(), &[&event, &dir.path().join(EVENT)]);

    let root = read(&event);
    assert_eq!(root[0].0.as_str(), Some("extra"));
    let host = root[0].1.as_map().unwrap();
    let labels: Vec<_> = host.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        labels,
        [Some("Exception Details"), Some("Process Details"), Some("Host")]
    );
    assert!(!dir.path().join(EVENT).exists());
}
