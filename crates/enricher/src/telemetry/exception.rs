#![forbid(unsafe_code)]

use crate::classify::PathClassifier;
use crate::domain::TelemetryMap;
use crate::snapshot::ProcessSnapshot;
use tracing::debug;

/// Describe the snapshot's exception and the module it hit. Snapshots
/// without an exception record (non-crash dumps) produce an empty map.
pub fn collect_exception(
    snapshot: &dyn ProcessSnapshot,
    classifier: &PathClassifier,
) -> TelemetryMap {
    let mut map = TelemetryMap::new();
    let Some(exception) = snapshot.exception() else {
        return map;
    };

    map.insert("exception_code", exception.code);
    map.insert("exception_address", format_args!("{:#x}", exception.address));
    if let Some(flags) = exception.flags {
        map.insert("exception_flags", flags);
    }

    let module = classifier.classify(exception.address, snapshot.modules());
    if module.full_path.is_empty() {
        map.omit("exception_module_name");
        map.omit("exception_module_path");
    } else {
        map.insert("exception_module_name", &module.name);
        map.insert("exception_module_path", &module.full_path);
    }
    map.insert("exception_module_category", module.category);

    debug!(
        code = exception.code,
        address = exception.address,
        module = %module.name,
        category = %module.category,
        "exception classified"
    );
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SystemModules;
    use crate::domain::{ExceptionRecord, ModuleDescriptor, ModuleKind};
    use crate::snapshot::SnapshotData;

    fn snapshot(exception: Option<ExceptionRecord>) -> SnapshotData {
        SnapshotData {
            modules: vec![ModuleDescriptor::new(
                0x1000,
                0x1000,
                r"C:\App\own.exe",
                ModuleKind::Executable,
            )],
            exception,
            ..Default::default()
        }
    }

    #[test]
    fn describes_faulting_module() {
        let classifier = PathClassifier::new(SystemModules::none());
        let record = ExceptionRecord::new(0x1500, 0xC000_0005).with_flags(1);
        let map = collect_exception(&snapshot(Some(record)), &classifier);

        assert_eq!(map.get("exception_code"), Some("3221225477"));
        assert_eq!(map.get("exception_address"), Some("0x1500"));
        assert_eq!(map.get("exception_flags"), Some("1"));
        assert_eq!(map.get("exception_module_name"), Some("own.exe"));
        assert_eq!(map.get("exception_module_path"), Some(r"C:\App\own.exe"));
        assert_eq!(map.get("exception_module_category"), Some("own"));
        assert!(map.omitted().is_empty());
    }

    #[test]
    fn unknown_module_omits_name() {
        let classifier = PathClassifier::default();
        let map = collect_exception(
            &snapshot(Some(ExceptionRecord::new(0x9000, 11))),
            &classifier,
        );

        assert_eq!(map.get("exception_module_category"), Some("unknown"));
        assert_eq!(map.get("exception_module_name"), None);
        assert_eq!(map.get("exception_flags"), None);
        assert!(map.omitted().contains(&"exception_module_name".to_string()));
    }

    #[test]
    fn no_exception_no_details() {
        let map = collect_exception(&snapshot(None), &PathClassifier::default());
        assert!(map.is_empty());
        assert!(map.omitted().is_empty());
    }
}
