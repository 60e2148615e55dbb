use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Telemetry {
    /// Whether host-wide counters are written to the system section. When
    /// off, the system section is still written, but empty.
    pub collect_system: bool,

    /// Whether the live process is queried for its working set. This opens
    /// a handle to the process and may fail for lack of permission, in
    /// which case the working set keys are omitted.
    pub query_working_set: bool,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            collect_system: true,
            query_working_set: true,
        }
    }
}
