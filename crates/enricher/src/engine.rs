#![forbid(unsafe_code)]

use crate::classify::{PathClassifier, SystemModules};
use crate::domain::TelemetryMap;
use crate::event::{AttachmentFailure, EventMergeWriter, Section};
use crate::snapshot::ProcessSnapshot;
use crate::telemetry::{
    HostSystemSource, HostWorkingSet, NoSystemSource, ProcessCollector, SystemSource,
    WorkingSetProbe, collect_exception, collect_system,
};
use config::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Platform back-ends the enricher queries.
pub struct Services {
    pub system: Box<dyn SystemSource>,
    /// `None` disables the live working set query.
    pub working_set: Option<Box<dyn WorkingSetProbe>>,
    pub system_modules: SystemModules,
}

impl Services {
    /// The running host's back-ends, as enabled by `config`.
    pub fn host(config: &Config) -> Self {
        let system: Box<dyn SystemSource> = if config.telemetry.collect_system {
            Box::new(HostSystemSource::default())
        } else {
            Box::new(NoSystemSource)
        };
        let working_set: Option<Box<dyn WorkingSetProbe>> = if config.telemetry.query_working_set {
            Some(Box::new(HostWorkingSet::default()))
        } else {
            None
        };
        Self {
            system,
            working_set,
            system_modules: SystemModules::from_config(&config.classifier),
        }
    }
}

/// The three sections produced for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    pub exception: TelemetryMap,
    pub process: TelemetryMap,
    pub system: TelemetryMap,
}

impl Collected {
    /// Keys that could not be collected, across all sections.
    pub fn omitted(&self) -> Vec<String> {
        [&self.exception, &self.process, &self.system]
            .into_iter()
            .flat_map(|map| map.omitted().iter().cloned())
            .collect()
    }
}

#[derive(Debug)]
pub enum EnrichOutcome {
    /// Every section was written to every event attachment and no key was
    /// omitted.
    Complete { merged: Vec<PathBuf> },
    /// Some keys were omitted, some attachments could not be written, or
    /// both. What could be written was written.
    Partial {
        merged: Vec<PathBuf>,
        omitted: Vec<String>,
        failed: Vec<AttachmentFailure>,
    },
    /// No attachment carries the event filename; nothing was collected.
    NoOp,
}

impl EnrichOutcome {
    pub fn merged(&self) -> &[PathBuf] {
        match self {
            EnrichOutcome::Complete { merged } | EnrichOutcome::Partial { merged, .. } => {
                merged.as_slice()
            }
            EnrichOutcome::NoOp => &[],
        }
    }
}

/// Decorates the event attachments of a crash report with exception,
/// process and system details taken from a process snapshot.
///
/// Enrichment is best effort: nothing in here fails the caller's crash
/// handling. Problems surface as an [`EnrichOutcome::Partial`].
pub struct Enricher {
    event: config::Event,
    classifier: PathClassifier,
    process: ProcessCollector,
    system: Box<dyn SystemSource>,
    writer: EventMergeWriter,
}

impl Enricher {
    pub fn new(config: &Config, services: Services) -> Self {
        Self {
            event: config.event.clone(),
            classifier: PathClassifier::new(services.system_modules),
            process: ProcessCollector::new(services.working_set),
            system: services.system,
            writer: EventMergeWriter::from_config(&config.event),
        }
    }

    /// An enricher backed by the running host.
    pub fn for_host(config: &Config) -> Self {
        Self::new(config, Services::host(config))
    }

    /// Collect the three sections without writing anything.
    pub fn collect(&self, snapshot: &dyn ProcessSnapshot) -> Collected {
        Collected {
            exception: collect_exception(snapshot, &self.classifier),
            process: self.process.collect(snapshot),
            system: collect_system(self.system.as_ref()),
        }
    }

    /// Collect from `snapshot` and merge into every event attachment among
    /// `attachments`.
    pub fn enrich<P: AsRef<Path>>(
        &self,
        snapshot: &dyn ProcessSnapshot,
        attachments: &[P],
    ) -> EnrichOutcome {
        let targets: Vec<&Path> = attachments
            .iter()
            .map(|path| path.as_ref())
            .filter(|path| self.writer.is_event_attachment(path))
            .collect();
        if targets.is_empty() {
            debug!(
                attachments = attachments.len(),
                name = %self.event.attachment_name,
                "no event attachment to enrich"
            );
            return EnrichOutcome::NoOp;
        }

        let collected = self.collect(snapshot);
        let sections = [
            Section {
                key: self.event.section_key.as_str(),
                label: self.event.exception_label.as_str(),
                map: &collected.exception,
            },
            Section {
                key: self.event.section_key.as_str(),
                label: self.event.process_label.as_str(),
                map: &collected.process,
            },
            Section {
                key: self.event.section_key.as_str(),
                label: self.event.system_label.as_str(),
                map: &collected.system,
            },
        ];
        let report = self.writer.merge(targets, &sections);

        for failure in &report.failed {
            warn!(path = %failure.path.display(), error = %failure.error, "failed to enrich attachment");
        }
        let omitted = collected.omitted();
        if !omitted.is_empty() {
            warn!(?omitted, "some details could not be collected");
        }
        info!(
            merged = report.merged.len(),
            failed = report.failed.len(),
            omitted = omitted.len(),
            "crash event enriched"
        );

        if omitted.is_empty() && report.failed.is_empty() {
            EnrichOutcome::Complete {
                merged: report.merged,
            }
        } else {
            EnrichOutcome::Partial {
                merged: report.merged,
                omitted,
                failed: report.failed,
            }
        }
    }
}
