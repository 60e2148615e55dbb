#![forbid(unsafe_code)]

pub mod document;

use crate::domain::TelemetryMap;
use crate::error::Error;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One `document[key][label] = map` assignment.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub map: &'a TelemetryMap,
}

#[derive(Debug)]
pub struct AttachmentFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct MergeReport {
    /// Event attachments rewritten with the new sections.
    pub merged: Vec<PathBuf>,
    /// Event attachments that could not be read or written. Their content
    /// is left as it was.
    pub failed: Vec<AttachmentFailure>,
}

impl MergeReport {
    /// No attachment carried the event filename.
    pub fn is_noop(&self) -> bool {
        self.merged.is_empty() && self.failed.is_empty()
    }
}

/// Merges sections into the event attachments of a crash report.
///
/// Errors are returned in the [`MergeReport`], never raised and never
/// logged here; one attachment failing does not stop the others.
#[derive(Debug, Clone)]
pub struct EventMergeWriter {
    attachment_name: String,
}

impl EventMergeWriter {
    pub fn new(attachment_name: impl Into<String>) -> Self {
        Self {
            attachment_name: attachment_name.into(),
        }
    }

    pub fn from_config(config: &config::Event) -> Self {
        Self::new(config.attachment_name.clone())
    }

    pub fn is_event_attachment(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name == self.attachment_name.as_str())
    }

    pub fn merge<I>(&self, attachments: I, sections: &[Section<'_>]) -> MergeReport
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        let mut report = MergeReport::default();
        for path in attachments {
            let path = path.as_ref();
            if !self.is_event_attachment(path) {
                continue;
            }
            match Self::merge_file(path, sections) {
                Ok(()) => report.merged.push(path.to_path_buf()),
                Err(error) => report.failed.push(AttachmentFailure {
                    path: path.to_path_buf(),
                    error,
                }),
            }
        }
        report
    }

    /// Read-modify-write one document. A missing file starts out empty, and
    /// so does one that does not decode to a map: its previous content is
    /// lost rather than letting it block the report.
    pub fn merge_file(path: &Path, sections: &[Section<'_>]) -> Result<(), Error> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        let mut root = document::decode(&bytes).unwrap_or_default();
        for section in sections {
            document::set_section(&mut root, section.key, section.label, section.map);
        }
        let encoded = document::encode(root)?;
        Self::replace(path, &encoded)
    }

    /// Swap in the new content through a sibling temporary file so that a
    /// failed write leaves the previous document intact. An existing
    /// document keeps its permissions.
    fn replace(path: &Path, contents: &[u8]) -> Result<(), Error> {
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut file = NamedTempFile::new_in(dir)?;
        match std::fs::metadata(path) {
            Ok(metadata) => file.as_file().set_permissions(metadata.permissions())?,
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        file.write_all(contents)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}
