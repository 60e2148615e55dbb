use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Event {
    /// Base filename of the attachment holding the structured event
    /// document. Attachments with any other name are never touched.
    pub attachment_name: String,

    /// Top-level key of the event document under which the enriched
    /// sections are written.
    pub section_key: String,

    /// Label of the section describing the exception and its module.
    pub exception_label: String,

    /// Label of the section describing the crashed process.
    pub process_label: String,

    /// Label of the section describing the host.
    pub system_label: String,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            attachment_name: "__sentry-event".into(),
            section_key: "contexts".into(),
            exception_label: "Exception Details".into(),
            process_label: "Process Details".into(),
            system_label: "System Details".into(),
        }
    }
}
