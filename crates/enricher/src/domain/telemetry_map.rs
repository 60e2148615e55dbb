#![forbid(unsafe_code)]

use std::fmt;

/// Flat, insertion-ordered key/value telemetry destined for one section of
/// the event document.
///
/// Keys that a collector wanted to write but could not (the data was
/// unavailable or the query was denied) are remembered in `omitted` instead
/// of being written with a made-up value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TelemetryMap {
    entries: Vec<(String, String)>,
    omitted: Vec<String>,
}

impl TelemetryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        let key = key.into();
        let value = value.to_string();
        self.omitted.retain(|omitted| omitted != &key);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Set `key` when `value` is present, otherwise record it as omitted.
    pub fn insert_opt<V: fmt::Display>(&mut self, key: impl Into<String>, value: Option<V>) {
        match value {
            Some(value) => self.insert(key, value),
            None => self.omit(key),
        }
    }

    /// Record that `key` could not be collected.
    pub fn omit(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.get(&key).is_none() && !self.omitted.contains(&key) {
            self.omitted.push(key);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn omitted(&self) -> &[String] {
        &self.omitted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
