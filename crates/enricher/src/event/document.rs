#![forbid(unsafe_code)]

//! The event document: a MessagePack map whose top-level keys belong to
//! many producers. Only the sections being set are touched; every other
//! entry keeps its value and position.

use crate::domain::TelemetryMap;
use crate::error::Error;
use rmpv::Value;

pub type Entries = Vec<(Value, Value)>;

/// Nesting bound for decoding. Event documents are shallow; a corrupt file
/// must not recurse deep enough to exhaust a small thread stack.
const MAX_DEPTH: usize = 64;

/// Decode the root map of an event document. Empty input, undecodable
/// input, input nested past a fixed depth and a non-map root all yield
/// `None`.
pub fn decode(bytes: &[u8]) -> Option<Entries> {
    if bytes.is_empty() {
        return None;
    }
    let mut reader = bytes;
    match rmpv::decode::read_value_with_max_depth(&mut reader, MAX_DEPTH) {
        Ok(Value::Map(entries)) => Some(entries),
        _ => None,
    }
}

pub fn encode(entries: Entries) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, &Value::Map(entries))
        .map_err(|err| Error::Encode(err.to_string()))?;
    Ok(buf)
}

/// Set `root[key][label]` to `map`, creating the `key` sub-map when it is
/// missing or is not a map.
pub fn set_section(root: &mut Entries, key: &str, label: &str, map: &TelemetryMap) {
    let position = root.iter().position(|(k, _)| k.as_str() == Some(key));
    let mut section = match position.map(|i| std::mem::replace(&mut root[i].1, Value::Nil)) {
        Some(Value::Map(entries)) => entries,
        _ => Entries::new(),
    };
    upsert(&mut section, label, to_value(map));

    let section = Value::Map(section);
    match position {
        Some(i) => root[i].1 = section,
        None => root.push((Value::from(key), section)),
    }
}

fn upsert(entries: &mut Entries, key: &str, value: Value) {
    match entries.iter_mut().find(|(k, _)| k.as_str() == Some(key)) {
        Some((_, existing)) => *existing = value,
        None => entries.push((Value::from(key), value)),
    }
}

fn to_value(map: &TelemetryMap) -> Value {
    Value::Map(
        map.iter()
            .map(|(key, value)| (Value::from(key), Value::from(value)))
            .collect(),
    )
}
