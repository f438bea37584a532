//! Small helpers shared by request handlers and the realtime layer.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Convert a string-keyed map into a JSON object for transmission to
/// websocket clients.
pub fn map_to_object<T: Serialize>(map: &HashMap<String, T>) -> Result<Map<String, Value>, serde_json::Error> {
    map.iter()
        .map(|(key, value)| Ok((key.clone(), serde_json::to_value(value)?)))
        .collect()
}

/// Remove NUL characters, which PostgreSQL refuses in text columns.
///
/// Borrows the input when there is nothing to strip.
pub fn strip_null_byte(value: &str) -> Cow<'_, str> {
    if value.contains('\0') {
        Cow::Owned(value.replace('\0', ""))
    } else {
        Cow::Borrowed(value)
    }
}

/// Resolve an optional, nullable value.
///
/// The outer `Option` is presence (absent stays absent); the inner one is
/// nullability (null becomes `default`).
pub fn process_data<T>(data: Option<Option<T>>, default: T) -> Option<T> {
    process_data_with(data, default, |value| value)
}

/// Like [`process_data`], but runs `process` over a present, non-null value.
pub fn process_data_with<T, F>(data: Option<Option<T>>, default: T, process: F) -> Option<T>
where
    F: FnOnce(T) -> T,
{
    match data {
        None => None,
        Some(None) => Some(default),
        Some(Some(value)) => Some(process(value)),
    }
}
