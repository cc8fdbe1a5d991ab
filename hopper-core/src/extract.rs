//! Safe nested lookup over loosely-structured event payloads.
//!
//! Payloads coming off the radio are partially-structured mappings whose
//! shape varies by packet type; no key is guaranteed. Every field access in
//! the adapter goes through these accessors so that a missing or reshaped
//! field degrades to a caller-supplied default instead of failing the event.

use serde_json::Value;

/// Walk `container` one key at a time. Returns `None` as soon as a key is
/// absent or the current value is not a mapping; never fails.
pub fn value_at<'a>(container: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = container;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// Look up an unsigned integer that fits in 32 bits.
pub fn u32_at(container: &Value, path: &[&str]) -> Option<u32> {
    value_at(container, path)?
        .as_u64()
        .and_then(|num| u32::try_from(num).ok())
}

/// Look up an unsigned integer.
pub fn u64_at(container: &Value, path: &[&str]) -> Option<u64> {
    value_at(container, path)?.as_u64()
}

/// Look up a floating-point number.
pub fn f64_at(container: &Value, path: &[&str]) -> Option<f64> {
    value_at(container, path)?.as_f64()
}

/// Look up a string field.
pub fn str_at<'a>(container: &'a Value, path: &[&str]) -> Option<&'a str> {
    value_at(container, path)?.as_str()
}

/// Read a value as raw bytes. Payload bytes arrive as an array of byte-sized
/// integers; a string value is returned as its UTF-8 bytes.
pub fn as_bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|num| u8::try_from(num).ok()))
            .collect(),
        Value::String(text) => Some(text.clone().into_bytes()),
        _ => None,
    }
}

/// Look up a byte-string field.
pub fn bytes_at(container: &Value, path: &[&str]) -> Option<Vec<u8>> {
    as_bytes(value_at(container, path)?)
}
