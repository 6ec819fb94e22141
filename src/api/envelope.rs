//! Unwrapping of backend response envelopes.
//!
//! Depending on the route the backend answers with a bare payload, with
//! `{"data": ...}`, or with a named wrapper such as `{"nodes": [...]}`. These
//! helpers peel at most two wrapper levels so all shapes decode the same way.

use serde_json::Value;

const MAX_DEPTH: usize = 2;

/// Removes up to two levels of `{key: ...}` / `{"data": ...}` wrapping.
///
/// Only structured inner values (arrays and objects) are unwrapped, so a
/// payload that merely has a scalar field called `data` is left alone.
pub(crate) fn unwrap_envelope(value: Value, key: &str) -> Value {
    let mut current = value;
    for _ in 0..MAX_DEPTH {
        let Value::Object(mut map) = current else {
            return current;
        };
        let wrapper = [key, "data"]
            .into_iter()
            .find(|k| map.get(*k).is_some_and(|v| v.is_array() || v.is_object()));
        match wrapper {
            Some(k) => current = map.remove(k).unwrap_or(Value::Null),
            None => return Value::Object(map),
        }
    }
    current
}

/// Like [`unwrap_envelope`], additionally mapping `null` and `{key: null}`
/// to an empty list.
pub(crate) fn unwrap_list(value: Value, key: &str) -> Value {
    match unwrap_envelope(value, key) {
        Value::Null => Value::Array(Vec::new()),
        Value::Object(map) if [key, "data"].iter().any(|k| map.get(*k).is_some_and(Value::is_null)) => {
            Value::Array(Vec::new())
        }
        other => other,
    }
}
