//! Bounds for retained provider payloads.
//!
//! Raw provider answers are kept for diagnostics only. Nothing downstream
//! parses them, so they are pruned rather than validated.

use serde_json::{json, Map, Value};

/// Containers nested deeper than this are replaced by a marker.
pub const MAX_DIAGNOSTIC_DEPTH: usize = 8;

/// Serialized size above which the payload is replaced by a preview.
pub const MAX_DIAGNOSTIC_BYTES: usize = 64 * 1024;

const PREVIEW_CHARS: usize = 4096;
const DEPTH_MARKER: &str = "[truncated: nested too deep]";

fn prune(value: Value, depth: usize) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) if depth >= MAX_DIAGNOSTIC_DEPTH => {
            Value::String(DEPTH_MARKER.to_string())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(|v| prune(v, depth + 1)).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, prune(v, depth + 1)))
                .collect::<Map<_, _>>(),
        ),
        scalar => scalar,
    }
}

/// Cap a diagnostic payload in depth and size.
pub fn cap_diagnostic(value: Value) -> Value {
    let pruned = prune(value, 0);
    let serialized = pruned.to_string();
    if serialized.len() <= MAX_DIAGNOSTIC_BYTES {
        return pruned;
    }

    json!({
        "diagnosticOnly": true,
        "truncated": true,
        "originalBytes": serialized.len(),
        "preview": serialized.chars().take(PREVIEW_CHARS).collect::<String>(),
    })
}
