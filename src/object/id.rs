//! Object id resolution
//!
//! Ids are always strings. Wherever one is located (body data or a response
//! header) it goes through the functions here, so path substitution sees the
//! same text for the same value every time.

use serde_json::{Map, Value};

/// Coerce a JSON value to its canonical id text.
///
/// - strings pass through unchanged
/// - integers print as decimal digits (`42` -> `"42"`)
/// - floats print in serde_json's shortest round-trip form (`1.5` -> `"1.5"`)
/// - booleans print as `"true"` / `"false"`
/// - null prints as `"null"`
/// - arrays and objects print as compact JSON
pub fn id_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Look up `attribute` in `data` and coerce it to an id.
///
/// A `null` or empty value is not an id.
pub fn lookup_id(data: &Map<String, Value>, attribute: &str) -> Option<String> {
    match data.get(attribute) {
        None | Some(Value::Null) => None,
        Some(value) => Some(id_to_string(value)).filter(|id| !id.is_empty()),
    }
}

/// Raw path text of an absolute URL, without query or fragment
fn raw_url_path(value: &str) -> Option<&str> {
    let url = url::Url::parse(value).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }
    let (_, rest) = value.split_once("://")?;
    let path = rest.find('/').map(|i| &rest[i..]).unwrap_or("");
    path.split(|c: char| c == '?' || c == '#').next()
}

/// Last path segment of a URL-valued header, trailing `/` stripped first.
///
/// The segment is taken verbatim: no percent-encoding, no dot-segment
/// resolution.
fn last_path_segment(value: &str) -> Option<String> {
    raw_url_path(value)
        .unwrap_or(value)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Resolve an id from the value of the configured id header
pub fn resolve_header_id(value: &str, is_url: bool) -> Option<String> {
    let value = value.trim();
    if is_url {
        last_path_segment(value)
    } else {
        Some(value.to_string()).filter(|s| !s.is_empty())
    }
}
