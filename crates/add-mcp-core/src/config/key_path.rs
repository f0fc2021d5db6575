//! Dot-notation config keys (`"mcp_servers"`, `"a.b.c"`).

use serde_json::{Map, Value};

use super::ConfigDocument;

/// Split a dotted key into its segments, ignoring empty segments.
pub fn segments(key: &str) -> impl Iterator<Item = &str> {
    key.split('.').filter(|segment| !segment.is_empty())
}

/// Walk `key` one segment at a time.
///
/// Returns `None` if any segment is absent or holds something other than a map.
pub fn get_map_at_key<'a>(doc: &'a ConfigDocument, key: &str) -> Option<&'a ConfigDocument> {
    let mut current = doc;
    for segment in segments(key) {
        match current.get(segment) {
            Some(Value::Object(map)) => current = map,
            _ => return None,
        }
    }
    Some(current)
}

/// Wrap `entries` so that they sit at `key`: `"a.b"` + `{x}` -> `{"a": {"b": {x}}}`.
pub fn nest_under_key(key: &str, entries: ConfigDocument) -> ConfigDocument {
    let parts: Vec<&str> = segments(key).collect();
    parts.iter().rev().fold(entries, |inner, segment| {
        let mut outer = Map::new();
        outer.insert(segment.to_string(), Value::Object(inner));
        outer
    })
}
