//! Deep merge of a patch document into an existing one.

use serde_json::Value;

use super::ConfigDocument;

/// Merge `patch` into `target`.
///
/// For each key in `patch`: when both sides hold maps the merge recurses,
/// otherwise the incoming value replaces the existing one (arrays included).
/// Keys only present in `target` are left alone.
pub fn deep_merge(target: &mut ConfigDocument, patch: &ConfigDocument) {
    for (key, incoming) in patch {
        match (target.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}
