//! Deep merge for layered host parameter files.
//!
//! Higher tiers override lower tiers key by key. Arrays are replaced, not
//! concatenated, and a null in a higher tier leaves the lower value in place.

use serde_json::Value;

/// Deep merge two values, with `overlay` taking precedence over `base`.
///
/// ```
/// use migrate_settings::config::deep_merge;
/// use serde_json::json;
///
/// let project = json!({ "parameters": { "changeLogFile": "db/master.xml", "dropFirst": false } });
/// let user = json!({ "parameters": { "dropFirst": true } });
/// let merged = deep_merge(project, user);
/// assert_eq!(merged["parameters"]["changeLogFile"], "db/master.xml");
/// assert_eq!(merged["parameters"]["dropFirst"], true);
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        // null means "not specified"
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge tiers in order, later ones taking precedence.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}
