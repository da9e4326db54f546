//! Deep merge for JSON-shaped configuration
//!
//! Used for playlist options and track metadata: defaults are serialized to a
//! JSON object, caller overrides are merged on top, and the result is
//! deserialized back into the typed struct.

use serde_json::{Map, Value};

/// Merge `overrides` into `base`, returning the merged value.
///
/// For each key in `overrides`: if both sides hold objects they are merged
/// recursively, otherwise the override replaces the base value. Keys only
/// present in `base` are kept. A non-object override replaces `base` wholesale.
pub fn deep_merge(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            Value::Object(merge_maps(base, overrides))
        }
        (base, Value::Null) => base,
        (_, overrides) => overrides,
    }
}

fn merge_maps(mut base: Map<String, Value>, overrides: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in overrides {
        let merged = match base.remove(&key) {
            Some(existing @ Value::Object(_)) if value.is_object() => deep_merge(existing, value),
            _ => value,
        };
        base.insert(key, merged);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn override_wins_for_scalars() {
        let merged = deep_merge(json!({"volume": 1.0, "autoPlayNext": true}), json!({"volume": 0.4}));
        assert_eq!(merged, json!({"volume": 0.4, "autoPlayNext": true}));
    }

    #[test]
    fn nested_objects_merge_key_by_key() {
        let base = json!({"display": {"theme": "dark", "compact": false}, "name": "a"});
        let overrides = json!({"display": {"compact": true}});

        let merged = deep_merge(base, overrides);
        assert_eq!(
            merged,
            json!({"display": {"theme": "dark", "compact": true}, "name": "a"})
        );
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let merged = deep_merge(json!({"genre": ["rock"]}), json!({"genre": ["jazz", "funk"]}));
        assert_eq!(merged, json!({"genre": ["jazz", "funk"]}));
    }

    #[test]
    fn object_replaced_by_scalar() {
        let merged = deep_merge(json!({"a": {"b": 1}}), json!({"a": 5}));
        assert_eq!(merged, json!({"a": 5}));
    }

    #[test]
    fn unknown_keys_are_retained() {
        let merged = deep_merge(json!({"known": 1}), json!({"extra": "kept"}));
        assert_eq!(merged["known"], 1);
        assert_eq!(merged["extra"], "kept");
    }

    #[test]
    fn null_overrides_keep_base() {
        let base = json!({"a": 1});
        assert_eq!(deep_merge(base.clone(), Value::Null), base);
    }
}
