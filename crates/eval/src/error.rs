use reshape_core::{CompareOp, Path, Step};
use serde_json::Value;

/// Fatal errors that abort a run. Soft lookup misses are not errors; they
/// are logged and the directive contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// A `location` / `root_location` step could not be applied.
    #[error("{origin} {path}: step {position} ({step}) cannot be applied to {shape}")]
    Navigation {
        origin: &'static str,
        path: Path,
        position: usize,
        step: Step,
        shape: String,
    },

    /// A directive with no action, key or index.
    #[error("directive #{creation_order} has no action, key or index to resolve")]
    MissingDirectiveTarget { creation_order: u64 },

    /// `if_key` evaluated against something other than a mapping.
    #[error("if_key '{key}' needs a mapping, found {shape}")]
    IfKeyNotMapping { key: String, shape: String },

    /// `if_key` field absent from its mapping.
    #[error("if_key '{key}' not found in {shape}")]
    IfKeyMissing { key: String, shape: String },

    /// `if_key` comparison between values of different kinds.
    #[error("cannot compare {left} {op} {right}")]
    IncomparableValues {
        op: CompareOp,
        left: String,
        right: String,
    },

    /// `for_list` evaluated against something other than a sequence.
    #[error("for_list needs a sequence, found {shape}")]
    ForListNotSequence { shape: String },

    /// A directive's value converter rejected the extracted value.
    #[error("cannot convert {value} to {target}: {message}")]
    Conversion {
        target: String,
        value: String,
        message: String,
    },
}

const MAX_LISTED_KEYS: usize = 8;

/// Compact description of a data value for diagnostics, e.g.
/// `object {a, b}`, `array[3]`, `string`.
pub fn describe_shape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => format!("array[{}]", items.len()),
        Value::Object(map) => {
            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_unstable();
            keys.truncate(MAX_LISTED_KEYS);
            if map.len() > MAX_LISTED_KEYS {
                keys.push("...");
            }
            format!("object {{{}}}", keys.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shapes() {
        assert_eq!(describe_shape(&json!(null)), "null");
        assert_eq!(describe_shape(&json!([1, 2, 3])), "array[3]");
        assert_eq!(describe_shape(&json!({"b": 1, "a": 2})), "object {a, b}");
        assert_eq!(describe_shape(&json!({})), "object {}");
    }

    #[test]
    fn long_objects_are_truncated() {
        let wide: serde_json::Map<String, Value> =
            (0..10).map(|i| (format!("k{}", i), json!(i))).collect();
        let shape = describe_shape(&Value::Object(wide));
        assert!(shape.ends_with(", ...}"));
    }

    #[test]
    fn navigation_message_names_step_and_shape() {
        let err = EvalError::Navigation {
            origin: "location",
            path: reshape_core::path!["level", "missing"],
            position: 1,
            step: Step::Key("missing".to_string()),
            shape: "object {level2}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"location ["level", "missing"]: step 1 ("missing") cannot be applied to object {level2}"#
        );
    }
}
