//! Value converters applied to extracted directive values.
//!
//! A directive's optional `type` turns the raw value pulled out of the
//! data tree into the representation the result wants: stringify a price,
//! coerce a flag to an integer, and so on. Conversion failures carry the
//! target name and a message; the evaluator reports them as fatal.

use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

/// Signature of a user supplied converter.
pub type ConvertFn = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;

/// A named user supplied converter.
#[derive(Clone)]
pub struct Converter {
    name: String,
    func: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Converter {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Target representation for an extracted value.
#[derive(Debug, Clone)]
pub enum ValueType {
    Text,
    Int,
    Float,
    Bool,
    Custom(Converter),
}

/// A failed conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionFailure {
    pub target: String,
    pub message: String,
}

impl ValueType {
    pub fn name(&self) -> &str {
        match self {
            ValueType::Text => "text",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Custom(c) => c.name(),
        }
    }

    /// Convert `raw` into this type.
    pub fn apply(&self, raw: &Value) -> Result<Value, ConversionFailure> {
        let converted = match self {
            ValueType::Text => Ok(to_text(raw)),
            ValueType::Int => to_int(raw),
            ValueType::Float => to_float(raw),
            ValueType::Bool => to_bool(raw),
            ValueType::Custom(c) => (c.func)(raw),
        };
        converted.map_err(|message| ConversionFailure {
            target: self.name().to_string(),
            message,
        })
    }
}

fn to_text(raw: &Value) -> Value {
    match raw {
        Value::String(s) => Value::String(s.clone()),
        // Display of Value is compact JSON for numbers, bools, null and containers.
        other => Value::String(other.to_string()),
    }
}

fn to_int(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                let f = n.as_f64().ok_or_else(|| format!("{} is not finite", n))?;
                let truncated = f.trunc();
                if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                    return Err(format!("{} is out of integer range", n));
                }
                Ok(Value::from(truncated as i64))
            }
        }
        Value::Bool(b) => Ok(Value::from(i64::from(*b))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| format!("'{}' is not an integer", s)),
        other => Err(format!("cannot convert {} to int", kind(other))),
    }
}

fn to_float(raw: &Value) -> Result<Value, String> {
    let f = match raw {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("{} is not finite", n))?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", s))?,
        other => return Err(format!("cannot convert {} to float", kind(other))),
    };
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| format!("{} is not a finite number", f))
}

fn to_bool(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Number(n) => Ok(Value::Bool(n.as_f64().is_some_and(|f| f != 0.0))),
        Value::String(s) => match s.trim() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(format!("'{}' is not a boolean", s)),
        },
        other => Err(format!("cannot convert {} to bool", kind(other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_stringifies_numbers() {
        assert_eq!(ValueType::Text.apply(&json!(15)).unwrap(), json!("15"));
        assert_eq!(ValueType::Text.apply(&json!("abc")).unwrap(), json!("abc"));
        assert_eq!(ValueType::Text.apply(&json!(true)).unwrap(), json!("true"));
    }

    #[test]
    fn int_parses_strings_and_truncates_floats() {
        assert_eq!(ValueType::Int.apply(&json!(" 42 ")).unwrap(), json!(42));
        assert_eq!(ValueType::Int.apply(&json!(3.9)).unwrap(), json!(3));
        assert_eq!(ValueType::Int.apply(&json!(-3.9)).unwrap(), json!(-3));
        assert_eq!(ValueType::Int.apply(&json!(true)).unwrap(), json!(1));
    }

    #[test]
    fn int_rejects_floats_outside_i64() {
        let err = ValueType::Int.apply(&json!(9_223_372_036_854_775_808.0)).unwrap_err();
        assert!(err.message.contains("out of integer range"));
        assert!(ValueType::Int.apply(&json!(-1.0e19)).is_err());
        assert_eq!(ValueType::Int.apply(&json!(1.0e18)).unwrap(), json!(1_000_000_000_000_000_000i64));
    }

    #[test]
    fn int_rejects_words() {
        let err = ValueType::Int.apply(&json!("twelve")).unwrap_err();
        assert_eq!(err.target, "int");
        assert!(err.message.contains("twelve"));
    }

    #[test]
    fn float_and_bool() {
        assert_eq!(ValueType::Float.apply(&json!("2.5")).unwrap(), json!(2.5));
        assert_eq!(ValueType::Bool.apply(&json!(0)).unwrap(), json!(false));
        assert_eq!(ValueType::Bool.apply(&json!("1")).unwrap(), json!(true));
        assert!(ValueType::Bool.apply(&json!([])).is_err());
    }

    #[test]
    fn custom_converter_runs_closure() {
        let upper = ValueType::Custom(Converter::new("upper", |v| {
            v.as_str()
                .map(|s| Value::String(s.to_uppercase()))
                .ok_or_else(|| "expected a string".to_string())
        }));
        assert_eq!(upper.apply(&json!("abc")).unwrap(), json!("ABC"));
        let err = upper.apply(&json!(1)).unwrap_err();
        assert_eq!(err.target, "upper");
    }
}
