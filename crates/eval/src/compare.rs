//! Value comparison for `if_key`.
//!
//! Both sides must be the same kind of value: number with number, string
//! with string, bool with bool. Anything else is an error for every
//! operator, including `==` and `!=`; values are never coerced.

use std::cmp::Ordering;

use reshape_core::CompareOp;
use serde_json::{Number, Value};

use crate::error::{describe_shape, EvalError};

/// Evaluate `left op right`.
pub fn compare_values(left: &Value, right: &Value, op: CompareOp) -> Result<bool, EvalError> {
    let ordering = match (left, right) {
        (Value::Number(l), Value::Number(r)) => compare_numbers(l, r),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None,
    };
    let ordering = ordering.ok_or_else(|| EvalError::IncomparableValues {
        op,
        left: describe_operand(left),
        right: describe_operand(right),
    })?;
    Ok(apply(op, ordering))
}

fn apply(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
    }
}

/// Integers compare exactly; anything involving a float compares as f64.
fn compare_numbers(l: &Number, r: &Number) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (l.as_i64(), r.as_i64()) {
        return Some(a.cmp(&b));
    }
    if let (Some(a), Some(b)) = (l.as_u64(), r.as_u64()) {
        return Some(a.cmp(&b));
    }
    l.as_f64()?.partial_cmp(&r.as_f64()?)
}

fn describe_operand(value: &Value) -> String {
    match value {
        Value::Number(_) | Value::String(_) | Value::Bool(_) => {
            format!("{} {}", describe_shape(value), value)
        }
        _ => describe_shape(value),
    }
}
