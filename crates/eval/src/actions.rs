//! Execution of `if_key` and `for_list`.
//!
//! Location actions only move the ambient cursor and live on
//! [`crate::scope::Scope::rebind`]. The two actions here work on the
//! directive's local cursor: `if_key` picks a template, `for_list` walks a
//! sequence.

use reshape_core::{IfKey, Template};
use serde_json::Value;

use crate::compare::compare_values;
use crate::error::{describe_shape, EvalError};

/// Outcome of an `if_key` check.
#[derive(Debug)]
pub struct Selection<'t> {
    pub matched: bool,
    pub template: Option<&'t Template>,
}

/// Compare `local[key]` against the literal and pick the branch.
///
/// `local` must be a mapping holding `key`.
pub fn select_branch<'t>(if_key: &'t IfKey, local: &Value) -> Result<Selection<'t>, EvalError> {
    let Value::Object(fields) = local else {
        return Err(EvalError::IfKeyNotMapping {
            key: if_key.key().to_string(),
            shape: describe_shape(local),
        });
    };
    let field = fields
        .get(if_key.key())
        .ok_or_else(|| EvalError::IfKeyMissing {
            key: if_key.key().to_string(),
            shape: describe_shape(local),
        })?;
    let matched = compare_values(field, &if_key.literal().to_value(), if_key.op())?;
    Ok(Selection {
        matched,
        template: if_key.select(matched),
    })
}

/// Whether iteration should go on after an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterState {
    Continue,
    Break,
}

/// Call `visit` on each element of the sequence `local`, in index order,
/// until it returns [`IterState::Break`] or fails. Returns the number of
/// elements visited.
pub fn for_each_item<'d, F>(local: &'d Value, mut visit: F) -> Result<usize, EvalError>
where
    F: FnMut(usize, &'d Value) -> Result<IterState, EvalError>,
{
    let Value::Array(items) = local else {
        return Err(EvalError::ForListNotSequence {
            shape: describe_shape(local),
        });
    };
    let mut visited = 0;
    for (index, item) in items.iter().enumerate() {
        visited += 1;
        if visit(index, item)? == IterState::Break {
            break;
        }
    }
    Ok(visited)
}
