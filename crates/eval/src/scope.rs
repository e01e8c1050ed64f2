//! Data cursors.
//!
//! A [`Scope`] holds the data root and the ambient cursor inherited by a
//! collection's children. Each directive derives a local cursor from the
//! ambient one plus its own `location` / `root_location`.
//!
//! Navigation along a location path is strict: a missing key, an index out
//! of range or a step applied to the wrong container kind is fatal.

use reshape_core::{Directive, Path, Step};
use serde_json::Value;

use crate::error::{describe_shape, EvalError};

/// Follow `path` from `start`.
pub fn navigate<'d>(
    start: &'d Value,
    path: &Path,
    origin: &'static str,
) -> Result<&'d Value, EvalError> {
    let mut cursor = start;
    for (position, step) in path.steps().iter().enumerate() {
        let next = match (step, cursor) {
            (Step::Key(key), Value::Object(map)) => map.get(key),
            (Step::Index(index), Value::Array(items)) => items.get(*index),
            _ => None,
        };
        cursor = next.ok_or_else(|| EvalError::Navigation {
            origin,
            path: path.clone(),
            position,
            step: step.clone(),
            shape: describe_shape(cursor),
        })?;
    }
    Ok(cursor)
}

/// Root and ambient cursors for one collection level.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'d> {
    root: &'d Value,
    ambient: &'d Value,
}

impl<'d> Scope<'d> {
    pub fn new(root: &'d Value) -> Self {
        Scope {
            root,
            ambient: root,
        }
    }

    pub fn root(&self) -> &'d Value {
        self.root
    }

    pub fn ambient(&self) -> &'d Value {
        self.ambient
    }

    /// Same root, different ambient cursor.
    pub fn with_ambient(&self, ambient: &'d Value) -> Scope<'d> {
        Scope {
            root: self.root,
            ambient,
        }
    }

    /// Narrow from the ambient cursor, or from the root when `from_root`.
    pub fn narrow(&self, path: &Path, from_root: bool) -> Result<&'d Value, EvalError> {
        if from_root {
            navigate(self.root, path, "root_location")
        } else {
            navigate(self.ambient, path, "location")
        }
    }

    /// Move the ambient cursor itself. Later siblings see the new cursor.
    pub fn rebind(&mut self, path: &Path, from_root: bool) -> Result<(), EvalError> {
        self.ambient = self.narrow(path, from_root)?;
        Ok(())
    }

    /// The local cursor for `directive`.
    pub fn local_for(&self, directive: &Directive) -> Result<&'d Value, EvalError> {
        if let Some(path) = directive.location() {
            return self.narrow(path, false);
        }
        if let Some(path) = directive.root_location() {
            return self.narrow(path, true);
        }
        Ok(self.ambient)
    }
}
