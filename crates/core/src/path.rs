//! Navigation paths into a data tree.
//!
//! A path is a list of steps. A `Key` step looks up a mapping entry, an
//! `Index` step looks up a sequence position. Paths are used by directive
//! `location` / `root_location` fields and by the location actions.

use std::fmt;

use serde::Serialize;

/// One navigation step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Step {
    Key(String),
    Index(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => write!(f, "{:?}", key),
            Step::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Step::Key(key.to_string())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Step::Key(key)
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

/// An ordered list of steps. The empty path addresses the starting cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Path(Vec<Step>);

impl Path {
    pub fn new(steps: Vec<Step>) -> Self {
        Path(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", step)?;
        }
        write!(f, "]")
    }
}

impl From<Vec<Step>> for Path {
    fn from(steps: Vec<Step>) -> Self {
        Path(steps)
    }
}

impl<const N: usize> From<[Step; N]> for Path {
    fn from(steps: [Step; N]) -> Self {
        Path(steps.into())
    }
}

impl From<Step> for Path {
    fn from(step: Step) -> Self {
        Path(vec![step])
    }
}

impl From<&str> for Path {
    fn from(key: &str) -> Self {
        Path(vec![Step::from(key)])
    }
}

impl From<String> for Path {
    fn from(key: String) -> Self {
        Path(vec![Step::Key(key)])
    }
}

impl From<usize> for Path {
    fn from(index: usize) -> Self {
        Path(vec![Step::Index(index)])
    }
}

impl FromIterator<Step> for Path {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

/// Build a [`Path`] from a mix of keys and indices.
///
/// ```
/// use reshape_core::path;
/// let p = path!["ROOT_path", "t", 1, "r2", 2];
/// assert_eq!(p.len(), 5);
/// ```
#[macro_export]
macro_rules! path {
    () => { $crate::Path::default() };
    ($($step:expr),+ $(,)?) => {
        $crate::Path::new(vec![$($crate::Step::from($step)),+])
    };
}
