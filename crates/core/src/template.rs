//! Template node model.
//!
//! A template is a tree of literals, sequences, mappings and directives.
//! Templates are immutable once built; the evaluator only borrows them.

use std::collections::BTreeMap;

use serde_json::{Number, Value};

use crate::action::Action;
use crate::convert::ValueType;
use crate::error::TemplateError;
use crate::path::Path;

// ──────────────────────────────────────────────
// Scalars
// ──────────────────────────────────────────────

/// A literal echoed verbatim into the result.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Scalar {
    /// A float scalar; `None` for NaN and infinities.
    pub fn float(f: f64) -> Option<Scalar> {
        Number::from_f64(f).map(Scalar::Number)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::Text(s) => Value::String(s.clone()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Number(_) => "number",
            Scalar::Text(_) => "string",
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Number(Number::from(i))
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Number(Number::from(i))
    }
}

impl From<u64> for Scalar {
    fn from(u: u64) -> Self {
        Scalar::Number(Number::from(u))
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

// ──────────────────────────────────────────────
// Directives
// ──────────────────────────────────────────────

/// A mapping instruction: extract a value from the data instead of echoing
/// a literal.
///
/// Built through [`crate::TemplateBuilder::directive`], which assigns the
/// creation order and rejects conflicting locations.
#[derive(Debug, Clone)]
pub struct Directive {
    pub(crate) key: Option<String>,
    pub(crate) index: Option<usize>,
    pub(crate) value_type: Option<ValueType>,
    pub(crate) location: Option<Path>,
    pub(crate) root_location: Option<Path>,
    pub(crate) action: Option<Action>,
    pub(crate) creation_order: u64,
}

impl Directive {
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_ref()
    }

    pub fn root_location(&self) -> Option<&Path> {
        self.root_location.as_ref()
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Tie-break weight for mapping entry ordering. Never an identity.
    pub fn creation_order(&self) -> u64 {
        self.creation_order
    }
}

// ──────────────────────────────────────────────
// Template nodes
// ──────────────────────────────────────────────

/// Entries of a mapping node. Keys are unique; declaration order is not
/// kept and never observable.
pub type Mapping = BTreeMap<String, Template>;

/// A template node.
#[derive(Debug, Clone)]
pub enum Template {
    Scalar(Scalar),
    Sequence(Vec<Template>),
    Mapping(Mapping),
    Directive(Box<Directive>),
}

impl Template {
    pub fn sequence<I>(items: I) -> Template
    where
        I: IntoIterator,
        I::Item: Into<Template>,
    {
        Template::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Build a mapping; a repeated key keeps the last value.
    pub fn mapping<K, V, I>(entries: I) -> Template
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Template>,
    {
        Template::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn as_directive(&self) -> Option<&Directive> {
        match self {
            Template::Directive(d) => Some(d),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Template::Scalar(_) => "scalar",
            Template::Sequence(_) => "sequence",
            Template::Mapping(_) => "mapping",
            Template::Directive(_) => "directive",
        }
    }
}

impl From<Scalar> for Template {
    fn from(s: Scalar) -> Self {
        Template::Scalar(s)
    }
}

impl From<Directive> for Template {
    fn from(d: Directive) -> Self {
        Template::Directive(Box::new(d))
    }
}

impl From<&str> for Template {
    fn from(s: &str) -> Self {
        Template::Scalar(s.into())
    }
}

impl From<String> for Template {
    fn from(s: String) -> Self {
        Template::Scalar(s.into())
    }
}

impl From<bool> for Template {
    fn from(b: bool) -> Self {
        Template::Scalar(b.into())
    }
}

impl From<i64> for Template {
    fn from(i: i64) -> Self {
        Template::Scalar(i.into())
    }
}

impl From<i32> for Template {
    fn from(i: i32) -> Self {
        Template::Scalar(i.into())
    }
}

impl From<Vec<Template>> for Template {
    fn from(items: Vec<Template>) -> Self {
        Template::Sequence(items)
    }
}

impl From<Mapping> for Template {
    fn from(entries: Mapping) -> Self {
        Template::Mapping(entries)
    }
}

/// Literal-only templates from plain JSON. Null has no literal form.
impl TryFrom<Value> for Template {
    type Error = TemplateError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Err(TemplateError::NullLiteral),
            Value::Bool(b) => Ok(Template::Scalar(Scalar::Bool(b))),
            Value::Number(n) => Ok(Template::Scalar(Scalar::Number(n))),
            Value::String(s) => Ok(Template::Scalar(Scalar::Text(s))),
            Value::Array(items) => items
                .into_iter()
                .map(Template::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Template::Sequence),
            Value::Object(entries) => entries
                .into_iter()
                .map(|(k, v)| Template::try_from(v).map(|t| (k, t)))
                .collect::<Result<Mapping, _>>()
                .map(Template::Mapping),
        }
    }
}
