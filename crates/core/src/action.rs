//! Directive actions.
//!
//! An action turns a directive from a value extractor into a control
//! entry: rebinding the ambient cursor, choosing a template by comparing a
//! data field, or iterating a data sequence.
//!
//! Actions can be built through the typed constructors or by name with
//! loosely typed arguments (`Action::from_name`), which validates arity,
//! argument kinds and operators the same way for both.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::TemplateError;
use crate::path::{Path, Step};
use crate::template::{Scalar, Template};

// ──────────────────────────────────────────────
// Comparison operators
// ──────────────────────────────────────────────

/// Comparator used by `if_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompareOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Gt,
        CompareOp::Ge,
        CompareOp::Lt,
        CompareOp::Le,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareOp {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompareOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| TemplateError::UnsupportedOperator { op: s.to_string() })
    }
}

// ──────────────────────────────────────────────
// Actions
// ──────────────────────────────────────────────

/// Conditional template selection on one field of the local cursor.
#[derive(Debug, Clone)]
pub struct IfKey {
    key: String,
    op: CompareOp,
    literal: Scalar,
    then_template: Option<Box<Template>>,
    else_template: Option<Box<Template>>,
}

impl IfKey {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn literal(&self) -> &Scalar {
        &self.literal
    }

    pub fn then_template(&self) -> Option<&Template> {
        self.then_template.as_deref()
    }

    pub fn else_template(&self) -> Option<&Template> {
        self.else_template.as_deref()
    }

    /// The branch for a comparison outcome, if that branch exists.
    pub fn select(&self, matched: bool) -> Option<&Template> {
        if matched {
            self.then_template()
        } else {
            self.else_template()
        }
    }
}

/// Iteration over the local cursor's sequence.
#[derive(Debug, Clone)]
pub struct ForList {
    item_template: Box<Template>,
}

impl ForList {
    pub fn item_template(&self) -> &Template {
        &self.item_template
    }
}

/// Behaviour attached to a directive.
#[derive(Debug, Clone)]
pub enum Action {
    /// Rebind the ambient cursor relative to itself.
    Location(Path),
    /// Rebind the ambient cursor from the data root.
    RootLocation(Path),
    IfKey(IfKey),
    ForList(ForList),
}

impl Action {
    pub fn location(path: impl Into<Path>) -> Action {
        Action::Location(path.into())
    }

    pub fn root_location(path: impl Into<Path>) -> Action {
        Action::RootLocation(path.into())
    }

    pub fn if_key(
        key: impl Into<String>,
        op: CompareOp,
        literal: impl Into<Scalar>,
        then_template: Option<Template>,
        else_template: Option<Template>,
    ) -> Result<Action, TemplateError> {
        let key = key.into();
        if then_template.is_none() && else_template.is_none() {
            return Err(TemplateError::MissingBranch { key });
        }
        Ok(Action::IfKey(IfKey {
            key,
            op,
            literal: literal.into(),
            then_template: then_template.map(Box::new),
            else_template: else_template.map(Box::new),
        }))
    }

    pub fn for_list(item_template: impl Into<Template>) -> Action {
        Action::ForList(ForList {
            item_template: Box::new(item_template.into()),
        })
    }

    /// Build an action from its name and loosely typed arguments.
    ///
    /// Names: `location`, `root_location` (`rootLocation`), `if_key`
    /// (`ifKey`), `for_list` (`forList`).
    pub fn from_name(name: &str, args: ActionArgs) -> Result<Action, TemplateError> {
        match name {
            "location" => Ok(Action::Location(args.single_path("location")?)),
            "root_location" | "rootLocation" => {
                Ok(Action::RootLocation(args.single_path("root_location")?))
            }
            "if_key" | "ifKey" => args.into_if_key(),
            "for_list" | "forList" => args.into_for_list(),
            other => Err(TemplateError::UnknownAction {
                name: other.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Location(_) => "location",
            Action::RootLocation(_) => "root_location",
            Action::IfKey(_) => "if_key",
            Action::ForList(_) => "for_list",
        }
    }
}

// ──────────────────────────────────────────────
// Loosely typed construction
// ──────────────────────────────────────────────

/// A positional action argument.
#[derive(Debug, Clone)]
pub enum ActionArg {
    Path(Path),
    Scalar(Scalar),
}

impl From<Path> for ActionArg {
    fn from(p: Path) -> Self {
        ActionArg::Path(p)
    }
}

impl From<Scalar> for ActionArg {
    fn from(s: Scalar) -> Self {
        ActionArg::Scalar(s)
    }
}

impl From<&str> for ActionArg {
    fn from(s: &str) -> Self {
        ActionArg::Scalar(s.into())
    }
}

impl From<String> for ActionArg {
    fn from(s: String) -> Self {
        ActionArg::Scalar(s.into())
    }
}

impl From<i64> for ActionArg {
    fn from(i: i64) -> Self {
        ActionArg::Scalar(i.into())
    }
}

impl From<i32> for ActionArg {
    fn from(i: i32) -> Self {
        ActionArg::Scalar(i.into())
    }
}

impl From<bool> for ActionArg {
    fn from(b: bool) -> Self {
        ActionArg::Scalar(b.into())
    }
}

/// Positional arguments plus the keyword templates `then`, `else` and
/// `template`.
#[derive(Debug, Clone, Default)]
pub struct ActionArgs {
    positional: Vec<ActionArg>,
    then_template: Option<Template>,
    else_template: Option<Template>,
    template: Option<Template>,
}

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, arg: impl Into<ActionArg>) -> Self {
        self.positional.push(arg.into());
        self
    }

    pub fn then(mut self, template: impl Into<Template>) -> Self {
        self.then_template = Some(template.into());
        self
    }

    pub fn otherwise(mut self, template: impl Into<Template>) -> Self {
        self.else_template = Some(template.into());
        self
    }

    pub fn template(mut self, template: impl Into<Template>) -> Self {
        self.template = Some(template.into());
        self
    }

    fn expect_arity(&self, action: &'static str, expected: usize) -> Result<(), TemplateError> {
        if self.positional.len() != expected {
            return Err(TemplateError::Arity {
                action,
                expected,
                found: self.positional.len(),
            });
        }
        Ok(())
    }

    fn reject_keywords(&self, action: &'static str, allowed: &[&str]) -> Result<(), TemplateError> {
        let given = [
            ("then", self.then_template.is_some()),
            ("else", self.else_template.is_some()),
            ("template", self.template.is_some()),
        ];
        for (keyword, present) in given {
            if present && !allowed.contains(&keyword) {
                return Err(TemplateError::UnexpectedKeyword { action, keyword });
            }
        }
        Ok(())
    }

    fn single_path(self, action: &'static str) -> Result<Path, TemplateError> {
        self.expect_arity(action, 1)?;
        self.reject_keywords(action, &[])?;
        let invalid = TemplateError::InvalidArgument {
            action,
            position: 0,
            expected: "a non-empty path, a key or an index",
        };
        let path = match self.positional.into_iter().next() {
            Some(ActionArg::Path(p)) => p,
            Some(ActionArg::Scalar(Scalar::Text(key))) => Path::from(key),
            Some(ActionArg::Scalar(Scalar::Number(n))) => match n.as_u64() {
                Some(i) => match usize::try_from(i) {
                    Ok(index) => Path::from(Step::Index(index)),
                    Err(_) => return Err(invalid),
                },
                None => return Err(invalid),
            },
            _ => return Err(invalid),
        };
        if path.is_empty() {
            return Err(invalid);
        }
        Ok(path)
    }

    fn into_if_key(self) -> Result<Action, TemplateError> {
        const ACTION: &str = "if_key";
        self.expect_arity(ACTION, 3)?;
        self.reject_keywords(ACTION, &["then", "else"])?;
        let mut positional = self.positional.into_iter();
        let key = match positional.next() {
            Some(ActionArg::Scalar(Scalar::Text(key))) if !key.is_empty() => key,
            _ => {
                return Err(TemplateError::InvalidArgument {
                    action: ACTION,
                    position: 0,
                    expected: "a non-empty key",
                })
            }
        };
        let op = match positional.next() {
            Some(ActionArg::Scalar(Scalar::Text(op))) => op.parse::<CompareOp>()?,
            _ => {
                return Err(TemplateError::InvalidArgument {
                    action: ACTION,
                    position: 1,
                    expected: "an operator",
                })
            }
        };
        let literal = match positional.next() {
            Some(ActionArg::Scalar(literal)) => literal,
            _ => {
                return Err(TemplateError::InvalidArgument {
                    action: ACTION,
                    position: 2,
                    expected: "a literal",
                })
            }
        };
        Action::if_key(key, op, literal, self.then_template, self.else_template)
    }

    fn into_for_list(self) -> Result<Action, TemplateError> {
        const ACTION: &str = "for_list";
        self.expect_arity(ACTION, 0)?;
        self.reject_keywords(ACTION, &["template"])?;
        self.template
            .map(Action::for_list)
            .ok_or(TemplateError::MissingItemTemplate)
    }
}
