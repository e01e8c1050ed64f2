use crate::path::Path;

/// Errors raised while constructing a template, before any data is seen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A directive was given both a relative and an absolute location.
    #[error("directive #{creation_order} sets both location {location} and root_location {root_location}; choose one")]
    ConflictingLocations {
        creation_order: u64,
        location: Path,
        root_location: Path,
    },

    /// `Action::from_name` was called with a name no action answers to.
    #[error("unknown action '{name}' (expected one of: location, root_location, if_key, for_list)")]
    UnknownAction { name: String },

    /// Wrong number of positional arguments for an action.
    #[error("action '{action}' takes {expected} positional argument(s), got {found}")]
    Arity {
        action: &'static str,
        expected: usize,
        found: usize,
    },

    /// A positional argument has the wrong kind for its slot.
    #[error("action '{action}' argument {position}: expected {expected}")]
    InvalidArgument {
        action: &'static str,
        position: usize,
        expected: &'static str,
    },

    /// A keyword template the action does not accept.
    #[error("action '{action}' does not accept keyword '{keyword}'")]
    UnexpectedKeyword {
        action: &'static str,
        keyword: &'static str,
    },

    /// Comparison operator outside `==`, `!=`, `>`, `>=`, `<`, `<=`.
    #[error("unsupported operator '{op}' (supported: ==, !=, >, >=, <, <=)")]
    UnsupportedOperator { op: String },

    /// `if_key` with neither a then nor an else template.
    #[error("if_key on '{key}' needs a then template, an else template, or both")]
    MissingBranch { key: String },

    /// `for_list` without an item template.
    #[error("for_list needs an item template")]
    MissingItemTemplate,

    /// A JSON null where a literal was expected.
    #[error("null has no literal template form")]
    NullLiteral,
}
