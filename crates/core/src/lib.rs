//! reshape-core: template node model for the reshape transformer.
//!
//! A template is a tree of literals, sequences, mappings and directives.
//! Directives extract values from a data tree; their optional actions
//! rebind scope, branch on a field, or iterate a sequence. This crate only
//! describes templates; `reshape-eval` interprets them.
//!
//! # Public API
//!
//! - [`Template`], [`Scalar`], [`Mapping`], [`Directive`] -- the node model
//! - [`TemplateBuilder`] -- owns the directive creation counter
//! - [`Action`], [`ActionArgs`], [`CompareOp`] -- directive actions
//! - [`Path`], [`Step`], [`path!`] -- navigation paths
//! - [`ValueType`], [`Converter`] -- value converters
//! - [`TemplateError`] -- construction errors

pub mod action;
pub mod builder;
pub mod convert;
pub mod error;
pub mod path;
pub mod template;

// ── Convenience re-exports ───────────────────────────────────────────

pub use action::{Action, ActionArg, ActionArgs, CompareOp, ForList, IfKey};
pub use builder::{DirectiveBuilder, TemplateBuilder};
pub use convert::{ConversionFailure, Converter, ValueType};
pub use error::TemplateError;
pub use path::{Path, Step};
pub use template::{Directive, Mapping, Scalar, Template};
