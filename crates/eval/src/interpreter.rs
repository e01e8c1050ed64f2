//! Recursive template interpreter.
//!
//! Dispatches on the node kind: scalars are echoed, sequences and mappings
//! are rebuilt child by child, directives are resolved against the data.
//! Each collection gets its own copy of the ambient cursor, so a location
//! action inside it affects later siblings and their descendants only.

use reshape_core::{Action, Directive, Mapping, Template};
use serde_json::{Map, Value};

use crate::actions::{for_each_item, select_branch, IterState};
use crate::error::{describe_shape, EvalError};
use crate::options::EngineOptions;
use crate::order::OrderCache;
use crate::scope::Scope;
use crate::trace::{TraceStep, Tracer};

/// What a node contributed to its parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Produced {
    Value(Value),
    /// Nothing: the parent omits the key or skips the slot.
    Absent,
    /// `for_list` output. Spliced into an enclosing sequence, a plain
    /// array anywhere else.
    Items(Vec<Value>),
}

impl Produced {
    /// Standalone value: absent becomes null, items become an array.
    pub fn into_value(self) -> Value {
        match self {
            Produced::Value(v) => v,
            Produced::Absent => Value::Null,
            Produced::Items(items) => Value::Array(items),
        }
    }
}

pub struct Interpreter<'t, 'o> {
    options: &'o EngineOptions,
    orders: OrderCache<'t>,
    tracer: Tracer,
    depth: usize,
}

impl<'t, 'o> Interpreter<'t, 'o> {
    pub fn new(options: &'o EngineOptions) -> Self {
        Interpreter {
            options,
            orders: OrderCache::new(),
            tracer: Tracer::new(options.trace),
            depth: 0,
        }
    }

    /// Interpret `node` with `scope`. Location actions directly inside
    /// `node` (when it is a directive) rebind `scope` for the caller.
    pub fn eval<'d>(
        &mut self,
        node: &'t Template,
        scope: &mut Scope<'d>,
    ) -> Result<Produced, EvalError> {
        self.depth += 1;
        let produced = self.dispatch(node, scope);
        self.depth -= 1;
        produced
    }

    pub fn into_trace(self) -> Vec<crate::trace::TraceEvent> {
        self.tracer.finish()
    }

    fn dispatch<'d>(
        &mut self,
        node: &'t Template,
        scope: &mut Scope<'d>,
    ) -> Result<Produced, EvalError> {
        tracing::debug!(depth = self.depth, kind = node.kind(), "dispatch");
        match node {
            Template::Scalar(s) => {
                self.tracer.record(self.depth, || TraceStep::Scalar);
                Ok(Produced::Value(s.to_value()))
            }
            Template::Sequence(items) => self.eval_sequence(items, *scope),
            Template::Mapping(entries) => self.eval_mapping(entries, *scope),
            Template::Directive(directive) => self.eval_directive(directive, scope),
        }
    }

    fn eval_sequence<'d>(
        &mut self,
        items: &'t [Template],
        mut scope: Scope<'d>,
    ) -> Result<Produced, EvalError> {
        self.tracer
            .record(self.depth, || TraceStep::Sequence { len: items.len() });
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match self.eval(item, &mut scope)? {
                Produced::Value(v) => out.push(v),
                Produced::Absent => {}
                Produced::Items(values) => out.extend(values),
            }
        }
        Ok(Produced::Value(Value::Array(out)))
    }

    fn eval_mapping<'d>(
        &mut self,
        entries: &'t Mapping,
        mut scope: Scope<'d>,
    ) -> Result<Produced, EvalError> {
        let order = self.orders.order(entries, &self.options.scope_key);
        self.tracer.record(self.depth, || TraceStep::Mapping {
            order: order.iter().map(|k| k.to_string()).collect(),
        });
        let mut out = Map::new();
        for &key in order.iter() {
            let Some(node) = entries.get(key) else {
                continue;
            };
            match self.eval(node, &mut scope)? {
                Produced::Value(v) => {
                    out.insert(key.to_string(), v);
                }
                Produced::Absent => {}
                Produced::Items(values) => {
                    out.insert(key.to_string(), Value::Array(values));
                }
            }
        }
        Ok(Produced::Value(Value::Object(out)))
    }

    fn eval_directive<'d>(
        &mut self,
        directive: &'t Directive,
        scope: &mut Scope<'d>,
    ) -> Result<Produced, EvalError> {
        let creation_order = directive.creation_order();
        self.tracer
            .record(self.depth, || TraceStep::Directive { creation_order });

        let local = scope.local_for(directive)?;
        if let Some(path) = directive.location() {
            self.tracer.record(self.depth, || TraceStep::Narrow {
                path: path.clone(),
                from_root: false,
            });
        } else if let Some(path) = directive.root_location() {
            self.tracer.record(self.depth, || TraceStep::Narrow {
                path: path.clone(),
                from_root: true,
            });
        }

        if let Some(action) = directive.action() {
            return self.run_action(action, local, scope);
        }
        if let Some(key) = directive.key() {
            return self.extract_key(directive, key, local);
        }
        if let Some(index) = directive.index() {
            return self.extract_index(directive, index, local);
        }
        Err(EvalError::MissingDirectiveTarget { creation_order })
    }

    fn run_action<'d>(
        &mut self,
        action: &'t Action,
        local: &'d Value,
        scope: &mut Scope<'d>,
    ) -> Result<Produced, EvalError> {
        match action {
            Action::Location(path) | Action::RootLocation(path) => {
                let from_root = matches!(action, Action::RootLocation(_));
                scope.rebind(path, from_root)?;
                tracing::debug!(%path, from_root, "ambient cursor rebound");
                self.tracer.record(self.depth, || TraceStep::Rebind {
                    path: path.clone(),
                    from_root,
                });
                Ok(Produced::Absent)
            }
            Action::IfKey(if_key) => {
                let selection = select_branch(if_key, local)?;
                self.tracer.record(self.depth, || TraceStep::IfKey {
                    key: if_key.key().to_string(),
                    op: if_key.op(),
                    matched: selection.matched,
                });
                match selection.template {
                    Some(template) => {
                        let mut branch = scope.with_ambient(local);
                        self.eval(template, &mut branch)
                    }
                    None => Ok(Produced::Absent),
                }
            }
            Action::ForList(for_list) => {
                let item_template = for_list.item_template();
                let base = *scope;
                let mut out = Vec::new();
                let visited = for_each_item(local, |_, item| {
                    let mut item_scope = base.with_ambient(item);
                    out.push(self.eval(item_template, &mut item_scope)?.into_value());
                    Ok(IterState::Continue)
                })?;
                self.tracer
                    .record(self.depth, || TraceStep::ForList { len: visited });
                Ok(Produced::Items(out))
            }
        }
    }

    fn extract_key<'d>(
        &mut self,
        directive: &Directive,
        key: &str,
        local: &'d Value,
    ) -> Result<Produced, EvalError> {
        let raw = match local {
            Value::Object(fields) => {
                let raw = fields.get(key);
                if raw.is_none() {
                    tracing::warn!(key, data = %describe_shape(local), "key not found; value omitted");
                }
                raw
            }
            _ => {
                tracing::warn!(key, data = %describe_shape(local), "key lookup on non-mapping data; value omitted");
                None
            }
        };
        let hit = raw.is_some();
        self.tracer.record(self.depth, || TraceStep::KeyLookup {
            key: key.to_string(),
            hit,
        });
        raw.map_or(Ok(Produced::Absent), |raw| convert(directive, raw))
    }

    fn extract_index<'d>(
        &mut self,
        directive: &Directive,
        index: usize,
        local: &'d Value,
    ) -> Result<Produced, EvalError> {
        let raw = match local {
            Value::Array(items) => {
                let raw = items.get(index);
                if raw.is_none() {
                    tracing::warn!(index, data = %describe_shape(local), "index out of range; value omitted");
                }
                raw
            }
            _ => {
                tracing::warn!(index, data = %describe_shape(local), "index lookup on non-sequence data; value omitted");
                None
            }
        };
        let hit = raw.is_some();
        self.tracer
            .record(self.depth, || TraceStep::IndexLookup { index, hit });
        raw.map_or(Ok(Produced::Absent), |raw| convert(directive, raw))
    }
}

/// Apply the directive's converter, if any.
fn convert(directive: &Directive, raw: &Value) -> Result<Produced, EvalError> {
    let Some(value_type) = directive.value_type() else {
        return Ok(Produced::Value(raw.clone()));
    };
    value_type
        .apply(raw)
        .map(Produced::Value)
        .map_err(|failure| EvalError::Conversion {
            target: failure.target,
            value: raw.to_string(),
            message: failure.message,
        })
}
