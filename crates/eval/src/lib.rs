//! reshape-eval: interprets reshape templates against a data tree.
//!
//! Given a template (see `reshape-core`) and a `serde_json::Value`, produces
//! a result tree: literals are echoed, directives are replaced by values
//! extracted from the data, and directive actions rebind the cursor,
//! branch, or iterate.
//!
//! Failures come in two classes. Structural problems (a location that does
//! not exist, an `if_key` field missing, `for_list` over a non-sequence, a
//! failed conversion) abort the run with an [`EvalError`]. A `key` / `index`
//! lookup that misses is logged with `tracing::warn!` and the directive
//! simply contributes nothing.

pub mod actions;
pub mod compare;
pub mod error;
pub mod interpreter;
pub mod options;
pub mod order;
pub mod scope;
pub mod trace;

pub use error::EvalError;
pub use options::{EngineOptions, DEFAULT_SCOPE_KEY};
pub use trace::{TraceEvent, TraceStep};

use reshape_core::Template;
use serde_json::Value;

use interpreter::Interpreter;
use scope::Scope;
use trace::Tracer;

/// Result of [`Engine::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub value: Value,
    /// Empty unless [`EngineOptions::trace`] is set.
    pub trace: Vec<TraceEvent>,
}

/// Configured entry point. Runs share no state, so one engine may be used
/// from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: EngineOptions,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Engine { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Interpret `template` against `data`.
    ///
    /// A bare scalar template is returned as is. A top-level directive that
    /// contributes nothing yields `null`.
    pub fn run(&self, template: &Template, data: &Value) -> Result<RunOutput, EvalError> {
        if let Template::Scalar(s) = template {
            let mut tracer = Tracer::new(self.options.trace);
            tracer.record(1, || TraceStep::Scalar);
            return Ok(RunOutput {
                value: s.to_value(),
                trace: tracer.finish(),
            });
        }

        let mut interpreter = Interpreter::new(&self.options);
        let mut scope = Scope::new(data);
        let value = interpreter.eval(template, &mut scope)?.into_value();
        let trace = interpreter.into_trace();
        if self.options.trace {
            let rendered: Vec<String> = trace.iter().map(|e| format!("[{}]", e)).collect();
            tracing::debug!(transitions = %rendered.join(" -> "), "run complete");
        }
        Ok(RunOutput { value, trace })
    }
}

/// Interpret `template` against `data` with default options.
pub fn run(template: &Template, data: &Value) -> Result<Value, EvalError> {
    Engine::default().run(template, data).map(|output| output.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reshape_core::{Action, TemplateBuilder, ValueType};
    use serde_json::json;

    #[test]
    fn scalar_template_ignores_data() {
        let t = Template::from("abc");
        assert_eq!(run(&t, &json!({"anything": [1, 2]})).unwrap(), json!("abc"));
        assert_eq!(run(&t, &Value::Null).unwrap(), json!("abc"));
    }

    #[test]
    fn scalar_template_is_traced_when_enabled() {
        let t = Template::from(7);
        let traced = Engine::new(EngineOptions::default().with_trace(true))
            .run(&t, &json!({}))
            .unwrap();
        assert_eq!(traced.value, json!(7));
        assert_eq!(
            traced.trace,
            vec![TraceEvent {
                depth: 1,
                step: TraceStep::Scalar
            }]
        );
        assert!(Engine::default().run(&t, &json!({})).unwrap().trace.is_empty());
    }

    #[test]
    fn top_level_absent_is_null() {
        let mut b = TemplateBuilder::new();
        let t = b.key("missing");
        assert_eq!(run(&t, &json!({})).unwrap(), Value::Null);
    }

    #[test]
    fn top_level_for_list_is_a_sequence() {
        let mut b = TemplateBuilder::new();
        let item = Template::mapping([("x", b.key("n"))]);
        let t = b.directive().action(Action::for_list(item)).build().unwrap();
        let data = json!([{"n": 1}, {"n": 2}]);
        assert_eq!(run(&t, &data).unwrap(), json!([{"x": 1}, {"x": 2}]));
    }

    #[test]
    fn trace_is_collected_only_when_enabled() {
        let mut b = TemplateBuilder::new();
        let t = Template::mapping([
            ("amap", b.location("level")),
            (
                "price",
                b.directive()
                    .key("tcPrice")
                    .value_type(ValueType::Text)
                    .build()
                    .unwrap(),
            ),
        ]);
        let data = json!({"level": {"tcPrice": 15}});

        let quiet = Engine::default().run(&t, &data).unwrap();
        assert!(quiet.trace.is_empty());
        assert_eq!(quiet.value, json!({"price": "15"}));

        let traced = Engine::new(EngineOptions::default().with_trace(true))
            .run(&t, &data)
            .unwrap();
        assert_eq!(traced.value, quiet.value);
        let rendered: Vec<String> = traced.trace.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "1:mapping[amap, price]",
                "2:directive#1",
                "2:action location [\"level\"]",
                "2:directive#2",
                "2:key \"tcPrice\" hit",
            ]
        );
    }

    #[test]
    fn engine_is_reusable_across_unrelated_templates() {
        let engine = Engine::default();
        let mut b1 = TemplateBuilder::new();
        let mut b2 = TemplateBuilder::new();
        let t1 = Template::mapping([("a", b1.key("x")), ("b", b1.key("y"))]);
        let t2 = Template::mapping([("b", b2.key("y")), ("a", b2.key("x"))]);
        let data = json!({"x": 1, "y": 2});
        assert_eq!(engine.run(&t1, &data).unwrap().value, json!({"a": 1, "b": 2}));
        assert_eq!(engine.run(&t2, &data).unwrap().value, json!({"a": 1, "b": 2}));
    }
}
