//! Ordered trace of interpreter transitions.
//!
//! Only collected when [`crate::EngineOptions::trace`] is set. The trace is
//! a debugging aid; nothing in the result depends on it.

use std::fmt;

use reshape_core::{CompareOp, Path};
use serde::Serialize;

/// One interpreter transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceStep {
    Scalar,
    Sequence { len: usize },
    Mapping { order: Vec<String> },
    Directive { creation_order: u64 },
    /// A directive's local cursor moved by its own location.
    Narrow { path: Path, from_root: bool },
    /// A location action moved the ambient cursor.
    Rebind { path: Path, from_root: bool },
    KeyLookup { key: String, hit: bool },
    IndexLookup { index: usize, hit: bool },
    IfKey { key: String, op: CompareOp, matched: bool },
    ForList { len: usize },
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceStep::Scalar => write!(f, "scalar"),
            TraceStep::Sequence { len } => write!(f, "sequence({})", len),
            TraceStep::Mapping { order } => write!(f, "mapping[{}]", order.join(", ")),
            TraceStep::Directive { creation_order } => write!(f, "directive#{}", creation_order),
            TraceStep::Narrow { path, from_root } => {
                let origin = if *from_root { "root_location" } else { "location" };
                write!(f, "{} {}", origin, path)
            }
            TraceStep::Rebind { path, from_root } => {
                let origin = if *from_root { "root_location" } else { "location" };
                write!(f, "action {} {}", origin, path)
            }
            TraceStep::KeyLookup { key, hit } => {
                write!(f, "key {:?} {}", key, if *hit { "hit" } else { "miss" })
            }
            TraceStep::IndexLookup { index, hit } => {
                write!(f, "index {} {}", index, if *hit { "hit" } else { "miss" })
            }
            TraceStep::IfKey { key, op, matched } => write!(f, "if_key {:?} {} -> {}", key, op, matched),
            TraceStep::ForList { len } => write!(f, "for_list({})", len),
        }
    }
}

/// A transition with its nesting depth (1 for the top-level node).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub depth: usize,
    #[serde(flatten)]
    pub step: TraceStep,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.depth, self.step)
    }
}

/// Collector handed through a run. Disabled tracers skip building steps.
#[derive(Debug, Default)]
pub(crate) struct Tracer {
    events: Option<Vec<TraceEvent>>,
}

impl Tracer {
    pub(crate) fn new(enabled: bool) -> Self {
        Tracer {
            events: enabled.then(Vec::new),
        }
    }

    pub(crate) fn record(&mut self, depth: usize, step: impl FnOnce() -> TraceStep) {
        if let Some(events) = &mut self.events {
            events.push(TraceEvent {
                depth,
                step: step(),
            });
        }
    }

    pub(crate) fn finish(self) -> Vec<TraceEvent> {
        self.events.unwrap_or_default()
    }
}
