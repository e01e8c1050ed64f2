//! Shared helpers for the integration tests.

use std::sync::Once;

use reshape_core::Template;
use serde_json::Value;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary. Set `RUST_LOG`
/// to see soft-miss warnings and transition logs.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_target(false)
            .try_init();
    });
}

/// A literal-only template from JSON.
pub fn literal(value: Value) -> Template {
    Template::try_from(value).expect("fixture JSON has no nulls")
}
