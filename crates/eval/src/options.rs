//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Reserved mapping key whose entry is always resolved first.
pub const DEFAULT_SCOPE_KEY: &str = "amap";

/// Options for an [`crate::Engine`]. Missing fields take their defaults
/// when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Mapping key of the scope-setting entry.
    pub scope_key: String,
    /// Record every interpreter transition in [`crate::RunOutput::trace`].
    pub trace: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            scope_key: DEFAULT_SCOPE_KEY.to_string(),
            trace: false,
        }
    }
}

impl EngineOptions {
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_scope_key(mut self, scope_key: impl Into<String>) -> Self {
        self.scope_key = scope_key.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let options: EngineOptions = serde_json::from_str(r#"{"trace": true}"#).unwrap();
        assert!(options.trace);
        assert_eq!(options.scope_key, "amap");
    }

    #[test]
    fn builder_style_overrides() {
        let options = EngineOptions::default()
            .with_scope_key("$scope")
            .with_trace(true);
        assert_eq!(options.scope_key, "$scope");
        assert!(options.trace);
    }
}
