use std::time::Duration;

use crate::constants::{DEFAULT_LLM_MODEL, DEFAULT_LLM_TIMEOUT_SECS};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Completion service configuration.
pub struct CompletionConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Upper bound for a single completion call.
    pub timeout: Duration,
    /// Whether the semantic reference refinement pass may call the service.
    pub semantic_references: bool,
    /// `true` when credentials are configured; otherwise every caller degrades.
    pub enabled: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            semantic_references: true,
            enabled: false,
        }
    }
}
