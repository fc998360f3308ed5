use std::future::Future;
use std::time::Duration;

use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatResponseFormat};
use tracing::{debug, warn};

use super::config::CompletionConfig;
use super::error::CompletionError;

/// A single system + user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Chat completion backend that answers with a single text reply.
pub trait CompletionClient: Send + Sync {
    /// Sends `request` and returns the first text part of the reply.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;

    /// Model identifier used for requests.
    fn model(&self) -> &str;
}

/// [`CompletionClient`] backed by [`genai::Client`].
///
/// Credentials are resolved by genai from the provider's usual environment
/// variable (`OPENAI_API_KEY` for OpenAI models). Requests run at temperature 0
/// in JSON mode and are bounded by the configured timeout.
#[derive(Clone)]
pub struct GenaiCompletionClient {
    client: Client,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GenaiCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiCompletionClient")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GenaiCompletionClient {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            timeout,
        }
    }

    /// Builds a client from config, or `None` when no credentials are configured.
    pub fn from_config(config: &CompletionConfig) -> Option<Self> {
        if !config.enabled {
            debug!("Completion service disabled (no credentials configured)");
            return None;
        }
        Some(Self::new(config.model.clone(), config.timeout))
    }

    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            model: model.into(),
            timeout: self.timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl CompletionClient for GenaiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let chat_req = ChatRequest::new(vec![
            ChatMessage::system(request.system.clone()),
            ChatMessage::user(request.user.clone()),
        ]);
        let options = ChatOptions::default()
            .with_temperature(0.0)
            .with_response_format(ChatResponseFormat::JsonMode);

        let call = self
            .client
            .exec_chat(self.model.as_str(), chat_req, Some(&options));

        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                warn!(model = %self.model, timeout = ?self.timeout, "Completion call timed out");
                CompletionError::Timeout {
                    elapsed: self.timeout,
                }
            })?
            .map_err(|e| CompletionError::Provider(e.to_string()))?;

        response
            .first_text()
            .map(str::to_string)
            .filter(|text| !text.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
