//! Scripted completion client for tests and offline runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::client::{CompletionClient, CompletionRequest};
use super::error::CompletionError;

type Responder = dyn Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync;

/// [`CompletionClient`] whose replies come from a closure.
///
/// Every request is recorded so tests can assert on prompt contents and call counts.
#[derive(Clone)]
pub struct MockCompletionClient {
    model: String,
    responder: Arc<Responder>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl std::fmt::Debug for MockCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCompletionClient")
            .field("model", &self.model)
            .field("calls", &self.call_count())
            .finish()
    }
}

impl MockCompletionClient {
    /// Replies with the result of `responder` for every request.
    pub fn replying<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync + 'static,
    {
        Self {
            model: "mock-model".to_string(),
            responder: Arc::new(responder),
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replies with the same text for every request.
    pub fn fixed(reply: impl Into<String>) -> Self {
        let reply = reply.into();
        Self::replying(move |_| Ok(reply.clone()))
    }

    /// Fails every request with a provider error.
    pub fn failing() -> Self {
        Self::replying(|_| Err(CompletionError::Provider("mock provider down".to_string())))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().last().cloned()
    }
}

impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        (self.responder)(request)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
