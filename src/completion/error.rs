use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("provider error: {0}")]
    Provider(String),

    #[error("provider returned no text content")]
    EmptyResponse,
}
