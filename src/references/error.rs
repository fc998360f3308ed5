use thiserror::Error;

use crate::completion::CompletionError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("malformed resolver reply: {reason}")]
    MalformedReply { reason: String },
}
