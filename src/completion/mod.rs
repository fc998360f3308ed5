//! External completion service boundary.
//!
//! Both the guideline scorer and the semantic reference resolver talk to a chat
//! completion endpoint through [`CompletionClient`]. The production client wraps
//! [`genai::Client`]; tests and offline runs use [`MockCompletionClient`].
//!
//! Callers treat every [`CompletionError`] as "service unavailable" and degrade;
//! nothing in this crate propagates a completion failure to a request.

pub mod client;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use client::{CompletionClient, CompletionRequest, GenaiCompletionClient};
pub use config::CompletionConfig;
pub use error::CompletionError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCompletionClient;
