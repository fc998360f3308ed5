//! Optional semantic refinement of reference detection.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use super::error::ResolveError;
use super::numbering::QuestionTextMap;
use super::types::RelativePosition;
use crate::completion::{CompletionClient, CompletionRequest};

const RESOLVER_SYSTEM_PROMPT: &str = "Return only valid JSON with key 'refs'.";

/// Everything a resolver may look at for one answer.
#[derive(Debug, Clone, Copy)]
pub struct ResolveQuery<'a> {
    pub text: &'a str,
    pub questions: &'a QuestionTextMap,
    pub position: Option<RelativePosition>,
}

/// Second opinion on which question numbers an answer refers to.
///
/// Results are unvalidated candidates; the extractor filters them against the
/// survey's numbering like any other candidate.
pub trait SemanticResolver: Send + Sync {
    fn resolve(
        &self,
        query: &ResolveQuery<'_>,
    ) -> impl Future<Output = Result<BTreeSet<u32>, ResolveError>> + Send;
}

/// [`SemanticResolver`] that asks a completion model for `{"refs": [...]}`.
#[derive(Debug)]
pub struct CompletionResolver<C> {
    client: Arc<C>,
}

impl<C> Clone for CompletionResolver<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: CompletionClient> CompletionResolver<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub fn build_request(query: &ResolveQuery<'_>) -> CompletionRequest {
        let numbered = query
            .questions
            .iter()
            .map(|(n, text)| format!("{}. {}", n, text))
            .collect::<Vec<_>>()
            .join("\n");

        let current = query
            .position
            .map(|p| p.current.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let total = query
            .position
            .map(|p| p.total)
            .unwrap_or(query.questions.len() as u32);

        let user = format!(
            "Extract which question numbers the answer refers to. \
             Interpret relative words (previous/next/last/first/earlier/above/below) \
             relative to CURRENT={current} and TOTAL={total}. \
             Return JSON: {{\"refs\": [ints]}}.\n\n\
             Available questions:\n{numbered}\n\nAnswer:\n{text}\n",
            text = query.text,
        );

        CompletionRequest::new(RESOLVER_SYSTEM_PROMPT, user)
    }
}

impl<C: CompletionClient> SemanticResolver for CompletionResolver<C> {
    async fn resolve(&self, query: &ResolveQuery<'_>) -> Result<BTreeSet<u32>, ResolveError> {
        let request = Self::build_request(query);
        let reply = self.client.complete(&request).await?;
        parse_resolver_reply(&reply)
    }
}

/// Parses `{"refs": [...]}`, keeping non-negative integers and digit-only strings.
pub fn parse_resolver_reply(reply: &str) -> Result<BTreeSet<u32>, ResolveError> {
    let value: Value =
        serde_json::from_str(reply.trim()).map_err(|e| ResolveError::MalformedReply {
            reason: e.to_string(),
        })?;

    let refs = match value.get("refs") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ResolveError::MalformedReply {
                reason: "'refs' is not an array".to_string(),
            });
        }
        None => return Ok(BTreeSet::new()),
    };

    Ok(refs
        .iter()
        .filter_map(|item| match item {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse().ok()
            }
            _ => None,
        })
        .collect())
}
