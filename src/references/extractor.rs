use tracing::{debug, instrument};

use super::numbering::QuestionTextMap;
use super::patterns::scan;
use super::resolver::{ResolveQuery, SemanticResolver};
use super::types::{ReferenceExtraction, RelativePosition};

/// Pattern-only extraction (no semantic refinement).
///
/// Deterministic for a given `text` and `questions`. `current` and `total` are
/// both required for relative phrases; if either is `None` that pass is skipped.
pub fn extract_references(
    text: &str,
    questions: &QuestionTextMap,
    current: Option<u32>,
    total: Option<u32>,
) -> ReferenceExtraction {
    let text = text.trim();
    if text.is_empty() {
        return ReferenceExtraction::default();
    }
    scan(text, RelativePosition::from_parts(current, total)).finish(questions)
}

/// Reference extractor with an optional [`SemanticResolver`].
#[derive(Debug, Clone)]
pub struct ReferenceExtractor<R> {
    resolver: Option<R>,
}

impl<R: SemanticResolver> ReferenceExtractor<R> {
    pub fn new(resolver: Option<R>) -> Self {
        Self { resolver }
    }

    /// Runs all passes. Resolver failures contribute nothing and are never surfaced.
    #[instrument(skip(self, text, questions), fields(text_len = text.len(), questions = questions.len()))]
    pub async fn extract(
        &self,
        text: &str,
        questions: &QuestionTextMap,
        position: Option<RelativePosition>,
    ) -> ReferenceExtraction {
        let text = text.trim();
        if text.is_empty() {
            return ReferenceExtraction::default();
        }

        let mut scan = scan(text, position);

        if let Some(resolver) = &self.resolver
            && scan.wants_refinement()
        {
            let query = ResolveQuery {
                text,
                questions,
                position,
            };
            match resolver.resolve(&query).await {
                Ok(refined) => {
                    debug!(refined = ?refined, "Semantic resolver returned candidates");
                    scan.candidates.extend(refined);
                }
                Err(e) => {
                    debug!(error = %e, "Semantic resolver unavailable; using pattern passes only");
                }
            }
        }

        let extraction = scan.finish(questions);
        debug!(
            numbers = ?extraction.numbers,
            warnings = extraction.warnings.len(),
            "References extracted"
        );
        extraction
    }
}
