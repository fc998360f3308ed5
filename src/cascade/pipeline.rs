use std::collections::BTreeSet;

use tracing::debug;

use crate::completion::CompletionClient;
use crate::context::build_scoring_context;
use crate::references::{ReferenceExtraction, ReferenceExtractor, SemanticResolver};
use crate::response::ResponseSheet;
use crate::scoring::{GuidelineScorer, ScoreOutcome, ScoringConfig};
use crate::store::QuestionId;

/// Freshly extracted references of one answer, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerAnalysis {
    pub extraction: ReferenceExtraction,
    /// `extraction.numbers` mapped to question ids.
    pub ids: BTreeSet<QuestionId>,
}

impl AnswerAnalysis {
    pub fn warning(&self) -> Option<String> {
        self.extraction.warning_opt()
    }
}

/// Extraction, context building and scoring for a single answer.
///
/// Both steps only read the sheet; callers write results back once scoring has
/// finished so an abandoned call leaves the previous state in place.
pub struct AnswerPipeline<C, R> {
    extractor: ReferenceExtractor<R>,
    scorer: GuidelineScorer<C>,
}

impl<C, R> std::fmt::Debug for AnswerPipeline<C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerPipeline").finish_non_exhaustive()
    }
}

impl<C: CompletionClient, R: SemanticResolver> AnswerPipeline<C, R> {
    pub fn new(extractor: ReferenceExtractor<R>, scorer: GuidelineScorer<C>) -> Self {
        Self { extractor, scorer }
    }

    pub fn scorer(&self) -> &GuidelineScorer<C> {
        &self.scorer
    }

    pub fn extractor(&self) -> &ReferenceExtractor<R> {
        &self.extractor
    }

    pub fn scoring_config(&self) -> &ScoringConfig {
        self.scorer.config()
    }

    /// Extracts references from the answer's own text, using its own display
    /// number as the relative position.
    pub async fn analyze(&self, sheet: &ResponseSheet, question_id: QuestionId) -> Option<AnswerAnalysis> {
        let answer = sheet.answer(question_id)?;
        let numbering = sheet.numbering();
        let extraction = self
            .extractor
            .extract(
                &answer.answer_text,
                numbering.texts(),
                numbering.position_of(question_id),
            )
            .await;
        let ids = numbering.ids_for(&extraction.numbers);
        Some(AnswerAnalysis { extraction, ids })
    }

    /// Scores the answer with a context built from `referenced` question ids.
    pub async fn score(
        &self,
        sheet: &ResponseSheet,
        question_id: QuestionId,
        referenced: &BTreeSet<QuestionId>,
        guideline: Option<&str>,
    ) -> Option<ScoreOutcome> {
        let answer = sheet.answer(question_id)?;
        let numbers = sheet.numbering().numbers_for(referenced);
        let context =
            build_scoring_context(&answer.answer_text, sheet.respondent_id(), &numbers, sheet);
        let outcome = self.scorer.score(&context, guideline).await;
        debug!(question_id, outcome = outcome.kind(), "Answer scored");
        Some(outcome)
    }

    /// Full pipeline for the answer that was just written: extract, score, then
    /// record both. Returns the extraction (for its warning) and the outcome.
    pub async fn process(
        &self,
        sheet: &mut ResponseSheet,
        question_id: QuestionId,
        guideline: Option<&str>,
    ) -> Option<(AnswerAnalysis, ScoreOutcome)> {
        let analysis = self.analyze(sheet, question_id).await?;
        let outcome = self
            .score(sheet, question_id, &analysis.ids, guideline)
            .await?;

        sheet.record_references(question_id, analysis.ids.clone(), analysis.warning());
        sheet.record_score(question_id, &outcome, self.scorer.config());
        Some((analysis, outcome))
    }
}
