use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::context::ReferencedAnswers;
use crate::references::{ReferenceGraph, SurveyNumbering, decode_reference_ids, encode_reference_ids};
use crate::scoring::{ScoreOutcome, ScoringConfig};
use crate::store::{Answer, QuestionId, RespondentId, SurveyId, now_timestamp};

/// Arena of answers indexed by question id, plus the reference graph derived
/// from their caches.
///
/// Only the authoritative answer per question is kept: the one with the highest
/// store write sequence, ties broken by the higher id.
#[derive(Debug, Clone)]
pub struct ResponseSheet {
    respondent_id: RespondentId,
    survey_id: SurveyId,
    numbering: SurveyNumbering,
    answers: BTreeMap<QuestionId, Answer>,
    graph: ReferenceGraph,
    dirty: BTreeSet<QuestionId>,
}

impl ResponseSheet {
    pub fn new(
        respondent_id: RespondentId,
        survey_id: SurveyId,
        numbering: SurveyNumbering,
        answers: impl IntoIterator<Item = Answer>,
    ) -> Self {
        let mut latest: BTreeMap<QuestionId, Answer> = BTreeMap::new();
        for answer in answers {
            if answer.respondent_id != respondent_id {
                continue;
            }
            let newer = latest
                .get(&answer.question_id)
                .is_none_or(|current| answer.recency_key() > current.recency_key());
            if newer {
                latest.insert(answer.question_id, answer);
            }
        }

        let mut graph = ReferenceGraph::new();
        for (question_id, answer) in &latest {
            if let Some(ids) = decode_reference_ids(answer.referenced_question_ids.as_deref()) {
                graph.set_references(*question_id, ids);
            }
        }

        debug!(
            respondent_id,
            answers = latest.len(),
            edges = graph.edge_count(),
            "Response sheet loaded"
        );

        Self {
            respondent_id,
            survey_id,
            numbering,
            answers: latest,
            graph,
            dirty: BTreeSet::new(),
        }
    }

    pub fn respondent_id(&self) -> RespondentId {
        self.respondent_id
    }

    pub fn survey_id(&self) -> SurveyId {
        self.survey_id
    }

    pub fn numbering(&self) -> &SurveyNumbering {
        &self.numbering
    }

    pub fn graph(&self) -> &ReferenceGraph {
        &self.graph
    }

    pub fn answer(&self, question_id: QuestionId) -> Option<&Answer> {
        self.answers.get(&question_id)
    }

    pub fn answers(&self) -> impl Iterator<Item = &Answer> {
        self.answers.values()
    }

    /// Question ids that currently have an answer, ascending.
    pub fn question_ids(&self) -> Vec<QuestionId> {
        self.answers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Makes `answer` the authoritative answer for its question.
    pub fn upsert(&mut self, answer: Answer) {
        let question_id = answer.question_id;
        match decode_reference_ids(answer.referenced_question_ids.as_deref()) {
            Some(ids) => self.graph.set_references(question_id, ids),
            None => self.graph.clear(question_id),
        }
        self.answers.insert(question_id, answer);
        self.dirty.insert(question_id);
    }

    /// Stores freshly resolved references for an answer, updating both the
    /// persisted cache column and the graph. Returns `false` if the question has
    /// no answer.
    pub fn record_references(
        &mut self,
        question_id: QuestionId,
        ids: BTreeSet<QuestionId>,
        warning: Option<String>,
    ) -> bool {
        let Some(answer) = self.answers.get_mut(&question_id) else {
            return false;
        };
        let encoded = encode_reference_ids(&ids);
        if answer.referenced_question_ids.as_deref() != Some(encoded.as_str())
            || answer.reference_warning != warning
        {
            answer.referenced_question_ids = Some(encoded);
            answer.reference_warning = warning;
            self.dirty.insert(question_id);
        }
        self.graph.set_references(question_id, ids);
        true
    }

    /// Writes a scoring outcome and the derived low-quality flag.
    pub fn record_score(
        &mut self,
        question_id: QuestionId,
        outcome: &ScoreOutcome,
        config: &ScoringConfig,
    ) -> bool {
        let Some(answer) = self.answers.get_mut(&question_id) else {
            return false;
        };
        answer.score = outcome.score();
        answer.rationale = outcome.rationale().map(str::to_string);
        answer.low_quality = config.is_low_quality(answer.score);
        if !outcome.is_unscored() {
            answer.score_revisions = answer.score_revisions.saturating_add(1);
        }
        answer.updated_at = now_timestamp().max(answer.updated_at);
        self.dirty.insert(question_id);
        true
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Consumes the sheet, returning every answer that changed.
    pub fn into_changes(mut self) -> Vec<Answer> {
        self.dirty
            .iter()
            .filter_map(|question_id| self.answers.remove(question_id))
            .collect()
    }
}

impl ReferencedAnswers for ResponseSheet {
    fn answer_text(&self, respondent_id: RespondentId, number: u32) -> Option<&str> {
        if respondent_id != self.respondent_id {
            return None;
        }
        let question_id = self.numbering.id_of(number)?;
        self.answers
            .get(&question_id)
            .map(|answer| answer.answer_text.as_str())
    }
}
