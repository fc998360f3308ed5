use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::error::GradingError;
use super::locks::RespondentLocks;
use super::types::{AnswerChanges, AnswerReceipt, NewAnswer};
use crate::cascade::{AnswerPipeline, CascadeReport, GuidelineMap, RescoreCascade};
use crate::completion::CompletionClient;
use crate::references::{CompletionResolver, ReferenceExtractor, SurveyNumbering};
use crate::response::ResponseSheet;
use crate::scoring::{GuidelineScorer, ScoreOutcome, ScoringConfig};
use crate::store::{
    Answer, AnswerId, QuestionId, Respondent, RespondentId, RespondentStatus, SurveyId,
    SurveyStore, now_timestamp,
};

/// Orchestrates the answer write path over a [`SurveyStore`].
pub struct GradingService<C, S> {
    store: Arc<S>,
    pipeline: AnswerPipeline<C, CompletionResolver<C>>,
    locks: RespondentLocks,
}

impl<C, S> std::fmt::Debug for GradingService<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradingService")
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl<C: CompletionClient, S: SurveyStore> GradingService<C, S> {
    /// Wires the scorer and extractor around one optional completion client.
    ///
    /// The semantic reference pass is only enabled when a client is present and
    /// `semantic_references` is set.
    pub fn new(
        store: Arc<S>,
        scoring: ScoringConfig,
        client: Option<Arc<C>>,
        semantic_references: bool,
    ) -> Self {
        let resolver = client
            .as_ref()
            .filter(|_| semantic_references)
            .map(|c| CompletionResolver::new(Arc::clone(c)));
        let pipeline = AnswerPipeline::new(
            ReferenceExtractor::new(resolver),
            GuidelineScorer::new(scoring, client),
        );
        Self::from_pipeline(store, pipeline)
    }

    pub fn from_pipeline(store: Arc<S>, pipeline: AnswerPipeline<C, CompletionResolver<C>>) -> Self {
        Self {
            store,
            pipeline,
            locks: RespondentLocks::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn scoring_config(&self) -> &ScoringConfig {
        self.pipeline.scoring_config()
    }

    pub fn locks(&self) -> &RespondentLocks {
        &self.locks
    }

    /// Loads the respondent's sheet and the survey's guidelines.
    fn load(&self, respondent: &Respondent) -> Result<(ResponseSheet, GuidelineMap), GradingError> {
        let questions = self.store.questions(respondent.survey_id)?;
        let numbering = SurveyNumbering::from_questions(&questions);
        let guidelines: GuidelineMap = questions
            .iter()
            .filter_map(|q| self.store.guideline(q.id).map(|g| (q.id, g.content)))
            .collect();
        let answers = self.store.answers_for_respondent(respondent.id)?;
        let sheet = ResponseSheet::new(respondent.id, respondent.survey_id, numbering, answers);
        Ok((sheet, guidelines))
    }

    /// Scores the written answer, optionally cascades, and commits the sheet.
    async fn grade_and_commit(
        &self,
        mut sheet: ResponseSheet,
        guidelines: &GuidelineMap,
        question_id: QuestionId,
        answer_id: AnswerId,
        cascade: bool,
    ) -> Result<AnswerReceipt, GradingError> {
        let guideline = guidelines.get(&question_id).map(String::as_str);
        let (warning, outcome) = match self.pipeline.process(&mut sheet, question_id, guideline).await {
            Some((analysis, outcome)) => (analysis.warning(), outcome),
            None => (None, ScoreOutcome::Unscored),
        };

        let report = if cascade {
            RescoreCascade::new(&self.pipeline)
                .run(&mut sheet, question_id, guidelines)
                .await
        } else {
            CascadeReport::new(question_id)
        };

        let committed = self.store.commit_answers(sheet.into_changes())?;
        let answer = committed
            .into_iter()
            .find(|a| a.id == answer_id)
            .ok_or(GradingError::NotFound {
                entity: "answer",
                id: answer_id,
            })?;

        Ok(AnswerReceipt {
            answer,
            reference_warning: warning,
            degrade_reason: outcome.degrade_reason(),
            cascade: report,
        })
    }

    #[instrument(skip(self, new), fields(respondent_id = new.respondent_id, question_id = new.question_id))]
    pub async fn create_answer(&self, new: NewAnswer) -> Result<AnswerReceipt, GradingError> {
        let _guard = self.locks.acquire(new.respondent_id).await;

        let respondent = self.store.respondent(new.respondent_id)?;
        let question = self.store.question(new.question_id)?;
        if question.survey_id != respondent.survey_id {
            return Err(GradingError::SurveyMismatch {
                question_id: question.id,
                survey_id: respondent.survey_id,
            });
        }

        let (mut sheet, guidelines) = self.load(&respondent)?;
        let answer = Answer::new(
            self.store.allocate_answer_id(),
            respondent.id,
            question.id,
            new.answer_text.unwrap_or_default(),
        )
        .with_flagged(new.flagged);
        let answer_id = answer.id;
        sheet.upsert(answer);

        let receipt = self
            .grade_and_commit(sheet, &guidelines, question.id, answer_id, true)
            .await?;
        info!(
            answer_id,
            score = ?receipt.answer.score,
            rescored = receipt.cascade.rescored.len(),
            "Answer created"
        );
        Ok(receipt)
    }

    /// Applies `changes`, rescores the answer, and cascades only when the text
    /// actually changed.
    #[instrument(skip(self, changes))]
    pub async fn update_answer(
        &self,
        answer_id: AnswerId,
        changes: AnswerChanges,
    ) -> Result<AnswerReceipt, GradingError> {
        let respondent_id = self.store.answer(answer_id)?.respondent_id;
        let _guard = self.locks.acquire(respondent_id).await;

        // Re-read under the lock.
        let mut answer = self.store.answer(answer_id)?;
        let respondent = self.store.respondent(answer.respondent_id)?;

        let text_changed = changes
            .answer_text
            .as_ref()
            .is_some_and(|text| *text != answer.answer_text);
        if let Some(text) = changes.answer_text {
            answer.answer_text = text;
        }
        if let Some(flagged) = changes.flagged {
            answer.flagged = flagged;
        }
        answer.updated_at = now_timestamp().max(answer.updated_at);

        let (mut sheet, guidelines) = self.load(&respondent)?;
        let question_id = answer.question_id;
        sheet.upsert(answer);

        let receipt = self
            .grade_and_commit(sheet, &guidelines, question_id, answer_id, text_changed)
            .await?;
        info!(
            answer_id,
            text_changed,
            rescored = receipt.cascade.rescored.len(),
            "Answer updated"
        );
        Ok(receipt)
    }

    /// Deletes an answer. Dependents keep their cached references and scores
    /// until their own next edit.
    #[instrument(skip(self))]
    pub async fn delete_answer(&self, answer_id: AnswerId) -> Result<Answer, GradingError> {
        let respondent_id = self.store.answer(answer_id)?.respondent_id;
        let _guard = self.locks.acquire(respondent_id).await;

        let deleted = self.store.delete_answer(answer_id)?;
        debug!(answer_id, question_id = deleted.question_id, "Answer deleted without cascade");
        Ok(deleted)
    }

    pub fn list_answers(&self, respondent_id: RespondentId) -> Result<Vec<Answer>, GradingError> {
        Ok(self.store.answers_for_respondent(respondent_id)?)
    }

    /// Marks the respondent submitted; requires at least one answer.
    #[instrument(skip(self))]
    pub async fn submit(&self, respondent_id: RespondentId) -> Result<Respondent, GradingError> {
        let _guard = self.locks.acquire(respondent_id).await;

        if self.store.answers_for_respondent(respondent_id)?.is_empty() {
            return Err(GradingError::NoAnswers { respondent_id });
        }
        let respondent = self
            .store
            .set_respondent_status(respondent_id, RespondentStatus::Submitted)?;
        info!(respondent_id, "Respondent submitted");
        Ok(respondent)
    }

    /// Deletes a survey with its respondents and releases their write locks.
    #[instrument(skip(self))]
    pub fn delete_survey(&self, survey_id: SurveyId) -> Result<(), GradingError> {
        let respondents = self.store.delete_survey(survey_id)?;
        for respondent_id in &respondents {
            self.locks.forget(*respondent_id);
        }
        info!(survey_id, respondents = respondents.len(), "Survey deleted");
        Ok(())
    }
}
