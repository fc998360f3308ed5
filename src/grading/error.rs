use thiserror::Error;

use crate::store::{QuestionId, RespondentId, StoreError, SurveyId};

#[derive(Debug, Error, PartialEq, Eq)]
/// Request-level failures of the write path. Extraction and scoring problems
/// never show up here.
pub enum GradingError {
    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Record kind.
        entity: &'static str,
        /// Requested id.
        id: u64,
    },

    /// The question belongs to a different survey than the respondent.
    #[error("question {question_id} is not part of survey {survey_id}")]
    SurveyMismatch {
        /// Question in the request.
        question_id: QuestionId,
        /// Survey the respondent is answering.
        survey_id: SurveyId,
    },

    /// Submit was called before any answer was written.
    #[error("respondent {respondent_id} has no answers to submit")]
    NoAnswers {
        /// Respondent in the request.
        respondent_id: RespondentId,
    },

    /// Any other storage failure.
    #[error("store error: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for GradingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => GradingError::NotFound { entity, id },
            other => GradingError::Store(other),
        }
    }
}
