use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors returned by [`SurveyStore`](super::SurveyStore) operations.
pub enum StoreError {
    /// Referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Record kind ("survey", "question", ...).
        entity: &'static str,
        /// Requested id.
        id: u64,
    },

    /// A committed answer points at a question outside the respondent's survey.
    #[error("question {question_id} does not belong to survey {survey_id}")]
    ForeignQuestion {
        /// Question the answer targets.
        question_id: u64,
        /// Survey of the answering respondent.
        survey_id: u64,
    },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        Self::NotFound { entity, id }
    }
}
