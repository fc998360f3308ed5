//! Persistence boundary for surveys, questions, guidelines, respondents and answers.
//!
//! The grading core only needs [`SurveyStore`]; [`MemoryStore`] is the bundled
//! implementation. Writes produced by one answer edit (the edited answer plus
//! every cascaded dependent) go through [`SurveyStore::commit_answers`], which
//! applies all of them or none.

pub mod error;
pub mod memory;
pub mod model;


pub use error::StoreError;
pub use memory::MemoryStore;
pub use model::{
    Answer, AnswerId, Guideline, NewQuestion, Question, QuestionId, Respondent, RespondentId,
    RespondentStatus, Survey, SurveyId, now_timestamp,
};

/// Survey storage used by the grading service and the HTTP gateway.
///
/// Deletes cascade: removing a question removes its guideline and answers,
/// removing a survey removes everything under it.
pub trait SurveyStore: Send + Sync {
    /// Creates a survey together with its initial questions.
    fn create_survey(
        &self,
        title: &str,
        description: Option<&str>,
        questions: Vec<NewQuestion>,
    ) -> Survey;

    fn survey(&self, id: SurveyId) -> Result<Survey, StoreError>;

    fn list_surveys(&self) -> Vec<Survey>;

    /// Removes the survey and everything under it; returns the removed respondents.
    fn delete_survey(&self, id: SurveyId) -> Result<Vec<RespondentId>, StoreError>;

    fn add_question(&self, survey_id: SurveyId, question: NewQuestion)
    -> Result<Question, StoreError>;

    fn question(&self, id: QuestionId) -> Result<Question, StoreError>;

    /// Questions of a survey ordered by `(order_index, id)`.
    fn questions(&self, survey_id: SurveyId) -> Result<Vec<Question>, StoreError>;

    fn delete_question(&self, id: QuestionId) -> Result<(), StoreError>;

    fn upsert_guideline(&self, question_id: QuestionId, content: &str)
    -> Result<Guideline, StoreError>;

    fn guideline(&self, question_id: QuestionId) -> Option<Guideline>;

    /// Removes a guideline if present; returns whether one was removed.
    fn delete_guideline(&self, question_id: QuestionId) -> bool;

    fn create_respondent(
        &self,
        survey_id: SurveyId,
        display_name: Option<String>,
    ) -> Result<Respondent, StoreError>;

    fn respondent(&self, id: RespondentId) -> Result<Respondent, StoreError>;

    fn set_respondent_status(
        &self,
        id: RespondentId,
        status: RespondentStatus,
    ) -> Result<Respondent, StoreError>;

    fn answer(&self, id: AnswerId) -> Result<Answer, StoreError>;

    /// All answers of a respondent ordered by id.
    fn answers_for_respondent(&self, respondent_id: RespondentId)
    -> Result<Vec<Answer>, StoreError>;

    /// Reserves an id for an answer that will be committed later.
    fn allocate_answer_id(&self) -> AnswerId;

    /// Upserts every answer atomically. Nothing is written if any answer is invalid.
    ///
    /// Each stored answer gets a fresh [`Answer::write_seq`], greater than any
    /// issued before, so the most recent write is the authoritative one. The
    /// stamped answers are returned in input order.
    fn commit_answers(&self, answers: Vec<Answer>) -> Result<Vec<Answer>, StoreError>;

    fn delete_answer(&self, id: AnswerId) -> Result<Answer, StoreError>;
}
