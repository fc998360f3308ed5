use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::scoring::ScoringStatus;

pub type SurveyId = u64;
pub type QuestionId = u64;
pub type RespondentId = u64;
pub type AnswerId = u64;

/// Current wall-clock time as a unix timestamp (seconds).
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: SurveyId,
    pub title: String,
    pub description: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub survey_id: SurveyId,
    /// Zero-based position within the survey.
    pub order_index: u32,
    pub text: String,
    /// Free-form type tag ("text" unless the admin says otherwise).
    #[serde(rename = "type")]
    pub kind: String,
}

impl Question {
    /// 1-based number shown to respondents and used by reference extraction.
    pub fn display_number(&self) -> u32 {
        self.order_index.saturating_add(1)
    }
}

/// Fields for a question that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    #[serde(default)]
    pub order_index: u32,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

impl NewQuestion {
    pub fn new(text: impl Into<String>, order_index: u32) -> Self {
        Self {
            text: text.into(),
            order_index,
            kind: default_kind(),
        }
    }
}

fn default_kind() -> String {
    "text".to_string()
}

/// Grading rubric attached to a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    pub question_id: QuestionId,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespondentStatus {
    InProgress,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Respondent {
    pub id: RespondentId,
    pub survey_id: SurveyId,
    pub display_name: Option<String>,
    pub status: RespondentStatus,
    pub created_at: i64,
}

/// One respondent's answer to one question, including its grading state.
///
/// `low_quality` is always derived from `score` by the write path; it is stored
/// only so readers do not need the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub respondent_id: RespondentId,
    pub question_id: QuestionId,
    pub answer_text: String,
    pub flagged: bool,
    pub score: Option<f64>,
    pub rationale: Option<String>,
    pub low_quality: bool,
    /// JSON list of referenced question ids; `None` until first computed.
    pub referenced_question_ids: Option<String>,
    pub reference_warning: Option<String>,
    /// Number of times a score (semantic or heuristic) has been written.
    pub score_revisions: u32,
    pub updated_at: i64,
    /// Store-wide write sequence stamped on every commit; `0` until first committed.
    #[serde(default)]
    pub write_seq: u64,
}

impl Answer {
    pub fn new(
        id: AnswerId,
        respondent_id: RespondentId,
        question_id: QuestionId,
        answer_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            respondent_id,
            question_id,
            answer_text: answer_text.into(),
            flagged: false,
            score: None,
            rationale: None,
            low_quality: false,
            referenced_question_ids: None,
            reference_warning: None,
            score_revisions: 0,
            updated_at: now_timestamp(),
            write_seq: 0,
        }
    }

    pub fn with_flagged(mut self, flagged: bool) -> Self {
        self.flagged = flagged;
        self
    }

    pub fn scoring_status(&self) -> ScoringStatus {
        ScoringStatus::from_revisions(self.score.is_some(), self.score_revisions)
    }

    /// Ordering key for "latest write wins" among answers to the same question.
    pub fn recency_key(&self) -> (u64, AnswerId) {
        (self.write_seq, self.id)
    }
}
