use serde::{Deserialize, Serialize};

use crate::cascade::CascadeReport;
use crate::scoring::DegradeReason;
use crate::store::{Answer, QuestionId, RespondentId};

/// A new answer from a respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnswer {
    pub respondent_id: RespondentId,
    pub question_id: QuestionId,
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub flagged: bool,
}

/// Partial update; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerChanges {
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub flagged: Option<bool>,
}

/// Result of a create or update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerReceipt {
    /// The answer as committed.
    pub answer: Answer,
    /// Joined reference warnings, if any.
    pub reference_warning: Option<String>,
    /// Set when the heuristic replaced the semantic score.
    pub degrade_reason: Option<DegradeReason>,
    /// Dependents rescored as a consequence of this write.
    pub cascade: CascadeReport,
}
