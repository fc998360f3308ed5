use serde::{Deserialize, Serialize};

use crate::grading::AnswerReceipt;
use crate::scoring::{DegradeReason, ScoringStatus};
use crate::store::{
    Answer, AnswerId, NewQuestion, Question, QuestionId, RespondentId, Survey, SurveyId,
};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreateSurveyRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<NewQuestion>,
}

impl CreateSurveyRequest {
    /// Trimmed title, or `None` when it is blank.
    pub fn title(&self) -> Option<&str> {
        Some(self.title.trim()).filter(|t| !t.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Questions sorted by `order_index` with blank ones dropped and text trimmed.
    pub fn into_questions(self) -> Vec<NewQuestion> {
        let mut questions: Vec<NewQuestion> = self
            .questions
            .into_iter()
            .filter_map(|mut q| {
                let text = q.text.trim();
                if text.is_empty() {
                    return None;
                }
                q.text = text.to_string();
                Some(q)
            })
            .collect();
        questions.sort_by_key(|q| q.order_index);
        questions
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct GuidelineUpsert {
    pub content: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateRespondentRequest {
    pub survey_id: SurveyId,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SubmitRequest {
    pub respondent_id: RespondentId,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatedResponse {
    pub id: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RespondentCreated {
    pub respondent_id: RespondentId,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub const OK: Self = Self { ok: true };
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DeletedResponse {
    pub ok: bool,
    pub deleted: u8,
}

#[derive(Serialize, Debug, Clone)]
pub struct SurveyOut {
    pub id: SurveyId,
    pub title: String,
    pub description: Option<String>,
}

impl From<Survey> for SurveyOut {
    fn from(survey: Survey) -> Self {
        Self {
            id: survey.id,
            title: survey.title,
            description: survey.description,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GuidelineOut {
    pub content: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct QuestionOut {
    pub id: QuestionId,
    pub order_index: u32,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub guideline: Option<GuidelineOut>,
}

impl QuestionOut {
    pub fn new(question: Question, guideline: Option<String>) -> Self {
        Self {
            id: question.id,
            order_index: question.order_index,
            text: question.text,
            kind: question.kind,
            guideline: guideline.map(|content| GuidelineOut { content }),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct SurveyDetail {
    pub survey: SurveyOut,
    pub questions: Vec<QuestionOut>,
}

/// Body returned by answer create and update.
#[derive(Serialize, Debug, Clone)]
pub struct AnswerResponse {
    pub ok: bool,
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub flagged: bool,
    pub score: Option<f64>,
    pub rationale: Option<String>,
    pub low_quality: bool,
    pub status: ScoringStatus,
    pub reference_warning: Option<String>,
    pub degraded: Option<DegradeReason>,
    pub rescored_question_ids: Vec<QuestionId>,
}

impl From<AnswerReceipt> for AnswerResponse {
    fn from(receipt: AnswerReceipt) -> Self {
        let status = receipt.answer.scoring_status();
        let answer = receipt.answer;
        Self {
            ok: true,
            id: answer.id,
            question_id: answer.question_id,
            flagged: answer.flagged,
            score: answer.score,
            rationale: answer.rationale,
            low_quality: answer.low_quality,
            status,
            reference_warning: receipt.reference_warning,
            degraded: receipt.degrade_reason,
            rescored_question_ids: receipt.cascade.rescored,
        }
    }
}

/// One row of a respondent's answer listing.
#[derive(Serialize, Debug, Clone)]
pub struct AnswerSummary {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub answer_text: String,
    pub flagged: bool,
    pub score: Option<f64>,
    pub rationale: Option<String>,
    pub low_quality: bool,
    pub reference_warning: Option<String>,
    pub updated_at: i64,
}

impl From<Answer> for AnswerSummary {
    fn from(answer: Answer) -> Self {
        Self {
            id: answer.id,
            question_id: answer.question_id,
            answer_text: answer.answer_text,
            flagged: answer.flagged,
            score: answer.score,
            rationale: answer.rationale,
            low_quality: answer.low_quality,
            reference_warning: answer.reference_warning,
            updated_at: answer.updated_at,
        }
    }
}
