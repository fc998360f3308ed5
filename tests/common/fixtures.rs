//! Survey fixtures and scripted completion clients.

use std::sync::Arc;

use grader::completion::{CompletionRequest, MockCompletionClient};
use grader::store::{MemoryStore, NewQuestion, Question, SurveyStore};
use grader::{GradingService, ScoringConfig};

pub type MockService = GradingService<MockCompletionClient, MemoryStore>;

pub const RESOLVER_PREFIX: &str = "Extract which question numbers";

/// Survey with one guideline per question and a single respondent.
pub struct SurveyFixture {
    pub store: Arc<MemoryStore>,
    pub survey_id: u64,
    pub questions: Vec<Question>,
    pub respondent_id: u64,
}

impl SurveyFixture {
    pub fn new(question_texts: &[&str]) -> Self {
        let store = Arc::new(MemoryStore::new());
        let survey = store.create_survey(
            "Team retrospective",
            Some("Quarterly check-in"),
            question_texts
                .iter()
                .enumerate()
                .map(|(i, text)| NewQuestion::new(*text, i as u32))
                .collect(),
        );
        let questions = store.questions(survey.id).unwrap();
        for question in &questions {
            store
                .upsert_guideline(question.id, "Be specific and give an example.")
                .unwrap();
        }
        let respondent_id = store.create_respondent(survey.id, None).unwrap().id;

        Self {
            store,
            survey_id: survey.id,
            questions,
            respondent_id,
        }
    }

    pub fn service(&self, client: Option<MockCompletionClient>, semantic: bool) -> MockService {
        GradingService::new(
            Arc::clone(&self.store),
            ScoringConfig::default(),
            client.map(Arc::new),
            semantic,
        )
    }

    pub fn question_id(&self, number: usize) -> u64 {
        self.questions[number - 1].id
    }
}

/// The answer text a request is about, for either prompt shape.
pub fn answer_section(request: &CompletionRequest) -> &str {
    if request.user.starts_with(RESOLVER_PREFIX) {
        request
            .user
            .split_once("\nAnswer:\n")
            .map(|(_, rest)| rest)
            .unwrap_or_default()
    } else {
        request
            .user
            .split_once("\nANSWER:\n")
            .map(|(_, rest)| rest)
            .unwrap_or_default()
    }
}

/// Scores 1 when the scored text says "bad" anywhere (including referenced
/// answers), 4 otherwise. Resolver prompts get `{"refs": [1]}` when the answer
/// mentions onboarding.
pub fn grading_client() -> MockCompletionClient {
    MockCompletionClient::replying(|request: &CompletionRequest| {
        let answer = answer_section(request);
        if request.user.starts_with(RESOLVER_PREFIX) {
            let refs = if answer.contains("onboarding") { "[1]" } else { "[]" };
            return Ok(format!(r#"{{"refs": {refs}}}"#));
        }
        let score = if answer.contains("bad") { 1 } else { 4 };
        Ok(format!(r#"{{"score": {score}, "rationale": "graded"}}"#))
    })
}

pub fn resolver_calls(client: &MockCompletionClient) -> usize {
    client
        .requests()
        .iter()
        .filter(|r| r.user.starts_with(RESOLVER_PREFIX))
        .count()
}
