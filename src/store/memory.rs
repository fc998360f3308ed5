use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use super::error::StoreError;
use super::model::{
    Answer, AnswerId, Guideline, NewQuestion, Question, QuestionId, Respondent, RespondentId,
    RespondentStatus, Survey, SurveyId, now_timestamp,
};
use super::SurveyStore;

#[derive(Debug, Default)]
struct Tables {
    surveys: BTreeMap<SurveyId, Survey>,
    questions: BTreeMap<QuestionId, Question>,
    guidelines: BTreeMap<QuestionId, Guideline>,
    respondents: BTreeMap<RespondentId, Respondent>,
    answers: BTreeMap<AnswerId, Answer>,
    write_seq: u64,
}

impl Tables {
    fn remove_question(&mut self, id: QuestionId) {
        self.questions.remove(&id);
        self.guidelines.remove(&id);
        self.answers.retain(|_, a| a.question_id != id);
    }
}

/// In-process [`SurveyStore`]. All tables live behind one lock, so
/// `commit_answers` is atomic with respect to every other call and its write
/// sequence is strictly increasing.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    next_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_id: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn insert_question(&self, tables: &mut Tables, survey_id: SurveyId, new: NewQuestion) -> Question {
        let question = Question {
            id: self.next_id(),
            survey_id,
            order_index: new.order_index,
            text: new.text,
            kind: new.kind,
        };
        tables.questions.insert(question.id, question.clone());
        question
    }
}

impl SurveyStore for MemoryStore {
    fn create_survey(
        &self,
        title: &str,
        description: Option<&str>,
        questions: Vec<NewQuestion>,
    ) -> Survey {
        let mut tables = self.tables.write();
        let survey = Survey {
            id: self.next_id(),
            title: title.to_string(),
            description: description.map(str::to_string),
            created_at: now_timestamp(),
        };
        tables.surveys.insert(survey.id, survey.clone());
        for question in questions {
            self.insert_question(&mut tables, survey.id, question);
        }
        debug!(survey_id = survey.id, "Survey created");
        survey
    }

    fn survey(&self, id: SurveyId) -> Result<Survey, StoreError> {
        self.tables
            .read()
            .surveys
            .get(&id)
            .cloned()
            .ok_or(StoreError::not_found("survey", id))
    }

    fn list_surveys(&self) -> Vec<Survey> {
        self.tables.read().surveys.values().cloned().collect()
    }

    fn delete_survey(&self, id: SurveyId) -> Result<Vec<RespondentId>, StoreError> {
        let mut tables = self.tables.write();
        if tables.surveys.remove(&id).is_none() {
            return Err(StoreError::not_found("survey", id));
        }

        let question_ids: Vec<QuestionId> = tables
            .questions
            .values()
            .filter(|q| q.survey_id == id)
            .map(|q| q.id)
            .collect();
        for question_id in question_ids {
            tables.remove_question(question_id);
        }

        let respondents: Vec<RespondentId> = tables
            .respondents
            .values()
            .filter(|r| r.survey_id == id)
            .map(|r| r.id)
            .collect();
        for respondent_id in &respondents {
            tables.respondents.remove(respondent_id);
        }
        tables
            .answers
            .retain(|_, a| !respondents.contains(&a.respondent_id));

        debug!(survey_id = id, respondents = respondents.len(), "Survey deleted");
        Ok(respondents)
    }

    fn add_question(
        &self,
        survey_id: SurveyId,
        question: NewQuestion,
    ) -> Result<Question, StoreError> {
        let mut tables = self.tables.write();
        if !tables.surveys.contains_key(&survey_id) {
            return Err(StoreError::not_found("survey", survey_id));
        }
        Ok(self.insert_question(&mut tables, survey_id, question))
    }

    fn question(&self, id: QuestionId) -> Result<Question, StoreError> {
        self.tables
            .read()
            .questions
            .get(&id)
            .cloned()
            .ok_or(StoreError::not_found("question", id))
    }

    fn questions(&self, survey_id: SurveyId) -> Result<Vec<Question>, StoreError> {
        let tables = self.tables.read();
        if !tables.surveys.contains_key(&survey_id) {
            return Err(StoreError::not_found("survey", survey_id));
        }
        let mut questions: Vec<Question> = tables
            .questions
            .values()
            .filter(|q| q.survey_id == survey_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| (q.order_index, q.id));
        Ok(questions)
    }

    fn delete_question(&self, id: QuestionId) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if !tables.questions.contains_key(&id) {
            return Err(StoreError::not_found("question", id));
        }
        tables.remove_question(id);
        debug!(question_id = id, "Question deleted with its guideline and answers");
        Ok(())
    }

    fn upsert_guideline(
        &self,
        question_id: QuestionId,
        content: &str,
    ) -> Result<Guideline, StoreError> {
        let mut tables = self.tables.write();
        if !tables.questions.contains_key(&question_id) {
            return Err(StoreError::not_found("question", question_id));
        }
        let guideline = Guideline {
            question_id,
            content: content.to_string(),
        };
        tables.guidelines.insert(question_id, guideline.clone());
        Ok(guideline)
    }

    fn guideline(&self, question_id: QuestionId) -> Option<Guideline> {
        self.tables.read().guidelines.get(&question_id).cloned()
    }

    fn delete_guideline(&self, question_id: QuestionId) -> bool {
        self.tables.write().guidelines.remove(&question_id).is_some()
    }

    fn create_respondent(
        &self,
        survey_id: SurveyId,
        display_name: Option<String>,
    ) -> Result<Respondent, StoreError> {
        let mut tables = self.tables.write();
        if !tables.surveys.contains_key(&survey_id) {
            return Err(StoreError::not_found("survey", survey_id));
        }
        let respondent = Respondent {
            id: self.next_id(),
            survey_id,
            display_name,
            status: RespondentStatus::InProgress,
            created_at: now_timestamp(),
        };
        tables.respondents.insert(respondent.id, respondent.clone());
        Ok(respondent)
    }

    fn respondent(&self, id: RespondentId) -> Result<Respondent, StoreError> {
        self.tables
            .read()
            .respondents
            .get(&id)
            .cloned()
            .ok_or(StoreError::not_found("respondent", id))
    }

    fn set_respondent_status(
        &self,
        id: RespondentId,
        status: RespondentStatus,
    ) -> Result<Respondent, StoreError> {
        let mut tables = self.tables.write();
        let respondent = tables
            .respondents
            .get_mut(&id)
            .ok_or(StoreError::not_found("respondent", id))?;
        respondent.status = status;
        Ok(respondent.clone())
    }

    fn answer(&self, id: AnswerId) -> Result<Answer, StoreError> {
        self.tables
            .read()
            .answers
            .get(&id)
            .cloned()
            .ok_or(StoreError::not_found("answer", id))
    }

    fn answers_for_respondent(
        &self,
        respondent_id: RespondentId,
    ) -> Result<Vec<Answer>, StoreError> {
        let tables = self.tables.read();
        if !tables.respondents.contains_key(&respondent_id) {
            return Err(StoreError::not_found("respondent", respondent_id));
        }
        Ok(tables
            .answers
            .values()
            .filter(|a| a.respondent_id == respondent_id)
            .cloned()
            .collect())
    }

    fn allocate_answer_id(&self) -> AnswerId {
        self.next_id()
    }

    fn commit_answers(&self, answers: Vec<Answer>) -> Result<Vec<Answer>, StoreError> {
        let mut tables = self.tables.write();

        for answer in &answers {
            let respondent = tables
                .respondents
                .get(&answer.respondent_id)
                .ok_or(StoreError::not_found("respondent", answer.respondent_id))?;
            let question = tables
                .questions
                .get(&answer.question_id)
                .ok_or(StoreError::not_found("question", answer.question_id))?;
            if question.survey_id != respondent.survey_id {
                return Err(StoreError::ForeignQuestion {
                    question_id: question.id,
                    survey_id: respondent.survey_id,
                });
            }
        }

        let mut committed = Vec::with_capacity(answers.len());
        for mut answer in answers {
            tables.write_seq += 1;
            answer.write_seq = tables.write_seq;
            tables.answers.insert(answer.id, answer.clone());
            committed.push(answer);
        }
        debug!(count = committed.len(), write_seq = tables.write_seq, "Answers committed");
        Ok(committed)
    }

    fn delete_answer(&self, id: AnswerId) -> Result<Answer, StoreError> {
        self.tables
            .write()
            .answers
            .remove(&id)
            .ok_or(StoreError::not_found("answer", id))
    }
}
