use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::QuestionId;

/// Guideline text per question for the survey being graded.
pub type GuidelineMap = BTreeMap<QuestionId, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// What one cascade run did.
pub struct CascadeReport {
    /// Question whose answer changed.
    pub changed_question_id: QuestionId,
    /// Sibling answers considered.
    pub examined: usize,
    /// Dependents found through the cached references alone.
    pub cache_hits: usize,
    /// Siblings whose references were re-extracted.
    pub rederived: usize,
    /// Questions whose answers were rescored, ascending.
    pub rescored: Vec<QuestionId>,
}

impl CascadeReport {
    pub fn new(changed_question_id: QuestionId) -> Self {
        Self {
            changed_question_id,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rescored.is_empty()
    }
}
