//! Display numbering of a survey's questions.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::warn;

use super::types::RelativePosition;
use crate::store::{Question, QuestionId};

/// Display number (1-based) → question text.
pub type QuestionTextMap = BTreeMap<u32, String>;

/// Bidirectional mapping between question ids and display numbers for one survey.
///
/// Display number is `order_index + 1`. When two questions share an
/// `order_index`, the one with the lowest id keeps the number and the other is
/// left unnumbered.
#[derive(Debug, Clone, Default)]
pub struct SurveyNumbering {
    texts: QuestionTextMap,
    ids_by_number: BTreeMap<u32, QuestionId>,
    numbers_by_id: HashMap<QuestionId, u32>,
}

impl SurveyNumbering {
    pub fn from_questions<'a>(questions: impl IntoIterator<Item = &'a Question>) -> Self {
        let mut ordered: Vec<&Question> = questions.into_iter().collect();
        ordered.sort_by_key(|q| (q.order_index, q.id));

        let mut numbering = Self::default();
        for question in ordered {
            let number = question.display_number();
            if let Some(existing) = numbering.ids_by_number.get(&number) {
                warn!(
                    survey_id = question.survey_id,
                    order_index = question.order_index,
                    kept = existing,
                    dropped = question.id,
                    "Duplicate order_index; question left unnumbered"
                );
                continue;
            }
            numbering.texts.insert(number, question.text.clone());
            numbering.ids_by_number.insert(number, question.id);
            numbering.numbers_by_id.insert(question.id, number);
        }
        numbering
    }

    /// Number → text map handed to the extractor.
    pub fn texts(&self) -> &QuestionTextMap {
        &self.texts
    }

    /// Count of numbered questions.
    pub fn total(&self) -> u32 {
        self.texts.len() as u32
    }

    pub fn number_of(&self, id: QuestionId) -> Option<u32> {
        self.numbers_by_id.get(&id).copied()
    }

    pub fn id_of(&self, number: u32) -> Option<QuestionId> {
        self.ids_by_number.get(&number).copied()
    }

    /// Relative position of a question, if it is numbered.
    pub fn position_of(&self, id: QuestionId) -> Option<RelativePosition> {
        self.number_of(id)
            .map(|current| RelativePosition::new(current, self.total()))
    }

    /// Maps display numbers to question ids, skipping unknown numbers.
    pub fn ids_for(&self, numbers: &[u32]) -> BTreeSet<QuestionId> {
        numbers.iter().filter_map(|n| self.id_of(*n)).collect()
    }

    /// Maps question ids to display numbers (ascending), skipping ids that are no
    /// longer part of the survey.
    pub fn numbers_for<'a>(&self, ids: impl IntoIterator<Item = &'a QuestionId>) -> Vec<u32> {
        let numbers: BTreeSet<u32> = ids.into_iter().filter_map(|id| self.number_of(*id)).collect();
        numbers.into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
