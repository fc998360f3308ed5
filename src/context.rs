//! Scoring context assembly.
//!
//! When an answer refers to other questions, the text handed to the scorer is
//! the primary answer followed by each referenced answer, in ascending display
//! number order:
//!
//! ```text
//! PRIMARY ANSWER:
//! see Q1
//!
//! REFERENCED ANSWER Q1:
//! good
//! ```
//!
//! A referenced question the respondent has not answered still gets a section,
//! with [`NO_ANSWER_PLACEHOLDER`] as its body. An answer without references is
//! scored on its own text verbatim.

use std::fmt::Write;

use crate::constants::NO_ANSWER_PLACEHOLDER;
use crate::store::RespondentId;

/// Source of a respondent's stored answers, addressed by display number.
pub trait ReferencedAnswers {
    fn answer_text(&self, respondent_id: RespondentId, number: u32) -> Option<&str>;
}

/// Builds the text scored for an answer.
///
/// With references the result is a `PRIMARY ANSWER:` section followed by one
/// `REFERENCED ANSWER Q<n>:` section per distinct number, ascending. Without
/// references the primary text is returned as is, with no section header, so
/// an unreferenced answer is scored on exactly what the respondent wrote.
///
/// `referenced_numbers` need not be sorted or unique.
pub fn build_scoring_context<L: ReferencedAnswers + ?Sized>(
    primary_text: &str,
    respondent_id: RespondentId,
    referenced_numbers: &[u32],
    lookup: &L,
) -> String {
    if referenced_numbers.is_empty() {
        return primary_text.to_string();
    }

    let mut numbers = referenced_numbers.to_vec();
    numbers.sort_unstable();
    numbers.dedup();

    let mut context = format!("PRIMARY ANSWER:\n{primary_text}\n");
    for number in numbers {
        let body = lookup
            .answer_text(respondent_id, number)
            .unwrap_or(NO_ANSWER_PLACEHOLDER);
        let _ = write!(context, "\nREFERENCED ANSWER Q{number}:\n{body}\n");
    }
    context
}
