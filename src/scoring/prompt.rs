//! Grading prompt.

use super::config::ScoringConfig;
use crate::completion::CompletionRequest;

/// Builds the grading request for one answer (or assembled scoring context).
pub fn build_score_request(text: &str, guideline: &str, config: &ScoringConfig) -> CompletionRequest {
    let (min, max) = (config.score_min, config.score_max);

    let system = format!(
        "You are a strict grader. Output ONLY JSON: \
         {{\"score\": number, \"rationale\": string}}. \
         The score MUST be a real number in [{min},{max}]. \
         Use {min} for off-topic/empty/contradictory answers; \
         ≈1 for poor; ≈3 for partial; ≈4 for good; {max} for perfect and fully aligned. \
         If the answer does not meet the guideline at all, you MUST use 0 or 1."
    );

    let user = format!(
        "You are an impartial grader. Score the candidate's answer strictly \
         against the provided guideline. Return a JSON object with fields:\n\
         \x20 - score: number in [{min},{max}]\n\
         \x20 - rationale: 1-3 concise sentences referencing the guideline.\n\
         Do not include anything except valid JSON.\n\n\
         GUIDELINE:\n{guideline}\n\n\
         ANSWER:\n{text}\n"
    );

    CompletionRequest::new(system, user)
}
