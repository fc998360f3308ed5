use std::sync::Arc;

use proptest::prelude::*;

use super::*;
use crate::completion::{CompletionError, MockCompletionClient};
use crate::constants::{DEFAULT_LLM_RATIONALE, HEURISTIC_RATIONALE};

const GUIDELINE: &str = "must mention budget";
const BUDGET_ANSWER: &str = "We discussed budget at length and it was approved.";

fn scorer_with(client: &MockCompletionClient) -> GuidelineScorer<MockCompletionClient> {
    GuidelineScorer::new(ScoringConfig::default(), Some(Arc::new(client.clone())))
}

fn heuristic_scorer() -> GuidelineScorer<MockCompletionClient> {
    GuidelineScorer::heuristic_only(ScoringConfig::default())
}

#[tokio::test]
async fn test_heuristic_fallback_without_service() {
    let outcome = heuristic_scorer().score(BUDGET_ANSWER, Some(GUIDELINE)).await;

    // 50 trimmed characters out of 200, times a maximum of 5.
    assert_eq!(
        outcome,
        ScoreOutcome::Degraded {
            score: 1.25,
            rationale: HEURISTIC_RATIONALE.to_string(),
            reason: DegradeReason::Disabled,
        }
    );
}

#[tokio::test]
async fn test_unscored_without_text_or_guideline() {
    let scorer = heuristic_scorer();

    assert!(scorer.score("", Some(GUIDELINE)).await.is_unscored());
    assert!(scorer.score(BUDGET_ANSWER, None).await.is_unscored());
    assert!(scorer.score(BUDGET_ANSWER, Some("   ")).await.is_unscored());
    assert_eq!(ScoreOutcome::Unscored.score(), None);
    assert_eq!(ScoreOutcome::Unscored.rationale(), None);
}

#[tokio::test]
async fn test_whitespace_answer_scores_minimum() {
    let outcome = heuristic_scorer().score("    ", Some(GUIDELINE)).await;
    assert_eq!(outcome.score(), Some(0.0));
    assert!(outcome.is_degraded());
}

#[tokio::test]
async fn test_semantic_score() {
    let client = MockCompletionClient::fixed(r#"{"score": 4, "rationale": "Mentions budget."}"#);
    let outcome = scorer_with(&client).score(BUDGET_ANSWER, Some(GUIDELINE)).await;

    assert_eq!(
        outcome,
        ScoreOutcome::Scored {
            score: 4.0,
            rationale: "Mentions budget.".to_string(),
        }
    );
    let request = client.last_request().unwrap();
    assert!(request.user.contains(GUIDELINE));
    assert!(request.user.contains(BUDGET_ANSWER));
}

#[tokio::test]
async fn test_semantic_blank_rationale_gets_default() {
    let client = MockCompletionClient::fixed(r#"{"score": "3.5", "rationale": "  "}"#);
    let outcome = scorer_with(&client).score(BUDGET_ANSWER, Some(GUIDELINE)).await;

    assert_eq!(outcome.score(), Some(3.5));
    assert_eq!(outcome.rationale(), Some(DEFAULT_LLM_RATIONALE));
}

#[tokio::test]
async fn test_semantic_reply_with_leading_prose() {
    let client = MockCompletionClient::fixed(
        "Sure! Here is the grade:\n{\"score\": 1, \"rationale\": \"Off topic.\"} trailing",
    );
    let outcome = scorer_with(&client).score("unrelated", Some(GUIDELINE)).await;
    assert_eq!(outcome.score(), Some(1.0));
    assert!(!outcome.is_degraded());
}

#[tokio::test]
async fn test_every_primary_failure_degrades() {
    let cases: Vec<(MockCompletionClient, DegradeReason)> = vec![
        (MockCompletionClient::failing(), DegradeReason::Completion),
        (
            MockCompletionClient::replying(|_| {
                Err(CompletionError::Timeout {
                    elapsed: std::time::Duration::from_secs(30),
                })
            }),
            DegradeReason::Completion,
        ),
        (
            MockCompletionClient::replying(|_| Err(CompletionError::EmptyResponse)),
            DegradeReason::Completion,
        ),
        (MockCompletionClient::fixed("no json here"), DegradeReason::MalformedPayload),
        (MockCompletionClient::fixed("{\"score\": "), DegradeReason::MalformedPayload),
        (
            MockCompletionClient::fixed(r#"{"rationale": "x"}"#),
            DegradeReason::MissingField,
        ),
        (
            MockCompletionClient::fixed(r#"{"score": 3}"#),
            DegradeReason::MissingField,
        ),
        (
            MockCompletionClient::fixed(r#"{"score": "high", "rationale": "x"}"#),
            DegradeReason::InvalidScore,
        ),
        (
            MockCompletionClient::fixed(r#"{"score": 9, "rationale": "x"}"#),
            DegradeReason::InvalidScore,
        ),
        (
            MockCompletionClient::fixed(r#"{"score": -1, "rationale": "x"}"#),
            DegradeReason::InvalidScore,
        ),
        (
            MockCompletionClient::fixed(r#"{"score": "NaN", "rationale": "x"}"#),
            DegradeReason::InvalidScore,
        ),
    ];

    for (client, expected) in cases {
        let outcome = scorer_with(&client).score(BUDGET_ANSWER, Some(GUIDELINE)).await;
        assert_eq!(outcome.degrade_reason(), Some(expected), "outcome: {outcome}");
        assert_eq!(outcome.score(), Some(1.25));
        assert_eq!(outcome.rationale(), Some(HEURISTIC_RATIONALE));
    }
}

#[test]
fn test_heuristic_saturates() {
    let config = ScoringConfig::default();
    let long = "x".repeat(500);

    assert_eq!(heuristic_score(&long, &config), 5.0);
    assert_eq!(heuristic_score(&"y".repeat(100), &config), 2.5);
    assert_eq!(heuristic_score("  padded  ", &config), 6.0 / 200.0 * 5.0);
}

#[test]
fn test_heuristic_respects_custom_range() {
    let config = ScoringConfig::new(1.0, 10.0, 4.0);
    assert_eq!(heuristic_score("", &config), 1.0);
    assert_eq!(heuristic_score(&"z".repeat(400), &config), 10.0);
}

#[test]
fn test_low_quality_flag() {
    let config = ScoringConfig::default();

    assert!(config.is_low_quality(Some(1.99)));
    assert!(!config.is_low_quality(Some(2.0)));
    assert!(!config.is_low_quality(None));
}

#[test]
fn test_normalize() {
    let config = ScoringConfig::default();
    assert_eq!(config.normalize(2.5), 0.5);
    assert_eq!(config.normalize(7.0), 1.0);
    assert_eq!(ScoringConfig::new(1.0, 1.0, 1.0).normalize(1.0), 0.0);
}

#[test]
fn test_scoring_status_transitions() {
    assert_eq!(ScoringStatus::from_revisions(false, 0), ScoringStatus::Unscored);
    assert_eq!(ScoringStatus::from_revisions(false, 3), ScoringStatus::Unscored);
    assert_eq!(ScoringStatus::from_revisions(true, 1), ScoringStatus::Scored);
    assert_eq!(ScoringStatus::from_revisions(true, 2), ScoringStatus::Rescored);
    assert_eq!(ScoringStatus::Rescored.as_str(), "rescored");
}

#[test]
fn test_outcome_display() {
    let outcome = ScoreOutcome::Degraded {
        score: 1.25,
        rationale: HEURISTIC_RATIONALE.to_string(),
        reason: DegradeReason::InvalidScore,
    };
    assert_eq!(outcome.to_string(), "DEGRADED (1.25, invalid_score)");
    assert_eq!(outcome.kind(), "DEGRADED");
}

proptest! {
    #[test]
    fn prop_heuristic_within_bounds(text in ".{0,400}", min in -5.0f64..5.0, width in 0.5f64..10.0) {
        let config = ScoringConfig::new(min, min + width, min);
        let score = heuristic_score(&text, &config);
        prop_assert!(score >= config.score_min && score <= config.score_max);
    }

    #[test]
    fn prop_parsed_scores_within_bounds(raw in prop::num::f64::ANY) {
        let config = ScoringConfig::default();
        let reply = format!("{{\"score\": \"{raw}\", \"rationale\": \"r\"}}");
        if let Ok((score, _)) = parse_score_payload(&reply, &config) {
            prop_assert!(config.contains(score));
        }
    }
}

#[test]
fn test_bounds_hold_on_every_path() {
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let config = ScoringConfig::default();
    let replies = [
        r#"{"score": 5, "rationale": "ok"}"#,
        r#"{"score": 0, "rationale": "ok"}"#,
        r#"{"score": 50, "rationale": "ok"}"#,
        "garbage",
    ];

    let long = "long ".repeat(100);

    for reply in replies {
        let client = MockCompletionClient::fixed(reply);
        let scorer = GuidelineScorer::new(config, Some(Arc::new(client)));
        for text in ["", " ", "short", long.as_str()] {
            let outcome = rt.block_on(scorer.score(text, Some(GUIDELINE)));
            if let Some(score) = outcome.score() {
                assert!(config.contains(score), "{score} out of range for {reply:?}");
                assert_eq!(config.is_low_quality(Some(score)), score < 2.0);
            }
        }
    }
}
