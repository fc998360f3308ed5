//! Compiled reference patterns and the pure detection passes.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::numbering::QuestionTextMap;
use super::types::{ReferenceExtraction, RelativePosition};

/// "question 3", "q3", "Q 3", "ques 3".
static ABSOLUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bq(?:uestion)?\s*|ques\s*)([0-9]+)\b").expect("absolute pattern")
});

static ORDINAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)\b")
        .expect("ordinal pattern")
});

// "last" alone never means "previous"; only "last question" resolves (to the final one).
static PREVIOUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:prev(?:ious)?|prior|earlier|above)\b").expect("previous pattern")
});

static NEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:next|following|below|later)\b").expect("next pattern")
});

static LAST_QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:the\s+)?last\s+question\b").expect("last-question pattern")
});

static FIRST_QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:the\s+)?first\s+question\b").expect("first-question pattern")
});

/// Words vague enough that the semantic resolver should take a look.
static VAGUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:previous|prior|earlier|above|next|following|below|later|last|first)\b")
        .expect("vague pattern")
});

pub const NO_PREVIOUS_WARNING: &str =
    "Referenced previous question but there is no previous question.";
pub const NO_NEXT_WARNING: &str = "Referenced next question but there is no next question.";

fn ordinal_value(word: &str) -> Option<u32> {
    let value = match word.to_ascii_lowercase().as_str() {
        "first" => 1,
        "second" => 2,
        "third" => 3,
        "fourth" => 4,
        "fifth" => 5,
        "sixth" => 6,
        "seventh" => 7,
        "eighth" => 8,
        "ninth" => 9,
        "tenth" => 10,
        _ => return None,
    };
    Some(value)
}

/// Candidates gathered by the pattern passes, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternScan {
    pub candidates: BTreeSet<u32>,
    /// Absolute numbers too large for a question number; always invalid.
    pub oversized: BTreeSet<String>,
    pub warnings: Vec<String>,
    /// Text contains a relative/ordinal word worth a semantic second opinion.
    pub vague: bool,
}

impl PatternScan {
    /// Whether the semantic pass should run for this text.
    pub fn wants_refinement(&self) -> bool {
        self.vague || self.candidates.is_empty()
    }

    /// Splits candidates into valid numbers and a non-existent warning.
    pub fn finish(self, questions: &QuestionTextMap) -> ReferenceExtraction {
        let Self {
            candidates,
            oversized,
            mut warnings,
            ..
        } = self;

        let (numbers, invalid): (Vec<u32>, Vec<u32>) = candidates
            .into_iter()
            .partition(|n| questions.contains_key(n));

        let invalid: Vec<String> = invalid
            .iter()
            .map(u32::to_string)
            .chain(oversized)
            .collect();
        if !invalid.is_empty() {
            warnings.push(format!(
                "Referenced non-existent question(s): [{}]",
                invalid.join(", ")
            ));
        }

        ReferenceExtraction { numbers, warnings }
    }
}

/// Runs the absolute, ordinal and relative passes over `text`.
pub fn scan(text: &str, position: Option<RelativePosition>) -> PatternScan {
    let mut scan = PatternScan::default();

    for caps in ABSOLUTE_RE.captures_iter(text) {
        let Some(digits) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        match digits.parse::<u32>() {
            Ok(n) => {
                scan.candidates.insert(n);
            }
            Err(_) => {
                let trimmed = digits.trim_start_matches('0');
                scan.oversized.insert(trimmed.to_string());
            }
        }
    }

    for m in ORDINAL_RE.find_iter(text) {
        if let Some(n) = ordinal_value(m.as_str()) {
            scan.candidates.insert(n);
        }
    }

    if let Some(RelativePosition { current, total }) = position {
        if PREVIOUS_RE.is_match(text) {
            match current.checked_sub(1).filter(|n| *n >= 1) {
                Some(n) => {
                    scan.candidates.insert(n);
                }
                None => scan.warnings.push(NO_PREVIOUS_WARNING.to_string()),
            }
        }

        if NEXT_RE.is_match(text) {
            let n = current.saturating_add(1);
            if n <= total {
                scan.candidates.insert(n);
            } else {
                scan.warnings.push(NO_NEXT_WARNING.to_string());
            }
        }

        if LAST_QUESTION_RE.is_match(text) && total >= 1 {
            scan.candidates.insert(total);
        }

        if FIRST_QUESTION_RE.is_match(text) {
            scan.candidates.insert(1);
        }
    }

    scan.vague = VAGUE_RE.is_match(text);
    scan
}
