use crate::constants::WARNING_SEPARATOR;

/// Where the answer being analysed sits in its survey.
///
/// Relative phrases ("previous", "next", "the last question") are only resolved
/// when both values are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativePosition {
    /// 1-based display number of the answer's own question.
    pub current: u32,
    /// Number of questions in the survey.
    pub total: u32,
}

impl RelativePosition {
    pub fn new(current: u32, total: u32) -> Self {
        Self { current, total }
    }

    /// Returns a position only when both parts are present.
    pub fn from_parts(current: Option<u32>, total: Option<u32>) -> Option<Self> {
        Some(Self::new(current?, total?))
    }
}

/// Outcome of reference extraction for one answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceExtraction {
    /// Valid referenced display numbers, ascending, no duplicates.
    pub numbers: Vec<u32>,
    /// Non-fatal warnings in detection order.
    pub warnings: Vec<String>,
}

impl ReferenceExtraction {
    /// Warnings joined with `"; "` (empty string when there are none).
    pub fn warning(&self) -> String {
        self.warnings.join(WARNING_SEPARATOR)
    }

    /// Joined warning, or `None` when there is nothing to report.
    pub fn warning_opt(&self) -> Option<String> {
        if self.warnings.is_empty() {
            None
        } else {
            Some(self.warning())
        }
    }

    pub fn references(&self, number: u32) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}
