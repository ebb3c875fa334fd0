//! The value every criterion evaluator returns.

use serde::{Deserialize, Serialize};

/// Normalized score for one criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportValue {
    /// Score in `[0.0, 1.0]`
    pub ratio: f32,
    /// Human-readable explanation (may be empty)
    pub reasoning: String,
}

impl ReportValue {
    #[must_use]
    pub fn new(ratio: f32, reasoning: impl Into<String>) -> Self {
        Self {
            ratio: ratio.clamp(0.0, 1.0),
            reasoning: reasoning.into(),
        }
    }

    /// A zero score with the given reason
    #[must_use]
    pub fn failing(reasoning: impl Into<String>) -> Self {
        Self::new(0.0, reasoning)
    }

    /// `hits / total` with empty reasoning, or a zero score with
    /// `empty_reason` when `total` is zero
    #[must_use]
    pub fn from_counts(hits: usize, total: usize, empty_reason: &str) -> Self {
        if total == 0 {
            return Self::failing(empty_reason);
        }
        Self::new(ratio(hits, total), String::new())
    }

    /// Whether the criterion is fully satisfied
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        (self.ratio - 1.0).abs() < f32::EPSILON
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(hits: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        hits as f32 / total as f32
    }
}

/// `hits` as a whole percentage of `total`, rounded half away from zero.
///
/// Returns 0 when `total` is 0.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn pretty_percent(hits: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (hits as f64 / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_percent() {
        assert_eq!(pretty_percent(0, 0), 0);
        assert_eq!(pretty_percent(5, 0), 0);
        assert_eq!(pretty_percent(1, 3), 33);
        assert_eq!(pretty_percent(2, 3), 67);
        assert_eq!(pretty_percent(1, 8), 13);
        assert_eq!(pretty_percent(4, 4), 100);
    }

    #[test]
    fn test_from_counts() {
        let empty = ReportValue::from_counts(0, 0, "No packages");
        assert_eq!(empty.ratio, 0.0);
        assert_eq!(empty.reasoning, "No packages");

        let half = ReportValue::from_counts(1, 2, "No packages");
        assert!((half.ratio - 0.5).abs() < f32::EPSILON);
        assert!(half.reasoning.is_empty());
        assert!(ReportValue::from_counts(3, 3, "").is_perfect());
    }

    #[test]
    fn test_ratio_is_clamped() {
        assert_eq!(ReportValue::new(-0.4, "").ratio, 0.0);
        assert_eq!(ReportValue::new(1.5, "").ratio, 1.0);
    }
}
