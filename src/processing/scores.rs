//! Category score extraction from analysis report text

use crate::error::{Result, SmartCvError};
use regex::Regex;

/// Extracts "N/5" category scores from free-text analysis reports.
///
/// The pattern is a versioned contract with the report prompt: an integer or
/// decimal immediately followed by "/5", anywhere in the text. Widening it
/// changes the numeric semantics of the aggregate, so don't.
pub struct ScoreExtractor {
    pattern: Regex,
}

impl ScoreExtractor {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"(\d+(?:\.\d+)?)/5")
            .map_err(|e| SmartCvError::Configuration(format!("Invalid score pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    /// All matched scores in order of first appearance in the text.
    ///
    /// The final "Overall AI Score" line matches the same pattern and is
    /// captured as one more sample; aggregation does not exclude it.
    /// Values are not range-clamped.
    pub fn extract_scores(&self, report: &str) -> Vec<f32> {
        self.pattern
            .captures_iter(report)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().parse::<f32>().ok())
            .collect()
    }

    /// Normalized average of the scores: sum / (5 * count), in [0, 1] when
    /// every score is within [0, 5]. Fails on an empty sequence instead of
    /// dividing by zero.
    pub fn aggregate(&self, scores: &[f32]) -> Result<f32> {
        if scores.is_empty() {
            return Err(SmartCvError::NoScoresFound);
        }

        let sum: f32 = scores.iter().sum();
        Ok(sum / (5.0 * scores.len() as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_scores_in_order() {
        let extractor = ScoreExtractor::new().unwrap();
        let scores = extractor.extract_scores("Score: 4/5 and 3.5/5");
        assert_eq!(scores, vec![4.0, 3.5]);
    }

    #[test]
    fn test_extract_scores_empty_when_no_matches() {
        let extractor = ScoreExtractor::new().unwrap();
        assert!(extractor.extract_scores("no scores here").is_empty());
    }

    #[test]
    fn test_extract_ignores_non_numeric_scores() {
        let extractor = ScoreExtractor::new().unwrap();
        let scores = extractor.extract_scores("Score: five/5, but also 2/5");
        assert_eq!(scores, vec![2.0]);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = ScoreExtractor::new().unwrap();
        let report = "Skills Match: 4/5\nExperience Relevance: 2.5/5\nOverall AI Score: 3/5";
        let first = extractor.extract_scores(report);
        let second = extractor.extract_scores(report);
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_full_report() {
        let extractor = ScoreExtractor::new().unwrap();
        let report = "\
1. Skills Match: 4/5
Strong alignment with the required stack.
2. Experience Relevance: 2/5
3. Educational Background: 5/5
4. Certifications or Courses: 3/5
5. Projects or Contributions: 4.5/5
6. Overall Presentation & Formatting: 3/5
Overall AI Score: 3.75/5";

        let scores = extractor.extract_scores(report);
        assert_eq!(scores.len(), 7);
        assert_eq!(scores, vec![4.0, 2.0, 5.0, 3.0, 4.5, 3.0, 3.75]);
    }

    #[test]
    fn test_aggregate_empty_fails() {
        let extractor = ScoreExtractor::new().unwrap();
        let result = extractor.aggregate(&[]);
        assert!(matches!(result, Err(SmartCvError::NoScoresFound)));
    }

    #[test]
    fn test_aggregate_full_marks() {
        let extractor = ScoreExtractor::new().unwrap();
        let avg = extractor.aggregate(&[5.0, 5.0]).unwrap();
        assert!((avg - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_aggregate_half_marks() {
        let extractor = ScoreExtractor::new().unwrap();
        let avg = extractor.aggregate(&[0.0, 5.0]).unwrap();
        assert!((avg - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_aggregate_does_not_clamp_out_of_range() {
        let extractor = ScoreExtractor::new().unwrap();
        // A model mistake like "7/5" passes through as-is.
        let avg = extractor.aggregate(&[7.0]).unwrap();
        assert!((avg - 1.4).abs() < 1e-6);
    }
}
