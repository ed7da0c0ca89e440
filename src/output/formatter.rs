//! Console presentation of match results

use crate::processing::analyzer::{MatchReport, Stage};
use colored::Colorize;

/// Console formatter with colors and an optional category breakdown.
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        // colored honors NO_COLOR itself; this switch covers config/flags.
        if !use_colors {
            colored::control::set_override(false);
        }
        Self {
            use_colors,
            detailed,
        }
    }

    pub fn format(&self, report: &MatchReport) -> String {
        let mut out = String::new();

        out.push_str("\n📊 Match Results\n");

        match &report.similarity {
            Some(similarity) => {
                out.push_str(&format!(
                    "  • Similarity Score (ATS-style): {}\n",
                    self.colorize_score(similarity.score)
                ));
            }
            None => {
                out.push_str("  • Similarity Score: unavailable\n");
            }
        }

        match report.aggregate_score {
            Some(aggregate) => {
                out.push_str(&format!(
                    "  • AI Report Score: {}\n",
                    self.colorize_score(aggregate)
                ));
            }
            None => {
                out.push_str("  • AI Report Score: unavailable\n");
            }
        }

        if self.detailed && !report.category_scores.is_empty() {
            let scores: Vec<String> = report
                .category_scores
                .iter()
                .map(|s| format!("{}/5", s))
                .collect();
            out.push_str(&format!(
                "  • Category scores (in report order): {}\n",
                scores.join(", ")
            ));
        }

        if !report.resume_extraction_ok {
            out.push_str("\n⚠️  Resume text could not be extracted; results are based on placeholder text.\n");
        }

        for failure in &report.failures {
            let stage = match failure.stage {
                Stage::Similarity => "similarity",
                Stage::Report => "report generation",
                Stage::Aggregate => "score aggregation",
            };
            out.push_str(&format!("⚠️  {} failed: {}\n", stage, failure.message));
        }

        if let Some(text) = &report.report {
            out.push_str("\n📄 AI Generated Analysis Report:\n\n");
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }

        out
    }

    fn colorize_score(&self, score: f32) -> String {
        let formatted = format!("{:.3}", score);
        if !self.use_colors {
            return formatted;
        }
        if score >= 0.7 {
            formatted.green().bold().to_string()
        } else if score >= 0.4 {
            formatted.yellow().bold().to_string()
        } else {
            formatted.red().bold().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::{BranchFailure, ModelInfo};
    use crate::processing::embeddings::SimilarityScore;
    use chrono::Utc;

    fn sample_report() -> MatchReport {
        MatchReport {
            similarity: Some(SimilarityScore {
                score: 0.82,
                embedding_dim: 256,
            }),
            report: Some("Skills Match: 4/5\nOverall AI Score: 4/5".to_string()),
            category_scores: vec![4.0, 4.0],
            aggregate_score: Some(0.8),
            resume_extraction_ok: true,
            failures: Vec::new(),
            generated_at: Utc::now(),
            processing_time_ms: 1200,
            model_info: ModelInfo {
                embedding_model: Some("potion-base-8M".to_string()),
                llm_model: "llama-3.3-70b-versatile".to_string(),
            },
        }
    }

    #[test]
    fn test_format_contains_scores_and_report() {
        let formatter = ConsoleFormatter::new(false, false);
        let output = formatter.format(&sample_report());

        assert!(output.contains("0.820"));
        assert!(output.contains("0.800"));
        assert!(output.contains("Skills Match: 4/5"));
    }

    #[test]
    fn test_format_detailed_lists_category_scores() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format(&sample_report());

        assert!(output.contains("4/5, 4/5"));
    }

    #[test]
    fn test_format_surfaces_branch_failures() {
        let formatter = ConsoleFormatter::new(false, false);
        let mut report = sample_report();
        report.report = None;
        report.aggregate_score = None;
        report.category_scores.clear();
        report.failures.push(BranchFailure {
            stage: Stage::Report,
            message: "API error (status 429): rate limit exceeded".to_string(),
        });

        let output = formatter.format(&report);

        assert!(output.contains("report generation failed"));
        assert!(output.contains("429"));
        assert!(output.contains("unavailable"));
    }

    #[test]
    fn test_format_flags_placeholder_resume() {
        let formatter = ConsoleFormatter::new(false, false);
        let mut report = sample_report();
        report.resume_extraction_ok = false;

        let output = formatter.format(&report);

        assert!(output.contains("placeholder"));
    }
}
