//! Match engine combining embedding similarity and LLM report scoring

use crate::error::{Result, SmartCvError};
use crate::input::manager::ExtractedText;
use crate::llm::client::Completer;
use crate::llm::generator::ReportGenerator;
use crate::processing::embeddings::{self, Embedder, SimilarityScore};
use crate::processing::scores::ScoreExtractor;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Coordinates one analysis run: similarity scoring and report generation
/// run concurrently, then category scores are extracted from the report.
///
/// Holds only read-only capability handles; every [`MatchEngine::analyze`]
/// call is an independent computation with no state carried between runs.
pub struct MatchEngine {
    embedder: Option<Arc<dyn Embedder>>,
    report_generator: ReportGenerator,
    score_extractor: ScoreExtractor,
    model_info: ModelInfo,
}

/// Result of one analysis run. Each sub-result is independent: a failure in
/// one branch nulls only that branch and is recorded in `failures`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Embedding similarity of resume and job description
    pub similarity: Option<SimilarityScore>,

    /// Raw AI-generated analysis report text
    pub report: Option<String>,

    /// Category scores in order of appearance in the report
    pub category_scores: Vec<f32>,

    /// Normalized average of the category scores, in [0, 1]
    pub aggregate_score: Option<f32>,

    /// False when resume extraction degraded to the placeholder text
    pub resume_extraction_ok: bool,

    /// Failures scoped to individual sub-results
    pub failures: Vec<BranchFailure>,

    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub model_info: ModelInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchFailure {
    pub stage: Stage,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Similarity,
    Report,
    Aggregate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub embedding_model: Option<String>,
    pub llm_model: String,
}

impl MatchReport {
    /// True when no sub-result was produced at all.
    pub fn is_empty(&self) -> bool {
        self.similarity.is_none() && self.report.is_none()
    }
}

impl MatchEngine {
    /// Build an engine from capability handles. `embedder` is `None` when
    /// the embedding model could not be loaded; report generation still
    /// runs and only the similarity branch is marked failed.
    pub fn new(embedder: Option<Arc<dyn Embedder>>, completer: Arc<dyn Completer>) -> Result<Self> {
        let model_info = ModelInfo {
            embedding_model: embedder.as_ref().map(|e| e.model_name().to_string()),
            llm_model: completer.model().to_string(),
        };

        Ok(Self {
            embedder,
            report_generator: ReportGenerator::new(completer),
            score_extractor: ScoreExtractor::new()?,
            model_info,
        })
    }

    /// Run the full analysis. Similarity and report generation are
    /// logically independent and run concurrently; score extraction runs
    /// once the report is available.
    pub async fn analyze(&self, resume: &ExtractedText, job_description: &str) -> MatchReport {
        let start_time = Instant::now();
        let mut failures = Vec::new();

        if !resume.ok {
            warn!("Analyzing with placeholder resume text; extraction failed upstream");
        }

        let report_future = self.report_generator.generate(&resume.text, job_description);

        let (similarity_result, report_result) = match &self.embedder {
            Some(embedder) => {
                // Encoding is CPU-bound; keep it off the async executor.
                let embedder = Arc::clone(embedder);
                let resume_text = resume.text.clone();
                let job_text = job_description.to_string();
                let similarity_task = tokio::task::spawn_blocking(move || {
                    embeddings::similarity(embedder.as_ref(), &resume_text, &job_text)
                });

                let (joined, report_result) = tokio::join!(similarity_task, report_future);
                let similarity_result = joined.unwrap_or_else(|e| {
                    Err(SmartCvError::Embedding(format!(
                        "Similarity task aborted: {}",
                        e
                    )))
                });
                (Some(similarity_result), report_result)
            }
            None => (None, report_future.await),
        };

        let similarity = match similarity_result {
            Some(Ok(score)) => Some(score),
            Some(Err(e)) => {
                warn!("Similarity computation failed: {}", e);
                failures.push(BranchFailure {
                    stage: Stage::Similarity,
                    message: e.to_string(),
                });
                None
            }
            None => {
                failures.push(BranchFailure {
                    stage: Stage::Similarity,
                    message: "embedding model unavailable".to_string(),
                });
                None
            }
        };

        let report = match report_result {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Report generation failed: {}", e);
                failures.push(BranchFailure {
                    stage: Stage::Report,
                    message: e.to_string(),
                });
                None
            }
        };

        let (category_scores, aggregate_score) = match &report {
            Some(text) => {
                let scores = self.score_extractor.extract_scores(text);
                match self.score_extractor.aggregate(&scores) {
                    Ok(average) => (scores, Some(average)),
                    Err(e) => {
                        warn!("Score aggregation failed: {}", e);
                        failures.push(BranchFailure {
                            stage: Stage::Aggregate,
                            message: e.to_string(),
                        });
                        (scores, None)
                    }
                }
            }
            None => (Vec::new(), None),
        };

        MatchReport {
            similarity,
            report,
            category_scores,
            aggregate_score,
            resume_extraction_ok: resume.ok,
            failures,
            generated_at: Utc::now(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
            model_info: self.model_info.clone(),
        }
    }
}
