//! Analysis report generation via the completion capability

use crate::llm::client::{Completer, CompletionError};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use log::info;
use std::sync::Arc;

/// Builds the evaluation prompt and obtains the analysis report from the
/// completion capability. The report is the raw completion text, unmodified;
/// tolerating malformed output is the score extractor's job.
pub struct ReportGenerator {
    completer: Arc<dyn Completer>,
    templates: PromptTemplates,
}

impl ReportGenerator {
    pub fn new(completer: Arc<dyn Completer>) -> Self {
        Self {
            completer,
            templates: PromptTemplates::default(),
        }
    }

    pub async fn generate(
        &self,
        resume: &str,
        job_description: &str,
    ) -> Result<String, CompletionError> {
        let params = PromptParams {
            resume: resume.to_string(),
            job_description: job_description.to_string(),
        };
        let prompt = self.templates.render_resume_analysis(&params);

        info!(
            "Requesting analysis report from model {} ({} prompt chars)",
            self.completer.model(),
            prompt.len()
        );

        self.completer.complete(&prompt).await
    }

    pub fn model(&self) -> &str {
        self.completer.model()
    }
}
