//! Error handling for the smartcv application

use crate::llm::client::CompletionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmartCvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Embedding model unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Report generation failed: {0}")]
    ReportGeneration(#[from] CompletionError),

    #[error("no category scores found in report")]
    NoScoresFound,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SmartCvError>;
