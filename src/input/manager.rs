//! Input manager for handling different file types

use crate::error::{Result, SmartCvError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

/// Placeholder substituted when resume extraction fails. The pipeline keeps
/// running with this text instead of aborting.
pub const EXTRACTION_PLACEHOLDER: &str = "Could not extract text from the PDF file.";

/// Text produced by extraction, with a flag telling whether extraction
/// actually succeeded or the placeholder was substituted.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub ok: bool,
}

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract text from a file, failing on unreadable or unsupported input.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(SmartCvError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = self.detect_file_type(path)?;

        let text = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(SmartCvError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Extract resume text, degrading to [`EXTRACTION_PLACEHOLDER`] instead
    /// of failing. The `ok` flag records whether extraction succeeded.
    pub async fn extract_resume_text(&mut self, path: &Path) -> ExtractedText {
        match self.extract_text(path).await {
            Ok(text) => ExtractedText { text, ok: true },
            Err(e) => {
                warn!("Resume extraction failed, continuing with placeholder: {}", e);
                ExtractedText {
                    text: EXTRACTION_PLACEHOLDER.to_string(),
                    ok: false,
                }
            }
        }
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
            SmartCvError::InvalidInput(format!("File has no extension: {}", path.display()))
        })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
