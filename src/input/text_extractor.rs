//! Text extraction from various file formats

use crate::error::{Result, SmartCvError};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(SmartCvError::Io)?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            SmartCvError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await.map_err(SmartCvError::Io)?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown = fs::read_to_string(path).await.map_err(SmartCvError::Io)?;
        Ok(markdown_to_text(&markdown))
    }
}

/// Strip Markdown formatting, keeping the readable text content.
fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item) => text.push('\n'),
            _ => {}
        }
    }

    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_text_strips_formatting() {
        let markdown = "# John Doe\n\n**Software Engineer** with `Rust` experience.\n\n- React\n- Node.js\n";
        let text = markdown_to_text(markdown);

        assert!(text.contains("John Doe"));
        assert!(text.contains("Software Engineer"));
        assert!(text.contains("Rust"));
        assert!(text.contains("React"));
        assert!(!text.contains("**"));
        assert!(!text.contains("#"));
        assert!(!text.contains("`"));
    }

    #[test]
    fn test_markdown_to_text_drops_blank_lines() {
        let text = markdown_to_text("one\n\n\n\ntwo\n");
        assert_eq!(text, "one\ntwo");
    }
}
