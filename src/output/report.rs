//! Report persistence

use crate::error::{Result, SmartCvError};
use crate::processing::analyzer::MatchReport;
use log::info;
use std::path::Path;
use tokio::fs;

/// Write the analysis report text to disk, byte-identical to the text shown
/// to the caller.
pub async fn save_report_text(path: &Path, report_text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(path, report_text.as_bytes()).await?;
    info!(
        "Report written to {} ({} bytes)",
        path.display(),
        report_text.len()
    );
    Ok(())
}

/// Write the full match result as pretty-printed JSON.
pub async fn save_json(path: &Path, report: &MatchReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(SmartCvError::Serialization)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(path, json).await?;
    info!("JSON summary written to {}", path.display());
    Ok(())
}
