//! Embedding model management: download and cache Model2Vec models

use crate::error::{Result, SmartCvError};
use hf_hub::api::tokio::Api;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files a usable Model2Vec model directory must contain.
const REQUIRED_MODEL_FILES: &[&str] = &["model.safetensors", "tokenizer.json", "config.json"];

/// Optional extras downloaded when the repo has them.
const OPTIONAL_MODEL_FILES: &[&str] = &["README.md"];

/// Information about an available embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: String,
}

/// Manager for embedding models: download, caching, and name resolution
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    catalog: HashMap<String, EmbeddingModelInfo>,
    downloaded: HashSet<String>,
    api: Api,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                SmartCvError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let api = Api::new()
            .map_err(|e| SmartCvError::ModelError(format!("Failed to initialize HF API: {}", e)))?;

        let mut manager = Self {
            models_dir,
            catalog: Self::build_catalog(),
            downloaded: HashSet::new(),
            api,
        };

        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    fn build_catalog() -> HashMap<String, EmbeddingModelInfo> {
        let mut catalog = HashMap::new();

        catalog.insert(
            "potion-base-8M".to_string(),
            EmbeddingModelInfo {
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 33,
                dimensions: 256,
                description: "High-quality Model2Vec embeddings with 8M parameters (recommended)"
                    .to_string(),
            },
        );

        catalog.insert(
            "m2v-base".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Base".to_string(),
                repo_id: "minishlab/M2V_base_output".to_string(),
                size_mb: 90,
                dimensions: 256,
                description: "Legacy Model2Vec base embeddings model".to_string(),
            },
        );

        catalog.insert(
            "m2v-large".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Large".to_string(),
                repo_id: "minishlab/M2V_large_output".to_string(),
                size_mb: 250,
                dimensions: 512,
                description: "High-capacity Model2Vec large embeddings model".to_string(),
            },
        );

        catalog
    }

    /// Scan the models directory for already downloaded models.
    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            SmartCvError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SmartCvError::ModelError(format!("Failed to read directory entry: {}", e)))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| SmartCvError::ModelError(format!("Failed to get file type: {}", e)))?
                .is_dir();

            if is_dir && Self::is_complete_model_dir(&entry.path()).await {
                let model_name = entry.file_name().to_string_lossy().to_string();
                debug!("Found downloaded embedding model: {}", model_name);
                self.downloaded.insert(model_name);
            }
        }

        Ok(())
    }

    async fn is_complete_model_dir(path: &Path) -> bool {
        for file in REQUIRED_MODEL_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Download an embedding model from the Hugging Face Hub.
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_info = self.catalog.get(model_id).ok_or_else(|| {
            SmartCvError::ModelError(format!("Unknown embedding model: {}", model_id))
        })?;

        let model_dir = self.models_dir.join(model_id);

        if self.downloaded.contains(model_id) {
            return Ok(model_dir);
        }

        println!(
            "📥 Downloading embedding model: {} ({} MB)",
            model_info.name, model_info.size_mb
        );

        fs::create_dir_all(&model_dir).await.map_err(|e| {
            SmartCvError::ModelError(format!("Failed to create model directory: {}", e))
        })?;

        let repo = self.api.repo(hf_hub::Repo::model(model_info.repo_id.clone()));

        for file in REQUIRED_MODEL_FILES {
            let file_path = repo.get(file).await.map_err(|e| {
                SmartCvError::ModelError(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&file_path, model_dir.join(file))
                .await
                .map_err(|e| SmartCvError::ModelError(format!("Failed to copy {}: {}", file, e)))?;
            println!("  ✅ Downloaded: {}", file);
        }

        for file in OPTIONAL_MODEL_FILES {
            match repo.get(file).await {
                Ok(file_path) => {
                    fs::copy(&file_path, model_dir.join(file)).await.map_err(|e| {
                        SmartCvError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                }
                Err(e) => debug!("Optional file {} not available: {}", file, e),
            }
        }

        self.downloaded.insert(model_id.to_string());

        println!("✅ Embedding model {} downloaded successfully!", model_info.name);
        Ok(model_dir)
    }

    /// Path to a downloaded model, if present.
    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        if self.downloaded.contains(model_id) {
            Some(self.models_dir.join(model_id))
        } else {
            None
        }
    }

    /// Get a model's local path, downloading it first when needed.
    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        if let Some(path) = self.get_model_path(model_id) {
            return Ok(path);
        }
        self.download_model(model_id).await
    }

    pub fn list_available_models(&self) -> Vec<&EmbeddingModelInfo> {
        let mut models: Vec<_> = self.catalog.values().collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        models
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        self.downloaded.iter().cloned().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded.contains(model_id)
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.catalog.get(model_id)
    }

    /// Remove a downloaded model from disk.
    pub async fn remove_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_dir = self.models_dir.join(model_id);
        if !self.downloaded.remove(model_id) {
            return Err(SmartCvError::ModelError(format!(
                "Model '{}' is not downloaded",
                model_id
            )));
        }
        fs::remove_dir_all(&model_dir)
            .await
            .map_err(|e| SmartCvError::ModelError(format!("Failed to remove model: {}", e)))?;
        Ok(model_dir)
    }

    /// Resolve catalog ID from an ID, repo ID, or display name.
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.catalog.contains_key(input) {
            return Some(input.to_string());
        }

        for (id, info) in &self.catalog {
            if info.repo_id == input || info.name.eq_ignore_ascii_case(input) {
                return Some(id.clone());
            }
        }

        None
    }

    /// Pick the best model to use: a downloaded one in preference order,
    /// otherwise the recommended default.
    pub fn auto_select_model(&self) -> String {
        let preferred_order = ["potion-base-8M", "m2v-base", "m2v-large"];

        for model_id in &preferred_order {
            if self.downloaded.contains(*model_id) {
                return model_id.to_string();
            }
        }

        "potion-base-8M".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_manager_creation_builds_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        assert!(!manager.list_available_models().is_empty());
        assert!(manager.list_downloaded_models().is_empty());
    }

    #[tokio::test]
    async fn test_auto_select_prefers_default_when_nothing_downloaded() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(manager.auto_select_model(), "potion-base-8M");
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(
            manager.resolve_model_id("potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(
            manager.resolve_model_id("minishlab/potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(
            manager.resolve_model_id("potion base 8m"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(manager.resolve_model_id("no-such-model"), None);
    }

    #[tokio::test]
    async fn test_scan_recognizes_complete_model_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let model_dir = temp_dir.path().join("potion-base-8M");
        std::fs::create_dir_all(&model_dir).unwrap();
        for file in REQUIRED_MODEL_FILES {
            std::fs::write(model_dir.join(file), b"stub").unwrap();
        }
        // An incomplete directory must not count as downloaded.
        std::fs::create_dir_all(temp_dir.path().join("broken-model")).unwrap();

        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        assert!(manager.is_model_downloaded("potion-base-8M"));
        assert!(!manager.is_model_downloaded("broken-model"));
        assert_eq!(manager.auto_select_model(), "potion-base-8M");
    }
}
