//! Download and local lookup of Model2Vec embedding models

use crate::error::{Result, RankerError};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: String,
}

/// Files a usable model directory must contain
const REQUIRED_FILES: [&str; 2] = ["tokenizer.json", "model.safetensors"];
const OPTIONAL_FILES: [&str; 2] = ["config.json", "README.md"];

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                RankerError::ModelLoading(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: Self::known_models(),
            downloaded_models: HashSet::new(),
        };
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    fn known_models() -> BTreeMap<String, EmbeddingModelInfo> {
        let mut models = BTreeMap::new();
        models.insert(
            "potion-base-8M".to_string(),
            EmbeddingModelInfo {
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 33,
                dimensions: 256,
                description: "Small static embeddings, good default for ranking".to_string(),
            },
        );
        models.insert(
            "potion-base-32M".to_string(),
            EmbeddingModelInfo {
                name: "Potion Base 32M".to_string(),
                repo_id: "minishlab/potion-base-32M".to_string(),
                size_mb: 130,
                dimensions: 512,
                description: "Larger static embeddings with better semantic recall".to_string(),
            },
        );
        models.insert(
            "m2v-base".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Base".to_string(),
                repo_id: "minishlab/M2V_base_output".to_string(),
                size_mb: 90,
                dimensions: 256,
                description: "Legacy Model2Vec base model".to_string(),
            },
        );
        models
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && Self::is_complete_model_dir(&entry.path()).await {
                self.downloaded_models.insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    async fn is_complete_model_dir(path: &Path) -> bool {
        for file in REQUIRED_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_id = self
            .resolve_model_id(model_id)
            .ok_or_else(|| RankerError::ModelNotFound(model_id.to_string()))?;
        let model_info = self.available_models[&model_id].clone();
        let model_dir = self.models_dir.join(&model_id);

        if self.downloaded_models.contains(&model_id) {
            return Ok(model_dir);
        }

        info!("Downloading embedding model {} from {}", model_info.name, model_info.repo_id);
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new().map_err(|e| RankerError::ModelLoading(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model_info.repo_id.clone());

        for file in REQUIRED_FILES {
            let cached = repo
                .get(file)
                .await
                .map_err(|e| RankerError::ModelLoading(format!("Failed to download required file {}: {}", file, e)))?;
            fs::copy(&cached, model_dir.join(file)).await?;
            info!("Downloaded {}", file);
        }

        for file in OPTIONAL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await?;
                }
                Err(e) => warn!("Optional file {} not available: {}", file, e),
            }
        }

        self.downloaded_models.insert(model_id);
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        let model_id = self.resolve_model_id(model_id).unwrap_or_else(|| model_id.to_string());
        self.downloaded_models
            .contains(&model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        match self.get_model_path(model_id) {
            Some(path) => Ok(path),
            None => self.download_model(model_id).await,
        }
    }

    pub fn list_available_models(&self) -> Vec<(&String, &EmbeddingModelInfo)> {
        self.available_models.iter().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.get_model_path(model_id).is_some()
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.resolve_model_id(model_id)
            .and_then(|id| self.available_models.get(&id))
    }

    /// Accepts a model id, a repo id, or a display name (case-insensitive)
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|(_, info)| info.repo_id == input || info.name.to_lowercase() == input_lower)
            .map(|(id, _)| id.clone())
    }
}
