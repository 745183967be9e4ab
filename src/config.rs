//! Configuration management for the candidate ranker

use crate::error::{Result, RankerError};
use crate::processing::extractor::{DEFAULT_EDUCATION_KEYWORDS, DEFAULT_SKILLS};
use crate::processing::ranking::DEFAULT_WEIGHTS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub ranking: RankingConfig,
    pub extraction: ExtractionConfig,
    pub keyword: KeywordConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub embedding_backend: EmbeddingBackend,
    pub default_embedding_model: String,
    pub hashing_dimension: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    Model2Vec,
    Hashing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub required_experience_years: u32,
    /// semantic, keyword, experience, skill, education
    pub weights: Vec<f32>,
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub skills: Vec<String>,
    pub education_keywords: Vec<String>,
    pub extra_locations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub max_features: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub max_file_size_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub top_skills: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".candidate-ranker")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                embedding_backend: EmbeddingBackend::Model2Vec,
                default_embedding_model: "potion-base-8M".to_string(),
                hashing_dimension: 512,
            },
            ranking: RankingConfig {
                required_experience_years: 3,
                weights: DEFAULT_WEIGHTS.to_vec(),
                parallel: true,
            },
            extraction: ExtractionConfig {
                skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
                education_keywords: DEFAULT_EDUCATION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
                extra_locations: Vec::new(),
            },
            keyword: KeywordConfig { max_features: 1000 },
            input: InputConfig { max_file_size_mb: 50 },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                top_skills: 5,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| RankerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("candidate-ranker")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let weights = &self.ranking.weights;
        if weights.len() != 5 {
            return Err(RankerError::Configuration(format!(
                "ranking.weights must have 5 entries, got {}",
                weights.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RankerError::Configuration(
                "ranking.weights must be finite and non-negative".to_string(),
            ));
        }
        if self.keyword.max_features == 0 {
            return Err(RankerError::Configuration("keyword.max_features must be positive".to_string()));
        }
        if self.models.hashing_dimension == 0 {
            return Err(RankerError::Configuration("models.hashing_dimension must be positive".to_string()));
        }
        Ok(())
    }

    /// Weights as a fixed array, assuming `validate` passed
    pub fn weights(&self) -> Result<[f32; 5]> {
        self.ranking.weights.as_slice().try_into().map_err(|_| {
            RankerError::Configuration("ranking.weights must have 5 entries".to_string())
        })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models.models_dir
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.input.max_file_size_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ranking.required_experience_years, 3);
        assert_eq!(config.weights().unwrap(), [0.40, 0.20, 0.20, 0.15, 0.05]);
        assert_eq!(config.keyword.max_features, 1000);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ranking.required_experience_years = 7;
        config.models.embedding_backend = EmbeddingBackend::Hashing;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ranking.required_experience_years, 7);
        assert_eq!(loaded.models.embedding_backend, EmbeddingBackend::Hashing);
        assert_eq!(loaded.extraction.skills.len(), 20);
    }

    #[test]
    fn test_rejects_wrong_weight_count() {
        let mut config = Config::default();
        config.ranking.weights = vec![0.5, 0.5];
        assert!(matches!(config.validate(), Err(RankerError::Configuration(_))));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut config = Config::default();
        config.ranking.weights[2] = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert!(matches!(Config::load_from(&path), Err(RankerError::Configuration(_))));
    }
}
