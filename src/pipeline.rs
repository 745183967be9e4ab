//! Assembles the ranking engine and its capabilities from configuration

use crate::config::{Config, EmbeddingBackend};
use crate::error::Result;
use crate::processing::embedding_manager::EmbeddingModelManager;
use crate::processing::embeddings::{Embedder, HashingEmbedder, Model2VecEmbedder};
use crate::processing::extractor::EntityExtractor;
use crate::processing::features::FeatureBuilder;
use crate::processing::ner::PatternRecognizer;
use crate::processing::ranking::{LinearPolicy, RankingEngine};
use log::{info, warn};
use std::sync::Arc;

pub fn build_extractor(config: &Config) -> Result<EntityExtractor> {
    let recognizer = PatternRecognizer::with_locations(config.extraction.extra_locations.clone())?;
    EntityExtractor::with_vocabularies(
        Arc::new(recognizer),
        config.extraction.skills.clone(),
        config.extraction.education_keywords.clone(),
    )
}

/// Model2Vec when available, otherwise the hashing embedder
pub async fn build_embedder(config: &Config, backend: EmbeddingBackend) -> Arc<dyn Embedder> {
    let hashing = || -> Arc<dyn Embedder> { Arc::new(HashingEmbedder::new(config.models.hashing_dimension)) };

    match backend {
        EmbeddingBackend::Hashing => hashing(),
        EmbeddingBackend::Model2Vec => match load_model2vec(config).await {
            Ok(embedder) => Arc::new(embedder),
            Err(e) => {
                warn!("Model2Vec embedder unavailable ({}), falling back to hashing embeddings", e);
                hashing()
            }
        },
    }
}

async fn load_model2vec(config: &Config) -> Result<Model2VecEmbedder> {
    let model_id = &config.models.default_embedding_model;
    let mut manager = EmbeddingModelManager::new(config.models_dir().to_path_buf()).await?;
    let model_path = manager.ensure_model_available(model_id).await?;
    Model2VecEmbedder::load(&model_path, model_id)
}

pub fn build_engine(config: &Config, extractor: EntityExtractor, embedder: Arc<dyn Embedder>) -> Result<RankingEngine> {
    let weights = config.weights()?;
    info!(
        "Building ranking engine (embedder: {}, weights: {:?}, parallel: {})",
        embedder.name(),
        weights,
        config.ranking.parallel
    );

    let builder = FeatureBuilder::new(Arc::new(extractor), embedder, config.keyword.max_features);
    Ok(RankingEngine::with_policy(builder, Arc::new(LinearPolicy::new(weights))).parallel(config.ranking.parallel))
}

/// Full engine for `backend`, falling back to hashing embeddings when needed
pub async fn engine_from_config(config: &Config, backend: EmbeddingBackend) -> Result<RankingEngine> {
    let extractor = build_extractor(config)?;
    let embedder = build_embedder(config, backend).await;
    build_engine(config, extractor, embedder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::{Candidate, Document};

    #[tokio::test]
    async fn test_hashing_engine_from_default_config() {
        let mut config = Config::default();
        config.models.hashing_dimension = 64;
        config.ranking.parallel = false;

        let engine = engine_from_config(&config, EmbeddingBackend::Hashing).await.unwrap();
        assert_eq!(engine.builder().embedder().name(), "hashing");
        assert_eq!(engine.builder().embedder().dimension(), 64);

        let result = engine.rank(&Document::job("Python developer"), vec![Candidate::new(1, "A", "Python")], 3);
        assert_eq!(result.policy, "linear");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_extractor_uses_configured_vocabulary() {
        let mut config = Config::default();
        config.extraction.skills = vec!["Rust".to_string(), "Tokio".to_string()];
        config.extraction.extra_locations = vec!["Tallinn".to_string()];

        let extractor = build_extractor(&config).unwrap();
        let entities = extractor.extract("Rust and Tokio services, based in Tallinn");
        assert_eq!(entities.skills, vec!["rust".to_string(), "tokio".to_string()]);
        assert!(entities.locations.contains(&"Tallinn".to_string()));
    }

    #[test]
    fn test_invalid_weights_are_rejected() {
        let mut config = Config::default();
        config.ranking.weights = vec![1.0, 0.0];
        let extractor = build_extractor(&config).unwrap();
        let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::default());
        assert!(build_engine(&config, extractor, embedder).is_err());
    }
}
