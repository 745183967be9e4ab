//! Embedding capability: Model2Vec static embeddings and a feature-hashing fallback

use crate::error::{Result, RankerError};
use log::{debug, info, warn};
use model2vec_rs::model::StaticModel;
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use unicode_segmentation::UnicodeSegmentation;

/// Dense text encoder.
///
/// Must be deterministic for identical input within a process lifetime and
/// safe to share between candidate computations.
pub trait Embedder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    fn name(&self) -> &str;

    fn dimension(&self) -> usize;
}

/// Model2Vec static embedding model with an in-memory cache.
///
/// The cache is keyed on the full input text, lives as long as the embedder
/// and is never evicted. It is sized for one CLI run, not a long-lived service.
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
    dimension: usize,
    cache: Mutex<HashMap<String, Vec<f32>>>,
}

impl Model2VecEmbedder {
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(RankerError::ModelNotFound(format!(
                "{} (expected at {})",
                model_name,
                model_path.display()
            )));
        }

        let model = StaticModel::from_pretrained(model_path, None, None, None)?;
        let dimension = model.encode_single("dimension probe").len();

        info!("Model loaded in {:.2?} ({} dimensions)", start_time.elapsed(), dimension);

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            dimension,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn cache_size(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Embedder for Model2VecEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(cached) = cache.get(text) {
                return Ok(cached.clone());
            }
        }

        let embedding = self.model.encode_single(text);
        if embedding.len() != self.dimension {
            return Err(RankerError::Embedding(format!(
                "Model returned {} dimensions, expected {}",
                embedding.len(),
                self.dimension
            )));
        }

        match self.cache.lock() {
            Ok(mut cache) => {
                cache.insert(text.to_string(), embedding.clone());
            }
            Err(_) => warn!("Embedding cache lock poisoned, skipping cache insert"),
        }

        Ok(embedding)
    }

    fn name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

const HASH_SEED_K0: u64 = 0x0123_4567_89ab_cdef;
const HASH_SEED_K1: u64 = 0xfedc_ba98_7654_3210;

/// Deterministic bag-of-words embedding via feature hashing.
///
/// Needs no model files. Counts are non-negative, so cosine similarity between
/// two hashed documents never drops below zero.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        (hasher.finish() % self.dimension as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(512)
    }
}

impl Embedder for HashingEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text.unicode_words() {
            let token = word.to_lowercase();
            if token.chars().count() < 2 {
                continue;
            }
            vector[self.bucket(&token)] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }

    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Raw cosine similarity in [-1, 1]; 0.0 for empty or zero-norm vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RankerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Semantic similarity of job and resume, clamped to [0, 1].
///
/// Capability failures degrade to 0.0.
pub fn semantic_similarity(embedder: &dyn Embedder, job: &str, resume: &str) -> f32 {
    let score = embedder
        .encode(job)
        .and_then(|job_embedding| {
            let resume_embedding = embedder.encode(resume)?;
            cosine_similarity(&job_embedding, &resume_embedding)
        });

    match score {
        Ok(score) if score.is_finite() => {
            if score < 0.0 {
                debug!("Negative cosine similarity {:.4} clamped to 0", score);
            }
            score.clamp(0.0, 1.0)
        }
        Ok(score) => {
            warn!("Non-finite semantic similarity {} replaced with 0", score);
            0.0
        }
        Err(e) => {
            warn!("Embedder '{}' failed, semantic score set to 0: {}", embedder.name(), e);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEmbedder(Vec<f32>);

    impl Embedder for FixedEmbedder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            if text.is_empty() {
                Ok(self.0.iter().map(|x| -x).collect())
            } else {
                Ok(self.0.clone())
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn dimension(&self) -> usize {
            self.0.len()
        }
    }

    struct BrokenEmbedder;

    impl Embedder for BrokenEmbedder {
        fn encode(&self, _text: &str) -> Result<Vec<f32>> {
            Err(RankerError::Embedding("service unavailable".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }

        fn dimension(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_hashing_embedder_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(64);
        let a = embedder.encode("Rust systems programming").unwrap();
        let b = embedder.encode("Rust systems programming").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashing_embedder_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(16);
        assert!(embedder.encode("").unwrap().iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_semantic_similarity_orders_related_text_higher() {
        let embedder = HashingEmbedder::default();
        let job = "python machine learning engineer tensorflow";
        let close = semantic_similarity(&embedder, job, "machine learning engineer using python and tensorflow");
        let far = semantic_similarity(&embedder, job, "barista coffee latte espresso");

        assert!(close > far);
        assert!((0.0..=1.0).contains(&close));
        assert!((0.0..=1.0).contains(&far));
    }

    #[test]
    fn test_semantic_similarity_clamps_negative_cosine() {
        let embedder = FixedEmbedder(vec![1.0, 2.0]);
        assert_eq!(semantic_similarity(&embedder, "job", ""), 0.0);
        assert!((semantic_similarity(&embedder, "job", "resume") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_semantic_similarity_embedder_failure_is_zero() {
        assert_eq!(semantic_similarity(&BrokenEmbedder, "job", "resume"), 0.0);
    }
}
