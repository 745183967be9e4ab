//! Ranking engine: feature vectors to an ordered candidate list

use crate::processing::document::{Candidate, Document, EntitySet};
use crate::processing::features::{FeatureBuilder, PairFeatures, FeatureVector};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// semantic, keyword, experience, skill, education
pub const DEFAULT_WEIGHTS: [f32; 5] = [0.40, 0.20, 0.20, 0.15, 0.05];

/// Turns a feature vector into a single comparable score.
///
/// The linear policy is the default; a trained ranking model plugs in here
/// without touching feature extraction.
pub trait ScoringPolicy: Send + Sync {
    fn score(&self, features: &FeatureVector) -> f32;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPolicy {
    weights: [f32; 5],
}

impl LinearPolicy {
    pub fn new(weights: [f32; 5]) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> [f32; 5] {
        self.weights
    }
}

impl Default for LinearPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHTS)
    }
}

impl ScoringPolicy for LinearPolicy {
    fn score(&self, features: &FeatureVector) -> f32 {
        features
            .to_array()
            .iter()
            .zip(self.weights.iter())
            .map(|(value, weight)| value * weight)
            .sum()
    }

    fn name(&self) -> &str {
        "linear"
    }
}

/// Hiring recommendation bucket derived from `ai_score`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTier {
    StrongMatch,
    GoodMatch,
    WeakMatch,
    PoorMatch,
}

impl MatchTier {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.75 {
            MatchTier::StrongMatch
        } else if score >= 0.60 {
            MatchTier::GoodMatch
        } else if score >= 0.45 {
            MatchTier::WeakMatch
        } else {
            MatchTier::PoorMatch
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::StrongMatch => "Strong Match",
            MatchTier::GoodMatch => "Good Match",
            MatchTier::WeakMatch => "Weak Match",
            MatchTier::PoorMatch => "Poor Match",
        }
    }
}

/// Candidate annotated by the engine; read-only afterwards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub candidate: Candidate,
    pub ai_score: f32,
    pub features: FeatureVector,
    pub entities: EntitySet,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub tier: MatchTier,
}

impl RankedCandidate {
    pub fn id(&self) -> u32 {
        self.candidate.id
    }

    pub fn name(&self) -> &str {
        &self.candidate.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResult {
    pub candidates: Vec<RankedCandidate>,
    pub job_entities: EntitySet,
    pub required_experience_years: u32,
    pub policy: String,
    pub embedding_model: String,
    pub processing_time_ms: u64,
}

impl RankingResult {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn top(&self) -> Option<&RankedCandidate> {
        self.candidates.first()
    }

    pub fn scores(&self) -> Vec<f32> {
        self.candidates.iter().map(|c| c.ai_score).collect()
    }
}

pub struct RankingEngine {
    builder: FeatureBuilder,
    policy: Arc<dyn ScoringPolicy>,
    parallel: bool,
}

impl RankingEngine {
    pub fn new(builder: FeatureBuilder) -> Self {
        Self::with_policy(builder, Arc::new(LinearPolicy::default()))
    }

    pub fn with_policy(builder: FeatureBuilder, policy: Arc<dyn ScoringPolicy>) -> Self {
        Self {
            builder,
            policy,
            parallel: true,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn policy(&self) -> &dyn ScoringPolicy {
        self.policy.as_ref()
    }

    pub fn builder(&self) -> &FeatureBuilder {
        &self.builder
    }

    /// Score every candidate against `job` and sort by `ai_score` descending.
    ///
    /// Equal scores keep their input order. Never fails: degenerate or
    /// malformed resumes receive neutral feature values.
    pub fn rank(&self, job: &Document, candidates: Vec<Candidate>, required_experience_years: u32) -> RankingResult {
        let start_time = Instant::now();
        info!(
            "Ranking {} candidates (required experience: {} years, policy: {})",
            candidates.len(),
            required_experience_years,
            self.policy.name()
        );

        let job_text = job.content();
        let job_entities = self.builder.extractor().extract(job_text);

        let evaluate = |candidate: Candidate| {
            let pair = self.builder.build_against(
                job_text,
                &job_entities,
                candidate.resume.content(),
                required_experience_years,
            );
            self.annotate(candidate, pair)
        };

        let mut ranked: Vec<RankedCandidate> = if self.parallel {
            candidates.into_par_iter().map(evaluate).collect()
        } else {
            candidates.into_iter().map(evaluate).collect()
        };

        // stable: ties keep input order
        ranked.sort_by(|a, b| b.ai_score.total_cmp(&a.ai_score));
        for (position, candidate) in ranked.iter_mut().enumerate() {
            candidate.rank = position + 1;
        }

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!("Ranking finished in {}ms", processing_time_ms);

        RankingResult {
            candidates: ranked,
            job_entities,
            required_experience_years,
            policy: self.policy.name().to_string(),
            embedding_model: self.builder.embedder().name().to_string(),
            processing_time_ms,
        }
    }

    fn annotate(&self, candidate: Candidate, pair: PairFeatures) -> RankedCandidate {
        let PairFeatures {
            features,
            resume_entities,
            job_entities,
        } = pair;

        let mut ai_score = self.policy.score(&features);
        if !ai_score.is_finite() {
            ai_score = 0.0;
        }

        let (matching_skills, missing_skills): (Vec<String>, Vec<String>) = job_entities
            .skills
            .iter()
            .cloned()
            .partition(|skill| resume_entities.skills.contains(skill));

        debug!(
            "Candidate {} ({}): score {:.3}, features {:?}",
            candidate.id,
            candidate.name,
            ai_score,
            features.to_array()
        );

        RankedCandidate {
            rank: 0,
            candidate,
            ai_score,
            features,
            entities: resume_entities,
            matching_skills,
            missing_skills,
            tier: MatchTier::from_score(ai_score),
        }
    }
}
