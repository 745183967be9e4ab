//! Feature vector construction for a (job, resume) pair

use crate::processing::document::EntitySet;
use crate::processing::embeddings::{semantic_similarity, Embedder};
use crate::processing::extractor::EntityExtractor;
use crate::processing::tfidf::TfidfVectorizer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_REQUIRED_EXPERIENCE_YEARS: u32 = 3;

pub const FEATURE_NAMES: [&str; 5] = [
    "semantic_score",
    "keyword_score",
    "experience_score",
    "skill_score",
    "education_score",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub semantic_score: f32,
    pub keyword_score: f32,
    pub experience_score: f32,
    pub skill_score: f32,
    pub education_score: f32,
}

impl FeatureVector {
    /// Components in the fixed ranking order
    pub fn to_array(&self) -> [f32; 5] {
        [
            self.semantic_score,
            self.keyword_score,
            self.experience_score,
            self.skill_score,
            self.education_score,
        ]
    }

    pub fn from_array(values: [f32; 5]) -> Self {
        Self {
            semantic_score: values[0],
            keyword_score: values[1],
            experience_score: values[2],
            skill_score: values[3],
            education_score: values[4],
        }
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f32)> {
        FEATURE_NAMES.into_iter().zip(self.to_array())
    }
}

/// Feature vector plus the entity sets it was derived from
#[derive(Debug, Clone)]
pub struct PairFeatures {
    pub features: FeatureVector,
    pub resume_entities: EntitySet,
    pub job_entities: EntitySet,
}

/// Coarse step policy: meeting the bar scores 1.0, near misses stay high
pub fn experience_score(candidate_years: u32, required_years: u32) -> f32 {
    let years = candidate_years as f64;
    let required = required_years as f64;

    if years >= required {
        1.0
    } else if years >= required * 0.7 {
        0.8
    } else if years >= required * 0.5 {
        0.6
    } else {
        0.3
    }
}

/// Share of the job's skills the resume mentions, set semantics, at most 1.0
pub fn skill_score(resume_skills: &[String], job_skills: &[String]) -> f32 {
    let resume: HashSet<&str> = resume_skills.iter().map(String::as_str).collect();
    let job: HashSet<&str> = job_skills.iter().map(String::as_str).collect();

    let overlap = resume.intersection(&job).count();
    (overlap as f32 / job.len().max(1) as f32).min(1.0)
}

pub fn education_score(resume_education: &[String]) -> f32 {
    if resume_education.is_empty() {
        0.5
    } else {
        1.0
    }
}

pub struct FeatureBuilder {
    extractor: Arc<EntityExtractor>,
    embedder: Arc<dyn Embedder>,
    vectorizer: TfidfVectorizer,
}

impl FeatureBuilder {
    pub fn new(extractor: Arc<EntityExtractor>, embedder: Arc<dyn Embedder>, max_features: usize) -> Self {
        Self {
            extractor,
            embedder,
            vectorizer: TfidfVectorizer::new(max_features),
        }
    }

    pub fn build(&self, job: &str, resume: &str, required_experience_years: u32) -> FeatureVector {
        self.build_with_entities(job, resume, required_experience_years).features
    }

    pub fn build_with_entities(&self, job: &str, resume: &str, required_experience_years: u32) -> PairFeatures {
        let job_entities = self.extractor.extract(job);
        self.build_against(job, &job_entities, resume, required_experience_years)
    }

    /// Same as `build_with_entities` with the job side already extracted
    pub fn build_against(
        &self,
        job: &str,
        job_entities: &EntitySet,
        resume: &str,
        required_experience_years: u32,
    ) -> PairFeatures {
        let resume_entities = self.extractor.extract(resume);

        let features = FeatureVector {
            semantic_score: semantic_similarity(self.embedder.as_ref(), job, resume),
            keyword_score: self.vectorizer.similarity(job, resume),
            experience_score: experience_score(resume_entities.experience_years, required_experience_years),
            skill_score: skill_score(&resume_entities.skills, &job_entities.skills),
            education_score: education_score(&resume_entities.education),
        };

        PairFeatures {
            features,
            resume_entities,
            job_entities: job_entities.clone(),
        }
    }

    pub fn extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }
}
