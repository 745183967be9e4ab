//! Report structures built from a ranking result

use crate::processing::features::FeatureVector;
use crate::processing::ranking::{MatchTier, RankedCandidate, RankingResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Spread above which the ranking is considered to separate candidates well
pub const CLEAR_DIFFERENTIATION_SPREAD: f32 = 0.2;

/// Everything a formatter needs to render one ranking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub metadata: ReportMetadata,
    pub job: JobSummary,
    pub statistics: ScoreStatistics,
    pub candidates: Vec<CandidateReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub ranker_version: String,
    pub embedding_model: String,
    pub scoring_policy: String,
    pub processing_time_ms: u64,
    pub candidate_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub source: String,
    pub required_experience_years: u32,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub spread: f32,
    pub clear_differentiation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateReport {
    pub rank: usize,
    pub id: u32,
    pub name: String,
    pub source: String,
    pub ai_score: f32,
    pub score_percentage: u8,
    pub tier: MatchTier,
    pub recommendation: String,
    pub features: FeatureVector,
    pub experience_years: u32,
    pub skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub education: Vec<String>,
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
}

impl ScoreStatistics {
    /// All zeros for an empty slice
    pub fn from_scores(scores: &[f32]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
        let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        let spread = max - min;

        Self {
            min,
            max,
            mean,
            spread,
            clear_differentiation: spread > CLEAR_DIFFERENTIATION_SPREAD,
        }
    }
}

impl RankingReport {
    pub fn from_ranking(result: &RankingResult, job_source: &str) -> Self {
        let candidates: Vec<CandidateReport> = result
            .candidates
            .iter()
            .map(|candidate| CandidateReport::from_ranked(candidate, result.required_experience_years))
            .collect();

        let job = &result.job_entities;

        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                ranker_version: env!("CARGO_PKG_VERSION").to_string(),
                embedding_model: result.embedding_model.clone(),
                scoring_policy: result.policy.clone(),
                processing_time_ms: result.processing_time_ms,
                candidate_count: candidates.len(),
            },
            job: JobSummary {
                source: job_source.to_string(),
                required_experience_years: result.required_experience_years,
                skills: job.skills.clone(),
                education: job.education.clone(),
                organizations: job.organizations.clone(),
                locations: job.locations.clone(),
            },
            statistics: ScoreStatistics::from_scores(&result.scores()),
            candidates,
        }
    }

    pub fn top_candidate(&self) -> Option<&CandidateReport> {
        self.candidates.first()
    }
}

impl CandidateReport {
    fn from_ranked(ranked: &RankedCandidate, required_experience_years: u32) -> Self {
        let features = ranked.features;
        let entities = &ranked.entities;

        let mut strengths = Vec::new();
        if features.semantic_score > 0.7 {
            strengths.push("Strong semantic alignment with the job description".to_string());
        }
        if features.keyword_score > 0.5 {
            strengths.push("High keyword overlap with the posting".to_string());
        }
        if features.experience_score >= 1.0 {
            strengths.push(format!(
                "{} years of experience meets the {} year requirement",
                entities.experience_years, required_experience_years
            ));
        }
        if !ranked.matching_skills.is_empty() && ranked.missing_skills.is_empty() {
            strengths.push("Covers every skill named in the posting".to_string());
        }
        if !entities.education.is_empty() {
            strengths.push(format!("Education: {}", entities.education.join(", ")));
        }

        let mut concerns = Vec::new();
        if features.experience_score < 1.0 {
            concerns.push(format!(
                "{} years of experience, {} required",
                entities.experience_years, required_experience_years
            ));
        }
        if !ranked.missing_skills.is_empty() {
            concerns.push(format!("Missing skills: {}", ranked.missing_skills.join(", ")));
        }
        if features.keyword_score < 0.1 {
            concerns.push("Little vocabulary shared with the posting".to_string());
        }

        Self {
            rank: ranked.rank,
            id: ranked.id(),
            name: ranked.name().to_string(),
            source: ranked.candidate.resume.source().to_string(),
            ai_score: ranked.ai_score,
            score_percentage: (ranked.ai_score.clamp(0.0, 1.0) * 100.0).round() as u8,
            tier: ranked.tier,
            recommendation: ranked.tier.label().to_string(),
            features,
            experience_years: entities.experience_years,
            skills: entities.skills.clone(),
            matching_skills: ranked.matching_skills.clone(),
            missing_skills: ranked.missing_skills.clone(),
            education: entities.education.clone(),
            organizations: entities.organizations.clone(),
            locations: entities.locations.clone(),
            strengths,
            concerns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::{Candidate, EntitySet};

    fn ranked(rank: usize, score: f32, features: [f32; 5], missing: &[&str]) -> RankedCandidate {
        RankedCandidate {
            rank,
            candidate: Candidate::new(rank as u32, format!("Candidate {}", rank), "text"),
            ai_score: score,
            features: FeatureVector::from_array(features),
            entities: EntitySet {
                experience_years: 2,
                education: vec!["phd".to_string()],
                ..EntitySet::default()
            },
            matching_skills: vec!["python".to_string()],
            missing_skills: missing.iter().map(|s| s.to_string()).collect(),
            tier: MatchTier::from_score(score),
        }
    }

    fn result(candidates: Vec<RankedCandidate>) -> RankingResult {
        RankingResult {
            candidates,
            job_entities: EntitySet {
                skills: vec!["python".to_string(), "aws".to_string()],
                ..EntitySet::default()
            },
            required_experience_years: 3,
            policy: "linear".to_string(),
            embedding_model: "hashing".to_string(),
            processing_time_ms: 12,
        }
    }

    #[test]
    fn test_statistics() {
        let stats = ScoreStatistics::from_scores(&[0.8, 0.5, 0.3]);
        assert!((stats.spread - 0.5).abs() < 1e-6);
        assert!((stats.mean - 0.5333333).abs() < 1e-5);
        assert!(stats.clear_differentiation);

        let close = ScoreStatistics::from_scores(&[0.61, 0.6]);
        assert!(!close.clear_differentiation);

        assert_eq!(ScoreStatistics::from_scores(&[]), ScoreStatistics::default());
    }

    #[test]
    fn test_report_from_ranking() {
        let report = RankingReport::from_ranking(
            &result(vec![
                ranked(1, 0.8, [0.9, 0.6, 1.0, 1.0, 1.0], &[]),
                ranked(2, 0.4, [0.3, 0.05, 0.6, 0.5, 0.5], &["aws"]),
            ]),
            "job.txt",
        );

        assert_eq!(report.metadata.candidate_count, 2);
        assert_eq!(report.job.skills, vec!["python".to_string(), "aws".to_string()]);
        assert_eq!(report.top_candidate().map(|c| c.score_percentage), Some(80));

        let second = &report.candidates[1];
        assert_eq!(second.recommendation, "Poor Match");
        assert!(second.concerns.iter().any(|c| c == "Missing skills: aws"));
        assert!(second.concerns.iter().any(|c| c == "2 years of experience, 3 required"));
    }
}
