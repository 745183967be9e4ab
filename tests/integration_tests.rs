//! Integration tests for the candidate ranker

use candidate_ranker::config::{Config, OutputFormat};
use candidate_ranker::demo;
use candidate_ranker::error::RankerError;
use candidate_ranker::input::{CandidateLoader, InputManager};
use candidate_ranker::output::{RankingReport, ReportGenerator};
use candidate_ranker::pipeline;
use candidate_ranker::processing::document::{Candidate, DocumentType};
use candidate_ranker::processing::embeddings::{Embedder, HashingEmbedder};
use candidate_ranker::{Document, RankingEngine, RankingResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const JOB: &str = "tests/fixtures/job_ml_engineer.txt";

fn resume_paths() -> Vec<PathBuf> {
    // junior first so the ranking has to reorder
    ["resume_junior.txt", "resume_mid.md", "resume_senior.txt"]
        .iter()
        .map(|name| Path::new("tests/fixtures").join(name))
        .collect()
}

fn hashing_engine() -> RankingEngine {
    let config = Config::default();
    let extractor = pipeline::build_extractor(&config).unwrap();
    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::default());
    pipeline::build_engine(&config, extractor, embedder).unwrap()
}

async fn load_fixtures() -> (Document, Vec<Candidate>) {
    let mut input = InputManager::new();
    let job = input.load_document(Path::new(JOB), DocumentType::JobDescription).await.unwrap();
    let candidates = CandidateLoader::new(input).load(&resume_paths()).await.unwrap();
    (job, candidates)
}

fn ids(result: &RankingResult) -> Vec<u32> {
    result.candidates.iter().map(|c| c.id()).collect()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let text = manager.extract_text(Path::new("tests/fixtures/resume_senior.txt")).await.unwrap();

    assert!(text.contains("Alex Senior"));
    assert!(text.contains("TensorFlow"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let text = manager.extract_text(Path::new("tests/fixtures/resume_mid.md")).await.unwrap();

    assert!(text.contains("Sam Middle - Data Scientist"));
    assert!(text.contains("5 years of experience as a data scientist."));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new(JOB);

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(RankerError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/nonexistent.txt")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_loader_assigns_ids_and_names() {
    let (_, candidates) = load_fixtures().await;

    let summary: Vec<(u32, &str)> = candidates.iter().map(|c| (c.id, c.name.as_str())).collect();
    assert_eq!(summary, vec![(1, "Kim Junior"), (2, "Sam Middle"), (3, "Alex Senior")]);
}

#[tokio::test]
async fn test_end_to_end_ranking() {
    let (job, candidates) = load_fixtures().await;
    let result = hashing_engine().rank(&job, candidates, 3);

    let names: Vec<&str> = result.candidates.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Alex Senior", "Sam Middle", "Kim Junior"]);

    let scores = result.scores();
    assert!(scores.windows(2).all(|pair| pair[0] > pair[1]), "scores not strictly decreasing: {:?}", scores);

    let ranks: Vec<usize> = result.candidates.iter().map(|c| c.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);

    let senior = &result.candidates[0];
    assert_eq!(senior.entities.experience_years, 8);
    assert_eq!(senior.features.skill_score, 1.0);
    assert!(senior.missing_skills.is_empty());

    let junior = &result.candidates[2];
    assert_eq!(junior.features.experience_score, 0.6);
    assert_eq!(junior.features.skill_score, 0.0);
    assert!(junior.matching_skills.is_empty());
}

#[tokio::test]
async fn test_feature_components_in_unit_range() {
    let (job, candidates) = load_fixtures().await;
    let result = hashing_engine().rank(&job, candidates, 3);

    for candidate in &result.candidates {
        for (name, value) in candidate.features.named() {
            assert!((0.0..=1.0).contains(&value), "{} of {} out of range: {}", name, candidate.name(), value);
        }
    }
}

#[tokio::test]
async fn test_ranking_is_idempotent() {
    let (job, candidates) = load_fixtures().await;
    let engine = hashing_engine();

    let first = engine.rank(&job, candidates.clone(), 3);
    let second = engine.rank(&job, candidates, 3);

    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.scores(), second.scores());
}

#[tokio::test]
async fn test_empty_resume_ranks_last_with_neutral_features() {
    let (job, mut candidates) = load_fixtures().await;
    candidates.push(Candidate::new(4, "Blank", ""));

    let result = hashing_engine().rank(&job, candidates, 3);
    let blank = result.candidates.last().unwrap();

    assert_eq!(blank.id(), 4);
    assert_eq!(blank.features.to_array(), [0.0, 0.0, 0.3, 0.0, 0.5]);
    assert_eq!(blank.entities.experience_years, 0);
}

#[tokio::test]
async fn test_report_rendering_from_ranking() {
    let (job, candidates) = load_fixtures().await;
    let result = hashing_engine().rank(&job, candidates, 3);
    let report = RankingReport::from_ranking(&result, JOB);

    assert!(report.statistics.clear_differentiation);
    assert_eq!(report.metadata.embedding_model, "hashing");
    assert_eq!(report.top_candidate().map(|c| c.name.as_str()), Some("Alex Senior"));

    let generator = ReportGenerator::with_options(false, true, 5);
    let json = generator.generate_report(&report, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["candidates"][0]["name"], "Alex Senior");

    let markdown = generator.generate_report(&report, OutputFormat::Markdown).unwrap();
    assert!(markdown.contains("| 1 | Alex Senior |"));

    let html = generator.generate_report(&report, OutputFormat::Html).unwrap();
    assert!(html.contains("Kim Junior"));
}

#[test]
fn test_demo_ranking_orders_by_experience() {
    let result = hashing_engine().rank(&demo::demo_job(), demo::demo_candidates(), 3);

    let names: Vec<&str> = result.candidates.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Dr. Alex Rodriguez", "Sarah Chen", "Jennifer Liu", "Mike Johnson"]);

    let years: Vec<u32> = result.candidates.iter().map(|c| c.entities.experience_years).collect();
    assert_eq!(years, vec![8, 5, 3, 2]);

    let scores = result.scores();
    assert!(scores.windows(2).all(|pair| pair[0] > pair[1]), "scores not strictly decreasing: {:?}", scores);
}
