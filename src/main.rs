//! Candidate ranker: rank resumes against a job description

use candidate_ranker::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use candidate_ranker::config::{Config, EmbeddingBackend, OutputFormat};
use candidate_ranker::demo;
use candidate_ranker::error::{RankerError, Result};
use candidate_ranker::input::{CandidateLoader, InputManager};
use candidate_ranker::output::{save_report_to_file, RankingReport, ReportGenerator};
use candidate_ranker::pipeline;
use candidate_ranker::processing::document::{Candidate, Document, DocumentType};
use candidate_ranker::processing::embedding_manager::EmbeddingModelManager;
use candidate_ranker::processing::text_processor::TextProcessor;
use clap::Parser;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Rank {
            job,
            resume,
            required_years,
            output,
            save,
            detailed,
            embedding,
        } => {
            info!("Starting candidate ranking");
            let format = resolve_format(output.as_deref(), &config)?;
            let backend = resolve_backend(embedding.as_deref(), &config)?;
            let required_years = required_years.unwrap_or(config.ranking.required_experience_years);

            println!("🚀 Candidate ranking");
            println!("📄 Resumes: {}", resume.len());
            println!("🎓 Required experience: {} years", required_years);

            let mut input = InputManager::new().with_max_file_size(config.max_file_size_bytes());
            let job_doc = input.load_document(&job, DocumentType::JobDescription).await?;
            if job_doc.is_blank() {
                warn!("Job description {} is empty, every candidate will receive neutral scores", job.display());
            }
            println!("💼 Job Description: {} ({} words)", job.display(), job_doc.word_count());

            println!("\n📂 Extracting text from resumes...");
            let mut loader = CandidateLoader::new(input).with_progress(true);
            let candidates = loader.load(&resume).await?;

            let source = job.display().to_string();
            rank_and_report(&config, backend, &job_doc, &source, candidates, required_years, format, detailed, save.as_deref())
                .await?;
        }

        Commands::Demo {
            output,
            detailed,
            embedding,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let backend = resolve_backend(embedding.as_deref(), &config)?;

            println!("🎯 Candidate ranking demo: Machine Learning Engineer, San Francisco");
            let job = demo::demo_job();
            let candidates = demo::demo_candidates();
            println!("📄 {} sample candidates", candidates.len());

            rank_and_report(
                &config,
                backend,
                &job,
                job.source(),
                candidates,
                config.ranking.required_experience_years,
                format,
                detailed,
                None,
            )
            .await?;
        }

        Commands::Extract { file } => {
            let mut input = InputManager::new().with_max_file_size(config.max_file_size_bytes());
            let document = input.load_document(&file, DocumentType::Resume).await?;
            let extractor = pipeline::build_extractor(&config)?;
            let entities = extractor.extract(document.content());

            println!("🔍 Entities in {} ({} words)", file.display(), document.word_count());
            println!("📄 {}\n", preview(&TextProcessor::normalize_whitespace(document.content()), 200));
            println!("🏢 Organizations: {}", list_or_none(&entities.organizations));
            println!("👤 Persons: {}", list_or_none(&entities.persons));
            println!("📍 Locations: {}", list_or_none(&entities.locations));
            println!("🛠️  Skills: {}", list_or_none(&entities.skills));
            println!("🎓 Education: {}", list_or_none(&entities.education));
            println!("⏳ Experience: {} years", entities.experience_years);
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.models_dir().to_path_buf()).await?;

            match action {
                ModelAction::List => {
                    println!("📚 Embedding Models\n");
                    for (id, info) in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(id) { "✅ Downloaded" } else { "⬇️  Available" };
                        println!("  • {} ({}) - {} MB, {} dims [{}]", id, info.repo_id, info.size_mb, info.dimensions, status);
                        println!("    {}", info.description);
                    }
                    println!("\n💡 Download: candidate-ranker models download <id>");
                }

                ModelAction::Download { model } => {
                    println!("⬇️  Downloading model: {}", model);
                    let path = manager.download_model(&model).await?;
                    println!("✅ Model '{}' ready", model);
                    println!("📁 Location: {}", path.display());
                }

                ModelAction::Info { model } => {
                    let info = manager
                        .get_model_info(&model)
                        .cloned()
                        .ok_or_else(|| RankerError::ModelNotFound(model.clone()))?;

                    println!("📋 Model Information for '{}'\n", model);
                    println!("Name: {}", info.name);
                    println!("Repository: {}", info.repo_id);
                    println!("Size: {} MB", info.size_mb);
                    println!("Dimensions: {}", info.dimensions);
                    println!("Description: {}", info.description);
                    match manager.get_model_path(&model) {
                        Some(path) => println!("Status: ✅ Downloaded ({})", path.display()),
                        None => println!("Status: ⬇️  Available for download"),
                    }
                }
            }
        }

        Commands::Config { action } => {
            let config_path = config_override.unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration\n");
                    println!("Models Directory: {}", config.models_dir().display());
                    println!("Embedding Backend: {:?}", config.models.embedding_backend);
                    println!("Embedding Model: {}", config.models.default_embedding_model);
                    println!("Required Experience: {} years", config.ranking.required_experience_years);
                    println!("Parallel Scoring: {}", config.ranking.parallel);
                    println!("\nScoring Weights:");
                    for (name, weight) in candidate_ranker::processing::features::FEATURE_NAMES
                        .iter()
                        .zip(config.ranking.weights.iter())
                    {
                        println!("  {}: {:.2}", name, weight);
                    }
                    println!("\nSkills Vocabulary: {} terms", config.extraction.skills.len());
                    println!("TF-IDF max features: {}", config.keyword.max_features);
                    println!("Max file size: {} MB", config.input.max_file_size_mb);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&config_path)?;
                    println!("✅ Configuration reset: {}", config_path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn rank_and_report(
    config: &Config,
    backend: EmbeddingBackend,
    job: &Document,
    job_source: &str,
    candidates: Vec<Candidate>,
    required_years: u32,
    format: OutputFormat,
    detailed: bool,
    save: Option<&Path>,
) -> Result<()> {
    println!("🧠 Initializing ranking engine...");
    let engine = pipeline::engine_from_config(config, backend).await?;
    println!("✅ Using {} embeddings", engine.builder().embedder().name());

    println!("🔍 Scoring {} candidates...", candidates.len());
    let result = engine.rank(job, candidates, required_years);
    let report = RankingReport::from_ranking(&result, job_source);

    let generator = ReportGenerator::with_options(
        config.output.color_output,
        detailed || config.output.detailed,
        config.output.top_skills,
    );
    let rendered = generator.generate_report(&report, format)?;

    match save {
        Some(path) => {
            // saved files never carry terminal color codes
            let content = if format == OutputFormat::Console {
                ReportGenerator::with_options(false, detailed || config.output.detailed, config.output.top_skills)
                    .generate_report(&report, format)?
            } else {
                rendered
            };
            save_report_to_file(&content, path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(RankerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn resolve_backend(embedding: Option<&str>, config: &Config) -> Result<EmbeddingBackend> {
    match embedding {
        Some(backend) => cli::parse_embedding_backend(backend).map_err(RankerError::InvalidInput),
        None => Ok(config.models.embedding_backend),
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

/// Truncate at a word boundary, appending an ellipsis
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(last_space) => format!("{}...", &truncated[..last_space]),
        None => format!("{}...", truncated),
    }
}
