//! CLI interface for the candidate ranker

use crate::config::{EmbeddingBackend, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "candidate-ranker")]
#[command(about = "Rank job candidates against a job description")]
#[command(long_about = "Score resumes against a job description using semantic embeddings, TF-IDF keyword overlap, experience, skills and education, then rank them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank resumes against a job description
    Rank {
        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files (PDF, TXT, MD); candidates are numbered in this order
        #[arg(short, long, required = true, num_args = 1..)]
        resume: Vec<PathBuf>,

        /// Years of experience the role requires
        #[arg(long)]
        required_years: Option<u32>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show per-feature scores and diagnostics
        #[arg(short, long)]
        detailed: bool,

        /// Embedding backend: model2vec or hashing
        #[arg(short, long)]
        embedding: Option<String>,
    },

    /// Rank the built-in machine learning engineer demo
    Demo {
        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Show per-feature scores and diagnostics
        #[arg(short, long)]
        detailed: bool,

        /// Embedding backend: model2vec or hashing
        #[arg(short, long)]
        embedding: Option<String>,
    },

    /// Print the entities extracted from one document
    Extract {
        /// Document to analyze (PDF, TXT, MD)
        file: PathBuf,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model id, display name or HuggingFace repo ID
        model: String,
    },

    /// Show model information
    Info {
        /// Model id
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

pub fn parse_embedding_backend(backend: &str) -> Result<EmbeddingBackend, String> {
    match backend.to_lowercase().as_str() {
        "model2vec" | "m2v" => Ok(EmbeddingBackend::Model2Vec),
        "hashing" | "hash" => Ok(EmbeddingBackend::Hashing),
        _ => Err(format!(
            "Invalid embedding backend: {}. Supported: model2vec, hashing",
            backend
        )),
    }
}
