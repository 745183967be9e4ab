//! Candidate ranking library

pub mod cli;
pub mod config;
pub mod demo;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod processing;

pub use config::Config;
pub use error::{RankerError, Result};
pub use processing::document::{Candidate, Document, DocumentType, EntitySet};
pub use processing::features::FeatureVector;
pub use processing::ranking::{RankedCandidate, RankingEngine, RankingResult};
