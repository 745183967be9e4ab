//! Input processing module
//! Reads job descriptions and resumes from disk and turns them into candidates

pub mod text_extractor;
pub mod manager;

pub use manager::{CandidateLoader, InputManager};
