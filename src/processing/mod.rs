//! Feature generation and ranking pipeline

pub mod document;
pub mod ner;
pub mod extractor;
pub mod text_processor;
pub mod tfidf;
pub mod embeddings;
pub mod embedding_manager;
pub mod features;
pub mod ranking;
