//! TF-IDF keyword similarity over a small document corpus

use crate::error::{Result, RankerError};
use crate::processing::embeddings::cosine_similarity;
use crate::processing::text_processor::TextProcessor;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Fitted TF-IDF matrix: one L2-normalised row per input document
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    pub vocabulary: Vec<String>,
    pub idf: Vec<f32>,
    pub rows: Vec<Vec<f32>>,
}

/// Vectorizer refitted for every call; holds no corpus state between calls
pub struct TfidfVectorizer {
    processor: TextProcessor,
    max_features: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            processor: TextProcessor::new(),
            max_features: max_features.max(1),
        }
    }

    pub fn fit_transform(&self, documents: &[&str]) -> Result<TfidfMatrix> {
        let doc_counts: Vec<HashMap<String, usize>> =
            documents.iter().map(|doc| self.processor.term_counts(doc)).collect();

        // corpus frequency and document frequency per term
        let mut corpus_stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for counts in &doc_counts {
            for (term, count) in counts {
                let entry = corpus_stats.entry(term.as_str()).or_insert((0, 0));
                entry.0 += count;
                entry.1 += 1;
            }
        }

        if corpus_stats.is_empty() {
            return Err(RankerError::EmptyVocabulary(
                "documents contain no scorable terms after stop word removal".to_string(),
            ));
        }

        // Keep the most frequent terms; BTreeMap order breaks ties alphabetically
        let mut ranked: Vec<(&str, (usize, usize))> = corpus_stats.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0));
        ranked.truncate(self.max_features);
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        let n_docs = documents.len() as f32;
        let vocabulary: Vec<String> = ranked.iter().map(|(term, _)| term.to_string()).collect();
        let idf: Vec<f32> = ranked
            .iter()
            .map(|(_, (_, df))| ((1.0 + n_docs) / (1.0 + *df as f32)).ln() + 1.0)
            .collect();

        let rows = doc_counts
            .iter()
            .map(|counts| {
                let mut row: Vec<f32> = vocabulary
                    .iter()
                    .zip(&idf)
                    .map(|(term, weight)| counts.get(term).copied().unwrap_or(0) as f32 * weight)
                    .collect();
                let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm > 0.0 {
                    row.iter_mut().for_each(|x| *x /= norm);
                }
                row
            })
            .collect();

        Ok(TfidfMatrix { vocabulary, idf, rows })
    }

    /// Keyword similarity of job and resume; any failure yields 0.0
    pub fn similarity(&self, job: &str, resume: &str) -> f32 {
        let score = self
            .fit_transform(&[job, resume])
            .and_then(|matrix| cosine_similarity(&matrix.rows[0], &matrix.rows[1]));

        match score {
            Ok(score) if score.is_finite() => score.clamp(0.0, 1.0),
            Ok(_) => 0.0,
            Err(e) => {
                debug!("Keyword similarity degraded to 0: {}", e);
                0.0
            }
        }
    }
}
