//! Input manager and candidate loading

use crate::error::{Result, RankerError};
use crate::input::text_extractor::{FileType, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::document::{Candidate, Document, DocumentType};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    max_file_size: u64,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            max_file_size: 50 * 1024 * 1024,
        }
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(cached_text) = self.cache.get(path) {
            debug!("Using cached text for: {}", path.display());
            return Ok(cached_text.clone());
        }

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|_| RankerError::InvalidInput(format!("File does not exist: {}", path.display())))?;

        if metadata.len() > self.max_file_size {
            return Err(RankerError::InvalidInput(format!(
                "{} is {} bytes, limit is {} bytes",
                path.display(),
                metadata.len(),
                self.max_file_size
            )));
        }

        let text = match FileType::from_path(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
        };

        self.cache.insert(path.to_path_buf(), text.clone());

        Ok(text)
    }

    pub async fn load_document(&mut self, path: &Path, document_type: DocumentType) -> Result<Document> {
        let text = self.extract_text(path).await?;
        Ok(Document::new(text, path.to_string_lossy(), document_type))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// Builds candidates from resume files, numbering them in argument order
pub struct CandidateLoader {
    input: InputManager,
    show_progress: bool,
}

impl CandidateLoader {
    pub fn new(input: InputManager) -> Self {
        Self {
            input,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn load(&mut self, paths: &[PathBuf]) -> Result<Vec<Candidate>> {
        let progress = if self.show_progress {
            let bar = ProgressBar::new(paths.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                    .map_err(|e| RankerError::OutputFormatting(e.to_string()))?
                    .progress_chars("=> "),
            );
            Some(bar)
        } else {
            None
        };

        let mut candidates = Vec::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            if let Some(bar) = &progress {
                bar.set_message(path.display().to_string());
            }

            let resume = self.input.load_document(path, DocumentType::Resume).await?;
            let name = candidate_name(resume.content(), path);
            candidates.push(Candidate::from_document(index as u32 + 1, name, resume));

            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        Ok(candidates)
    }
}

/// Name from a "Name - Title" header line, else the file stem
pub fn candidate_name(text: &str, path: &Path) -> String {
    let header = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.split_once(" - "))
        .map(|(name, _)| name.trim())
        .filter(|name| looks_like_name(name));

    match header {
        Some(name) => name.to_string(),
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string()),
    }
}

/// 2 to 4 capitalised words, letters plus `.`, `'` and `-` only
fn looks_like_name(name: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && name.len() <= 60
        && words.iter().all(|word| {
            word.chars().next().is_some_and(char::is_uppercase)
                && word.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_extracts_and_caches_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Doe - Engineer\nPython").unwrap();

        let mut manager = InputManager::new();
        let first = manager.extract_text(&path).await.unwrap();
        let second = manager.extract_text(&path).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_rejects_oversized_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.txt");
        std::fs::write(&path, "x".repeat(64)).unwrap();

        let mut manager = InputManager::new().with_max_file_size(16);
        assert!(matches!(manager.extract_text(&path).await, Err(RankerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let mut manager = InputManager::new();
        assert!(manager.extract_text(Path::new("does/not/exist.txt")).await.is_err());
    }

    #[tokio::test]
    async fn test_loader_numbers_candidates_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.txt");
        let second = temp_dir.path().join("second.md");
        std::fs::write(&first, "Sarah Chen - ML Engineer\n5 years of experience").unwrap();
        std::fs::write(&second, "python, sql").unwrap();

        let mut loader = CandidateLoader::new(InputManager::new());
        let candidates = loader.load(&[first, second]).await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!((candidates[0].id, candidates[0].name.as_str()), (1, "Sarah Chen"));
        assert_eq!((candidates[1].id, candidates[1].name.as_str()), (2, "second"));
    }

    #[test]
    fn test_candidate_name_falls_back_to_stem() {
        let path = Path::new("resumes/jdoe.pdf");
        assert_eq!(candidate_name("", path), "jdoe");
        assert_eq!(candidate_name("Curriculum vitae of a very long line of words", path), "jdoe");
        assert_eq!(candidate_name("\n  Mike Johnson - Software Developer", path), "Mike Johnson");
        assert_eq!(candidate_name("Dr. Alex Rodriguez - AI Research Scientist", path), "Dr. Alex Rodriguez");
    }

    #[test]
    fn test_candidate_name_requires_capitalised_header() {
        let path = Path::new("resumes/second.md");
        assert_eq!(candidate_name("python, sql", path), "second");
        assert_eq!(candidate_name("Jane Doe\nEngineer", path), "second");
        assert_eq!(candidate_name("skills - python, sql", path), "second");
        assert_eq!(candidate_name("Senior ML Engineer 2019 - 2024", path), "second");
    }
}
