//! Text extraction from plain text, markdown and PDF files

use crate::error::{Result, RankerError};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
}

impl FileType {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| RankerError::InvalidInput(format!("File has no extension: {}", path.display())))?;

        match extension.to_lowercase().as_str() {
            "pdf" => Ok(FileType::Pdf),
            "txt" | "text" => Ok(FileType::Text),
            "md" | "markdown" => Ok(FileType::Markdown),
            other => Err(RankerError::UnsupportedFormat(format!(
                ".{} ({}); supported: pdf, txt, md",
                other,
                path.display()
            ))),
        }
    }
}

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            RankerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown))
    }
}

/// Strip markdown syntax, keeping one line per block element
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());

    for event in Parser::new(markdown) {
        match event {
            Event::Text(content) | Event::Code(content) => text.push_str(&content),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph) | Event::End(Tag::Heading(..)) | Event::End(Tag::Item) => text.push('\n'),
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_path(Path::new("cv.PDF")).unwrap(), FileType::Pdf);
        assert_eq!(FileType::from_path(Path::new("job.txt")).unwrap(), FileType::Text);
        assert_eq!(FileType::from_path(Path::new("cv.markdown")).unwrap(), FileType::Markdown);
        assert!(matches!(
            FileType::from_path(Path::new("cv.docx")),
            Err(RankerError::UnsupportedFormat(_))
        ));
        assert!(matches!(FileType::from_path(Path::new("README")), Err(RankerError::InvalidInput(_))));
    }

    #[test]
    fn test_markdown_to_text_strips_formatting() {
        let text = markdown_to_text("# Jane Doe\n\n**Skills:** Rust, `tokio`\n\n- 5 years of experience\n- Berlin");
        assert_eq!(text, "Jane Doe\nSkills: Rust, tokio\n5 years of experience\nBerlin");
    }
}
