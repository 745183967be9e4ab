//! Documents, candidates and the structured attributes extracted from them

use serde::{Deserialize, Serialize};

/// Raw text of a job posting or a resume. Immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    content: String,
    source: String,
    document_type: DocumentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Resume,
    JobDescription,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>, document_type: DocumentType) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            document_type,
        }
    }

    pub fn job(content: impl Into<String>) -> Self {
        Self::new(content, "inline", DocumentType::JobDescription)
    }

    pub fn resume(content: impl Into<String>) -> Self {
        Self::new(content, "inline", DocumentType::Resume)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// File path or other label the text was read from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Structured attributes derived from one document.
///
/// Organizations, persons, locations and education keep list semantics:
/// duplicates are preserved in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySet {
    pub organizations: Vec<String>,
    pub persons: Vec<String>,
    pub locations: Vec<String>,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience_years: u32,
}

impl EntitySet {
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
            && self.persons.is_empty()
            && self.locations.is_empty()
            && self.skills.is_empty()
            && self.education.is_empty()
            && self.experience_years == 0
    }
}

/// A resume plus identity metadata, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u32,
    pub name: String,
    pub resume: Document,
}

impl Candidate {
    pub fn new(id: u32, name: impl Into<String>, resume_text: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            resume: Document::resume(resume_text),
        }
    }

    pub fn from_document(id: u32, name: impl Into<String>, resume: Document) -> Self {
        Self {
            id,
            name: name.into(),
            resume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_accessors() {
        let doc = Document::new("Senior Rust engineer\nBerlin", "jobs/rust.txt", DocumentType::JobDescription);
        assert_eq!(doc.source(), "jobs/rust.txt");
        assert_eq!(doc.document_type(), DocumentType::JobDescription);
        assert_eq!(doc.word_count(), 4);
        assert!(!doc.is_blank());
    }

    #[test]
    fn test_blank_document() {
        assert!(Document::resume("  \n\t ").is_blank());
    }

    #[test]
    fn test_default_entity_set_is_empty() {
        let entities = EntitySet::default();
        assert!(entities.is_empty());
        assert_eq!(entities.experience_years, 0);
    }
}
