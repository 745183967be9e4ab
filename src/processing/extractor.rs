//! Entity extraction: NER spans plus rule-based skills, experience and education

use crate::error::{Result, RankerError};
use crate::processing::document::EntitySet;
use crate::processing::ner::{EntityLabel, EntityRecognizer};
use aho_corasick::{AhoCorasick, MatchKind};
use log::{debug, warn};
use regex::Regex;
use std::sync::Arc;

pub const DEFAULT_SKILLS: &[&str] = &[
    "python", "javascript", "react", "node.js", "aws", "docker",
    "kubernetes", "tensorflow", "pytorch", "machine learning",
    "deep learning", "nlp", "computer vision", "sql", "mongodb",
    "microservices", "rest api", "graphql", "git", "linux",
];

pub const DEFAULT_EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "degree", "university", "college",
];

/// Turns raw text into an [`EntitySet`]. Never fails once constructed.
pub struct EntityExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
    skills: Vec<String>,
    skill_matcher: AhoCorasick,
    education_keywords: Vec<String>,
    education_matcher: AhoCorasick,
    experience_regex: Regex,
}

impl EntityExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Result<Self> {
        Self::with_vocabularies(
            recognizer,
            DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_EDUCATION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn with_vocabularies(
        recognizer: Arc<dyn EntityRecognizer>,
        skills: Vec<String>,
        education_keywords: Vec<String>,
    ) -> Result<Self> {
        let skills = normalize_vocabulary(skills);
        let education_keywords = normalize_vocabulary(education_keywords);

        let skill_matcher = build_substring_matcher(&skills, "skill")?;
        let education_matcher = build_substring_matcher(&education_keywords, "education")?;

        let experience_regex = Regex::new(r"([0-9]+)\s*(?:years?|yrs?)\s*(?:of\s*)?experience")
            .expect("Invalid experience regex");

        Ok(Self {
            recognizer,
            skills,
            skill_matcher,
            education_keywords,
            education_matcher,
            experience_regex,
        })
    }

    pub fn extract(&self, text: &str) -> EntitySet {
        let mut entities = EntitySet::default();

        match self.recognizer.recognize(text) {
            Ok(spans) => {
                for span in spans {
                    match span.label {
                        EntityLabel::Org => entities.organizations.push(span.text),
                        EntityLabel::Person => entities.persons.push(span.text),
                        EntityLabel::Gpe => entities.locations.push(span.text),
                        EntityLabel::Other(_) => {}
                    }
                }
            }
            Err(e) => {
                warn!("Entity recognizer '{}' failed, continuing without NER entities: {}", self.recognizer.name(), e);
            }
        }

        let text_lower = text.to_lowercase();

        entities.skills = present_terms(&self.skill_matcher, &self.skills, &text_lower);
        entities.experience_years = self.experience_years(&text_lower);
        entities.education = present_terms(&self.education_matcher, &self.education_keywords, &text_lower);

        debug!(
            "Extracted {} skills, {} education keywords, {} years of experience",
            entities.skills.len(),
            entities.education.len(),
            entities.experience_years
        );

        entities
    }

    /// Largest `<n> years of experience` figure in already lower-cased text.
    /// Figures too large for a `u32` saturate at `u32::MAX`.
    pub fn experience_years(&self, text_lower: &str) -> u32 {
        self.experience_regex
            .captures_iter(text_lower)
            .filter_map(|caps| caps.get(1))
            .map(|m| saturating_parse(m.as_str()))
            .max()
            .unwrap_or(0)
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn education_keywords(&self) -> &[String] {
        &self.education_keywords
    }
}

fn saturating_parse(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')))
}

/// Lower-case, drop blanks and repeated terms, keep first-seen order
fn normalize_vocabulary(terms: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(terms.len());
    for term in terms {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !seen.contains(&term) {
            seen.push(term);
        }
    }
    seen
}

fn build_substring_matcher(terms: &[String], kind: &str) -> Result<AhoCorasick> {
    // Standard match kind so overlapping terms ("machine learning" / "learning") all report
    AhoCorasick::builder()
        .match_kind(MatchKind::Standard)
        .build(terms)
        .map_err(|e| RankerError::InvalidInput(format!("Failed to build {} matcher: {}", kind, e)))
}

/// Vocabulary terms occurring anywhere in the text, in vocabulary order
fn present_terms(matcher: &AhoCorasick, terms: &[String], text_lower: &str) -> Vec<String> {
    let mut found = vec![false; terms.len()];
    for mat in matcher.find_overlapping_iter(text_lower) {
        found[mat.pattern().as_usize()] = true;
    }

    terms
        .iter()
        .zip(found)
        .filter_map(|(term, hit)| hit.then(|| term.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::features::experience_score;
    use crate::processing::ner::{PatternRecognizer, RecognizedEntity};

    struct FailingRecognizer;

    impl EntityRecognizer for FailingRecognizer {
        fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
            Err(RankerError::Recognition("model unavailable".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(Arc::new(PatternRecognizer::new().unwrap())).unwrap()
    }

    #[test]
    fn test_empty_text_yields_empty_entity_set() {
        let entities = extractor().extract("");
        assert!(entities.is_empty());
        assert_eq!(entities.experience_years, 0);
    }

    #[test]
    fn test_skills_are_case_insensitive_and_in_vocabulary_order() {
        let entities = extractor().extract("Built services with Kubernetes, PYTHON and Deep Learning");
        assert_eq!(
            entities.skills,
            vec!["python".to_string(), "kubernetes".to_string(), "deep learning".to_string()]
        );
    }

    #[test]
    fn test_skills_have_no_word_boundary_check() {
        // "digital" contains "git"
        let entities = extractor().extract("digital marketing");
        assert_eq!(entities.skills, vec!["git".to_string()]);
    }

    #[test]
    fn test_repeated_skill_is_listed_once() {
        let entities = extractor().extract("python python python");
        assert_eq!(entities.skills, vec!["python".to_string()]);
    }

    #[test]
    fn test_experience_takes_maximum_match() {
        let extractor = extractor();
        let text = "2 years of experience in SQL, 7 yrs experience with Linux and 4 Years Of Experience leading teams";
        assert_eq!(extractor.extract(text).experience_years, 7);
    }

    #[test]
    fn test_experience_pattern_variants() {
        let extractor = extractor();
        assert_eq!(extractor.experience_years("5years experience"), 5);
        assert_eq!(extractor.experience_years("1 yr of experience"), 1);
        assert_eq!(extractor.experience_years("5 years in machine learning"), 0);
        assert_eq!(extractor.experience_years("3+ years of experience"), 0);
    }

    #[test]
    fn test_experience_overflow_saturates() {
        let extractor = extractor();
        assert_eq!(extractor.experience_years("99999999999 years of experience, 6 years of experience"), u32::MAX);
        assert_eq!(extractor.experience_years("007 years of experience"), 7);

        let entities = extractor.extract("99999999999 years of experience");
        assert_eq!(experience_score(entities.experience_years, 3), 1.0);
    }

    #[test]
    fn test_experience_counts_ascii_digits_only() {
        let extractor = extractor();
        assert_eq!(extractor.experience_years("\u{0665} years of experience"), 0);
        assert_eq!(extractor.experience_years("\u{0665}4 years of experience"), 4);
    }

    #[test]
    fn test_education_keywords() {
        let entities = extractor().extract("PhD in Machine Learning, MIT. Bachelor's degree from a state college");
        assert_eq!(
            entities.education,
            vec!["bachelor".to_string(), "phd".to_string(), "degree".to_string(), "college".to_string()]
        );
    }

    #[test]
    fn test_ner_entities_populate_collections() {
        let entities = extractor().extract("Sarah Chen - Senior Engineer\nML Engineer at TechCorp, based in Seattle");
        assert_eq!(entities.persons, vec!["Sarah Chen".to_string()]);
        assert_eq!(entities.organizations, vec!["TechCorp".to_string()]);
        assert_eq!(entities.locations, vec!["Seattle".to_string()]);
    }

    #[test]
    fn test_recognizer_failure_degrades_to_empty_ner_collections() {
        let extractor = EntityExtractor::new(Arc::new(FailingRecognizer)).unwrap();
        let entities = extractor.extract("5 years of experience with Docker at Acme Corp");

        assert!(entities.organizations.is_empty());
        assert_eq!(entities.skills, vec!["docker".to_string()]);
        assert_eq!(entities.experience_years, 5);
    }

    #[test]
    fn test_custom_vocabulary_is_normalized() {
        let extractor = EntityExtractor::with_vocabularies(
            Arc::new(PatternRecognizer::new().unwrap()),
            vec!["Rust".to_string(), "rust".to_string(), " ".to_string(), "Tokio".to_string()],
            vec!["Diploma".to_string()],
        )
        .unwrap();

        assert_eq!(extractor.skills(), &["rust".to_string(), "tokio".to_string()]);
        let entities = extractor.extract("Rust and tokio, diploma in CS");
        assert_eq!(entities.skills, vec!["rust".to_string(), "tokio".to_string()]);
        assert_eq!(entities.education, vec!["diploma".to_string()]);
    }
}
