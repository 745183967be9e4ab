//! Named-entity recognition capability and the rule-based recognizer

use crate::error::{Result, RankerError};
use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Entity labels the extractor understands. Everything else lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityLabel {
    Org,
    Person,
    Gpe,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// Named-entity capability.
///
/// Implementations are loaded once and shared across candidate computations,
/// so they must be safe to call concurrently.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>>;

    fn name(&self) -> &str;
}

const DEFAULT_LOCATIONS: &[&str] = &[
    "San Francisco", "New York", "Los Angeles", "Seattle", "Austin", "Boston", "Chicago",
    "Denver", "Berkeley", "Palo Alto", "Mountain View", "London", "Berlin", "Paris",
    "Amsterdam", "Dublin", "Toronto", "Vancouver", "Tokyo", "Singapore", "Bangalore",
    "Sydney", "California", "Texas", "Washington", "Massachusetts", "United States",
    "USA", "Canada", "Germany", "France", "India", "Japan", "United Kingdom", "UK",
    "CA", "NY", "WA", "TX", "MA",
];

/// Capitalised words that head a job title rather than a name
const ROLE_WORDS: &[&str] = &[
    "Senior", "Junior", "Lead", "Principal", "Staff", "Engineer", "Developer", "Scientist",
    "Analyst", "Manager", "Director", "Researcher", "Architect", "Designer", "Consultant",
    "Machine", "Learning", "Data", "Software", "Full", "Stack", "Resume", "Curriculum",
];

/// Rule and gazetteer based recognizer.
///
/// ORG: capitalised spans following "at" and spans ending in an organisation
/// suffix. PERSON: honorific + name, and "First Last - Title" header lines.
/// GPE: a location gazetteer matched at word boundaries.
pub struct PatternRecognizer {
    locations: Vec<String>,
    location_matcher: AhoCorasick,
    employer_regex: Regex,
    org_suffix_regex: Regex,
    university_regex: Regex,
    honorific_regex: Regex,
    header_name_regex: Regex,
}

impl PatternRecognizer {
    pub fn new() -> Result<Self> {
        Self::with_locations(Vec::new())
    }

    pub fn with_locations(extra_locations: Vec<String>) -> Result<Self> {
        let mut locations: Vec<String> = DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect();
        locations.extend(extra_locations.into_iter().filter(|l| !l.trim().is_empty()));

        let location_matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&locations)
            .map_err(|e| RankerError::Recognition(format!("Failed to build location matcher: {}", e)))?;

        let employer_regex = Regex::new(
            r"\bat[ \t]+([A-Z][A-Za-z0-9&.'-]*(?:[ \t]+[A-Z][A-Za-z0-9&.'-]*){0,3})",
        )
        .expect("Invalid employer regex");

        let org_suffix_regex = Regex::new(
            r"\b((?:[A-Z][A-Za-z0-9&'-]*[ \t]+){0,3}(?:Inc|Corp|Corporation|LLC|Ltd|Labs|GmbH|Technologies|University|College|Institute))\b",
        )
        .expect("Invalid organisation suffix regex");

        let university_regex = Regex::new(r"\b((?:University|College) of(?:[ \t]+[A-Z][A-Za-z-]*){1,3})")
            .expect("Invalid university regex");

        let honorific_regex = Regex::new(
            r"\b(?:Dr|Mr|Mrs|Ms|Prof)\.?[ \t]+([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){0,2})",
        )
        .expect("Invalid honorific regex");

        let header_name_regex = Regex::new(
            r"(?m)^[ \t]*([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){1,2})[ \t]+[-|–][ \t]",
        )
        .expect("Invalid header name regex");

        Ok(Self {
            locations,
            location_matcher,
            employer_regex,
            org_suffix_regex,
            university_regex,
            honorific_regex,
            header_name_regex,
        })
    }

    fn find_locations(&self, text: &str, out: &mut Vec<RecognizedEntity>) {
        for mat in self.location_matcher.find_iter(text) {
            if !is_word_boundary(text, mat.start(), mat.end()) {
                continue;
            }
            out.push(RecognizedEntity {
                text: self.locations[mat.pattern().as_usize()].clone(),
                label: EntityLabel::Gpe,
                start: mat.start(),
                end: mat.end(),
            });
        }
    }

    fn find_captures(&self, regex: &Regex, label: EntityLabel, text: &str, out: &mut Vec<RecognizedEntity>) {
        for caps in regex.captures_iter(text) {
            let Some(span) = caps.get(1) else { continue };
            let span_text = span.as_str().trim_end_matches(['.', '\'', '-']);
            if span_text.is_empty() {
                continue;
            }
            if label == EntityLabel::Person && span_text.split_whitespace().any(|w| ROLE_WORDS.contains(&w)) {
                continue;
            }
            out.push(RecognizedEntity {
                text: span_text.to_string(),
                label: label.clone(),
                start: span.start(),
                end: span.start() + span_text.len(),
            });
        }
    }
}

impl EntityRecognizer for PatternRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>> {
        let mut candidates = Vec::new();

        self.find_captures(&self.honorific_regex, EntityLabel::Person, text, &mut candidates);
        self.find_captures(&self.header_name_regex, EntityLabel::Person, text, &mut candidates);
        self.find_captures(&self.university_regex, EntityLabel::Org, text, &mut candidates);
        self.find_captures(&self.org_suffix_regex, EntityLabel::Org, text, &mut candidates);
        self.find_captures(&self.employer_regex, EntityLabel::Org, text, &mut candidates);
        self.find_locations(text, &mut candidates);

        // Earliest span wins, longer span first on equal starts; overlaps dropped
        candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        let mut entities: Vec<RecognizedEntity> = Vec::with_capacity(candidates.len());
        for entity in candidates {
            if entities.last().is_some_and(|prev| entity.start < prev.end) {
                continue;
            }
            entities.push(entity);
        }

        Ok(entities)
    }

    fn name(&self) -> &str {
        "pattern"
    }
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().next_back().map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[end..].chars().next().map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}
