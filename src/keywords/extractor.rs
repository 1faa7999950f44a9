// Frequency-with-rarity keyword extraction.
//
// Candidates are single tokens and two-token phrases. A phrase is only a
// candidate when the job description presents it as a unit: either it forms a
// whole phrase segment on its own ("..., distributed systems, ...") or it
// repeats. Single words that never appear outside a kept phrase are dropped so
// the phrase is not counted twice.
//
// rank score = frequency * rarity
//
// where rarity is 1.0 for a domain term and COMMON_WORD_RARITY for a word
// that is common in general English. Weights are rank scores divided by the
// best rank score, so the top keyword always has weight 1.0.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::common::is_common_english;
use super::traits::KeywordExtractor;
use crate::error::ScoringError;
use crate::text::Document;

/// Rarity multiplier for words common in general English.
pub const COMMON_WORD_RARITY: f64 = 0.5;

/// A single required keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    /// Normalized term; phrases are words joined by a single space
    pub term: String,
    /// Importance in (0, 1]
    pub weight: f64,
    pub is_phrase: bool,
}

impl Keyword {
    pub fn new(term: impl Into<String>, weight: f64) -> Self {
        let term = term.into();
        let is_phrase = term.contains(' ');
        Self {
            term,
            weight,
            is_phrase,
        }
    }

    /// The words making up this keyword.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.term.split(' ')
    }
}

/// Ranked keyword set, highest weight first. Terms are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    /// Build a keyword set from arbitrary keywords.
    ///
    /// Duplicate terms keep their first occurrence, weights above 1.0 are
    /// clamped, non-positive (or NaN) weights are discarded, and the result is
    /// ordered by descending weight (stable for equal weights).
    pub fn new(keywords: Vec<Keyword>) -> Self {
        let mut seen = HashSet::new();
        let mut keywords: Vec<Keyword> = keywords
            .into_iter()
            .filter(|k| k.weight > 0.0 && seen.insert(k.term.clone()))
            .map(|mut k| {
                k.weight = k.weight.min(1.0);
                k
            })
            .collect();
        keywords.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
        Self { keywords }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> + '_ {
        self.keywords.iter()
    }

    pub fn as_slice(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn get(&self, term: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.term == term)
    }

    /// Sum of all weights, the denominator of the lexical coverage ratio.
    pub fn total_weight(&self) -> f64 {
        self.keywords.iter().map(|k| k.weight).sum()
    }

    pub fn terms(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.term.as_str()).collect()
    }
}

/// Default extractor: frequency with a rarity bonus.
pub struct FrequencyExtractor {
    /// How many keywords to keep after ranking
    pub max_terms: usize,
}

impl Default for FrequencyExtractor {
    fn default() -> Self {
        Self { max_terms: 25 }
    }
}

impl KeywordExtractor for FrequencyExtractor {
    fn extract(&self, jd_document: &Document) -> Result<KeywordSet, ScoringError> {
        extract_keywords(jd_document, self.max_terms)
    }
}

struct Candidate {
    term: String,
    count: usize,
    first_pos: usize,
    is_phrase: bool,
    rank: f64,
}

/// Derive the ranked keyword set from a job description.
pub fn extract_keywords(jd_document: &Document, max_terms: usize) -> Result<KeywordSet, ScoringError> {
    if max_terms == 0 {
        return Err(ScoringError::InvalidConfig(
            "max_keywords must be at least 1".to_string(),
        ));
    }

    let tokens = jd_document.tokens();
    if tokens.is_empty() {
        return Err(ScoringError::InsufficientContent(jd_document.role()));
    }

    // Phrase occurrences, keyed by term: (count, first position, forms a
    // whole two-token segment somewhere)
    let mut phrases: HashMap<String, (usize, usize, bool)> = HashMap::new();
    let mut phrase_order: Vec<String> = Vec::new();
    let mut occurrences: Vec<(usize, String)> = Vec::new();

    for range in jd_document.segment_ranges() {
        let whole = range.len() == 2;
        for i in range.start..range.end.saturating_sub(1) {
            if tokens[i] == tokens[i + 1] {
                continue;
            }
            let term = format!("{} {}", tokens[i], tokens[i + 1]);
            let entry = phrases.entry(term.clone()).or_insert_with(|| {
                phrase_order.push(term.clone());
                (0, i, false)
            });
            entry.0 += 1;
            entry.2 |= whole;
            occurrences.push((i, term));
        }
    }

    let kept_phrases: HashSet<&str> = phrases
        .iter()
        .filter(|(_, (count, _, whole))| *count >= 2 || *whole)
        .map(|(term, _)| term.as_str())
        .collect();

    // Token positions that sit inside a kept phrase occurrence
    let mut covered = vec![false; tokens.len()];
    for (i, term) in &occurrences {
        if kept_phrases.contains(term.as_str()) {
            covered[*i] = true;
            covered[*i + 1] = true;
        }
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut seen_unigrams: HashSet<&str> = HashSet::new();
    let mut standalone: HashSet<&str> = HashSet::new();

    for (pos, token) in tokens.iter().enumerate() {
        if !covered[pos] {
            standalone.insert(token.as_str());
        }
        if !seen_unigrams.insert(token.as_str()) {
            continue;
        }
        candidates.push(Candidate {
            term: token.clone(),
            count: jd_document.frequency(token),
            first_pos: pos,
            is_phrase: false,
            rank: 0.0,
        });
    }

    candidates.retain(|c| standalone.contains(c.term.as_str()));

    for term in &phrase_order {
        if !kept_phrases.contains(term.as_str()) {
            continue;
        }
        let (count, first_pos, _) = phrases[term];
        candidates.push(Candidate {
            term: term.clone(),
            count,
            first_pos,
            is_phrase: true,
            rank: 0.0,
        });
    }

    if candidates.is_empty() {
        return Err(ScoringError::InsufficientContent(jd_document.role()));
    }

    for candidate in &mut candidates {
        candidate.rank = candidate.count as f64 * rarity(&candidate.term);
    }

    candidates.sort_by(|a, b| {
        b.rank
            .partial_cmp(&a.rank)
            .unwrap_or(Ordering::Equal)
            .then(a.first_pos.cmp(&b.first_pos))
            .then(b.is_phrase.cmp(&a.is_phrase))
            .then_with(|| a.term.cmp(&b.term))
    });
    candidates.truncate(max_terms);

    let best = candidates[0].rank;
    let keywords: Vec<Keyword> = candidates
        .into_iter()
        .map(|c| Keyword {
            weight: if best > 0.0 { c.rank / best } else { 1.0 },
            term: c.term,
            is_phrase: c.is_phrase,
        })
        .collect();

    debug!(
        keywords = keywords.len(),
        top_keyword = keywords[0].term.as_str(),
        "Extracted job description keywords"
    );

    Ok(KeywordSet { keywords })
}

/// A phrase is only as common as its least common word.
fn rarity(term: &str) -> f64 {
    if term.split(' ').all(is_common_english) {
        COMMON_WORD_RARITY
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentRole;
    use crate::text::normalize;

    fn jd(text: &str) -> Document {
        normalize(text, DocumentRole::JobDescription).unwrap()
    }

    #[test]
    fn test_extract_spec_style_job_description() {
        let doc = jd("Seeking engineer skilled in Python, SQL, and distributed systems");
        let set = extract_keywords(&doc, 25).unwrap();

        assert_eq!(set.terms(), vec!["python", "sql", "distributed systems"]);
        assert!(set.get("distributed systems").unwrap().is_phrase);
        // Subsumed by the phrase
        assert!(set.get("distributed").is_none());
        assert!(set.get("systems").is_none());
    }

    #[test]
    fn test_frequency_drives_rank() {
        let doc = jd("Kubernetes, Terraform. Kubernetes operators; Kubernetes clusters; Go.");
        let set = extract_keywords(&doc, 10).unwrap();
        assert_eq!(set.as_slice()[0].term, "kubernetes");
        assert!((set.as_slice()[0].weight - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weights_in_unit_interval_and_terms_unique() {
        let doc = jd(
            "Rust services. Rust tooling. Postgres, Redis, Kafka streaming, Kafka streaming, \
             observability and Grafana dashboards.",
        );
        let set = extract_keywords(&doc, 25).unwrap();
        let mut seen = HashSet::new();
        for k in set.iter() {
            assert!(k.weight > 0.0 && k.weight <= 1.0, "{} has weight {}", k.term, k.weight);
            assert!(seen.insert(k.term.clone()), "duplicate term {}", k.term);
        }
    }

    #[test]
    fn test_repeated_word_is_not_a_phrase() {
        let doc = jd("Python python. Docker.");
        let set = extract_keywords(&doc, 25).unwrap();
        assert_eq!(set.terms(), vec!["python", "docker"]);
    }

    #[test]
    fn test_weights_are_descending() {
        let doc = jd("Python python python. Docker docker. Linux.");
        let set = extract_keywords(&doc, 25).unwrap();
        let weights: Vec<f64> = set.iter().map(|k| k.weight).collect();
        assert!(weights.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_ties_break_on_first_occurrence() {
        let doc = jd("Terraform. Ansible. Jenkins.");
        let set = extract_keywords(&doc, 25).unwrap();
        assert_eq!(set.terms(), vec!["terraform", "ansible", "jenkins"]);
    }

    #[test]
    fn test_truncates_to_max_terms() {
        let doc = jd("Rust. Java. Scala. Kotlin. Swift. Haskell.");
        let set = extract_keywords(&doc, 3).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.terms(), vec!["rust", "java", "scala"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "Data pipelines with Spark, Airflow, and dbt. Spark tuning. Airflow DAGs.";
        let a = extract_keywords(&jd(text), 25).unwrap();
        let b = extract_keywords(&jd(text), 25).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_only_stop_words_is_insufficient() {
        let doc = jd("We are seeking a candidate with the experience");
        assert!(matches!(
            extract_keywords(&doc, 25),
            Err(ScoringError::InsufficientContent(DocumentRole::JobDescription))
        ));
    }

    #[test]
    fn test_zero_max_terms_is_invalid() {
        let doc = jd("Rust");
        assert!(matches!(
            extract_keywords(&doc, 0),
            Err(ScoringError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_keyword_set_new_dedups_and_sorts() {
        let set = KeywordSet::new(vec![
            Keyword::new("sql", 0.4),
            Keyword::new("python", 0.9),
            Keyword::new("sql", 0.8),
            Keyword::new("ignored", 0.0),
            Keyword::new("machine learning", 1.7),
        ]);
        assert_eq!(set.terms(), vec!["machine learning", "python", "sql"]);
        assert!((set.get("machine learning").unwrap().weight - 1.0).abs() < f64::EPSILON);
        assert!((set.get("sql").unwrap().weight - 0.4).abs() < f64::EPSILON);
        assert!(set.get("machine learning").unwrap().is_phrase);
    }
}
