// Lexical keyword coverage.
//
// The score is a weighted coverage ratio, not a count:
//
//   score = sum(weight of matched keywords) / sum(weight of all keywords)
//
// so one missing high-weight keyword costs more than several minor ones.
// Phrases match when their words are adjacent in the resume, or when the
// resume writes them as one token ("front end" vs "frontend").

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::strategy::MatchStrategy;
use crate::keywords::{Keyword, KeywordSet};
use crate::text::Document;

/// Outcome of matching a resume against the required keyword set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicalMatch {
    /// Weighted coverage in [0, 1]
    pub score: f64,
    /// Matched keywords, in keyword-set order
    pub matched: Vec<Keyword>,
    /// Missing keywords, in keyword-set order (descending weight)
    pub missing: Vec<Keyword>,
}

impl LexicalMatch {
    pub fn missing_terms(&self) -> Vec<String> {
        self.missing.iter().map(|k| k.term.clone()).collect()
    }

    pub fn matched_terms(&self) -> Vec<String> {
        self.matched.iter().map(|k| k.term.clone()).collect()
    }
}

/// Canonical unigram and adjacent-pair sets of a resume under one strategy.
struct TermIndex {
    unigrams: HashSet<String>,
    bigrams: HashSet<String>,
}

impl TermIndex {
    fn build(document: &Document, strategy: &dyn MatchStrategy) -> Self {
        let canonical: Vec<String> = document
            .tokens()
            .iter()
            .map(|t| strategy.canonical(t))
            .collect();

        let bigrams = canonical
            .windows(2)
            .map(|pair| format!("{} {}", pair[0], pair[1]))
            .collect();

        Self {
            unigrams: canonical.into_iter().collect(),
            bigrams,
        }
    }

    fn contains(&self, keyword: &Keyword, strategy: &dyn MatchStrategy) -> bool {
        let words: Vec<String> = keyword.words().map(|w| strategy.canonical(w)).collect();
        match words.as_slice() {
            [] => false,
            [single] => self.unigrams.contains(single),
            _ => {
                self.bigrams.contains(&words.join(" ")) || self.unigrams.contains(&words.concat())
            }
        }
    }
}

/// Match a resume against the required keyword set.
pub fn match_keywords(
    resume_document: &Document,
    keywords: &KeywordSet,
    strategy: &dyn MatchStrategy,
) -> LexicalMatch {
    let index = TermIndex::build(resume_document, strategy);

    let (matched, missing): (Vec<Keyword>, Vec<Keyword>) = keywords
        .iter()
        .cloned()
        .partition(|k| index.contains(k, strategy));

    let total = keywords.total_weight();
    let score = if total > 0.0 {
        let hit: f64 = matched.iter().map(|k| k.weight).sum();
        (hit / total).clamp(0.0, 1.0)
    } else {
        0.0
    };

    LexicalMatch {
        score,
        matched,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentRole;
    use crate::similarity::strategy::{ExactMatch, StemmedMatch};
    use crate::text::normalize;

    fn resume(text: &str) -> Document {
        normalize(text, DocumentRole::Resume).unwrap()
    }

    fn set(pairs: &[(&str, f64)]) -> KeywordSet {
        KeywordSet::new(pairs.iter().map(|(t, w)| Keyword::new(*t, *w)).collect())
    }

    #[test]
    fn test_full_coverage() {
        let keywords = set(&[("python", 1.0), ("sql", 0.5), ("distributed systems", 0.8)]);
        let doc = resume("Python and SQL on distributed systems");
        let result = match_keywords(&doc, &keywords, &ExactMatch);
        assert!((result.score - 1.0).abs() < 1e-12);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_weighted_coverage_not_count() {
        let keywords = set(&[("kubernetes", 1.0), ("bash", 0.1), ("vim", 0.1)]);
        let doc = resume("bash vim");
        let result = match_keywords(&doc, &keywords, &ExactMatch);
        // 0.2 / 1.2
        assert!((result.score - 0.2 / 1.2).abs() < 1e-12);
        assert_eq!(result.missing_terms(), vec!["kubernetes"]);
    }

    #[test]
    fn test_missing_preserves_weight_order() {
        let keywords = set(&[("aws", 0.3), ("terraform", 0.9), ("go", 0.6)]);
        let doc = resume("java");
        let result = match_keywords(&doc, &keywords, &ExactMatch);
        assert_eq!(result.missing_terms(), vec!["terraform", "go", "aws"]);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_phrase_needs_adjacency() {
        let keywords = set(&[("machine learning", 1.0)]);
        let split = resume("learning about machine shops");
        assert_eq!(match_keywords(&split, &keywords, &ExactMatch).score, 0.0);

        let adjacent = resume("applied machine learning");
        assert_eq!(match_keywords(&adjacent, &keywords, &ExactMatch).score, 1.0);
    }

    #[test]
    fn test_phrase_matches_concatenated_variant() {
        let keywords = set(&[("front end", 1.0)]);
        let doc = resume("Frontend developer");
        assert_eq!(match_keywords(&doc, &keywords, &ExactMatch).score, 1.0);
    }

    #[test]
    fn test_stemmed_strategy_tolerates_inflection() {
        let keywords = set(&[("api", 1.0), ("microservice", 1.0)]);
        let doc = resume("Designed REST APIs and microservices");
        assert_eq!(match_keywords(&doc, &keywords, &ExactMatch).score, 0.0);
        assert_eq!(match_keywords(&doc, &keywords, &StemmedMatch).score, 1.0);
    }

    #[test]
    fn test_empty_keyword_set_scores_zero() {
        let doc = resume("anything");
        let result = match_keywords(&doc, &KeywordSet::default(), &ExactMatch);
        assert_eq!(result.score, 0.0);
        assert!(result.missing.is_empty());
    }
}
