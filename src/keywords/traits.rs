// Keyword extractor trait.
//
// The default implementation ranks terms by frequency with a rarity bonus.
// A skills-taxonomy or model-based extractor can slot in here without the
// matcher or aggregator noticing.

use super::extractor::KeywordSet;
use crate::error::ScoringError;
use crate::text::Document;

/// Trait for deriving the required keyword set from a job description.
pub trait KeywordExtractor: Send + Sync {
    /// Analyze a normalized job description and produce a ranked keyword set.
    fn extract(&self, jd_document: &Document) -> Result<KeywordSet, ScoringError>;
}
