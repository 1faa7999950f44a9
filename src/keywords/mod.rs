// Keyword extraction: the job description's required keyword set.

pub mod common;
pub mod extractor;
pub mod traits;

pub use extractor::{extract_keywords, FrequencyExtractor, Keyword, KeywordSet};
pub use traits::KeywordExtractor;
