// Similarity scorers: lexical coverage, TF-IDF cosine, embedding cosine.

pub mod cosine;
pub mod lexical;
pub mod semantic;
pub mod strategy;
pub mod tfidf;

pub use lexical::{match_keywords, LexicalMatch};
pub use semantic::semantic_similarity;
pub use strategy::{ExactMatch, MatchStrategy, MatchStrategyKind, StemmedMatch};
pub use tfidf::tfidf_similarity;
