// atsgauge: hybrid ATS compatibility scoring.
//
// This is the library root. Each module corresponds to one stage of the
// scoring pipeline or one piece of the surrounding tooling.

pub mod config;
pub mod embedding;
pub mod error;
pub mod keywords;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod similarity;
pub mod text;

pub use error::{DocumentRole, ScoringError};
pub use scoring::{score, ScoreReport, ScoringConfig};
