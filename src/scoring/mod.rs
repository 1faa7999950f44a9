// Score aggregation, suggestions, resume diagnostics and the `score` entry point.

pub mod aggregate;
pub mod categories;
pub mod config;
pub mod engine;
pub mod report;
pub mod suggestions;

pub use aggregate::aggregate;
pub use categories::{CategoryKind, CategoryScore, CategoryStatus};
pub use config::{BandThresholds, Calibration, ScoringConfig, ScoringWeights};
pub use engine::{score, score_against, JobProfile};
pub use report::{Band, ScoreReport, SubScore, SubScoreKind};
