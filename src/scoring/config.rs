// Scoring configuration: blend weights, band cut points, caps and thresholds.
//
// Every knob has a default so a partial JSON file (or none at all) yields a
// usable config. `validate()` is called by the engine before any work.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::similarity::MatchStrategyKind;

/// Tolerance when checking that the blend weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Blend weights for the three sub-scores. Must be non-negative and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub lexical: f64,
    pub statistical: f64,
    pub semantic: f64,
}

impl Default for ScoringWeights {
    /// Keyword compliance is what literal ATS filters check, so it carries
    /// half the mass.
    fn default() -> Self {
        Self {
            lexical: 0.5,
            statistical: 0.25,
            semantic: 0.25,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.lexical + self.statistical + self.semantic
    }

    /// Weights with the semantic share moved onto the other two in proportion
    /// to their size (or split evenly when both are zero).
    pub fn without_semantic(&self) -> Self {
        let remaining = self.lexical + self.statistical;
        let (lexical, statistical) = if remaining > 0.0 {
            (
                self.lexical + self.semantic * self.lexical / remaining,
                self.statistical + self.semantic * self.statistical / remaining,
            )
        } else {
            (self.semantic / 2.0, self.semantic / 2.0)
        };
        Self {
            lexical,
            statistical,
            semantic: 0.0,
        }
    }
}

/// Lower bounds (on the 0-100 scale) of each band.
///
/// `poor` is the floor of the scale and must stay 0: every score below
/// `fair` is poor. It is kept so the four cut points read as one tuple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub poor: f64,
    pub fair: f64,
    pub good: f64,
    pub excellent: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            poor: 0.0,
            fair: 40.0,
            good: 60.0,
            excellent: 80.0,
        }
    }
}

impl BandThresholds {
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.poor, self.fair, self.good, self.excellent)
    }
}

/// Optional post-processing of the raw blended score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Calibration {
    /// Report the weighted blend as-is.
    #[default]
    None,
    /// Sigmoid stretch around 45, blended 70/30 with the raw score, capped at 99.
    Sigmoid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Cap on the extracted keyword-set size.
    pub max_keywords: usize,
    pub weights: ScoringWeights,
    pub band_thresholds: BandThresholds,
    /// Cap on the suggestion list length.
    pub max_suggestions: usize,
    /// Deadline for the semantic scorer's provider calls.
    pub embedding_timeout_ms: u64,
    pub match_strategy: MatchStrategyKind,
    /// Missing keywords below this weight get no dedicated suggestion.
    pub keyword_suggestion_threshold: f64,
    /// Sub-scores below this level produce a suggestion.
    pub low_score_threshold: f64,
    pub calibration: Calibration,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_keywords: 25,
            weights: ScoringWeights::default(),
            band_thresholds: BandThresholds::default(),
            max_suggestions: 8,
            embedding_timeout_ms: 5000,
            match_strategy: MatchStrategyKind::default(),
            keyword_suggestion_threshold: 0.3,
            low_score_threshold: 0.4,
            calibration: Calibration::default(),
        }
    }
}

impl ScoringConfig {
    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_millis(self.embedding_timeout_ms)
    }

    /// Reject configurations the aggregator cannot honor.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let w = &self.weights;
        for (name, value) in [
            ("lexical", w.lexical),
            ("statistical", w.statistical),
            ("semantic", w.semantic),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidConfig(format!(
                    "weight '{name}' must be a non-negative number, got {value}"
                )));
            }
        }
        if (w.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::InvalidConfig(format!(
                "weights must sum to 1, got {:.6}",
                w.sum()
            )));
        }

        let (poor, fair, good, excellent) = self.band_thresholds.as_tuple();
        let cuts = [poor, fair, good, excellent];
        if cuts.iter().any(|c| !c.is_finite() || *c < 0.0 || *c > 100.0) {
            return Err(ScoringError::InvalidConfig(
                "band thresholds must lie within 0..=100".into(),
            ));
        }
        if poor != 0.0 {
            return Err(ScoringError::InvalidConfig(format!(
                "band threshold 'poor' is the floor of the scale and must be 0, got {poor}"
            )));
        }
        if !(poor < fair && fair < good && good < excellent) {
            return Err(ScoringError::InvalidConfig(format!(
                "band thresholds must be strictly ascending, got ({poor}, {fair}, {good}, {excellent})"
            )));
        }

        if self.max_keywords == 0 {
            return Err(ScoringError::InvalidConfig("max_keywords must be at least 1".into()));
        }
        if self.max_suggestions == 0 {
            return Err(ScoringError::InvalidConfig(
                "max_suggestions must be at least 1".into(),
            ));
        }
        if self.embedding_timeout_ms == 0 {
            return Err(ScoringError::InvalidConfig(
                "embedding_timeout_ms must be greater than 0".into(),
            ));
        }
        for (name, value) in [
            ("keyword_suggestion_threshold", self.keyword_suggestion_threshold),
            ("low_score_threshold", self.low_score_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScoringError::InvalidConfig(format!(
                    "{name} must lie within 0..=1, got {value}"
                )));
            }
        }
        Ok(())
    }
}
