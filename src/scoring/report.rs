// The ScoreReport value handed back to callers.
//
// Only the aggregator constructs a report. The engine then attaches keyword
// lists, diagnostics and suggestions through crate-private builders; nothing
// outside the crate can mutate one.

use serde::{Deserialize, Serialize};

use super::categories::CategoryScore;
use super::config::{BandThresholds, ScoringWeights};

/// Qualitative classification of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Band {
    /// Classify a 0-100 score against the configured lower bounds.
    pub fn from_score(score: f64, thresholds: &BandThresholds) -> Self {
        match score {
            s if s >= thresholds.excellent => Band::Excellent,
            s if s >= thresholds.good => Band::Good,
            s if s >= thresholds.fair => Band::Fair,
            _ => Band::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Poor => "poor",
            Band::Fair => "fair",
            Band::Good => "good",
            Band::Excellent => "excellent",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubScoreKind {
    Lexical,
    Statistical,
    Semantic,
}

impl SubScoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubScoreKind::Lexical => "lexical",
            SubScoreKind::Statistical => "statistical",
            SubScoreKind::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for SubScoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub kind: SubScoreKind,
    /// In [0, 1].
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    overall_score: f64,
    raw_score: f64,
    band: Band,
    sub_scores: Vec<SubScore>,
    missing_keywords: Vec<String>,
    matched_keywords: Vec<String>,
    suggestions: Vec<String>,
    degraded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    degradation_reason: Option<String>,
    categories: Vec<CategoryScore>,
    weights: ScoringWeights,
}

impl ScoreReport {
    pub(crate) fn new(
        overall_score: f64,
        raw_score: f64,
        band: Band,
        sub_scores: Vec<SubScore>,
        degraded: bool,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            overall_score,
            raw_score,
            band,
            sub_scores,
            missing_keywords: Vec::new(),
            matched_keywords: Vec::new(),
            suggestions: Vec::new(),
            degraded,
            degradation_reason: None,
            categories: Vec::new(),
            weights,
        }
    }

    pub(crate) fn with_keywords(mut self, matched: Vec<String>, missing: Vec<String>) -> Self {
        self.matched_keywords = matched;
        self.missing_keywords = missing;
        self
    }

    pub(crate) fn with_categories(mut self, categories: Vec<CategoryScore>) -> Self {
        self.categories = categories;
        self
    }

    pub(crate) fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub(crate) fn with_degradation_reason(mut self, reason: impl Into<String>) -> Self {
        self.degradation_reason = Some(reason.into());
        self
    }

    /// Final score on the 0-100 scale (calibrated if calibration is on).
    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    /// Weighted blend before calibration, 0-100.
    pub fn raw_score(&self) -> f64 {
        self.raw_score
    }

    pub fn band(&self) -> Band {
        self.band
    }

    /// Lexical, statistical, then semantic. The semantic entry is absent in
    /// degraded mode.
    pub fn sub_scores(&self) -> &[SubScore] {
        &self.sub_scores
    }

    pub fn sub_score(&self, kind: SubScoreKind) -> Option<f64> {
        self.sub_scores
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.value)
    }

    /// Missing keywords in descending weight order.
    pub fn missing_keywords(&self) -> &[String] {
        &self.missing_keywords
    }

    pub fn matched_keywords(&self) -> &[String] {
        &self.matched_keywords
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// True when the semantic scorer failed and its weight was redistributed.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn degradation_reason(&self) -> Option<&str> {
        self.degradation_reason.as_deref()
    }

    pub fn categories(&self) -> &[CategoryScore] {
        &self.categories
    }

    /// The weights actually applied, after any degraded-mode redistribution.
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }
}
