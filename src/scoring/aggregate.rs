// Weighted blend of the three sub-scores into one 0-100 score and band.
//
// A missing semantic score means the embedding provider failed. Its weight is
// then shared out across lexical and statistical in proportion to their own
// weights, and the report carries the degraded flag.

use super::config::{BandThresholds, Calibration, ScoringWeights};
use super::report::{Band, ScoreReport, SubScore, SubScoreKind};

/// Sigmoid steepness and centre for `Calibration::Sigmoid`.
const SIGMOID_K: f64 = 0.08;
const SIGMOID_MIDPOINT: f64 = 45.0;
/// Share of the sigmoid in the calibrated blend; the rest is the raw score.
const SIGMOID_SHARE: f64 = 0.7;
const CALIBRATED_CAP: f64 = 99.0;

/// Combine sub-scores (each in [0, 1]) into a `ScoreReport`.
///
/// Keyword lists, diagnostics and suggestions are left empty for the engine
/// to attach.
pub fn aggregate(
    lexical: f64,
    statistical: f64,
    semantic: Option<f64>,
    weights: &ScoringWeights,
    thresholds: &BandThresholds,
    calibration: Calibration,
) -> ScoreReport {
    let lexical = unit(lexical);
    let statistical = unit(statistical);
    let semantic = semantic.map(unit);

    let effective = match semantic {
        Some(_) => *weights,
        None => weights.without_semantic(),
    };

    let blended = effective.lexical * lexical
        + effective.statistical * statistical
        + effective.semantic * semantic.unwrap_or(0.0);
    let raw_score = (100.0 * blended).clamp(0.0, 100.0);
    let overall_score = calibrate(raw_score, calibration);
    let band = Band::from_score(overall_score, thresholds);

    let mut sub_scores = vec![
        SubScore {
            kind: SubScoreKind::Lexical,
            value: lexical,
        },
        SubScore {
            kind: SubScoreKind::Statistical,
            value: statistical,
        },
    ];
    if let Some(value) = semantic {
        sub_scores.push(SubScore {
            kind: SubScoreKind::Semantic,
            value,
        });
    }

    ScoreReport::new(
        overall_score,
        raw_score,
        band,
        sub_scores,
        semantic.is_none(),
        effective,
    )
}

/// Map a raw 0-100 score through the configured calibration. Monotone.
pub fn calibrate(raw_score: f64, calibration: Calibration) -> f64 {
    match calibration {
        Calibration::None => raw_score,
        Calibration::Sigmoid => {
            let sigmoid = 100.0 / (1.0 + (-SIGMOID_K * (raw_score - SIGMOID_MIDPOINT)).exp());
            let blended = SIGMOID_SHARE * sigmoid + (1.0 - SIGMOID_SHARE) * raw_score;
            blended.min(CALIBRATED_CAP)
        }
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
