// Rule-based improvement suggestions.
//
// Order is by contribution to the gap: heavy missing keywords first, then the
// weakest sub-scores, then resume diagnostics that fell short. The list is
// capped at `max_suggestions`.

use super::categories::{CategoryKind, CategoryScore};
use super::config::ScoringConfig;
use super::report::{ScoreReport, SubScoreKind};
use crate::keywords::Keyword;

/// Build the suggestion list for a report. `missing` must carry the missing
/// keywords with their weights.
pub fn generate_suggestions(
    report: &ScoreReport,
    missing: &[Keyword],
    config: &ScoringConfig,
) -> Vec<String> {
    let mut keywords: Vec<&Keyword> = missing
        .iter()
        .filter(|k| k.weight >= config.keyword_suggestion_threshold)
        .collect();
    keywords.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    let mut low_scores: Vec<_> = report
        .sub_scores()
        .iter()
        .filter(|s| s.value < config.low_score_threshold)
        .collect();
    low_scores.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut weak_categories: Vec<&CategoryScore> = report
        .categories()
        .iter()
        .filter(|c| c.needs_attention())
        .collect();
    weak_categories.sort_by(|a, b| a.score.total_cmp(&b.score));

    keywords
        .into_iter()
        .map(keyword_suggestion)
        .chain(low_scores.into_iter().map(|s| sub_score_suggestion(s.kind).to_string()))
        .chain(
            weak_categories
                .into_iter()
                .map(|c| category_suggestion(c.kind).to_string()),
        )
        .take(config.max_suggestions)
        .collect()
}

fn keyword_suggestion(keyword: &Keyword) -> String {
    format!(
        "Add the keyword '{}': it appears prominently in the target role",
        keyword.term
    )
}

fn sub_score_suggestion(kind: SubScoreKind) -> &'static str {
    match kind {
        SubScoreKind::Lexical => {
            "Your resume covers few of the job description's keywords. Work the missing terms \
             into your skills and experience sections"
        }
        SubScoreKind::Statistical => {
            "Your resume's wording differs from the job description. Mirror the terminology \
             and phrasing the employer uses"
        }
        SubScoreKind::Semantic => {
            "Your resume's overall phrasing has low semantic alignment with the job description. \
             Consider rewording responsibilities using similar language"
        }
    }
}

fn category_suggestion(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Formatting => {
            "Improve formatting: add clear section headers (Experience, Skills, Education), \
             use bullet points, and include contact information"
        }
        CategoryKind::Quantification => {
            "Add quantified achievements: use numbers, percentages and metrics to show impact \
             (e.g. 'Increased revenue by 25%')"
        }
        CategoryKind::RoleTargeting => {
            "Improve role targeting: open with a summary that names the target role and its \
             key requirements"
        }
    }
}
