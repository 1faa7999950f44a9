// Markdown report generation.
//
// Writes a shareable report for one resume/job pair. The rendering is a pure
// function so it can be checked without touching the filesystem.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::scoring::{ScoreReport, SubScoreKind};

/// Render a report as Markdown. `resume` and `job` are display labels,
/// typically the input file names.
pub fn render_report(
    report: &ScoreReport,
    resume: &str,
    job: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut md = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(md, "# ATS Compatibility Report\n");
    let _ = writeln!(md, "- **Resume:** {resume}");
    let _ = writeln!(md, "- **Job description:** {job}");
    let _ = writeln!(
        md,
        "- **Generated:** {}\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    let _ = writeln!(
        md,
        "## Overall: {:.1} ({})\n",
        report.overall_score(),
        report.band()
    );
    if report.is_degraded() {
        let _ = writeln!(
            md,
            "> **Degraded mode:** the semantic score was unavailable{} and its weight was \
             redistributed across the remaining scores.\n",
            report
                .degradation_reason()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default()
        );
    }

    let _ = writeln!(md, "| Score | Value | Weight |");
    let _ = writeln!(md, "|---|---:|---:|");
    let weights = report.weights();
    for sub in report.sub_scores() {
        let weight = match sub.kind {
            SubScoreKind::Lexical => weights.lexical,
            SubScoreKind::Statistical => weights.statistical,
            SubScoreKind::Semantic => weights.semantic,
        };
        let _ = writeln!(
            md,
            "| {} | {:.1}% | {:.2} |",
            sub.kind,
            sub.value * 100.0,
            weight
        );
    }
    md.push('\n');

    let _ = writeln!(md, "## Keywords\n");
    let _ = writeln!(md, "**Matched:** {}\n", join_or_none(report.matched_keywords()));
    let _ = writeln!(md, "**Missing:** {}\n", join_or_none(report.missing_keywords()));

    if !report.categories().is_empty() {
        let _ = writeln!(md, "## Resume Checks\n");
        let _ = writeln!(md, "| Check | Score | Status |");
        let _ = writeln!(md, "|---|---:|---|");
        for category in report.categories() {
            let _ = writeln!(
                md,
                "| {} | {:.1} | {} |",
                category.kind.label(),
                category.score,
                category.status
            );
        }
        md.push('\n');
    }

    if !report.suggestions().is_empty() {
        let _ = writeln!(md, "## Suggestions\n");
        for (i, suggestion) in report.suggestions().iter().enumerate() {
            let _ = writeln!(md, "{}. {}", i + 1, suggestion);
        }
    }

    md
}

/// Render and write the report to `output_path`, creating parent directories.
/// Returns the path written.
pub fn generate_report(
    report: &ScoreReport,
    resume: &str,
    job: &str,
    output_path: &str,
) -> Result<String> {
    let md = render_report(report, resume, job, Utc::now());

    if let Some(parent) = Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(output_path, md)
        .with_context(|| format!("Failed to write report to {output_path}"))?;

    Ok(output_path.to_string())
}

fn join_or_none(terms: &[String]) -> String {
    if terms.is_empty() {
        "_none_".to_string()
    } else {
        terms
            .iter()
            .map(|t| format!("`{t}`"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{aggregate, BandThresholds, Calibration, ScoringWeights};
    use chrono::TimeZone;

    fn sample(semantic: Option<f64>) -> ScoreReport {
        aggregate(
            0.5,
            0.5,
            semantic,
            &ScoringWeights::default(),
            &BandThresholds::default(),
            Calibration::None,
        )
        .with_keywords(vec!["rust".into()], vec!["kafka".into()])
    }

    #[test]
    fn test_render_contains_sections() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        let md = render_report(&sample(Some(0.5)), "jane.txt", "backend.txt", at);
        assert!(md.starts_with("# ATS Compatibility Report"));
        assert!(md.contains("2025-03-01 12:30 UTC"));
        assert!(md.contains("## Overall: 50.0 (fair)"));
        assert!(md.contains("| semantic | 50.0% | 0.25 |"));
        assert!(md.contains("**Missing:** `kafka`"));
        assert!(!md.contains("Degraded mode"));
    }

    #[test]
    fn test_render_flags_degraded() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let md = render_report(&sample(None), "a", "b", at);
        assert!(md.contains("Degraded mode"));
        assert!(!md.contains("| semantic |"));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.md");
        let path_str = path.to_str().unwrap();
        let written = generate_report(&sample(Some(0.5)), "a", "b", path_str).unwrap();
        assert_eq!(written, path_str);
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("## Keywords"));
    }
}
