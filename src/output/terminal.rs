// Colored terminal output for score reports, rankings and keyword sets.
//
// main.rs delegates all human-facing formatting here.

use colored::Colorize;

use super::truncate_chars;
use crate::keywords::KeywordSet;
use crate::pipeline::rank::RankedResume;
use crate::scoring::{Band, CategoryStatus, ScoreReport, SubScoreKind};

/// Longest resume label shown in the ranking table.
const LABEL_WIDTH: usize = 32;

/// Display a single score report.
pub fn display_report(report: &ScoreReport) {
    println!("\n{}", "=== ATS Compatibility ===".bold());
    println!(
        "  Overall: {}  ({})",
        format!("{:.1}", report.overall_score()).bold(),
        colorize_band(report.band())
    );
    if (report.overall_score() - report.raw_score()).abs() > f64::EPSILON {
        println!("  {}", format!("Uncalibrated blend: {:.1}", report.raw_score()).dimmed());
    }

    println!("\n  {}", "Sub-scores".underline());
    let weights = report.weights();
    for sub in report.sub_scores() {
        let weight = match sub.kind {
            SubScoreKind::Lexical => weights.lexical,
            SubScoreKind::Statistical => weights.statistical,
            SubScoreKind::Semantic => weights.semantic,
        };
        println!(
            "    {:<12} {:>5.1}%  {}",
            sub.kind.as_str(),
            sub.value * 100.0,
            format!("(weight {:.2})", weight).dimmed()
        );
    }
    if report.is_degraded() {
        println!(
            "    {} semantic score unavailable, weights redistributed{}",
            "!".yellow().bold(),
            report
                .degradation_reason()
                .map(|r| format!(": {r}"))
                .unwrap_or_default()
        );
    }

    if !report.matched_keywords().is_empty() {
        println!("\n  {}", "Matched keywords".underline());
        println!("    {}", report.matched_keywords().join(", ").green());
    }
    if !report.missing_keywords().is_empty() {
        println!("\n  {}", "Missing keywords".underline());
        println!("    {}", report.missing_keywords().join(", ").red());
    }

    if !report.categories().is_empty() {
        println!("\n  {}", "Resume checks".underline());
        for category in report.categories() {
            println!(
                "    {:<26} {:>5.1}  {}",
                category.kind.label(),
                category.score,
                colorize_status(category.status)
            );
        }
    }

    if !report.suggestions().is_empty() {
        println!("\n  {}", "Suggestions".underline());
        for (i, suggestion) in report.suggestions().iter().enumerate() {
            println!("    {}. {}", i + 1, suggestion);
        }
    }
    println!();
}

/// Display a batch ranking, best first.
pub fn display_ranking(ranked: &[RankedResume]) {
    if ranked.is_empty() {
        println!("No resumes to rank.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Resume Ranking ({} resumes) ===", ranked.len()).bold()
    );
    println!();
    println!(
        "  {:>4}  {:<width$} {:>6}  {:<10}  {:>7}",
        "Rank".dimmed(),
        "Resume".dimmed(),
        "Score".dimmed(),
        "Band".dimmed(),
        "Missing".dimmed(),
        width = LABEL_WIDTH,
    );
    println!("  {}", "-".repeat(LABEL_WIDTH + 36).dimmed());

    let mut failed = 0;
    for (i, entry) in ranked.iter().enumerate() {
        let label = truncate_chars(&entry.label, LABEL_WIDTH - 3);
        match &entry.result {
            Ok(report) => {
                let degraded = if report.is_degraded() { " *" } else { "" };
                println!(
                    "  {:>4}. {:<width$} {:>6.1}  {:<10}  {:>7}{}",
                    i + 1,
                    label,
                    report.overall_score(),
                    colorize_band(report.band()),
                    report.missing_keywords().len(),
                    degraded.yellow(),
                    width = LABEL_WIDTH,
                );
            }
            Err(e) => {
                failed += 1;
                println!(
                    "  {:>4}  {:<width$} {}",
                    "-",
                    label,
                    format!("error: {e}").red(),
                    width = LABEL_WIDTH,
                );
            }
        }
    }

    println!();
    if ranked.iter().any(|r| r.result.as_ref().is_ok_and(|s| s.is_degraded())) {
        println!("  {} scored without the semantic layer", "*".yellow());
    }
    if failed > 0 {
        println!("  {} {} resumes could not be scored", "!".red().bold(), failed);
    }
}

/// Display the keyword set extracted from a job description.
pub fn display_keywords(keywords: &KeywordSet) {
    println!(
        "\n{}",
        format!("=== Required Keywords ({}) ===", keywords.len()).bold()
    );
    println!();
    for (i, keyword) in keywords.iter().enumerate() {
        let bar_len = (keyword.weight * 20.0).round() as usize;
        let bar = "#".repeat(bar_len);
        let kind = if keyword.is_phrase { "phrase" } else { "" };
        println!(
            "  {:>3}. {:<28} {:.2}  {}  {}",
            i + 1,
            keyword.term,
            keyword.weight,
            bar.cyan(),
            kind.dimmed()
        );
    }
    println!();
}

fn colorize_band(band: Band) -> colored::ColoredString {
    let text = band.as_str();
    match band {
        Band::Excellent => text.green().bold(),
        Band::Good => text.green(),
        Band::Fair => text.yellow(),
        Band::Poor => text.red(),
    }
}

fn colorize_status(status: CategoryStatus) -> colored::ColoredString {
    let text = status.as_str();
    match status {
        CategoryStatus::Strong => text.green(),
        CategoryStatus::Moderate => text.yellow(),
        CategoryStatus::Weak => text.red(),
    }
}
