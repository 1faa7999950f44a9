// Resume diagnostics that sit beside the similarity scores.
//
// These look at the resume on its own terms: does it have visible structure,
// does it quantify impact, and does its opening paragraph speak to the target
// role. They do not feed the overall score; they feed suggestions and the
// rendered report.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DocumentRole;
use crate::similarity::MatchStrategy;
use crate::text::{normalize, Document};

/// How much of the resume counts as the summary area for role targeting.
const SUMMARY_CHARS: usize = 500;

/// Lines needed before headers or bullets count as present.
const MIN_STRUCTURE_LINES: usize = 3;

static CONTACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("valid contact regex"));

static LINKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://|linkedin\.com|github\.com").expect("valid link regex")
});

static NUMBERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[%+]?").expect("valid number regex"));

static ACTION_VERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "led", "built", "developed", "managed", "designed", "implemented", "created",
        "improved", "increased", "reduced", "achieved", "delivered", "launched", "optimized",
        "automated", "architected", "scaled", "drove", "spearheaded", "orchestrated",
        "mentored", "streamlined",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Formatting,
    Quantification,
    RoleTargeting,
}

impl CategoryKind {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryKind::Formatting => "Formatting & Structure",
            CategoryKind::Quantification => "Quantification & Impact",
            CategoryKind::RoleTargeting => "Role Targeting",
        }
    }

    /// (strong, moderate) lower bounds on the 0-100 category score.
    fn status_cutoffs(&self) -> (f64, f64) {
        match self {
            CategoryKind::Formatting | CategoryKind::Quantification => (70.0, 50.0),
            CategoryKind::RoleTargeting => (60.0, 35.0),
        }
    }

    /// Scores below this produce a suggestion.
    fn suggestion_cutoff(&self) -> f64 {
        match self {
            CategoryKind::Formatting | CategoryKind::Quantification => 60.0,
            CategoryKind::RoleTargeting => 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    Strong,
    Moderate,
    Weak,
}

impl CategoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryStatus::Strong => "strong",
            CategoryStatus::Moderate => "moderate",
            CategoryStatus::Weak => "weak",
        }
    }
}

impl std::fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub kind: CategoryKind,
    /// 0-100.
    pub score: f64,
    pub status: CategoryStatus,
}

impl CategoryScore {
    fn new(kind: CategoryKind, score: f64) -> Self {
        let score = score.clamp(0.0, 100.0);
        let (strong, moderate) = kind.status_cutoffs();
        let status = if score >= strong {
            CategoryStatus::Strong
        } else if score >= moderate {
            CategoryStatus::Moderate
        } else {
            CategoryStatus::Weak
        };
        Self {
            kind,
            score,
            status,
        }
    }

    pub fn needs_attention(&self) -> bool {
        self.score < self.kind.suggestion_cutoff()
    }
}

/// Run all resume diagnostics. Output order is fixed: formatting,
/// quantification, role targeting.
pub fn analyze_categories(
    resume_text: &str,
    jd_document: &Document,
    strategy: &dyn MatchStrategy,
) -> Vec<CategoryScore> {
    vec![
        CategoryScore::new(CategoryKind::Formatting, formatting_score(resume_text)),
        CategoryScore::new(CategoryKind::Quantification, quantification_score(resume_text)),
        CategoryScore::new(
            CategoryKind::RoleTargeting,
            role_targeting_score(resume_text, jd_document, strategy),
        ),
    ]
}

fn is_section_header(line: &str) -> bool {
    if line.starts_with('#') {
        return true;
    }
    let mut letters = line.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| c.is_uppercase())
}

fn is_bullet(line: &str) -> bool {
    line.starts_with(['-', '•', '*'])
}

fn formatting_score(resume_text: &str) -> f64 {
    let lines: Vec<&str> = resume_text.lines().map(str::trim).collect();
    let headers = lines.iter().filter(|l| is_section_header(l)).count();
    let bullets = lines.iter().filter(|l| is_bullet(l)).count();

    let mut score = 50.0;
    if headers >= MIN_STRUCTURE_LINES {
        score += 15.0;
    }
    if bullets >= MIN_STRUCTURE_LINES {
        score += 15.0;
    }
    if CONTACT.is_match(resume_text) {
        score += 10.0;
    }
    if LINKS.is_match(resume_text) {
        score += 10.0;
    }
    score
}

fn quantification_score(resume_text: &str) -> f64 {
    let figures = NUMBERS.find_iter(resume_text).count();
    let mut score: f64 = match figures {
        n if n >= 8 => 90.0,
        n if n >= 5 => 75.0,
        n if n >= 3 => 60.0,
        n if n >= 1 => 50.0,
        _ => 40.0,
    };

    let lowered = resume_text.to_lowercase();
    let verbs: HashSet<&str> = lowered
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| ACTION_VERBS.contains(w))
        .collect();
    if verbs.len() >= 5 {
        score = (score + 10.0).min(100.0);
    }
    score
}

fn role_targeting_score(
    resume_text: &str,
    jd_document: &Document,
    strategy: &dyn MatchStrategy,
) -> f64 {
    let jd_terms: HashSet<String> = jd_document
        .tokens()
        .iter()
        .map(|t| strategy.canonical(t))
        .collect();
    if jd_terms.is_empty() {
        return 0.0;
    }

    let summary: String = resume_text.chars().take(SUMMARY_CHARS).collect();
    let Ok(summary_doc) = normalize(&summary, DocumentRole::Resume) else {
        return 0.0;
    };
    let summary_terms: HashSet<String> = summary_doc
        .tokens()
        .iter()
        .map(|t| strategy.canonical(t))
        .collect();

    let overlap = jd_terms.intersection(&summary_terms).count() as f64 / jd_terms.len() as f64;
    (overlap * 150.0).min(100.0)
}
