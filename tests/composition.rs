// Composition tests: the full score() pipeline end to end.
//
// These tests exercise the data flow between modules:
//   normalize -> keywords -> {lexical, tf-idf, semantic} -> aggregate -> suggestions
// with stub embedding providers, so no network calls or model files are
// involved (except report generation, which writes to a temp directory).

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use atsgauge::embedding::{EmbeddingProvider, HashedNgramEmbedder, UnavailableProvider};
use atsgauge::pipeline::rank::{rank_resumes, ResumeInput};
use atsgauge::scoring::{Band, BandThresholds, ScoringWeights, SubScoreKind};
use atsgauge::similarity::MatchStrategyKind;
use atsgauge::{score, DocumentRole, ScoringConfig, ScoringError};

const REFERENCE_RESUME: &str = "Built REST APIs using Python and SQL";
const REFERENCE_JD: &str = "Seeking engineer skilled in Python, SQL, and distributed systems";

/// Returns the same unit vector for every text and counts calls.
#[derive(Default)]
struct FixedProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.0, 1.0, 0.0])
    }
}

/// Never answers.
struct HangingProvider;

#[async_trait]
impl EmbeddingProvider for HangingProvider {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f64>> {
        std::future::pending::<()>().await;
        unreachable!()
    }
}

// ============================================================
// Reference example
// ============================================================

#[tokio::test]
async fn reference_example_reports_missing_phrase() {
    let report = score(
        REFERENCE_RESUME,
        REFERENCE_JD,
        &ScoringConfig::default(),
        &FixedProvider::default(),
    )
    .await
    .unwrap();

    assert!(report
        .missing_keywords()
        .contains(&"distributed systems".to_string()));
    let lexical = report.sub_score(SubScoreKind::Lexical).unwrap();
    assert!((lexical - 2.0 / 3.0).abs() < 1e-9, "lexical {lexical}");
    assert_eq!(report.matched_keywords(), ["python".to_string(), "sql".to_string()]);
    assert!(report
        .suggestions()
        .iter()
        .any(|s| s.contains("'distributed systems'")));
}

#[tokio::test]
async fn semantic_provider_called_once_per_document() {
    let provider = FixedProvider::default();
    score(REFERENCE_RESUME, REFERENCE_JD, &ScoringConfig::default(), &provider)
        .await
        .unwrap();
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

// ============================================================
// Coverage extremes
// ============================================================

#[tokio::test]
async fn full_keyword_coverage_scores_lexical_one() {
    let jd = "Rust, Kafka. Kubernetes operators. Event sourcing.";
    let resume = "Wrote Kubernetes operators in Rust; event sourcing on Kafka.";
    let report = score(resume, jd, &ScoringConfig::default(), &FixedProvider::default())
        .await
        .unwrap();
    assert_eq!(report.sub_score(SubScoreKind::Lexical), Some(1.0));
    assert!(report.missing_keywords().is_empty());
}

#[tokio::test]
async fn no_shared_tokens_scores_zero_except_semantic() {
    let report = score(
        "Watercolor painting, pottery and calligraphy",
        "Kubernetes operators in Go",
        &ScoringConfig::default(),
        &FixedProvider::default(),
    )
    .await
    .unwrap();
    assert_eq!(report.sub_score(SubScoreKind::Lexical), Some(0.0));
    assert_eq!(report.sub_score(SubScoreKind::Statistical), Some(0.0));
    // The fixed stub maps every text to the same vector
    assert_eq!(report.sub_score(SubScoreKind::Semantic), Some(1.0));
    assert!((report.overall_score() - 25.0).abs() < 1e-9);
    assert_eq!(report.band(), Band::Poor);
}

// ============================================================
// Degraded mode
// ============================================================

#[tokio::test]
async fn failing_provider_degrades_instead_of_erroring() {
    let report = score(
        REFERENCE_RESUME,
        REFERENCE_JD,
        &ScoringConfig::default(),
        &UnavailableProvider,
    )
    .await
    .unwrap();

    assert!(report.is_degraded());
    assert!(report.sub_score(SubScoreKind::Semantic).is_none());

    let lexical = report.sub_score(SubScoreKind::Lexical).unwrap();
    let statistical = report.sub_score(SubScoreKind::Statistical).unwrap();
    let expected = 100.0 * (lexical * 2.0 / 3.0 + statistical / 3.0);
    assert!((report.overall_score() - expected).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn hanging_provider_times_out_into_degraded_mode() {
    let config = ScoringConfig {
        embedding_timeout_ms: 200,
        ..Default::default()
    };
    let report = score(REFERENCE_RESUME, REFERENCE_JD, &config, &HangingProvider)
        .await
        .unwrap();
    assert!(report.is_degraded());
    assert!(report.degradation_reason().unwrap().contains("timed out"));
}

#[tokio::test]
async fn degraded_report_serializes_flag() {
    let report = score(
        REFERENCE_RESUME,
        REFERENCE_JD,
        &ScoringConfig::default(),
        &UnavailableProvider,
    )
    .await
    .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["degraded"], true);
    assert_eq!(json["sub_scores"].as_array().unwrap().len(), 2);
}

// ============================================================
// Caller errors
// ============================================================

#[tokio::test]
async fn empty_job_description_is_caller_error() {
    let err = score(REFERENCE_RESUME, "", &ScoringConfig::default(), &HashedNgramEmbedder::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScoringError::EmptyDocument(DocumentRole::JobDescription)
    ));
    assert!(err.is_caller_error());
}

#[tokio::test]
async fn invalid_config_is_rejected_before_scoring() {
    let config = ScoringConfig {
        max_suggestions: 0,
        ..Default::default()
    };
    let provider = FixedProvider::default();
    let err = score(REFERENCE_RESUME, REFERENCE_JD, &config, &provider)
        .await
        .unwrap_err();
    assert!(matches!(err, ScoringError::InvalidConfig(_)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

// ============================================================
// Configuration flows through
// ============================================================

#[tokio::test]
async fn custom_weights_and_bands_apply() {
    let config = ScoringConfig {
        weights: ScoringWeights {
            lexical: 1.0,
            statistical: 0.0,
            semantic: 0.0,
        },
        band_thresholds: BandThresholds {
            poor: 0.0,
            fair: 30.0,
            good: 50.0,
            excellent: 65.0,
        },
        ..Default::default()
    };
    let report = score(REFERENCE_RESUME, REFERENCE_JD, &config, &FixedProvider::default())
        .await
        .unwrap();
    assert!((report.overall_score() - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(report.band(), Band::Excellent);
}

#[tokio::test]
async fn stemmed_strategy_flows_through_score() {
    let jd = "Microservices. Microservices. Databases.";
    let resume = "Designed a microservice backed by a database";
    let exact = score(resume, jd, &ScoringConfig::default(), &FixedProvider::default())
        .await
        .unwrap();
    let stemmed = score(
        resume,
        jd,
        &ScoringConfig {
            match_strategy: MatchStrategyKind::Stemmed,
            ..Default::default()
        },
        &FixedProvider::default(),
    )
    .await
    .unwrap();
    assert_eq!(exact.sub_score(SubScoreKind::Lexical), Some(0.0));
    assert_eq!(stemmed.sub_score(SubScoreKind::Lexical), Some(1.0));
}

#[tokio::test]
async fn max_keywords_caps_report_keyword_lists() {
    let jd = "Rust. Java. Scala. Kotlin. Swift. Haskell.";
    let config = ScoringConfig {
        max_keywords: 2,
        ..Default::default()
    };
    let report = score("Rust and Scala", jd, &config, &FixedProvider::default())
        .await
        .unwrap();

    assert_eq!(report.matched_keywords(), ["rust".to_string()]);
    assert_eq!(report.missing_keywords(), ["java".to_string()]);
    // Scala sits outside the capped set, so it earns no credit
    assert_eq!(report.sub_score(SubScoreKind::Lexical), Some(0.5));
}

#[tokio::test]
async fn suggestions_are_capped() {
    let jd = "Rust. Go. Kafka. Kubernetes. Terraform. Ansible. Postgres. Redis. GraphQL. gRPC.";
    let config = ScoringConfig {
        max_suggestions: 3,
        ..Default::default()
    };
    let report = score("Watercolor painting", jd, &config, &UnavailableProvider)
        .await
        .unwrap();
    assert_eq!(report.suggestions().len(), 3);
    assert!(report.suggestions()[0].starts_with("Add the keyword"));
}

// ============================================================
// Batch ranking
// ============================================================

#[tokio::test]
async fn rank_orders_by_score_and_reports_failures() {
    let jd = "Rust developer: Kafka streaming, Kubernetes, Postgres";
    let resumes = vec![
        ResumeInput::new("partial.txt", "Rust and Postgres"),
        ResumeInput::new("empty.txt", ""),
        ResumeInput::new("full.txt", "Rust developer with Kafka streaming, Kubernetes and Postgres"),
        ResumeInput::new("none.txt", "Landscape gardening"),
    ];
    let ranked = rank_resumes(
        jd,
        resumes,
        &ScoringConfig::default(),
        &HashedNgramEmbedder::default(),
        3,
    )
    .await
    .unwrap();

    let labels: Vec<&str> = ranked.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["full.txt", "partial.txt", "none.txt", "empty.txt"]);
    assert!(ranked[3].result.is_err());
    let scores: Vec<f64> = ranked.iter().filter_map(|r| r.overall_score()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

// ============================================================
// Report output
// ============================================================

#[tokio::test]
async fn markdown_report_written_for_scored_pair() {
    let report = score(
        REFERENCE_RESUME,
        REFERENCE_JD,
        &ScoringConfig::default(),
        &FixedProvider::default(),
    )
    .await
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.md");
    atsgauge::output::markdown::generate_report(
        &report,
        "resume.txt",
        "job.txt",
        path.to_str().unwrap(),
    )
    .unwrap();

    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.contains("`distributed systems`"));
    assert!(body.contains("resume.txt"));
}
