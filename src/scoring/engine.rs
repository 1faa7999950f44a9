// The scoring entry point: two raw texts in, one ScoreReport out.
//
// Flow: normalize both texts, extract the job's keyword set, run the lexical,
// statistical and semantic scorers, aggregate, then attach keyword lists,
// resume diagnostics and suggestions. Only the semantic step can suspend.
// Its failure degrades the score and is never returned to the caller.

use tracing::{debug, info, warn};

use super::aggregate::aggregate;
use super::categories::analyze_categories;
use super::config::ScoringConfig;
use super::report::{ScoreReport, SubScoreKind};
use super::suggestions::generate_suggestions;
use crate::embedding::EmbeddingProvider;
use crate::error::{DocumentRole, ScoringError};
use crate::keywords::{FrequencyExtractor, KeywordExtractor, KeywordSet};
use crate::similarity::{match_keywords, semantic_similarity, tfidf_similarity};
use crate::text::{normalize, Document};

/// A normalized job description and its required keyword set.
///
/// Prepare once and reuse when scoring many resumes against the same job.
#[derive(Debug, Clone)]
pub struct JobProfile {
    document: Document,
    keywords: KeywordSet,
}

impl JobProfile {
    pub fn prepare(jd_text: &str, extractor: &dyn KeywordExtractor) -> Result<Self, ScoringError> {
        let document = normalize(jd_text, DocumentRole::JobDescription)?;
        let keywords = extractor.extract(&document)?;
        debug!(
            tokens = document.len(),
            keywords = keywords.len(),
            "Prepared job description"
        );
        Ok(Self { document, keywords })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }
}

/// Score a resume against a job description.
///
/// Caller errors (empty text, a job description with no usable terms, bad
/// config) are returned immediately. The job description is checked before
/// the resume.
pub async fn score(
    resume_text: &str,
    jd_text: &str,
    config: &ScoringConfig,
    provider: &dyn EmbeddingProvider,
) -> Result<ScoreReport, ScoringError> {
    config.validate()?;
    let extractor = FrequencyExtractor {
        max_terms: config.max_keywords,
    };
    let job = JobProfile::prepare(jd_text, &extractor)?;
    score_against(resume_text, &job, config, provider).await
}

/// Score a resume against an already prepared job.
pub async fn score_against(
    resume_text: &str,
    job: &JobProfile,
    config: &ScoringConfig,
    provider: &dyn EmbeddingProvider,
) -> Result<ScoreReport, ScoringError> {
    config.validate()?;
    let resume = normalize(resume_text, DocumentRole::Resume)?;
    let strategy = config.match_strategy.strategy();

    let lexical = match_keywords(&resume, job.keywords(), strategy.as_ref());
    let statistical = tfidf_similarity(&resume, job.document());

    let semantic = semantic_similarity(
        &resume,
        job.document(),
        provider,
        config.embedding_timeout(),
    )
    .await;
    let (semantic_score, degradation_reason) = match semantic {
        Ok(value) => (Some(value), None),
        Err(e) => {
            warn!(
                provider = provider.name(),
                error = %e,
                "Semantic scoring unavailable, redistributing its weight"
            );
            (None, Some(e.to_string()))
        }
    };

    let mut report = aggregate(
        lexical.score,
        statistical,
        semantic_score,
        &config.weights,
        &config.band_thresholds,
        config.calibration,
    );
    if let Some(reason) = degradation_reason {
        report = report.with_degradation_reason(reason);
    }

    let categories = analyze_categories(resume_text, job.document(), strategy.as_ref());
    let report = report
        .with_keywords(lexical.matched_terms(), lexical.missing_terms())
        .with_categories(categories);
    let suggestions = generate_suggestions(&report, &lexical.missing, config);
    let report = report.with_suggestions(suggestions);

    info!(
        overall = report.overall_score(),
        band = %report.band(),
        lexical = lexical.score,
        statistical,
        semantic = ?report.sub_score(SubScoreKind::Semantic),
        missing = report.missing_keywords().len(),
        degraded = report.is_degraded(),
        strategy = strategy.name(),
        "Scored resume"
    );

    Ok(report)
}
