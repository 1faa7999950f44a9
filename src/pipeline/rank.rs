// Rank many resumes against one job description.
//
// The job description is normalized and its keywords extracted once; resumes
// are then scored concurrently with buffer_unordered. A resume that fails
// (empty file, say) is reported in the results without stopping the batch.
// A bad job description or config fails the whole call up front.

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::ScoringError;
use crate::keywords::FrequencyExtractor;
use crate::scoring::{score_against, JobProfile, ScoreReport, ScoringConfig};

/// A resume to rank: a caller-chosen label (usually the file name) and its text.
#[derive(Debug, Clone)]
pub struct ResumeInput {
    pub label: String,
    pub text: String,
}

impl ResumeInput {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Outcome for one resume in a batch.
#[derive(Debug)]
pub struct RankedResume {
    pub label: String,
    pub result: Result<ScoreReport, ScoringError>,
}

impl RankedResume {
    pub fn overall_score(&self) -> Option<f64> {
        self.result.as_ref().ok().map(|r| r.overall_score())
    }
}

/// Score every resume and return them best first. Failed resumes sort last,
/// in input order.
pub async fn rank_resumes(
    jd_text: &str,
    resumes: Vec<ResumeInput>,
    config: &ScoringConfig,
    provider: &dyn EmbeddingProvider,
    concurrency: usize,
) -> Result<Vec<RankedResume>, ScoringError> {
    config.validate()?;
    let extractor = FrequencyExtractor {
        max_terms: config.max_keywords,
    };
    let job = JobProfile::prepare(jd_text, &extractor)?;
    let concurrency = concurrency.max(1);

    info!(
        resumes = resumes.len(),
        keywords = job.keywords().len(),
        concurrency,
        "Ranking resumes"
    );

    let pb = ProgressBar::new(resumes.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("  Scoring [{bar:30}] {pos}/{len} ({eta})") {
        pb.set_style(style);
    }

    let job = &job;
    let mut pending = stream::iter(resumes.into_iter().enumerate().map(|(index, resume)| async move {
        let result = score_against(&resume.text, job, config, provider).await;
        (
            index,
            RankedResume {
                label: resume.label,
                result,
            },
        )
    }))
    .buffer_unordered(concurrency);

    let mut ranked = Vec::new();
    while let Some((index, entry)) = pending.next().await {
        if let Err(e) = &entry.result {
            warn!(resume = %entry.label, error = %e, "Failed to score resume, keeping it in the results");
        }
        ranked.push((index, entry));
        pb.inc(1);
    }
    pb.finish_and_clear();

    ranked.sort_by(|(ia, a), (ib, b)| match (a.overall_score(), b.overall_score()) {
        (Some(sa), Some(sb)) => sb.total_cmp(&sa).then(ia.cmp(ib)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => ia.cmp(ib),
    });

    Ok(ranked.into_iter().map(|(_, entry)| entry).collect())
}
