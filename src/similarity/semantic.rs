// Semantic similarity through a pluggable embedding provider.
//
// Both raw texts are embedded concurrently under a single deadline. Any
// provider failure, a timeout, an empty vector, or mismatched dimensions
// comes back as EmbeddingUnavailable; the engine turns that into degraded
// scoring. Nothing is retried here.

use std::time::Duration;

use tracing::debug;

use super::cosine::cosine_dense;
use crate::embedding::EmbeddingProvider;
use crate::error::ScoringError;
use crate::text::Document;

/// Cosine similarity of the two documents' embeddings, in [0, 1].
pub async fn semantic_similarity(
    resume_document: &Document,
    jd_document: &Document,
    provider: &dyn EmbeddingProvider,
    timeout: Duration,
) -> Result<f64, ScoringError> {
    let both = async {
        tokio::try_join!(
            provider.embed(resume_document.raw_text()),
            provider.embed(jd_document.raw_text())
        )
    };

    let (resume_vec, jd_vec) = match tokio::time::timeout(timeout, both).await {
        Err(_) => {
            return Err(ScoringError::EmbeddingUnavailable(format!(
                "{} timed out after {} ms",
                provider.name(),
                timeout.as_millis()
            )))
        }
        Ok(Err(e)) => {
            return Err(ScoringError::EmbeddingUnavailable(format!(
                "{}: {:#}",
                provider.name(),
                e
            )))
        }
        Ok(Ok(pair)) => pair,
    };

    if resume_vec.is_empty() || jd_vec.is_empty() {
        return Err(ScoringError::EmbeddingUnavailable(format!(
            "{} returned an empty vector",
            provider.name()
        )));
    }
    if resume_vec.len() != jd_vec.len() {
        return Err(ScoringError::EmbeddingUnavailable(format!(
            "{} returned mismatched dimensions ({} vs {})",
            provider.name(),
            resume_vec.len(),
            jd_vec.len()
        )));
    }
    if resume_vec.iter().chain(jd_vec.iter()).any(|v| !v.is_finite()) {
        return Err(ScoringError::EmbeddingUnavailable(format!(
            "{} returned non-finite values",
            provider.name()
        )));
    }

    let similarity = cosine_dense(&resume_vec, &jd_vec);
    debug!(
        provider = provider.name(),
        dim = resume_vec.len(),
        similarity,
        "Computed semantic similarity"
    );
    Ok(similarity)
}
