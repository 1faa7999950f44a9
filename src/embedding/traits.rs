// Embedding provider trait.
//
// The semantic scorer only needs one capability: turn a text into a
// fixed-length vector. The default implementation hashes character n-grams
// locally; a sentence-transformer ONNX model and a remote HTTP endpoint are
// available behind the same trait. Model lifecycle (loading once, sharing a
// session, retries) belongs to the provider, never to the scoring core.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for embedding text into a dense vector. Implementations must be
/// async because remote providers make HTTP calls and local models offload
/// inference to a blocking thread.
///
/// A single provider instance must return vectors of the same dimensionality
/// for every input.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;
}

/// Provider used when semantic scoring is switched off (e.g. `--no-semantic`).
/// Always fails, which makes the engine score in degraded mode instead of
/// silently producing a fake semantic score.
pub struct UnavailableProvider;

#[async_trait]
impl EmbeddingProvider for UnavailableProvider {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f64>> {
        anyhow::bail!("semantic scoring is disabled")
    }
}
