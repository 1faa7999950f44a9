// Remote embedding provider for OpenAI-compatible `/embeddings` endpoints.
//
// Works with hosted APIs and with self-hosted servers (text-embeddings-
// inference, Ollama's OpenAI shim, vLLM) that accept
//
//   POST {url}  {"model": "...", "input": "..."}
//
// and answer with `{"data": [{"embedding": [...]}]}`. No retries here: the
// engine applies its own deadline and degrades on failure.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::EmbeddingProvider;

pub struct HttpEmbedder {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
    rate_limiter: RateLimiter,
}

impl HttpEmbedder {
    /// Create a provider for the given endpoint URL and model name.
    ///
    /// Fails when `requests_per_second` is not a usable rate.
    pub fn new(
        url: String,
        api_key: Option<String>,
        model: String,
        requests_per_second: f64,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            url,
            api_key: api_key.filter(|k| !k.is_empty()),
            model,
            rate_limiter: RateLimiter::new(requests_per_second)
                .context("Invalid embedding request rate")?,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        self.rate_limiter.acquire().await;

        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to call embedding endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Embedding endpoint returned {}: {}", status, body);
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse embedding response")?;

        let embedding = parsed.into_embedding()?;
        debug!(dim = embedding.len(), model = %self.model, "Received remote embedding");
        Ok(embedding)
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

impl EmbeddingResponse {
    fn into_embedding(self) -> Result<Vec<f64>> {
        let first = self
            .data
            .into_iter()
            .next()
            .context("Embedding response contained no data")?;
        if first.embedding.is_empty() {
            anyhow::bail!("Embedding response contained an empty vector");
        }
        Ok(first.embedding)
    }
}
