// Sentence embeddings from a local all-MiniLM-L6-v2 ONNX model.
//
// Texts are tokenized, run through the BERT encoder, and mean-pooled over the
// attention mask into a 384-dimensional vector. The session is loaded once
// and shared behind Arc<Mutex<_>>; inference runs on spawn_blocking so the
// async runtime (and the engine's embedding timeout) stays responsive.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::traits::EmbeddingProvider;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// The model's maximum sequence length; longer resumes are truncated.
const MAX_TOKENS: usize = 256;

pub struct OnnxEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl OnnxEmbedder {
    /// Load the model and tokenizer from `model_dir`.
    ///
    /// Expects `model.onnx` and `tokenizer.json` in the directory.
    /// Run `atsgauge download-model` first if they don't exist.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "Embedding model not found: {}\nRun `atsgauge download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Embedding tokenizer not found: {}\nRun `atsgauge download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!(
                    "Failed to load embedding model from {}",
                    model_path.display()
                )
            })?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load embedding tokenizer: {}", e))?;
        limit_sequence_length(&mut tokenizer)?;

        debug!("Loaded sentence embedding model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OnnxEmbedder {
    fn name(&self) -> &'static str {
        "onnx-minilm"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || embed_sync(&session, &tokenizer, &text))
            .await
            .context("spawn_blocking panicked")?
    }
}

/// Tokenize, run inference, and mean-pool a single text.
fn embed_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    text: &str,
) -> Result<Vec<f64>> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

    // The tokenizer already truncates to MAX_TOKENS, special tokens included
    let seq_len = encoding.get_ids().len();
    if seq_len == 0 {
        return Ok(vec![0.0; EMBEDDING_DIM]);
    }

    let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
    let attention_mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&m| m as i64)
        .collect();
    let token_type_ids: Vec<i64> = vec![0; seq_len];

    let shape = [1_i64, seq_len as i64];

    let input_ids_tensor =
        Tensor::from_array((shape, input_ids)).context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, attention_mask.clone()))
        .context("Failed to create attention_mask tensor")?;
    let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids))
        .context("Failed to create token_type_ids tensor")?;

    // Output 0 is last_hidden_state: [1, seq_len, 384]
    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            })
            .context("Embedding ONNX inference failed")?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract embedding output tensor")?;

        data.to_vec()
    };

    if hidden_states.len() < seq_len * EMBEDDING_DIM {
        anyhow::bail!(
            "Unexpected embedding output size {} for {} tokens",
            hidden_states.len(),
            seq_len
        );
    }

    Ok(mean_pool(&hidden_states, &attention_mask))
}

/// Cap encodings at MAX_TOKENS. Truncation happens before the post-processor
/// adds [CLS] and [SEP], so both survive on long resumes.
fn limit_sequence_length(tokenizer: &mut Tokenizer) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: MAX_TOKENS,
            ..Default::default()
        }))
        .map_err(|e| anyhow::anyhow!("Failed to configure tokenizer truncation: {}", e))?;
    tokenizer.with_padding(None);
    Ok(())
}

/// Average token embeddings weighted by the attention mask.
pub fn mean_pool(hidden_states: &[f32], attention_mask: &[i64]) -> Vec<f64> {
    let mut sum = vec![0.0_f64; EMBEDDING_DIM];
    let mut mask_sum = 0.0_f64;

    for (j, &mask) in attention_mask.iter().enumerate() {
        if mask <= 0 {
            continue;
        }
        let mask_val = mask as f64;
        mask_sum += mask_val;
        let offset = j * EMBEDDING_DIM;
        for (k, slot) in sum.iter_mut().enumerate() {
            *slot += hidden_states[offset + k] as f64 * mask_val;
        }
    }

    if mask_sum > 0.0 {
        for val in &mut sum {
            *val /= mask_sum;
        }
    }
    sum
}
