use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::scoring::ScoringConfig;

/// Default model name sent to a remote embedding endpoint.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Which embedding provider backs the semantic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Local character n-gram hashing (default): no model, no network
    Hashed,
    /// Local all-MiniLM-L6-v2 ONNX model, needs `download-model` first
    Onnx,
    /// OpenAI-compatible `/embeddings` endpoint, needs ATS_EMBEDDING_URL
    Http,
}

impl EmbeddingBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingBackend::Hashed => "hashed",
            EmbeddingBackend::Onnx => "onnx",
            EmbeddingBackend::Http => "http",
        }
    }
}

/// Process configuration loaded from environment variables.
///
/// The .env file is loaded by the binary via dotenvy before this runs.
/// Scoring knobs come from an optional JSON file (ATS_CONFIG_FILE), then
/// individual ATS_* overrides, then validation.
#[derive(Debug, Clone)]
pub struct Config {
    pub embedder: EmbeddingBackend,
    /// Directory holding downloaded ONNX models
    pub model_dir: PathBuf,
    pub embedding_url: Option<String>,
    pub embedding_api_key: String,
    pub embedding_model: String,
    /// Request cap for the remote endpoint; 0 means unlimited
    pub embedding_rps: f64,
    pub config_file: Option<PathBuf>,
    pub scoring: ScoringConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let embedder = match var("ATS_EMBEDDER").as_deref() {
            None | Some("hashed") => EmbeddingBackend::Hashed,
            Some("onnx") => EmbeddingBackend::Onnx,
            Some("http") => EmbeddingBackend::Http,
            Some(other) => anyhow::bail!(
                "Unknown ATS_EMBEDDER '{other}'. Expected one of: hashed, onnx, http"
            ),
        };

        let model_dir = var("ATS_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(crate::embedding::download::default_model_dir);

        let config_file = var("ATS_CONFIG_FILE").map(PathBuf::from);
        let mut scoring = match &config_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read scoring config {}", path.display()))?;
                serde_json::from_str::<ScoringConfig>(&raw)
                    .with_context(|| format!("Failed to parse scoring config {}", path.display()))?
            }
            None => ScoringConfig::default(),
        };

        if let Some(v) = var("ATS_MAX_KEYWORDS") {
            scoring.max_keywords = v
                .parse()
                .with_context(|| format!("ATS_MAX_KEYWORDS must be a whole number, got '{v}'"))?;
        }
        if let Some(v) = var("ATS_MAX_SUGGESTIONS") {
            scoring.max_suggestions = v
                .parse()
                .with_context(|| format!("ATS_MAX_SUGGESTIONS must be a whole number, got '{v}'"))?;
        }
        if let Some(v) = var("ATS_EMBEDDING_TIMEOUT_MS") {
            scoring.embedding_timeout_ms = v.parse().with_context(|| {
                format!("ATS_EMBEDDING_TIMEOUT_MS must be a whole number, got '{v}'")
            })?;
        }
        scoring.validate()?;

        let embedding_rps = match var("ATS_EMBEDDING_RPS") {
            Some(v) => {
                let rps: f64 = v
                    .parse()
                    .with_context(|| format!("ATS_EMBEDDING_RPS must be a number, got '{v}'"))?;
                crate::embedding::rate_limiter::interval_for(rps)
                    .with_context(|| format!("ATS_EMBEDDING_RPS is not a usable rate: '{v}'"))?;
                rps
            }
            None => 0.0,
        };

        Ok(Self {
            embedder,
            model_dir,
            embedding_url: var("ATS_EMBEDDING_URL"),
            embedding_api_key: var("ATS_EMBEDDING_API_KEY").unwrap_or_default(),
            embedding_model: var("ATS_EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_rps,
            config_file,
            scoring,
        })
    }

    /// Validate that the chosen embedding backend has what it needs.
    /// For ONNX: model files must exist (or the user should run download-model).
    /// For HTTP: the endpoint URL must be set.
    pub fn require_embedder(&self) -> Result<()> {
        match self.embedder {
            EmbeddingBackend::Hashed => Ok(()),
            EmbeddingBackend::Onnx => {
                if !cfg!(feature = "onnx") {
                    anyhow::bail!(
                        "ATS_EMBEDDER=onnx but the 'onnx' feature is not compiled in.\n\
                         Rebuild with: cargo build --features onnx"
                    );
                }
                if !crate::embedding::download::embedding_files_present(&self.model_dir) {
                    anyhow::bail!(
                        "Embedding model files not found in {}\n\
                         Run `atsgauge download-model` to download them.\n\
                         Or set ATS_EMBEDDER=hashed to use the built-in embedder instead.",
                        self.model_dir.display()
                    );
                }
                Ok(())
            }
            EmbeddingBackend::Http => {
                if self.embedding_url.is_none() {
                    anyhow::bail!(
                        "ATS_EMBEDDER=http but ATS_EMBEDDING_URL is not set.\n\
                         Set it in the environment or your .env file, e.g.\n\
                         ATS_EMBEDDING_URL=http://localhost:8080/v1/embeddings"
                    );
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.embedder, EmbeddingBackend::Hashed);
        assert_eq!(config.scoring, ScoringConfig::default());
        assert_eq!(config.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert!(config.require_embedder().is_ok());
    }

    #[test]
    fn test_overrides_apply() {
        let config = load(&[
            ("ATS_MAX_KEYWORDS", "10"),
            ("ATS_MAX_SUGGESTIONS", "3"),
            ("ATS_EMBEDDING_TIMEOUT_MS", "250"),
        ])
        .unwrap();
        assert_eq!(config.scoring.max_keywords, 10);
        assert_eq!(config.scoring.max_suggestions, 3);
        assert_eq!(config.scoring.embedding_timeout_ms, 250);
    }

    #[test]
    fn test_bad_override_is_error() {
        assert!(load(&[("ATS_MAX_KEYWORDS", "lots")]).is_err());
        assert!(load(&[("ATS_MAX_KEYWORDS", "0")]).is_err());
    }

    #[test]
    fn test_unknown_embedder_is_error() {
        assert!(load(&[("ATS_EMBEDDER", "word2vec")]).is_err());
    }

    #[test]
    fn test_http_requires_url() {
        let config = load(&[("ATS_EMBEDDER", "http")]).unwrap();
        let err = config.require_embedder().unwrap_err().to_string();
        assert!(err.contains("ATS_EMBEDDING_URL"));
        assert!(!err.contains(".env.example"));
        let config = load(&[
            ("ATS_EMBEDDER", "http"),
            ("ATS_EMBEDDING_URL", "http://localhost:8080/v1/embeddings"),
        ])
        .unwrap();
        assert!(config.require_embedder().is_ok());
    }

    #[test]
    fn test_onnx_requires_model_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&[
            ("ATS_EMBEDDER", "onnx"),
            ("ATS_MODEL_DIR", dir.path().to_str().unwrap()),
        ])
        .unwrap();
        assert!(config.require_embedder().is_err());
    }

    #[test]
    fn test_scoring_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoring.json");
        std::fs::write(
            &path,
            r#"{"weights": {"lexical": 0.4, "statistical": 0.4, "semantic": 0.2}, "calibration": "sigmoid"}"#,
        )
        .unwrap();
        let config = load(&[("ATS_CONFIG_FILE", path.to_str().unwrap())]).unwrap();
        assert_eq!(config.scoring.weights.lexical, 0.4);
        assert_eq!(config.scoring.calibration, crate::scoring::Calibration::Sigmoid);
        assert_eq!(config.config_file.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_invalid_config_file_weights_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoring.json");
        std::fs::write(&path, r#"{"weights": {"lexical": 1.0, "statistical": 1.0, "semantic": 1.0}}"#)
            .unwrap();
        assert!(load(&[("ATS_CONFIG_FILE", path.to_str().unwrap())]).is_err());
    }

    #[test]
    fn test_embedding_rps_parsed() {
        let config = load(&[("ATS_EMBEDDING_RPS", "2.5")]).unwrap();
        assert_eq!(config.embedding_rps, 2.5);
        assert_eq!(load(&[]).unwrap().embedding_rps, 0.0);
    }

    #[test]
    fn test_unusable_embedding_rps_is_error() {
        let tiny = load(&[
            ("ATS_EMBEDDER", "http"),
            ("ATS_EMBEDDING_URL", "http://localhost:8080/v1/embeddings"),
            ("ATS_EMBEDDING_RPS", "1e-20"),
        ]);
        let err = tiny.unwrap_err();
        assert!(format!("{err:#}").contains("ATS_EMBEDDING_RPS"));

        assert!(load(&[("ATS_EMBEDDING_RPS", "-3")]).is_err());
        assert!(load(&[("ATS_EMBEDDING_RPS", "inf")]).is_err());
        assert!(load(&[("ATS_EMBEDDING_RPS", "NaN")]).is_err());
    }
}
