// Error taxonomy for the scoring core.
//
// Caller errors (empty or contentless input, bad configuration) are surfaced
// immediately and name the deficient document. EmbeddingUnavailable is an
// infrastructure error: the engine recovers from it by scoring in degraded
// mode, so it never reaches the caller of `score`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two input documents a value or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    Resume,
    JobDescription,
}

impl DocumentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentRole::Resume => "resume",
            DocumentRole::JobDescription => "job description",
        }
    }
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("The {0} is empty or contains only whitespace")]
    EmptyDocument(DocumentRole),

    #[error("The {0} has no extractable keywords after stop-word removal")]
    InsufficientContent(DocumentRole),

    #[error("Embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Invalid scoring configuration: {0}")]
    InvalidConfig(String),
}

impl ScoringError {
    /// True for errors caused by the caller's input rather than infrastructure.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ScoringError::EmptyDocument(_)
                | ScoringError::InsufficientContent(_)
                | ScoringError::InvalidConfig(_)
        )
    }
}
