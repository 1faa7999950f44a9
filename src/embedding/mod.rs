// Embedding providers behind a common trait.
//
// The EmbeddingProvider trait defines the interface. HashedNgramEmbedder is
// the zero-setup default; OnnxEmbedder runs a local sentence-transformer and
// HttpEmbedder calls a remote endpoint. The scoring core only sees the trait.

pub mod download;
pub mod hashed;
pub mod http;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod rate_limiter;
pub mod traits;

pub use hashed::HashedNgramEmbedder;
pub use traits::{EmbeddingProvider, UnavailableProvider};
