// Text normalization: the shared front end of every scorer.

pub mod normalize;

pub use normalize::{normalize, Document};
