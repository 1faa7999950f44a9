// Batch workflows built on top of the single-pair scoring engine.

pub mod rank;
