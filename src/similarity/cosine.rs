// Cosine similarity for sparse term vectors and dense embeddings.
//
//   cos(a, b) = dot(a, b) / (|a| * |b|)
//
// Both variants clamp to [0, 1] and define the zero-magnitude case as 0.0
// rather than failing. Sparse vectors are BTreeMaps so accumulation runs in
// sorted-key order, which makes the result exactly symmetric.

use std::collections::{BTreeMap, BTreeSet};

/// Sparse term -> weight vector.
pub type SparseVector = BTreeMap<String, f64>;

/// Cosine similarity between two sparse term vectors.
pub fn cosine_sparse(a: &SparseVector, b: &SparseVector) -> f64 {
    let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
    if keys.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0;
    for key in keys {
        let x = a.get(key).copied().unwrap_or(0.0);
        let y = b.get(key).copied().unwrap_or(0.0);
        dot += x * y;
    }

    let mag_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b = b.values().map(|x| x * x).sum::<f64>().sqrt();

    finish(dot, mag_a * mag_b)
}

/// Cosine similarity between two dense vectors.
///
/// Mismatched or empty dimensions give 0.0; callers that must distinguish
/// that case check dimensions first.
pub fn cosine_dense(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    finish(dot, mag_a * mag_b)
}

fn finish(dot: f64, denom: f64) -> f64 {
    if denom < f64::EPSILON || !denom.is_finite() {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse(pairs: &[(&str, f64)]) -> SparseVector {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_sparse_identical() {
        let a = sparse(&[("rust", 0.5), ("tokio", 0.3)]);
        assert!((cosine_sparse(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sparse_disjoint() {
        let a = sparse(&[("rust", 0.5)]);
        let b = sparse(&[("java", 0.5)]);
        assert_eq!(cosine_sparse(&a, &b), 0.0);
    }

    #[test]
    fn test_sparse_empty() {
        let empty = SparseVector::new();
        let a = sparse(&[("rust", 1.0)]);
        assert_eq!(cosine_sparse(&empty, &empty), 0.0);
        assert_eq!(cosine_sparse(&empty, &a), 0.0);
    }

    #[test]
    fn test_sparse_exactly_symmetric() {
        let a = sparse(&[("rust", 0.7), ("sql", 0.1), ("aws", 0.33)]);
        let b = sparse(&[("sql", 0.9), ("aws", 0.2), ("go", 0.4)]);
        assert_eq!(cosine_sparse(&a, &b), cosine_sparse(&b, &a));
    }

    #[test]
    fn test_dense_identical_and_proportional() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 4.0, 6.0];
        assert!((cosine_dense(&a, &a) - 1.0).abs() < 1e-10);
        assert!((cosine_dense(&a, &b) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_dense_orthogonal() {
        assert!(cosine_dense(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-12);
    }

    #[test]
    fn test_dense_opposite_clamps_to_zero() {
        assert_eq!(cosine_dense(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_dense_zero_vector_and_mismatch() {
        assert_eq!(cosine_dense(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_dense(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_dense(&[], &[]), 0.0);
    }
}
