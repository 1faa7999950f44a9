// Character n-gram feature hashing: the default local embedder.
//
// Each word is padded with spaces and cut into 3- to 5-character grams,
// which are hashed (FNV-1a) into a fixed number of buckets. Counts get
// sublinear scaling and the vector is L2-normalized. Words that share stems
// or fragments ("kubernetes" / "k8s-kubernetes-operator", "program" /
// "programming") land on shared buckets even when their tokens differ, which
// gives a cheap meaning-adjacent signal with no model download and no
// network calls.

use anyhow::Result;
use async_trait::async_trait;

use super::traits::EmbeddingProvider;

/// Default number of hash buckets.
pub const DEFAULT_DIM: usize = 512;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub struct HashedNgramEmbedder {
    /// Output dimensionality (number of hash buckets)
    pub dim: usize,
    /// Smallest n-gram length in characters
    pub min_n: usize,
    /// Largest n-gram length in characters
    pub max_n: usize,
}

impl Default for HashedNgramEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIM,
            min_n: 3,
            max_n: 5,
        }
    }
}

impl HashedNgramEmbedder {
    /// Synchronous embedding; the async trait method delegates here.
    pub fn embed_sync(&self, text: &str) -> Vec<f64> {
        let mut counts = vec![0u32; self.dim.max(1)];
        let lower = text.to_lowercase();

        for word in lower
            .split(|c: char| c.is_whitespace() || c == ',' || c == ';' || c == '(' || c == ')')
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '#' && c != '+'))
            .filter(|w| !w.is_empty())
        {
            let padded: Vec<char> = std::iter::once(' ')
                .chain(word.chars())
                .chain(std::iter::once(' '))
                .collect();

            for n in self.min_n..=self.max_n {
                if padded.len() < n {
                    break;
                }
                for gram in padded.windows(n) {
                    let bucket = (fnv1a(gram) % counts.len() as u64) as usize;
                    counts[bucket] += 1;
                }
            }
        }

        let mut vector: Vec<f64> = counts
            .into_iter()
            .map(|c| if c == 0 { 0.0 } else { 1.0 + (c as f64).ln() })
            .collect();

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashedNgramEmbedder {
    fn name(&self) -> &'static str {
        "hashed-ngram"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        Ok(self.embed_sync(text))
    }
}

fn fnv1a(chars: &[char]) -> u64 {
    let mut hash = FNV_OFFSET;
    for c in chars {
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}
