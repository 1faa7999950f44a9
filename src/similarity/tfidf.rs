// TF-IDF cosine similarity over the two-document corpus {resume, JD}.
//
// Terms are normalized unigrams plus adjacent bigrams. Weighting:
//
//   tf  = 1 + ln(count)                      (sublinear)
//   idf = ln((1 + n) / (1 + df)) + 1         (smoothed, n = 2)
//
// A term found in only one document gets a higher idf (ln(3/2) + 1) than a
// shared term (1.0). The smoothing keeps shared terms in the vectors: with an
// unsmoothed ln(n/df), every shared term weighs zero and any two documents
// would score zero, including a document against itself.

use std::collections::{BTreeSet, HashMap};

use super::cosine::{cosine_sparse, SparseVector};
use crate::text::Document;

const CORPUS_SIZE: f64 = 2.0;

/// Cosine similarity of the TF-IDF vectors of two documents, in [0, 1].
pub fn tfidf_similarity(resume_document: &Document, jd_document: &Document) -> f64 {
    let counts_a = term_counts(resume_document);
    let counts_b = term_counts(jd_document);

    if counts_a.is_empty() || counts_b.is_empty() {
        return 0.0;
    }

    let vocabulary: BTreeSet<&String> = counts_a.keys().chain(counts_b.keys()).collect();
    let mut vec_a = SparseVector::new();
    let mut vec_b = SparseVector::new();

    for term in vocabulary {
        let in_a = counts_a.get(term).copied();
        let in_b = counts_b.get(term).copied();
        let df = in_a.is_some() as u32 + in_b.is_some() as u32;
        let idf = ((1.0 + CORPUS_SIZE) / (1.0 + df as f64)).ln() + 1.0;

        if let Some(count) = in_a {
            vec_a.insert(term.clone(), sublinear_tf(count) * idf);
        }
        if let Some(count) = in_b {
            vec_b.insert(term.clone(), sublinear_tf(count) * idf);
        }
    }

    cosine_sparse(&vec_a, &vec_b)
}

fn sublinear_tf(count: usize) -> f64 {
    1.0 + (count as f64).ln()
}

/// Unigram and adjacent-bigram counts for one document.
fn term_counts(document: &Document) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = document.frequencies().clone();
    for pair in document.tokens().windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}
