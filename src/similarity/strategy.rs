// Keyword matching strategies.
//
// A strategy maps each normalized token onto the form used for comparison.
// Exact matching compares normalized tokens as-is. Stemmed matching strips
// common plural and verb suffixes first, so "APIs" satisfies "api" and
// "managed" satisfies "manage". Fuzzier strategies (edit distance, synonyms)
// plug in through the same trait.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Trait for deciding when a resume token satisfies a keyword token.
pub trait MatchStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Map a normalized token onto its comparison form.
    fn canonical(&self, token: &str) -> String;
}

/// Normalized tokens must be identical.
pub struct ExactMatch;

impl MatchStrategy for ExactMatch {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn canonical(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Tokens are compared after light suffix stripping.
pub struct StemmedMatch;

impl MatchStrategy for StemmedMatch {
    fn name(&self) -> &'static str {
        "stemmed"
    }

    fn canonical(&self, token: &str) -> String {
        light_stem(token)
    }
}

/// Configurable strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategyKind {
    #[default]
    Exact,
    Stemmed,
}

impl MatchStrategyKind {
    pub fn strategy(&self) -> Box<dyn MatchStrategy> {
        match self {
            MatchStrategyKind::Exact => Box::new(ExactMatch),
            MatchStrategyKind::Stemmed => Box::new(StemmedMatch),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategyKind::Exact => "exact",
            MatchStrategyKind::Stemmed => "stemmed",
        }
    }
}

impl fmt::Display for MatchStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strip common English inflections from a lowercase ASCII word.
///
/// Deliberately conservative: words of three letters or fewer and tokens with
/// digits or symbols ("c++", "node.js", "k8s") are returned unchanged.
pub fn light_stem(word: &str) -> String {
    if word.len() <= 3 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
        return word.to_string();
    }

    let mut stem = if let Some(base) = word.strip_suffix("ies").filter(|b| b.len() >= 2) {
        format!("{base}y")
    } else if let Some(base) = word.strip_suffix("sses") {
        format!("{base}ss")
    } else if let Some(base) = word.strip_suffix("ing").filter(|b| b.len() >= 3) {
        undouble(base)
    } else if let Some(base) = word.strip_suffix("ed").filter(|b| b.len() >= 3) {
        undouble(base)
    } else if word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    };

    if stem.len() > 4 && stem.ends_with('e') {
        stem.pop();
    }
    stem
}

/// "runn" -> "run", "scall" stays: only doubled consonants other than l/s/z.
fn undouble(base: &str) -> String {
    let bytes = base.as_bytes();
    let n = bytes.len();
    if n >= 2 && bytes[n - 1] == bytes[n - 2] && !b"aeioulsz".contains(&bytes[n - 1]) {
        base[..n - 1].to_string()
    } else {
        base.to_string()
    }
}
