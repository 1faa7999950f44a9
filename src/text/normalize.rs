// Text normalization shared by every scorer.
//
// Lowercases, strips URL and e-mail boilerplate, tokenizes on a
// technology-friendly token pattern (keeps "c++", "c#", "node.js"), and drops
// stop words. Alongside the flat token list we record phrase segments: runs of
// kept tokens that sat next to each other in the raw text with nothing but
// whitespace (or a hyphen/slash) between them. The keyword extractor builds
// its phrase candidates from those segments.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::{DocumentRole, ScoringError};

static BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://\S+|www\.\S+|\S+@\S+\.\S+").expect("valid boilerplate pattern")
});

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z][a-z0-9#+.]*").expect("valid token pattern"));

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Function words
        "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
        "does", "did", "will", "would", "could", "should", "may", "might", "shall", "can",
        "need", "must", "not", "no", "nor", "so", "if", "then", "than", "too", "very", "just",
        "about", "above", "after", "again", "all", "also", "am", "any", "as", "because",
        "before", "between", "both", "during", "each", "few", "further", "get", "got", "he",
        "her", "here", "him", "his", "how", "into", "it", "its", "let", "me", "more", "most",
        "my", "new", "now", "only", "other", "our", "out", "over", "own", "per", "re", "same",
        "she", "some", "still", "such", "that", "their", "them", "there", "these", "they",
        "this", "those", "through", "under", "up", "upon", "us", "use", "using", "used", "we",
        "what", "when", "where", "which", "while", "who", "whom", "why", "you", "your", "able",
        "etc", "eg", "e.g", "ie", "i.e", "like", "make", "take", "help", "well", "via",
        // Job-posting boilerplate
        "role", "work", "working", "looking", "seeking", "seek", "skilled", "including",
        "within", "across", "based", "strong", "good", "great", "excellent", "engineer",
        "candidate", "candidates", "ideal", "position", "opportunity", "join", "team",
        "company", "requirements", "required", "require", "qualifications", "preferred",
        "responsibilities", "responsible", "experience", "experienced", "years", "year",
        "ability", "knowledge", "familiarity", "familiar", "proficient", "proficiency",
        "plus", "bonus", "minimum", "hands", "solid", "deep",
    ]
    .into_iter()
    .collect()
});

/// True if `token` is dropped by the normalizer as a stop word.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// A normalized input document. Built once per input text, never mutated.
#[derive(Debug, Clone)]
pub struct Document {
    role: DocumentRole,
    raw_text: String,
    tokens: Vec<String>,
    frequencies: HashMap<String, usize>,
    segments: Vec<Range<usize>>,
}

impl Document {
    pub fn role(&self) -> DocumentRole {
        self.role
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Normalized tokens in document order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn frequencies(&self) -> &HashMap<String, usize> {
        &self.frequencies
    }

    pub fn frequency(&self, token: &str) -> usize {
        self.frequencies.get(token).copied().unwrap_or(0)
    }

    /// Phrase segments as token slices, in document order.
    pub fn segments(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.segments.iter().map(|r| &self.tokens[r.clone()])
    }

    /// Phrase segments as index ranges into `tokens()`.
    pub fn segment_ranges(&self) -> &[Range<usize>] {
        &self.segments
    }

    /// The token sequence joined by single spaces.
    pub fn normalized_text(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Normalize raw text into a `Document`.
///
/// Fails only when the text is empty or whitespace. Text that normalizes to
/// zero tokens (e.g. only stop words) yields an empty document; downstream
/// scorers treat that as a defined zero-overlap case.
pub fn normalize(raw_text: &str, role: DocumentRole) -> Result<Document, ScoringError> {
    if raw_text.trim().is_empty() {
        return Err(ScoringError::EmptyDocument(role));
    }

    let lower = raw_text.to_lowercase();
    let cleaned = BOILERPLATE.replace_all(&lower, " , ");

    let mut tokens: Vec<String> = Vec::new();
    let mut segments: Vec<Range<usize>> = Vec::new();
    let mut segment_start = 0usize;
    let mut prev_end = 0usize;
    // Set when something other than whitespace/hyphen/slash separated the
    // previous kept token from the next one.
    let mut pending_break = true;

    for m in TOKEN.find_iter(&cleaned) {
        let gap = &cleaned[prev_end..m.start()];
        prev_end = m.end();
        if !gap.chars().all(|c| c.is_whitespace() || c == '-' || c == '/') {
            pending_break = true;
        }

        let raw_token = m.as_str();
        let token = raw_token.trim_end_matches('.');
        let sentence_end = token.len() != raw_token.len();

        if token.len() < 2 || is_stop_word(token) {
            pending_break = true;
            continue;
        }

        if pending_break {
            if tokens.len() > segment_start {
                segments.push(segment_start..tokens.len());
            }
            segment_start = tokens.len();
            pending_break = false;
        }

        tokens.push(token.to_string());
        pending_break |= sentence_end;
    }

    if tokens.len() > segment_start {
        segments.push(segment_start..tokens.len());
    }

    let mut frequencies = HashMap::new();
    for token in &tokens {
        *frequencies.entry(token.clone()).or_insert(0) += 1;
    }

    Ok(Document {
        role,
        raw_text: raw_text.to_string(),
        tokens,
        frequencies,
        segments,
    })
}
