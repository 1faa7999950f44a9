// General-English word list used for the extractor's rarity bonus.
//
// Words that show up everywhere in English prose ("information", "provide",
// "results") say little about a specific role, so they rank below
// domain terms at equal frequency.

use std::collections::HashSet;
use std::sync::LazyLock;

use stop_words::{get, LANGUAGE};

static COMMON_ENGLISH: LazyLock<HashSet<String>> = LazyLock::new(|| {
    let words: Vec<String> = get(LANGUAGE::English);
    words.into_iter().map(|w| w.to_lowercase()).collect()
});

/// True if `word` is common in general English text.
pub fn is_common_english(word: &str) -> bool {
    COMMON_ENGLISH.contains(word)
}
