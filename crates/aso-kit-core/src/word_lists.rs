//! Curated word lists for keyword analysis.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Default stopwords excluded from repetition matching.
///
/// English function words plus connective filler common in store copy.
/// Overridable through `repetition.stopwords` in configuration.
pub static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "up", "about", "into", "through", "that", "this", "these", "those", "it", "its",
        "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did",
        "will", "can", "your", "you", "our", "we", "my", "all", "new", "more", "most", "now",
        "get", "than", "then", "as", "so", "not", "no", "any", "one",
    ]
    .into_iter()
    .collect()
});

/// Default stopword list as owned strings, for seeding configuration.
pub fn default_stopwords() -> Vec<String> {
    let mut words: Vec<String> = STOPWORDS.iter().map(|w| (*w).to_string()).collect();
    words.sort_unstable();
    words
}
