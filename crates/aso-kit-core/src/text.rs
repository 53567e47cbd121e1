//! Text normalization and literal keyword matching.
//!
//! Every component that counts words goes through [`tokenize`], so density
//! and repetition numbers are computed over the same token stream.

use regex::Regex;

/// Whether `c` may appear inside a word without splitting it.
const fn is_intra_word(c: char) -> bool {
    matches!(c, '\'' | '-')
}

/// Split text into lowercase word tokens.
///
/// Characters other than alphanumerics and intra-word marks (`'`, `-`) are
/// separators. Intra-word marks are trimmed from token edges, and empty
/// tokens are discarded.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && !is_intra_word(c))
        .map(|w| w.trim_matches(is_intra_word))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Count tokens without allocating them.
pub fn token_count(text: &str) -> usize {
    text.split(|c: char| !c.is_alphanumeric() && !is_intra_word(c))
        .filter(|w| !w.trim_matches(is_intra_word).is_empty())
        .count()
}

/// Literal key used to spot duplicate keywords: trimmed, lowercased, with
/// inner whitespace collapsed. Punctuation is kept, so "c" and "c++" differ.
pub fn literal_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Case-insensitive, whole-word, literal matcher for one keyword.
///
/// Keyword text is escaped before compilation, so regex metacharacters are
/// matched literally. Word edges follow [`tokenize`]: a hit counts only when
/// neither side continues into the same token, so every hit spans whole
/// tokens and no two hits share one.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Option<Regex>,
}

impl KeywordMatcher {
    /// Build a matcher for `keyword`. Keywords without tokens match nothing.
    pub fn new(keyword: &str) -> Self {
        let keyword = keyword.trim();
        if token_count(keyword) == 0 {
            return Self { pattern: None };
        }

        let source = format!("(?i){}", regex::escape(keyword));
        match Regex::new(&source) {
            Ok(re) => Self { pattern: Some(re) },
            Err(err) => {
                tracing::warn!(keyword, error = %err, "keyword pattern rejected; counting zero");
                Self { pattern: None }
            }
        }
    }

    /// Number of non-overlapping whole-token occurrences in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.hits(text).count()
    }

    /// Whether the keyword occurs at least once in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.hits(text).next().is_some()
    }

    fn hits<'t>(&'t self, text: &'t str) -> impl Iterator<Item = (usize, usize)> + 't {
        let mut pos = 0;
        std::iter::from_fn(move || {
            let re = self.pattern.as_ref()?;
            while pos <= text.len() {
                let m = re.find_at(text, pos)?;
                if !joins_left(&text[..m.start()]) && !joins_right(&text[m.end()..]) {
                    pos = m.end();
                    return Some((m.start(), m.end()));
                }
                // Retry one character later; a shorter overlap may still align.
                pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            }
            None
        })
    }
}

/// Whether the text before a hit runs into the hit's token.
///
/// Intra-word marks join only when an alphanumeric sits behind them before
/// the next separator, mirroring how [`tokenize`] trims token edges.
fn joins_left(before: &str) -> bool {
    continues_token(before.chars().rev())
}

/// Whether the text after a hit runs into the hit's token.
fn joins_right(after: &str) -> bool {
    continues_token(after.chars())
}

fn continues_token(mut chars: impl Iterator<Item = char>) -> bool {
    chars
        .find(|&c| !is_intra_word(c))
        .is_some_and(char::is_alphanumeric)
}

/// Round to one decimal place.
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
