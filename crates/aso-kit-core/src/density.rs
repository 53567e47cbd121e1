//! Keyword density across store metadata.
//!
//! Density is the share of tokens in a group of fields that are occurrences
//! of the given keyword(s), as a percentage rounded to one decimal.
//! Occurrences are counted field by field, so a phrase never spans two
//! fields.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{AppText, Keyword, Store};
use crate::text::{self, KeywordMatcher};

/// Keyword-set density for each field group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DensityReport {
    /// Density over the iOS fields.
    pub ios: f64,
    /// Density over the Android fields.
    pub android: f64,
    /// Density over every field of both stores.
    pub overall: f64,
}

/// Density of one keyword across every field of both stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeywordDensity {
    /// The keyword text.
    pub keyword: String,
    /// Whole-word occurrences across all fields.
    pub occurrences: usize,
    /// Percentage of all tokens.
    pub density: f64,
}

/// Running totals for one field group.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    words: usize,
    matches: usize,
}

impl Tally {
    fn add_field(&mut self, field: &str, matchers: &[KeywordMatcher]) {
        if field.is_empty() {
            return;
        }
        self.words += text::token_count(field);
        self.matches += matchers.iter().map(|m| m.count(field)).sum::<usize>();
    }

    fn merge(self, other: Self) -> Self {
        Self {
            words: self.words + other.words,
            matches: self.matches + other.matches,
        }
    }

    fn percentage(self) -> f64 {
        if self.words == 0 {
            return 0.0;
        }
        text::round1(self.matches as f64 / self.words as f64 * 100.0)
    }
}

fn tally_store(app: &AppText, store: Store, matchers: &[KeywordMatcher]) -> Tally {
    let mut tally = Tally::default();
    for field in app.store_fields(store) {
        tally.add_field(field, matchers);
    }
    tally
}

/// Density of a single keyword across every iOS and Android field.
///
/// Returns 0 when the app text holds no tokens.
#[tracing::instrument(skip(app))]
pub fn density_of_keyword(keyword: &str, app: &AppText) -> f64 {
    keyword_density(keyword, app).density
}

/// Density of a single keyword with its raw occurrence count.
pub fn keyword_density(keyword: &str, app: &AppText) -> KeywordDensity {
    let matchers = [KeywordMatcher::new(keyword)];
    let tally = Store::ALL
        .into_iter()
        .map(|store| tally_store(app, store, &matchers))
        .fold(Tally::default(), Tally::merge);

    KeywordDensity {
        keyword: keyword.to_string(),
        occurrences: tally.matches,
        density: tally.percentage(),
    }
}

/// Combined density of a keyword list for iOS, Android and both.
///
/// Each keyword is counted independently, so overlapping keywords (e.g.
/// "slots" and "free slots") both count. Keywords whose literal text repeats
/// an earlier entry, ignoring case and spacing, are counted once.
#[tracing::instrument(skip_all, fields(keywords = keywords.len()))]
pub fn density_of_keyword_set(keywords: &[Keyword], app: &AppText) -> DensityReport {
    let mut seen = HashSet::new();
    let matchers: Vec<KeywordMatcher> = keywords
        .iter()
        .filter(|kw| {
            text::token_count(&kw.text) > 0 && seen.insert(text::literal_key(&kw.text))
        })
        .map(|kw| KeywordMatcher::new(&kw.text))
        .collect();

    let ios = tally_store(app, Store::Ios, &matchers);
    let android = tally_store(app, Store::Android, &matchers);

    DensityReport {
        ios: ios.percentage(),
        android: android.percentage(),
        overall: ios.merge(android).percentage(),
    }
}
