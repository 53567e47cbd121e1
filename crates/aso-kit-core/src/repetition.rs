//! Cross-field repetition checks for indexable metadata.
//!
//! Storefront search indexes a few metadata fields independently. A term
//! that appears in two of them spends characters without adding reach, so
//! every shared term is reported once per offending field pair.
//!
//! | Store   | Indexed pairs (declaration order)                                  |
//! |---------|--------------------------------------------------------------------|
//! | iOS     | app name/subtitle, subtitle/keywords field, app name/keywords field |
//! | Android | app name/short description                                          |
//!
//! Descriptions are not indexed and never take part.

use std::borrow::Cow;
use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{AppText, Keyword, MetadataField, Store};
use crate::text;
use crate::word_lists;

/// Indexed field pairs for the App Store.
const IOS_PAIRS: &[(MetadataField, MetadataField)] = &[
    (MetadataField::AppName, MetadataField::Subtitle),
    (MetadataField::Subtitle, MetadataField::KeywordsField),
    (MetadataField::AppName, MetadataField::KeywordsField),
];

/// Indexed field pairs for Google Play.
const ANDROID_PAIRS: &[(MetadataField, MetadataField)] =
    &[(MetadataField::AppName, MetadataField::ShortDescription)];

/// Field pairs a store indexes independently, in reporting order.
pub const fn indexed_pairs(store: Store) -> &'static [(MetadataField, MetadataField)] {
    match store {
        Store::Ios => IOS_PAIRS,
        Store::Android => ANDROID_PAIRS,
    }
}

/// Matching and scoring policy for repetition checks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct RepetitionPolicy {
    /// Terms shorter than this many characters are ignored.
    pub min_term_length: usize,
    /// Terms never reported as repeats.
    pub stopwords: Vec<String>,
    /// Points deducted per error.
    pub error_penalty: u32,
    /// Points deducted per warning.
    pub warning_penalty: u32,
}

impl Default for RepetitionPolicy {
    fn default() -> Self {
        Self {
            min_term_length: 3,
            stopwords: word_lists::default_stopwords(),
            error_penalty: 20,
            warning_penalty: 10,
        }
    }
}

impl RepetitionPolicy {
    /// Reject penalties outside the 0–100 score range.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("repetition.error_penalty", self.error_penalty),
            ("repetition.warning_penalty", self.warning_penalty),
        ] {
            if value > 100 {
                return Err(ConfigError::InvalidPolicy {
                    field: field.to_string(),
                    reason: format!("{value} exceeds the maximum score of 100"),
                });
            }
        }
        Ok(())
    }

    /// Build the term filter this policy describes.
    ///
    /// Stopwords are lowercased to match [`text::tokenize`] output.
    pub fn term_filter(&self) -> TermFilter<'_> {
        TermFilter {
            min_len: self.min_term_length,
            stopwords: self
                .stopwords
                .iter()
                .map(|w| {
                    let w = w.trim();
                    if w.chars().any(char::is_uppercase) {
                        Cow::Owned(w.to_lowercase())
                    } else {
                        Cow::Borrowed(w)
                    }
                })
                .collect(),
        }
    }
}

/// Decides which tokens are significant enough to count as repeats.
#[derive(Debug, Clone)]
pub struct TermFilter<'a> {
    min_len: usize,
    stopwords: HashSet<Cow<'a, str>>,
}

impl TermFilter<'_> {
    /// Whether `token` (already lowercase) is a significant term.
    pub fn is_significant(&self, token: &str) -> bool {
        token.chars().count() >= self.min_len && !self.stopwords.contains(token)
    }

    /// Significant terms of `text`, deduplicated, in order of first use.
    pub fn terms(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        text::tokenize(text)
            .into_iter()
            .filter(|t| self.is_significant(t) && seen.insert(t.clone()))
            .collect()
    }
}

/// Issue severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Wastes the most valuable space: a brand term or the app name itself.
    Error,
    /// A generic term indexed twice.
    Warning,
}

impl Severity {
    /// Returns the severity as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// One repeated term within one field pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepetitionIssue {
    /// Store whose indexing rules were violated.
    pub store: Store,
    /// The repeated term (lowercase).
    pub term: String,
    /// Human-readable description.
    pub message: String,
    /// Severity.
    pub severity: Severity,
    /// Suggested fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// The two fields in conflict, in pair declaration order.
    pub field_pair: (MetadataField, MetadataField),
}

/// Result of checking one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepetitionReport {
    /// Store checked.
    pub store: Store,
    /// Whether any issue was found.
    pub has_issues: bool,
    /// Errors first, then warnings; each group in field-pair order.
    pub issues: Vec<RepetitionIssue>,
    /// Compliance score, 0–100.
    pub score: u8,
}

impl RepetitionReport {
    /// Number of error-severity issues.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warning-severity issues.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Repetition results for both stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StoreRepetition {
    /// App Store result.
    pub ios: RepetitionReport,
    /// Google Play result.
    pub android: RepetitionReport,
}

impl StoreRepetition {
    /// The lower of the two store scores.
    pub fn min_score(&self) -> u8 {
        self.ios.score.min(self.android.score)
    }
}

/// Check one store's indexed fields for repeated terms.
///
/// `keywords` supplies brand information: a repeated term that is a token
/// of a branded keyword is an error. So is a term that makes up the whole
/// app name. Every other repeat is a warning.
#[tracing::instrument(skip(app, keywords, policy), fields(keywords = keywords.len()))]
pub fn check_repetition(
    store: Store,
    app: &AppText,
    keywords: &[Keyword],
    policy: &RepetitionPolicy,
) -> RepetitionReport {
    let filter = policy.term_filter();

    let brand_terms: HashSet<String> = keywords
        .iter()
        .filter(|kw| kw.is_branded())
        .flat_map(|kw| text::tokenize(&kw.text))
        .collect();
    let name_tokens = text::tokenize(app.field(store, MetadataField::AppName));
    let whole_name = match name_tokens.as_slice() {
        [only] => Some(only.as_str()),
        _ => None,
    };

    let mut issues = Vec::new();
    for &(first, second) in indexed_pairs(store) {
        let second_terms: HashSet<String> = filter
            .terms(app.field(store, second))
            .into_iter()
            .collect();
        if second_terms.is_empty() {
            continue;
        }

        for term in filter.terms(app.field(store, first)) {
            if !second_terms.contains(&term) {
                continue;
            }
            let severity = if brand_terms.contains(&term) || whole_name == Some(term.as_str()) {
                Severity::Error
            } else {
                Severity::Warning
            };
            issues.push(RepetitionIssue {
                store,
                message: format!("'{term}' is indexed in both {first} and {second}"),
                recommendation: Some(format!(
                    "Remove '{term}' from {second}; it is already indexed via {first}"
                )),
                term,
                severity,
                field_pair: (first, second),
            });
        }
    }

    // Stable: keeps pair declaration order inside each severity group.
    issues.sort_by_key(|issue| issue.severity);

    let report = RepetitionReport {
        store,
        has_issues: !issues.is_empty(),
        score: compliance_score(&issues, policy),
        issues,
    };
    tracing::debug!(
        %store,
        issues = report.issues.len(),
        score = report.score,
        "repetition check complete"
    );
    report
}

/// Check both stores.
pub fn check_all(app: &AppText, keywords: &[Keyword], policy: &RepetitionPolicy) -> StoreRepetition {
    StoreRepetition {
        ios: check_repetition(Store::Ios, app, keywords, policy),
        android: check_repetition(Store::Android, app, keywords, policy),
    }
}

/// Starts at 100, deducts a fixed penalty per issue, floors at 0.
fn compliance_score(issues: &[RepetitionIssue], policy: &RepetitionPolicy) -> u8 {
    let deducted: u64 = issues
        .iter()
        .map(|issue| match issue.severity {
            Severity::Error => u64::from(policy.error_penalty),
            Severity::Warning => u64::from(policy.warning_penalty),
        })
        .sum();
    u8::try_from(100u64.saturating_sub(deducted)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AndroidText, Category, IosText};

    fn ios(app_name: &str, subtitle: &str, keywords_field: &str) -> AppText {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        AppText {
            ios: IosText {
                app_name: opt(app_name),
                subtitle: opt(subtitle),
                keywords_field: opt(keywords_field),
                description: Some("Fortune fortune fortune everywhere".into()),
            },
            ..AppText::default()
        }
    }

    #[test]
    fn generic_repeat_is_single_warning() {
        let app = ios("RedRain Fortune", "Egyptian Fortune Adventure", "");
        let report = check_repetition(Store::Ios, &app, &[], &RepetitionPolicy::default());

        assert!(report.has_issues);
        assert_eq!(report.issues.len(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.term, "fortune");
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(
            issue.field_pair,
            (MetadataField::AppName, MetadataField::Subtitle)
        );
        assert!(issue.message.contains("fortune"));
        assert_eq!(report.score, 90);
    }

    #[test]
    fn branded_repeat_is_error() {
        let app = ios("RedRain Fortune", "Egyptian Fortune Adventure", "");
        let keywords = [Keyword::new("RedRain Fortune").with_category(Category::Branded)];
        let report = check_repetition(Store::Ios, &app, &keywords, &RepetitionPolicy::default());

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Error);
        assert_eq!(report.score, 80);
    }

    #[test]
    fn whole_app_name_repeat_is_error() {
        let app = ios("RedRain", "RedRain Slots", "");
        let report = check_repetition(Store::Ios, &app, &[], &RepetitionPolicy::default());
        assert_eq!(report.issues[0].severity, Severity::Error);
    }

    #[test]
    fn description_is_never_indexed() {
        let app = ios("Fortune", "", "");
        let report = check_repetition(Store::Ios, &app, &[], &RepetitionPolicy::default());
        assert!(!report.has_issues);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn one_issue_per_term_per_pair() {
        let app = ios("Pharaoh Slots", "Pharaoh slots casino", "pharaoh,casino");
        let report = check_repetition(Store::Ios, &app, &[], &RepetitionPolicy::default());

        let pairs: Vec<_> = report
            .issues
            .iter()
            .map(|i| (i.term.as_str(), i.field_pair))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("pharaoh", (MetadataField::AppName, MetadataField::Subtitle)),
                ("slots", (MetadataField::AppName, MetadataField::Subtitle)),
                ("pharaoh", (MetadataField::Subtitle, MetadataField::KeywordsField)),
                ("casino", (MetadataField::Subtitle, MetadataField::KeywordsField)),
                ("pharaoh", (MetadataField::AppName, MetadataField::KeywordsField)),
            ]
        );
        assert_eq!(report.score, 50);
    }

    #[test]
    fn errors_sort_before_warnings() {
        let app = ios("Pharaoh Slots", "Pharaoh slots", "");
        let keywords = [Keyword::new("slots").with_category(Category::Branded)];
        let report = check_repetition(Store::Ios, &app, &keywords, &RepetitionPolicy::default());
        let severities: Vec<_> = report.issues.iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::Error, Severity::Warning]);
        assert_eq!(report.issues[0].term, "slots");
    }

    #[test]
    fn stopwords_and_short_tokens_ignored() {
        let app = ios("The Go App", "Go with the flow", "");
        let report = check_repetition(Store::Ios, &app, &[], &RepetitionPolicy::default());
        assert!(!report.has_issues);
    }

    #[test]
    fn custom_policy_changes_matching() {
        let app = ios("The Go App", "Go with the flow", "");
        let policy = RepetitionPolicy {
            min_term_length: 1,
            stopwords: Vec::new(),
            ..RepetitionPolicy::default()
        };
        let report = check_repetition(Store::Ios, &app, &[], &policy);
        let terms: Vec<_> = report.issues.iter().map(|i| i.term.as_str()).collect();
        assert_eq!(terms, vec!["the", "go"]);
    }

    #[test]
    fn configured_stopwords_ignore_case() {
        let app = ios("Casino Royale", "Casino Nights", "");
        assert!(check_repetition(Store::Ios, &app, &[], &RepetitionPolicy::default()).has_issues);

        let policy = RepetitionPolicy {
            stopwords: vec!["Casino".to_string(), " NIGHTS ".to_string()],
            ..RepetitionPolicy::default()
        };
        let report = check_repetition(Store::Ios, &app, &[], &policy);
        assert!(!report.has_issues);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn score_floors_at_zero() {
        let app = ios(
            "alpha bravo charlie delta echo foxtrot",
            "alpha bravo charlie delta echo foxtrot",
            "",
        );
        let policy = RepetitionPolicy {
            warning_penalty: 30,
            ..RepetitionPolicy::default()
        };
        let report = check_repetition(Store::Ios, &app, &[], &policy);
        assert_eq!(report.issues.len(), 6);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn android_disjoint_fields_are_clean() {
        let app = AppText {
            android: AndroidText {
                app_name: Some("RedRain Fortune".into()),
                short_description: Some("Spin Egyptian reels tonight".into()),
                full_description: Some("RedRain Fortune is a fortune game".into()),
            },
            ..AppText::default()
        };
        let report = check_repetition(Store::Android, &app, &[], &RepetitionPolicy::default());
        assert!(!report.has_issues);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn android_repeat_flagged() {
        let app = AppText {
            android: AndroidText {
                app_name: Some("RedRain Slots".into()),
                short_description: Some("Free slots".into()),
                full_description: None,
            },
            ..AppText::default()
        };
        let report = check_repetition(Store::Android, &app, &[], &RepetitionPolicy::default());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(
            report.issues[0].field_pair,
            (MetadataField::AppName, MetadataField::ShortDescription)
        );
        assert_eq!(
            report.issues[0].recommendation.as_deref(),
            Some("Remove 'slots' from short description; it is already indexed via app name")
        );
    }

    #[test]
    fn empty_app_text_is_clean() {
        let result = check_all(&AppText::default(), &[], &RepetitionPolicy::default());
        assert_eq!(result.ios.score, 100);
        assert_eq!(result.android.score, 100);
        assert!(!result.ios.has_issues && !result.android.has_issues);
    }

    #[test]
    fn idempotent() {
        let app = ios("Pharaoh Slots", "Pharaoh slots casino", "pharaoh,casino");
        let policy = RepetitionPolicy::default();
        assert_eq!(
            check_all(&app, &[], &policy),
            check_all(&app, &[], &policy)
        );
    }

    #[test]
    fn validate_rejects_oversized_penalty() {
        let policy = RepetitionPolicy {
            error_penalty: 101,
            ..RepetitionPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(ConfigError::InvalidPolicy { .. })
        ));
        assert!(RepetitionPolicy::default().validate().is_ok());
    }
}
