//! Input records consumed by the keyword engine.
//!
//! These are value snapshots supplied by the caller. The engine reads them,
//! never mutates them, and never holds on to them past a single call.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Keyword category used for priority weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Category {
    /// The app's own brand terms.
    Branded,
    /// Descriptive, unbranded terms.
    #[default]
    Generic,
    /// Another publisher's brand terms.
    Competitor,
}

impl Category {
    /// Returns the category as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Branded => "branded",
            Self::Generic => "generic",
            Self::Competitor => "competitor",
        }
    }
}

/// Storefront(s) a keyword targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Apple App Store only.
    Ios,
    /// Google Play only.
    Android,
    /// Both storefronts.
    #[default]
    Both,
}

impl Platform {
    /// Whether a keyword with this targeting belongs on `store`.
    pub const fn targets(self, store: Store) -> bool {
        matches!(
            (self, store),
            (Self::Both, _) | (Self::Ios, Store::Ios) | (Self::Android, Store::Android)
        )
    }
}

/// A concrete storefront with its own indexing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Store {
    /// Apple App Store.
    Ios,
    /// Google Play.
    Android,
}

impl Store {
    /// Both storefronts, iOS first.
    pub const ALL: [Self; 2] = [Self::Ios, Self::Android];

    /// Returns the store as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl std::fmt::Display for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A textual metadata field on either storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    /// App name (iOS and Android).
    AppName,
    /// iOS subtitle.
    Subtitle,
    /// iOS hidden keywords field (comma list).
    KeywordsField,
    /// iOS description.
    Description,
    /// Android short description.
    ShortDescription,
    /// Android full description.
    FullDescription,
}

impl MetadataField {
    /// Human-readable label used in issue messages.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AppName => "app name",
            Self::Subtitle => "subtitle",
            Self::KeywordsField => "keywords field",
            Self::Description => "description",
            Self::ShortDescription => "short description",
            Self::FullDescription => "full description",
        }
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Field a keyword is recommended for, as surfaced on a keyword record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecommendedField {
    /// Title / app name.
    Title,
    /// Subtitle (or Android short description).
    Subtitle,
    /// iOS keywords field.
    Keywords,
    /// Description (unindexed on iOS).
    Description,
}

/// Priority tier derived from a keyword's composite score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Place first; competes for scarce indexed space.
    High,
    /// Worth indexing when space remains.
    Medium,
    /// Description material.
    Low,
}

impl Priority {
    /// Returns the tier as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An app-store keyword with its externally supplied metrics.
///
/// Priority is deliberately absent: it is recomputed from these fields on
/// every call (see [`crate::priority`]). A `priority` key in a record file
/// is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Keyword {
    /// Opaque identifier from the persistence layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Keyword text as it would appear in metadata.
    pub text: String,
    /// Monthly search volume.
    pub search_volume: u64,
    /// Ranking difficulty, 0–100.
    pub difficulty: f64,
    /// Relevance to the app, 0–100.
    pub relevance_score: f64,
    /// Weighting category.
    pub category: Category,
    /// Targeted storefront(s).
    pub platform: Platform,
    /// Explicit brand marker, independent of category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<bool>,
}

impl Keyword {
    /// Convenience constructor for a generic keyword targeting both stores.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the targeted platform.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set search volume, difficulty and relevance in one go.
    #[must_use]
    pub fn with_metrics(mut self, search_volume: u64, difficulty: f64, relevance: f64) -> Self {
        self.search_volume = search_volume;
        self.difficulty = difficulty;
        self.relevance_score = relevance;
        self
    }

    /// Whether this keyword counts as the app's own brand.
    pub fn is_branded(&self) -> bool {
        self.category == Category::Branded || self.brand == Some(true)
    }

    /// Difficulty clamped into `[0, 100]`; non-finite values read as 0.
    pub fn difficulty(&self) -> f64 {
        clamp_metric(self.difficulty)
    }

    /// Relevance clamped into `[0, 100]`; non-finite values read as 0.
    pub fn relevance(&self) -> f64 {
        clamp_metric(self.relevance_score)
    }
}

fn clamp_metric(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// iOS App Store text metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct IosText {
    /// App name (title).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Subtitle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Hidden keywords field, comma separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords_field: Option<String>,
    /// Long description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl IosText {
    /// All fields in declaration order; absent fields read as `""`.
    pub fn fields(&self) -> [(MetadataField, &str); 4] {
        [
            (MetadataField::AppName, text_of(&self.app_name)),
            (MetadataField::Subtitle, text_of(&self.subtitle)),
            (MetadataField::KeywordsField, text_of(&self.keywords_field)),
            (MetadataField::Description, text_of(&self.description)),
        ]
    }
}

/// Google Play text metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct AndroidText {
    /// App name (title).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Short description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Full description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
}

impl AndroidText {
    /// All fields in declaration order; absent fields read as `""`.
    pub fn fields(&self) -> [(MetadataField, &str); 3] {
        [
            (MetadataField::AppName, text_of(&self.app_name)),
            (MetadataField::ShortDescription, text_of(&self.short_description)),
            (MetadataField::FullDescription, text_of(&self.full_description)),
        ]
    }
}

/// Read-only snapshot of an app's per-platform text metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct AppText {
    /// App Store metadata.
    pub ios: IosText,
    /// Google Play metadata.
    pub android: AndroidText,
}

impl AppText {
    /// Look up a field's text on a store; unknown or absent fields read as `""`.
    pub fn field(&self, store: Store, field: MetadataField) -> &str {
        match store {
            Store::Ios => self
                .ios
                .fields()
                .into_iter()
                .find(|(f, _)| *f == field)
                .map_or("", |(_, text)| text),
            Store::Android => self
                .android
                .fields()
                .into_iter()
                .find(|(f, _)| *f == field)
                .map_or("", |(_, text)| text),
        }
    }

    /// Every field of one store, absent fields as `""`.
    pub fn store_fields(&self, store: Store) -> Vec<&str> {
        match store {
            Store::Ios => self.ios.fields().iter().map(|(_, t)| *t).collect(),
            Store::Android => self.android.fields().iter().map(|(_, t)| *t).collect(),
        }
    }
}

fn text_of(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("")
}
