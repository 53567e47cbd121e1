//! Keyword allocation into store metadata fields.
//!
//! Keywords are ranked (tier, then relevance, then input order) and poured
//! bucket by bucket into each store's fields. Every bounded bucket is
//! filled first-fit: a keyword that does not fit is skipped and the next
//! one is tried. Keyword text is never truncated.
//!
//! A keyword is kept out of an indexed bucket when one of its significant
//! terms already sits in a different indexed bucket of the same store, so
//! the allocation does not create the repeats [`crate::repetition`] flags.

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{Keyword, MetadataField, Priority, RecommendedField, Store};
use crate::priority::{self, PriorityPolicy};
use crate::repetition::{RepetitionPolicy, TermFilter};
use crate::text;

/// Character budgets per store field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct FieldBudgets {
    /// iOS title characters.
    pub ios_title: usize,
    /// Most keywords placed in the iOS title.
    pub ios_title_max_terms: usize,
    /// iOS subtitle characters.
    pub ios_subtitle: usize,
    /// iOS keywords field characters, commas included.
    pub ios_keywords: usize,
    /// Android title characters.
    pub android_title: usize,
    /// Most keywords placed in the Android title.
    pub android_title_max_terms: usize,
    /// Android short description characters.
    pub android_short_description: usize,
}

impl Default for FieldBudgets {
    fn default() -> Self {
        Self {
            ios_title: 30,
            ios_title_max_terms: 2,
            ios_subtitle: 30,
            ios_keywords: 100,
            android_title: 50,
            android_title_max_terms: 2,
            android_short_description: 80,
        }
    }
}

impl FieldBudgets {
    /// Reject budgets that leave a bounded field with no space at all.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("budgets.ios_title", self.ios_title),
            ("budgets.ios_subtitle", self.ios_subtitle),
            ("budgets.ios_keywords", self.ios_keywords),
            ("budgets.android_title", self.android_title),
            ("budgets.android_short_description", self.android_short_description),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidPolicy {
                    field: field.to_string(),
                    reason: "a character budget must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// App Store buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IosBuckets {
    /// Title terms.
    pub title: Vec<String>,
    /// Subtitle terms.
    pub subtitle: Vec<String>,
    /// Keywords-field terms.
    pub keywords: Vec<String>,
    /// The keywords field as it would be pasted: comma-joined, no spaces.
    pub keywords_field: String,
    /// Everything left over.
    pub description: Vec<String>,
}

/// Google Play buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AndroidBuckets {
    /// Title terms.
    pub title: Vec<String>,
    /// Short description terms.
    pub short_description: Vec<String>,
    /// Everything left over.
    pub full_description: Vec<String>,
}

/// Where one input keyword ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Placement {
    /// Position in the input list.
    pub index: usize,
    /// Keyword id, if the input carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Keyword text.
    pub text: String,
    /// Derived priority tier.
    pub priority: Priority,
    /// App Store field, when the keyword targets iOS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios: Option<MetadataField>,
    /// Google Play field, when the keyword targets Android.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<MetadataField>,
    /// Field surfaced on the keyword record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_field: Option<RecommendedField>,
}

/// Result of allocating a keyword list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizedSet {
    /// App Store buckets.
    pub ios: IosBuckets,
    /// Google Play buckets.
    pub android: AndroidBuckets,
    /// One entry per non-blank input keyword, in input order.
    pub placements: Vec<Placement>,
}

/// Separator for human-readable bounded fields.
const LIST_SEPARATOR: &str = ", ";
/// Separator for the iOS keywords field.
const KEYWORDS_SEPARATOR: &str = ",";

/// Which ranked keywords a bucket accepts.
#[derive(Debug, Clone, Copy)]
enum Admit {
    BrandedHigh,
    High,
    Any,
}

impl Admit {
    fn accepts(self, ranked: &Ranked<'_>) -> bool {
        match self {
            Self::BrandedHigh => ranked.priority == Priority::High && ranked.keyword.is_branded(),
            Self::High => ranked.priority == Priority::High,
            Self::Any => true,
        }
    }
}

/// Static description of one bounded bucket.
#[derive(Debug, Clone, Copy)]
struct BucketSpec {
    field: MetadataField,
    budget: usize,
    max_terms: Option<usize>,
    separator: &'static str,
    admit: Admit,
}

/// A bucket being filled.
#[derive(Debug)]
struct Fill {
    spec: BucketSpec,
    terms: Vec<String>,
    chars: usize,
}

impl Fill {
    const fn new(spec: BucketSpec) -> Self {
        Self {
            spec,
            terms: Vec::new(),
            chars: 0,
        }
    }

    fn cost(&self, text: &str) -> usize {
        let sep = if self.terms.is_empty() {
            0
        } else {
            self.spec.separator.chars().count()
        };
        text.chars().count() + sep
    }

    fn fits(&self, text: &str) -> bool {
        self.spec.max_terms.is_none_or(|max| self.terms.len() < max)
            && self.chars + self.cost(text) <= self.spec.budget
    }

    fn push(&mut self, text: &str) {
        self.chars += self.cost(text);
        self.terms.push(text.to_string());
    }
}

/// A keyword with everything the allocator needs precomputed.
#[derive(Debug)]
struct Ranked<'a> {
    index: usize,
    keyword: &'a Keyword,
    text: &'a str,
    priority: Priority,
    /// Duplicate key; empty when the keyword has no tokens.
    key: String,
    terms: Vec<String>,
}

/// Result of allocating one store.
#[derive(Debug)]
struct StoreAllocation {
    buckets: Vec<Vec<String>>,
    overflow: Vec<String>,
    placed: HashMap<usize, MetadataField>,
}

/// Allocate keywords into both stores' fields.
///
/// Deterministic: identical input always yields identical buckets.
#[tracing::instrument(skip_all, fields(keywords = keywords.len()))]
pub fn optimize(
    keywords: &[Keyword],
    priority_policy: &PriorityPolicy,
    repetition_policy: &RepetitionPolicy,
    budgets: &FieldBudgets,
) -> OptimizedSet {
    let filter = repetition_policy.term_filter();
    let ranked = rank(keywords, priority_policy, &filter);

    let ios_specs = [
        BucketSpec {
            field: MetadataField::AppName,
            budget: budgets.ios_title,
            max_terms: Some(budgets.ios_title_max_terms),
            separator: LIST_SEPARATOR,
            admit: Admit::BrandedHigh,
        },
        BucketSpec {
            field: MetadataField::Subtitle,
            budget: budgets.ios_subtitle,
            max_terms: None,
            separator: LIST_SEPARATOR,
            admit: Admit::High,
        },
        BucketSpec {
            field: MetadataField::KeywordsField,
            budget: budgets.ios_keywords,
            max_terms: None,
            separator: KEYWORDS_SEPARATOR,
            admit: Admit::Any,
        },
    ];
    let android_specs = [
        BucketSpec {
            field: MetadataField::AppName,
            budget: budgets.android_title,
            max_terms: Some(budgets.android_title_max_terms),
            separator: LIST_SEPARATOR,
            admit: Admit::BrandedHigh,
        },
        BucketSpec {
            field: MetadataField::ShortDescription,
            budget: budgets.android_short_description,
            max_terms: None,
            separator: LIST_SEPARATOR,
            admit: Admit::High,
        },
    ];

    let ios = allocate_store(Store::Ios, &ranked, &ios_specs, MetadataField::Description);
    let android = allocate_store(
        Store::Android,
        &ranked,
        &android_specs,
        MetadataField::FullDescription,
    );

    let mut placements: Vec<Placement> = ranked
        .iter()
        .filter(|r| !r.key.is_empty())
        .map(|r| {
            let ios_field = ios.placed.get(&r.index).copied();
            let android_field = android.placed.get(&r.index).copied();
            Placement {
                index: r.index,
                id: r.keyword.id.clone(),
                text: r.text.to_string(),
                priority: r.priority,
                ios: ios_field,
                android: android_field,
                recommended_field: ios_field.or(android_field).map(recommended_for),
            }
        })
        .collect();
    placements.sort_by_key(|p| p.index);

    let [ios_title, ios_subtitle, ios_keywords] = take_buckets::<3>(ios.buckets);
    let [android_title, android_short] = take_buckets::<2>(android.buckets);

    OptimizedSet {
        ios: IosBuckets {
            keywords_field: ios_keywords.join(KEYWORDS_SEPARATOR),
            title: ios_title,
            subtitle: ios_subtitle,
            keywords: ios_keywords,
            description: ios.overflow,
        },
        android: AndroidBuckets {
            title: android_title,
            short_description: android_short,
            full_description: android.overflow,
        },
        placements,
    }
}

/// Rank keywords: tier ascending (high first), relevance descending,
/// then input order (the sort is stable).
fn rank<'a>(
    keywords: &'a [Keyword],
    policy: &PriorityPolicy,
    filter: &TermFilter<'_>,
) -> Vec<Ranked<'a>> {
    let mut ranked: Vec<Ranked<'a>> = keywords
        .iter()
        .enumerate()
        .map(|(index, keyword)| {
            let text = keyword.text.trim();
            Ranked {
                index,
                keyword,
                text,
                priority: priority::priority(keyword, policy),
                key: if text::token_count(text) == 0 {
                    String::new()
                } else {
                    text::literal_key(text)
                },
                terms: filter.terms(text),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| b.keyword.relevance().total_cmp(&a.keyword.relevance()))
    });
    ranked
}

fn allocate_store(
    store: Store,
    ranked: &[Ranked<'_>],
    specs: &[BucketSpec],
    overflow_field: MetadataField,
) -> StoreAllocation {
    let candidates: Vec<&Ranked<'_>> = ranked
        .iter()
        .filter(|r| !r.key.is_empty() && r.keyword.platform.targets(store))
        .collect();

    // Literal key -> field it landed in; duplicates follow the first.
    let mut assigned: HashMap<&str, MetadataField> = HashMap::new();
    // Significant term -> indexed field that already carries it.
    let mut term_owner: HashMap<&str, MetadataField> = HashMap::new();
    let mut buckets = Vec::with_capacity(specs.len());

    for spec in specs {
        let mut fill = Fill::new(*spec);
        for r in &candidates {
            if assigned.contains_key(r.key.as_str()) || !spec.admit.accepts(r) {
                continue;
            }
            let conflicts = r
                .terms
                .iter()
                .any(|t| term_owner.get(t.as_str()).is_some_and(|f| *f != spec.field));
            if conflicts {
                tracing::debug!(%store, keyword = r.text, field = %spec.field, "skipped: term already indexed");
                continue;
            }
            if !fill.fits(r.text) {
                if r.text.chars().count() > spec.budget {
                    tracing::debug!(%store, keyword = r.text, field = %spec.field, budget = spec.budget, "keyword exceeds field budget");
                }
                continue;
            }
            fill.push(r.text);
            assigned.insert(r.key.as_str(), spec.field);
            for term in &r.terms {
                term_owner.entry(term.as_str()).or_insert(spec.field);
            }
        }
        buckets.push(fill.terms);
    }

    let mut overflow = Vec::new();
    for r in &candidates {
        if !assigned.contains_key(r.key.as_str()) {
            assigned.insert(r.key.as_str(), overflow_field);
            overflow.push(r.text.to_string());
        }
    }

    let placed = candidates
        .iter()
        .filter_map(|r| assigned.get(r.key.as_str()).map(|f| (r.index, *f)))
        .collect();

    let unique: HashSet<&str> = candidates.iter().map(|r| r.key.as_str()).collect();
    tracing::debug!(
        %store,
        candidates = candidates.len(),
        unique = unique.len(),
        overflow = overflow.len(),
        "store allocation complete"
    );

    StoreAllocation {
        buckets,
        overflow,
        placed,
    }
}

fn take_buckets<const N: usize>(buckets: Vec<Vec<String>>) -> [Vec<String>; N] {
    let mut iter = buckets.into_iter();
    std::array::from_fn(|_| iter.next().unwrap_or_default())
}

const fn recommended_for(field: MetadataField) -> RecommendedField {
    match field {
        MetadataField::AppName => RecommendedField::Title,
        MetadataField::Subtitle | MetadataField::ShortDescription => RecommendedField::Subtitle,
        MetadataField::KeywordsField => RecommendedField::Keywords,
        MetadataField::Description | MetadataField::FullDescription => {
            RecommendedField::Description
        }
    }
}
