//! Keyword priority scoring.
//!
//! The composite score is a weighted sum of four components, each on a
//! 0–100 scale:
//!
//! - category score (branded > generic > competitor)
//! - normalized search volume, `log10(1 + v) / log10(1 + ceiling)`
//! - ease, `100 − difficulty`
//! - relevance
//!
//! The tier is read off the composite against two cutoffs. Every constant
//! lives in [`PriorityPolicy`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{Category, Keyword, Priority};
use crate::text::round1;

/// Component weights of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct PriorityWeights {
    /// Weight of the category score.
    pub category: f64,
    /// Weight of normalized search volume.
    pub volume: f64,
    /// Weight of ease (inverse difficulty).
    pub ease: f64,
    /// Weight of relevance.
    pub relevance: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            category: 0.30,
            volume: 0.25,
            ease: 0.15,
            relevance: 0.30,
        }
    }
}

/// Per-category component scores (0–100).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct CategoryScores {
    /// Score for branded keywords.
    pub branded: f64,
    /// Score for generic keywords.
    pub generic: f64,
    /// Score for competitor keywords.
    pub competitor: f64,
}

impl Default for CategoryScores {
    fn default() -> Self {
        Self {
            branded: 100.0,
            generic: 60.0,
            competitor: 30.0,
        }
    }
}

/// Tunable constants of the priority formula.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct PriorityPolicy {
    /// Component weights.
    pub weights: PriorityWeights,
    /// Category component scores.
    pub category_scores: CategoryScores,
    /// Search volume that normalizes to 100.
    pub volume_ceiling: u64,
    /// Composite score at or above which a keyword is high priority.
    pub high_cutoff: f64,
    /// Composite score at or above which a keyword is medium priority.
    pub medium_cutoff: f64,
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        Self {
            weights: PriorityWeights::default(),
            category_scores: CategoryScores::default(),
            volume_ceiling: 100_000,
            high_cutoff: 70.0,
            medium_cutoff: 45.0,
        }
    }
}

impl PriorityPolicy {
    /// Reject policies that would make scoring ill-defined or non-monotonic.
    pub fn validate(&self) -> ConfigResult<()> {
        let finite_non_negative = [
            ("priority.weights.category", self.weights.category),
            ("priority.weights.volume", self.weights.volume),
            ("priority.weights.ease", self.weights.ease),
            ("priority.weights.relevance", self.weights.relevance),
            ("priority.category_scores.branded", self.category_scores.branded),
            ("priority.category_scores.generic", self.category_scores.generic),
            ("priority.category_scores.competitor", self.category_scores.competitor),
        ];
        for (field, value) in finite_non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("{value} must be a finite, non-negative number")));
            }
        }
        for (field, value) in [
            ("priority.high_cutoff", self.high_cutoff),
            ("priority.medium_cutoff", self.medium_cutoff),
        ] {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} must be finite")));
            }
        }
        if self.medium_cutoff > self.high_cutoff {
            return Err(invalid(
                "priority.medium_cutoff",
                format!(
                    "{} is above high_cutoff {}",
                    self.medium_cutoff, self.high_cutoff
                ),
            ));
        }
        if self.volume_ceiling == 0 {
            return Err(invalid("priority.volume_ceiling", "must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Component score for a keyword's category (brand flag counts as branded).
    pub fn category_score(&self, keyword: &Keyword) -> f64 {
        if keyword.is_branded() {
            return self.category_scores.branded;
        }
        match keyword.category {
            Category::Branded => self.category_scores.branded,
            Category::Generic => self.category_scores.generic,
            Category::Competitor => self.category_scores.competitor,
        }
    }

    /// Log-scaled search volume on 0–100.
    pub fn normalized_volume(&self, search_volume: u64) -> f64 {
        let ceiling = (self.volume_ceiling.max(1) as f64).ln_1p();
        ((search_volume as f64).ln_1p() / ceiling).min(1.0) * 100.0
    }
}

fn invalid(field: &str, reason: String) -> ConfigError {
    ConfigError::InvalidPolicy {
        field: field.to_string(),
        reason,
    }
}

/// A keyword annotated with its derived priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PrioritizedKeyword {
    /// The input keyword, unchanged.
    #[serde(flatten)]
    pub keyword: Keyword,
    /// Composite score (one decimal).
    pub score: f64,
    /// Priority tier.
    pub priority: Priority,
    /// Keyword Efficiency Index.
    pub kei: f64,
}

/// Composite score of a keyword, unrounded.
pub fn score(keyword: &Keyword, policy: &PriorityPolicy) -> f64 {
    let w = &policy.weights;
    w.category * policy.category_score(keyword)
        + w.volume * policy.normalized_volume(keyword.search_volume)
        + w.ease * (100.0 - keyword.difficulty())
        + w.relevance * keyword.relevance()
}

/// Map a composite score to its tier.
pub fn tier(score: f64, policy: &PriorityPolicy) -> Priority {
    if score >= policy.high_cutoff {
        Priority::High
    } else if score >= policy.medium_cutoff {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Priority tier of a keyword.
pub fn priority(keyword: &Keyword, policy: &PriorityPolicy) -> Priority {
    tier(score(keyword, policy), policy)
}

/// Keyword Efficiency Index: search volume per point of difficulty.
///
/// Difficulty below 1 is treated as 1.
pub fn kei(keyword: &Keyword) -> f64 {
    round1(keyword.search_volume as f64 / keyword.difficulty().max(1.0))
}

/// Annotate every keyword with score, tier and KEI, preserving input order.
#[tracing::instrument(skip_all, fields(keywords = keywords.len()))]
pub fn prioritize(keywords: &[Keyword], policy: &PriorityPolicy) -> Vec<PrioritizedKeyword> {
    keywords
        .iter()
        .map(|kw| {
            let raw = score(kw, policy);
            PrioritizedKeyword {
                keyword: kw.clone(),
                score: round1(raw),
                priority: tier(raw, policy),
                kei: kei(kw),
            }
        })
        .collect()
}
