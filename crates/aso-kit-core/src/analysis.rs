//! Combined keyword analysis of one app record.
//!
//! [`run_full_analysis`] runs any subset of the four engine checks and
//! gathers their reports. Each check is also callable on its own from its
//! module.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::density::{self, DensityReport};
use crate::model::Priority;
use crate::optimize::{self, OptimizedSet};
use crate::priority::{self, PrioritizedKeyword};
use crate::record::AppRecord;
use crate::repetition::{self, StoreRepetition};

/// A check [`run_full_analysis`] can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Check {
    /// Priority scoring of every keyword.
    Priority,
    /// Cross-field repetition on both stores.
    Repetition,
    /// Keyword-set density.
    Density,
    /// Field allocation.
    Optimize,
}

impl Check {
    /// Every check, in report order.
    pub const ALL: [Self; 4] = [Self::Priority, Self::Repetition, Self::Density, Self::Optimize];

    /// Lowercase check name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Repetition => "repetition",
            Self::Density => "density",
            Self::Optimize => "optimize",
        }
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword counts per priority tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TierCounts {
    /// High-priority keywords.
    pub high: usize,
    /// Medium-priority keywords.
    pub medium: usize,
    /// Low-priority keywords.
    pub low: usize,
}

impl TierCounts {
    fn tally(keywords: &[PrioritizedKeyword]) -> Self {
        keywords.iter().fold(Self::default(), |mut acc, kw| {
            match kw.priority {
                Priority::High => acc.high += 1,
                Priority::Medium => acc.medium += 1,
                Priority::Low => acc.low += 1,
            }
            acc
        })
    }
}

/// Combined report. A check that was not run is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AsoReport {
    /// Record display name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of input keywords.
    pub keyword_count: usize,
    /// Keywords with score, tier and KEI, in input order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Vec<PrioritizedKeyword>>,
    /// Tier histogram of `priority`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiers: Option<TierCounts>,
    /// Repetition issues and scores for both stores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition: Option<StoreRepetition>,
    /// Keyword-set density.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<DensityReport>,
    /// Field allocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize: Option<OptimizedSet>,
}

impl AsoReport {
    /// Lowest repetition score across stores, when repetition was checked.
    pub fn min_repetition_score(&self) -> Option<u8> {
        self.repetition.as_ref().map(StoreRepetition::min_score)
    }
}

/// Run the selected checks (all when `checks` is `None`) over a record.
#[tracing::instrument(skip_all, fields(keywords = record.keywords.len()))]
pub fn run_full_analysis(
    record: &AppRecord,
    config: &Config,
    checks: Option<&[Check]>,
) -> AsoReport {
    let enabled: HashSet<Check> = checks.map_or_else(
        || Check::ALL.into_iter().collect(),
        |list| list.iter().copied().collect(),
    );
    tracing::debug!(checks = enabled.len(), "running analysis");

    let prioritized = enabled
        .contains(&Check::Priority)
        .then(|| priority::prioritize(&record.keywords, &config.priority));
    let tiers = prioritized.as_deref().map(TierCounts::tally);

    let repetition = enabled.contains(&Check::Repetition).then(|| {
        repetition::check_all(&record.text, &record.keywords, &config.repetition)
    });

    let density = enabled
        .contains(&Check::Density)
        .then(|| density::density_of_keyword_set(&record.keywords, &record.text));

    let optimized = enabled.contains(&Check::Optimize).then(|| {
        optimize::optimize(
            &record.keywords,
            &config.priority,
            &config.repetition,
            &config.budgets,
        )
    });

    AsoReport {
        name: record.name.clone(),
        keyword_count: record.keywords.len(),
        priority: prioritized,
        tiers,
        repetition,
        density,
        optimize: optimized,
    }
}
