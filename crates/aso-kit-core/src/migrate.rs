//! Legacy demo-data migration.
//!
//! Older demo records carry placeholder app names that have since been
//! replaced. This step rewrites them from a configured table before a record
//! reaches the engine. It is separate from scoring and never runs
//! implicitly.
//!
//! Rewrites are single-pass and a target name may not itself be a source,
//! so applying a migration twice equals applying it once.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::model::Store;
use crate::record::AppRecord;

/// Rename table for legacy app names (old name → new name).
///
/// Matching is on the trimmed name and ignores case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct MigrationPolicy {
    /// Old app name → replacement.
    pub app_names: BTreeMap<String, String>,
}

impl MigrationPolicy {
    /// Reject chained renames, which would make the migration order-dependent.
    pub fn validate(&self) -> ConfigResult<()> {
        for (from, to) in &self.app_names {
            if self.lookup(to).is_some() {
                return Err(ConfigError::InvalidPolicy {
                    field: format!("migrations.app_names.{from}"),
                    reason: format!("target '{to}' is itself renamed"),
                });
            }
        }
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_lowercase();
        self.app_names
            .iter()
            .find(|(from, _)| from.trim().to_lowercase() == name)
            .map(|(_, to)| to.as_str())
    }
}

/// Where a rewrite was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RenameTarget {
    /// The record's display name.
    RecordName,
    /// A store listing's app name.
    AppName(Store),
}

impl std::fmt::Display for RenameTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordName => f.write_str("name"),
            Self::AppName(store) => write!(f, "{store}.app_name"),
        }
    }
}

/// One applied rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rewrite {
    /// Field rewritten.
    pub target: RenameTarget,
    /// Value before.
    pub from: String,
    /// Value after.
    pub to: String,
}

/// A migrated record and the rewrites that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    /// The record after renaming.
    pub record: AppRecord,
    /// Every rewrite applied, in field order.
    pub rewrites: Vec<Rewrite>,
}

impl Migration {
    /// Whether the record was changed.
    pub fn changed(&self) -> bool {
        !self.rewrites.is_empty()
    }
}

/// Apply the rename table to a record's app names.
#[tracing::instrument(skip_all, fields(renames = policy.app_names.len()))]
pub fn apply_legacy_renames(mut record: AppRecord, policy: &MigrationPolicy) -> Migration {
    let mut rewrites = Vec::new();

    let slots = [
        (RenameTarget::RecordName, &mut record.name),
        (RenameTarget::AppName(Store::Ios), &mut record.text.ios.app_name),
        (
            RenameTarget::AppName(Store::Android),
            &mut record.text.android.app_name,
        ),
    ];
    for (target, slot) in slots {
        let Some(current) = slot.as_deref() else {
            continue;
        };
        let Some(replacement) = policy.lookup(current) else {
            continue;
        };
        if replacement == current {
            continue;
        }
        tracing::info!(
            ?target,
            from = current,
            to = replacement,
            "rewriting legacy app name"
        );
        rewrites.push(Rewrite {
            target,
            from: current.to_string(),
            to: replacement.to_string(),
        });
        *slot = Some(replacement.to_string());
    }

    Migration { record, rewrites }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AndroidText, AppText, IosText};

    fn policy() -> MigrationPolicy {
        MigrationPolicy {
            app_names: BTreeMap::from([("Golden Pharaoh Demo".into(), "RedRain Fortune".into())]),
        }
    }

    fn legacy_record() -> AppRecord {
        AppRecord {
            name: Some("golden pharaoh demo".into()),
            text: AppText {
                ios: IosText {
                    app_name: Some("Golden Pharaoh Demo ".into()),
                    ..IosText::default()
                },
                android: AndroidText {
                    app_name: Some("Something Else".into()),
                    ..AndroidText::default()
                },
            },
            keywords: Vec::new(),
        }
    }

    #[test]
    fn rewrites_matching_names() {
        let migration = apply_legacy_renames(legacy_record(), &policy());
        assert!(migration.changed());
        assert_eq!(migration.rewrites.len(), 2);
        assert_eq!(migration.rewrites[0].target, RenameTarget::RecordName);
        assert_eq!(
            migration.rewrites[1].target,
            RenameTarget::AppName(Store::Ios)
        );
        assert_eq!(migration.record.name.as_deref(), Some("RedRain Fortune"));
        assert_eq!(
            migration.record.text.ios.app_name.as_deref(),
            Some("RedRain Fortune")
        );
        assert_eq!(
            migration.record.text.android.app_name.as_deref(),
            Some("Something Else")
        );
    }

    #[test]
    fn idempotent() {
        let once = apply_legacy_renames(legacy_record(), &policy());
        let twice = apply_legacy_renames(once.record.clone(), &policy());
        assert!(!twice.changed());
        assert_eq!(once.record, twice.record);
    }

    #[test]
    fn matching_folds_non_ascii_case() {
        let policy = MigrationPolicy {
            app_names: BTreeMap::from([("Éclair Ünlimited".into(), "RedRain Fortune".into())]),
        };
        let record = AppRecord {
            text: AppText {
                android: AndroidText {
                    app_name: Some("ÉCLAIR ÜNLIMITED".into()),
                    ..AndroidText::default()
                },
                ..AppText::default()
            },
            ..AppRecord::default()
        };
        let migration = apply_legacy_renames(record, &policy);
        assert_eq!(migration.rewrites.len(), 1);
        assert_eq!(
            migration.record.text.android.app_name.as_deref(),
            Some("RedRain Fortune")
        );
    }

    #[test]
    fn chained_renames_detected_across_case() {
        let policy = MigrationPolicy {
            app_names: BTreeMap::from([
                ("Old Ärger".into(), "Mid ärger".into()),
                ("MID ÄRGER".into(), "New".into()),
            ]),
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn empty_policy_is_a_no_op() {
        let migration = apply_legacy_renames(legacy_record(), &MigrationPolicy::default());
        assert!(!migration.changed());
        assert_eq!(migration.record, legacy_record());
    }

    #[test]
    fn target_labels() {
        assert_eq!(RenameTarget::RecordName.to_string(), "name");
        assert_eq!(
            RenameTarget::AppName(Store::Android).to_string(),
            "android.app_name"
        );
    }

    #[test]
    fn chained_renames_rejected() {
        let chained = MigrationPolicy {
            app_names: BTreeMap::from([
                ("Old".into(), "Middle".into()),
                ("middle".into(), "New".into()),
            ]),
        };
        assert!(chained.validate().is_err());
        assert!(policy().validate().is_ok());
    }
}
