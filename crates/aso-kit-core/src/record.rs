//! App records: the metadata snapshot a caller hands to the engine.
//!
//! Records are plain documents in TOML, YAML or JSON:
//!
//! ```yaml
//! name: RedRain Fortune
//! ios:
//!   app_name: RedRain Fortune
//!   subtitle: Egyptian Fortune Adventure
//!   keywords_field: slots,casino,pharaoh
//! android:
//!   app_name: RedRain Fortune
//!   short_description: Spin Egyptian slots
//! keywords:
//!   - text: redrain
//!     category: branded
//!     search_volume: 1200
//!     difficulty: 10
//!     relevance_score: 100
//! ```

use figment::Figment;
use figment::providers::{Format, Json, Toml, Yaml};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{RecordError, RecordResult};
use crate::model::{AppText, Keyword};

/// An app's metadata and keyword list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct AppRecord {
    /// Display name of the app, independent of store listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Per-store text metadata.
    #[serde(flatten)]
    pub text: AppText,
    /// Keyword records.
    pub keywords: Vec<Keyword>,
}

/// Serialization format of a record document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// TOML document.
    Toml,
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl RecordFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> RecordResult<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(RecordError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Parse a record document.
#[tracing::instrument(skip(content), fields(content_len = content.len()))]
pub fn parse_record(content: &str, format: RecordFormat) -> RecordResult<AppRecord> {
    let figment = match format {
        RecordFormat::Toml => Figment::from(Toml::string(content)),
        RecordFormat::Yaml => Figment::from(Yaml::string(content)),
        RecordFormat::Json => Figment::from(Json::string(content)),
    };
    let record: AppRecord = figment
        .extract()
        .map_err(|e| RecordError::Parse(Box::new(e)))?;
    tracing::debug!(keywords = record.keywords.len(), "record parsed");
    Ok(record)
}
