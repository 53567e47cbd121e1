//! Core library for aso-kit.
//!
//! A stateless keyword engine for app store metadata: priority scoring,
//! cross-field repetition checks, keyword density and budgeted field
//! allocation for the App Store and Google Play.
//!
//! # Modules
//!
//! - [`model`] - Keywords, store fields and app text
//! - [`text`] - Tokenizing and whole-word keyword matching
//! - [`density`] - Keyword density across metadata fields
//! - [`repetition`] - Indexed-field repetition issues and compliance score
//! - [`priority`] - Composite priority score, tiers and KEI
//! - [`optimize`] - Allocation of keywords into store fields
//! - [`analysis`] - All of the above over one app record
//! - [`record`] - App record parsing
//! - [`migrate`] - Legacy app-name rewrites
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use aso_kit_core::model::{Category, Keyword};
//! use aso_kit_core::priority::{self, PriorityPolicy};
//!
//! let keyword = Keyword::new("redrain")
//!     .with_category(Category::Branded)
//!     .with_metrics(12_000, 15.0, 95.0);
//! let tier = priority::priority(&keyword, &PriorityPolicy::default());
//! println!("{}: {tier}", keyword.text);
//! ```
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod density;
pub mod error;
pub mod migrate;
pub mod model;
pub mod optimize;
pub mod priority;
pub mod record;
pub mod repetition;
pub mod text;
pub mod word_lists;

pub use analysis::{AsoReport, Check, run_full_analysis};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{ConfigError, ConfigResult, RecordError, RecordResult};
pub use model::{AppText, Category, Keyword, MetadataField, Platform, Priority, Store};
pub use record::{AppRecord, RecordFormat, parse_record};

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
