//! Command implementations.

use anyhow::Context;
use aso_kit_core::record::{self, AppRecord, RecordFormat};
use camino::Utf8Path;

pub mod analyze;
pub mod density;
pub mod info;
pub mod migrate;
pub mod optimize;
pub mod priority;
pub mod repetition;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Read and parse an app record, picking the format from the extension.
pub fn load_record(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<AppRecord> {
    let format = RecordFormat::from_extension(path.extension().unwrap_or_default())
        .with_context(|| format!("cannot read {path}"))?;
    let content = read_input_file(path, max_bytes)?;
    record::parse_record(&content, format).with_context(|| format!("failed to parse {path}"))
}
