//! Logging setup: human-readable stderr output plus an optional JSONL file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Exact log file path; wins over every directory setting.
const ENV_LOG_PATH: &str = "ASO_KIT_LOG_PATH";
/// Log directory; wins over the config file's `log_dir`.
const ENV_LOG_DIR: &str = "ASO_KIT_LOG_DIR";
/// File name used inside a log directory.
const LOG_FILE_NAME: &str = "aso-kit.jsonl";

/// Where, if anywhere, JSONL logs are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Exact log file.
    pub log_path: Option<PathBuf>,
    /// Directory holding `aso-kit.jsonl`.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment, falling back to the configured log directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self {
            log_path: std::env::var_os(ENV_LOG_PATH)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            log_dir: std::env::var_os(ENV_LOG_DIR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or(config_log_dir),
        }
    }

    /// Directory and file name of the log file.
    fn log_file(&self) -> Option<(PathBuf, PathBuf)> {
        if let Some(ref path) = self.log_path {
            let name = path.file_name()?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            return Some((dir.to_path_buf(), PathBuf::from(name)));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), PathBuf::from(LOG_FILE_NAME)))
    }
}

/// Build the event filter.
///
/// `RUST_LOG` wins when set and valid. Otherwise `-q` means errors only,
/// `-v` debug, `-vv` trace, and no flag falls back to the configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => default_level,
            1 => "debug",
            _ => "trace",
        }
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and closes the file writer.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match config.log_file() {
        Some((dir, name)) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_splits_into_dir_and_name() {
        let config = ObservabilityConfig {
            log_path: Some(PathBuf::from("/var/log/aso/run.jsonl")),
            log_dir: Some(PathBuf::from("/ignored")),
        };
        let (dir, name) = config.log_file().unwrap();
        assert_eq!(dir, PathBuf::from("/var/log/aso"));
        assert_eq!(name, PathBuf::from("run.jsonl"));
    }

    #[test]
    fn bare_file_name_logs_to_cwd() {
        let config = ObservabilityConfig {
            log_path: Some(PathBuf::from("run.jsonl")),
            log_dir: None,
        };
        let (dir, _) = config.log_file().unwrap();
        assert_eq!(dir, PathBuf::from("."));
    }

    #[test]
    fn directory_gets_default_file_name() {
        let config = ObservabilityConfig {
            log_path: None,
            log_dir: Some(PathBuf::from("/tmp/aso-logs")),
        };
        let (dir, name) = config.log_file().unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/aso-logs"));
        assert_eq!(name, PathBuf::from(LOG_FILE_NAME));
    }

    #[test]
    fn no_file_without_settings() {
        assert!(ObservabilityConfig::default().log_file().is_none());
    }
}
