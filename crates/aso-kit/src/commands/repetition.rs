//! Repetition command: terms repeated across a store's indexed fields.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use aso_kit_core::config::Config;
use aso_kit_core::model::Store;
use aso_kit_core::repetition::{self, RepetitionReport, Severity};

/// Arguments for the `repetition` subcommand.
#[derive(Args, Debug)]
pub struct RepetitionArgs {
    /// App record (TOML, YAML or JSON).
    pub file: Utf8PathBuf,

    /// Check one store only. Omit for both.
    #[arg(long, value_enum)]
    pub platform: Option<Store>,

    /// Minimum acceptable compliance score (0–100).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_score: Option<u8>,
}

/// Check a record for repeated indexed terms.
#[instrument(name = "cmd_repetition", skip_all, fields(file = %args.file))]
pub fn cmd_repetition(
    args: RepetitionArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, platform = ?args.platform, "executing repetition command");

    let record = super::load_record(&args.file, max_input_bytes)?;
    let min_score = args.min_score.or(config.min_repetition_score);

    let stores: &[Store] = match args.platform {
        Some(ref store) => std::slice::from_ref(store),
        None => &Store::ALL,
    };
    let reports: Vec<RepetitionReport> = stores
        .iter()
        .map(|&store| {
            repetition::check_repetition(store, &record.text, &record.keywords, &config.repetition)
        })
        .collect();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("{}", args.file.bold());
        for report in &reports {
            print_report(report);
        }
    }

    let lowest = reports.iter().map(|r| r.score).min().unwrap_or(100);
    if let Some(min) = min_score
        && lowest < min
    {
        bail!(
            "{} repetition score {} is below minimum {}. Remove repeated terms from the flagged fields.",
            args.file,
            lowest,
            min,
        );
    }

    Ok(())
}

/// Colour a 0–100 score.
pub(crate) fn score_label(score: u8) -> String {
    let text = format!("{score}/100");
    if score >= 80 {
        text.green().to_string()
    } else if score >= 60 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

/// Print one store's issues and score.
pub(crate) fn print_report(report: &RepetitionReport) {
    println!(
        "\n  {} {} ({} errors, {} warnings)",
        format!("{}:", report.store).cyan(),
        score_label(report.score),
        report.error_count(),
        report.warning_count(),
    );
    for issue in &report.issues {
        let severity = match issue.severity {
            Severity::Error => issue.severity.as_str().red().to_string(),
            Severity::Warning => issue.severity.as_str().yellow().to_string(),
        };
        println!("    {severity}: {}", issue.message);
        if let Some(ref fix) = issue.recommendation {
            println!("      {}", fix.dimmed());
        }
    }
}
