//! Analyze command: every keyword check over one app record.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use aso_kit_core::analysis::{self, Check};
use aso_kit_core::config::Config;

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// App record (TOML, YAML or JSON).
    pub file: Utf8PathBuf,

    /// Checks to run (comma-separated). Omit for all checks.
    #[arg(long, value_delimiter = ',', value_enum)]
    pub checks: Option<Vec<Check>>,

    /// Minimum acceptable repetition score (0–100).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_score: Option<u8>,
}

/// Run the keyword checks on a record.
#[instrument(name = "cmd_analyze", skip_all, fields(file = %args.file))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, checks = ?args.checks, "executing analyze command");

    let record = super::load_record(&args.file, max_input_bytes)?;
    let min_score = args.min_score.or(config.min_repetition_score);

    let report = analysis::run_full_analysis(&record, config, args.checks.as_deref());

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match report.name {
            Some(ref name) => println!("{} ({})", name.bold(), args.file),
            None => println!("{}", args.file.bold()),
        }
        println!("  {} keywords", report.keyword_count);

        if let Some(ref tiers) = report.tiers {
            println!(
                "\n  {} {} high / {} medium / {} low",
                "Priority:".cyan(),
                tiers.high.green(),
                tiers.medium.yellow(),
                tiers.low,
            );
        }
        if let Some(ref scored) = report.priority {
            super::priority::print_table(scored);
        }

        if let Some(ref repetition) = report.repetition {
            super::repetition::print_report(&repetition.ios);
            super::repetition::print_report(&repetition.android);
        }

        if let Some(ref density) = report.density {
            println!();
            super::density::print_report(density);
        }

        if let Some(ref set) = report.optimize {
            super::optimize::print_set(set, config);
        }
    }

    if let (Some(min), Some(lowest)) = (min_score, report.min_repetition_score())
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
