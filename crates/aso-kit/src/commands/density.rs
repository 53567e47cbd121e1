//! Density command: how often keywords appear in the record's text.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use aso_kit_core::density::{self, DensityReport};

/// Arguments for the `density` subcommand.
#[derive(Args, Debug)]
pub struct DensityArgs {
    /// App record (TOML, YAML or JSON).
    pub file: Utf8PathBuf,

    /// Measure one keyword instead of the record's keyword set.
    #[arg(short, long)]
    pub keyword: Option<String>,
}

/// Report keyword density for a record.
#[instrument(name = "cmd_density", skip_all, fields(file = %args.file))]
pub fn cmd_density(
    args: DensityArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, keyword = ?args.keyword, "executing density command");

    let record = super::load_record(&args.file, max_input_bytes)?;

    if let Some(ref keyword) = args.keyword {
        let report = density::keyword_density(keyword, &record.text);
        if global_json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "{}: \"{}\" appears {} time(s), {:.1}% of words",
                args.file.bold(),
                report.keyword,
                report.occurrences,
                report.density,
            );
        }
        return Ok(());
    }

    let report = density::density_of_keyword_set(&record.keywords, &record.text);
    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("{}", args.file.bold());
    print_report(&report);
    Ok(())
}

/// Print set density per store.
pub(crate) fn print_report(report: &DensityReport) {
    println!(
        "  {} iOS {:.1}% / Android {:.1}% / overall {:.1}%",
        "Density:".cyan(),
        report.ios,
        report.android,
        report.overall,
    );
}
