//! Priority command: composite score, tier and KEI per keyword.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use aso_kit_core::config::Config;
use aso_kit_core::model::Priority;
use aso_kit_core::priority::{self, PrioritizedKeyword};

/// Arguments for the `priority` subcommand.
#[derive(Args, Debug)]
pub struct PriorityArgs {
    /// App record (TOML, YAML or JSON).
    pub file: Utf8PathBuf,

    /// Sort by score, highest first, instead of input order.
    #[arg(long)]
    pub sort: bool,
}

/// Score every keyword in a record.
#[instrument(name = "cmd_priority", skip_all, fields(file = %args.file))]
pub fn cmd_priority(
    args: PriorityArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, sort = args.sort, "executing priority command");

    let record = super::load_record(&args.file, max_input_bytes)?;
    let mut scored = priority::prioritize(&record.keywords, &config.priority);
    if args.sort {
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&scored)?);
        return Ok(());
    }

    println!("{}", args.file.bold());
    print_table(&scored);
    Ok(())
}

/// Print scored keywords as an aligned table.
pub(crate) fn print_table(scored: &[PrioritizedKeyword]) {
    if scored.is_empty() {
        println!("  {}", "no keywords".dimmed());
        return;
    }
    let width = scored
        .iter()
        .map(|kw| kw.keyword.text.chars().count())
        .max()
        .unwrap_or(0)
        .max("keyword".len());
    println!(
        "  {:<width$}  {:<10}  {:>5}  {:<6}  {:>9}",
        "keyword".dimmed(),
        "category".dimmed(),
        "score".dimmed(),
        "tier".dimmed(),
        "kei".dimmed(),
    );
    for kw in scored {
        // Pad before colouring so escape codes do not skew the columns.
        let tier = format!("{:<6}", kw.priority.as_str());
        let tier = match kw.priority {
            Priority::High => tier.green().to_string(),
            Priority::Medium => tier.yellow().to_string(),
            Priority::Low => tier.dimmed().to_string(),
        };
        println!(
            "  {:<width$}  {:<10}  {:>5.1}  {}  {:>9.1}",
            kw.keyword.text,
            kw.keyword.category.as_str(),
            kw.score,
            tier,
            kw.kei,
        );
    }
}
