//! Optimize command: allocate keywords into store fields.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use aso_kit_core::config::Config;
use aso_kit_core::optimize::{self, OptimizedSet};

/// Arguments for the `optimize` subcommand.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// App record (TOML, YAML or JSON).
    pub file: Utf8PathBuf,

    /// Print only the iOS keywords field, ready to paste.
    #[arg(long)]
    pub keywords_field: bool,
}

/// Allocate a record's keywords.
#[instrument(name = "cmd_optimize", skip_all, fields(file = %args.file))]
pub fn cmd_optimize(
    args: OptimizeArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, keywords_field = args.keywords_field, "executing optimize command");

    let record = super::load_record(&args.file, max_input_bytes)?;
    let set = optimize::optimize(
        &record.keywords,
        &config.priority,
        &config.repetition,
        &config.budgets,
    );

    if args.keywords_field {
        if global_json {
            println!("{}", serde_json::to_string(&set.ios.keywords_field)?);
        } else {
            println!("{}", set.ios.keywords_field);
        }
        return Ok(());
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&set)?);
        return Ok(());
    }

    println!("{}", args.file.bold());
    print_set(&set, config);
    Ok(())
}

/// Print both stores' buckets with budget usage.
pub(crate) fn print_set(set: &OptimizedSet, config: &Config) {
    let budgets = &config.budgets;
    let list = |terms: &[String]| terms.join(", ");

    println!("\n  {}", "iOS:".cyan());
    print_bucket("title", &list(&set.ios.title), Some(budgets.ios_title));
    print_bucket("subtitle", &list(&set.ios.subtitle), Some(budgets.ios_subtitle));
    print_bucket(
        "keywords",
        &set.ios.keywords_field,
        Some(budgets.ios_keywords),
    );
    print_bucket("description", &list(&set.ios.description), None);

    println!("\n  {}", "Android:".cyan());
    print_bucket("title", &list(&set.android.title), Some(budgets.android_title));
    print_bucket(
        "short description",
        &list(&set.android.short_description),
        Some(budgets.android_short_description),
    );
    print_bucket(
        "full description",
        &list(&set.android.full_description),
        None,
    );
}

fn print_bucket(label: &str, joined: &str, budget: Option<usize>) {
    let usage = budget.map_or_else(String::new, |max| {
        format!(" ({}/{max})", joined.chars().count())
    });
    if joined.is_empty() {
        println!("    {:<18} {}{}", label.dimmed(), "-".dimmed(), usage.dimmed());
    } else {
        println!("    {:<18} {joined}{}", label.dimmed(), usage.dimmed());
    }
}
