//! Migrate command: rewrite legacy demo app names in a record.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info, instrument};

use aso_kit_core::config::Config;
use aso_kit_core::migrate::{self, Rewrite};
use aso_kit_core::record::AppRecord;

/// Arguments for the `migrate` subcommand.
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// App record (TOML, YAML or JSON).
    pub file: Utf8PathBuf,

    /// Write the migrated record as JSON to this path instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,
}

#[derive(Serialize)]
struct MigrateOutput<'a> {
    rewrites: &'a [Rewrite],
    record: &'a AppRecord,
}

/// Apply the configured rename table to a record.
#[instrument(name = "cmd_migrate", skip_all, fields(file = %args.file))]
pub fn cmd_migrate(
    args: MigrateArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        file = %args.file,
        renames = config.migrations.app_names.len(),
        "executing migrate command"
    );

    let record = super::load_record(&args.file, max_input_bytes)?;
    let migration = migrate::apply_legacy_renames(record, &config.migrations);

    if let Some(ref output) = args.output {
        let json = serde_json::to_string_pretty(&migration.record)?;
        std::fs::write(output.as_std_path(), format!("{json}\n"))
            .with_context(|| format!("failed to write {output}"))?;
        info!(output = %output, rewrites = migration.rewrites.len(), "migrated record written");
    }

    if global_json {
        let out = MigrateOutput {
            rewrites: &migration.rewrites,
            record: &migration.record,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if migration.changed() {
        println!("{}", args.file.bold());
        for rewrite in &migration.rewrites {
            println!(
                "  {}: {} -> {}",
                rewrite.target,
                rewrite.from.red(),
                rewrite.to.green()
            );
        }
    } else {
        println!("{} {}", args.file.bold(), "no legacy names found".dimmed());
    }
    if args.output.is_none() {
        println!("{}", serde_json::to_string_pretty(&migration.record)?);
    }
    Ok(())
}
