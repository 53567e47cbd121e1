//! Workspace automation: man pages and shell completions for aso-kit.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "xtask", about = "aso-kit workspace tasks")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Render man pages for aso-kit and each subcommand.
    Man {
        /// Output directory.
        #[arg(long, default_value = "target/man")]
        out: PathBuf,
    },
    /// Generate shell completion scripts.
    Completions {
        /// Output directory.
        #[arg(long, default_value = "target/completions")]
        out: PathBuf,
        /// Shells to generate for. Defaults to all supported shells.
        #[arg(long, value_delimiter = ',')]
        shell: Vec<Shell>,
    },
}

fn main() -> Result<()> {
    let root = workspace_root()?;
    match Xtask::parse().task {
        Task::Man { out } => man(&root.join(out)),
        Task::Completions { out, shell } => completions(&root.join(out), &shell),
    }
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask manifest has no parent directory")
}

fn man(out: &Path) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    let cmd = aso_kit::command();
    let name = cmd.get_name().to_string();
    write_man(out, &name, cmd.clone())?;
    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        let sub_name = format!("{name}-{}", sub.get_name());
        write_man(out, &sub_name, sub.clone().name(sub_name.clone()))?;
    }
    println!("man pages written to {}", out.display());
    Ok(())
}

fn write_man(out: &Path, name: &str, cmd: clap::Command) -> Result<()> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buffer)
        .with_context(|| format!("failed to render man page for {name}"))?;
    let path = out.join(format!("{name}.1"));
    fs::write(&path, buffer).with_context(|| format!("failed to write {}", path.display()))
}

fn completions(out: &Path, shells: &[Shell]) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    let shells = if shells.is_empty() {
        Shell::value_variants()
    } else {
        shells
    };
    let mut cmd = aso_kit::command();
    let bin = cmd.get_name().to_string();
    for &shell in shells {
        let path = clap_complete::generate_to(shell, &mut cmd, &bin, out)
            .with_context(|| format!("failed to generate {shell} completions"))?;
        println!("{}", path.display());
    }
    Ok(())
}
