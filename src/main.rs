use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use plugin_validate::markdown::FsMarkdownSource;
use plugin_validate::report::{render_json, render_text};
use plugin_validate::{validate_with, CheckType, ValidateOptions};

#[derive(Parser)]
#[command(name = "plugin-validate")]
#[command(version, about = "Validate layered architecture of plugin packages", long_about = None)]
struct Cli {
    /// Repository root containing the plugins/ directory
    #[arg(default_value = ".")]
    repo_root: PathBuf,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// List passing checks individually
    #[arg(short, long)]
    verbose: bool,

    /// Leave a check out of the run (repeatable)
    #[arg(long, value_enum, value_name = "CHECK")]
    skip: Vec<CheckType>,
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ValidateOptions { skip: cli.skip };

    let results = validate_with(&cli.repo_root, &options, &FsMarkdownSource)
        .with_context(|| format!("Failed to validate {}", cli.repo_root.display()))?;

    if cli.json {
        println!("{}", render_json(&results)?);
    } else {
        print!("{}", render_text(&results, cli.verbose));
    }

    Ok(if results.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
