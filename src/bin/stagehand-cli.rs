//! Stagehand CLI - classify one content commit from two snapshot files.
//!
//! Reads the old (parent revision) and new (child revision) program source,
//! classifies the delta against the given commit-kind tag, and prints the
//! resulting rich commit as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use stagehand::StructuredDiff;

#[derive(Parser)]
#[command(name = "stagehand")]
#[command(
    about = "Classify the structural change between two program snapshots",
    long_about = None
)]
struct Cli {
    /// Path to the old (parent revision) program source
    old: PathBuf,

    /// Path to the new (child revision) program source
    new: PathBuf,

    /// Commit-kind tag as authored in the tutorial markup
    kind: String,

    /// Extra string arguments for the kind (e.g. a display identifier)
    args: Vec<String>,

    /// Label prefixed onto structure errors
    #[arg(long, default_value = "cli")]
    label: String,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let old_code = fs::read_to_string(&cli.old)
        .with_context(|| format!("reading old snapshot {:?}", cli.old))?;
    let new_code = fs::read_to_string(&cli.new)
        .with_context(|| format!("reading new snapshot {:?}", cli.new))?;

    let diff = StructuredDiff::new(cli.label, &old_code, &new_code)?;
    let args: Vec<&str> = cli.args.iter().map(String::as_str).collect();
    let commit = diff.rich_commit(&cli.kind, &args)?;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&commit)?
    } else {
        serde_json::to_string(&commit)?
    };
    println!("{}", rendered);
    Ok(())
}
