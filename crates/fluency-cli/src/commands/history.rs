//! History command - normalize stored session records.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use tracing::warn;

use fluency_core::normalize_record;

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    /// Stored record files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Skip records that cannot be normalized
    #[arg(long)]
    skip_invalid: bool,
}

pub async fn run(args: HistoryArgs) -> anyhow::Result<()> {
    let files: Vec<PathBuf> = glob(&args.input)?.filter_map(|r| r.ok()).collect();
    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let mut summaries = Vec::with_capacity(files.len());
    for path in &files {
        let content = fs::read_to_string(path)?;
        match normalize_record(&content) {
            Ok(summary) => summaries.push(summary),
            Err(e) if args.skip_invalid => {
                warn!("Skipping {}: {}", path.display(), e);
            }
            Err(e) => anyhow::bail!("{}: {}", path.display(), e),
        }
    }

    println!("{}", serde_json::to_string_pretty(&summaries)?);
    eprintln!(
        "{} Normalized {} of {} records",
        style("✓").green(),
        summaries.len(),
        files.len()
    );

    Ok(())
}
