//! Batch command - analyze many session files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use fluency_core::{FluencyEngine, ReadingAnalysis, ReadingSession};

use super::analyze::{format_report, OutputFormat};
use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Session files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-session results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each session
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of analyzing a single session file.
struct SessionResult {
    path: PathBuf,
    analysis: Option<ReadingAnalysis>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} sessions to analyze",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sessions")?
            .progress_chars("=>-"),
    );

    let engine = FluencyEngine::new(config);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = ReadingSession::from_file(&path).map(|session| engine.analyze(&session));
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(analysis) => results.push(SessionResult {
                path,
                analysis: Some(analysis),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to analyze {}: {}", path.display(), error_msg);
                    results.push(SessionResult {
                        path,
                        analysis: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to analyze {}: {}", path.display(), error_msg);
                    anyhow::bail!("Analysis failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(analysis) = &result.analysis {
                write_analysis(output_dir, &result.path, analysis, args.format)?;
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Analyzed {} sessions in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_analysis(
    output_dir: &Path,
    source: &Path,
    analysis: &ReadingAnalysis,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("session");

    let (extension, content) = match format {
        OutputFormat::Json => ("json", serde_json::to_string_pretty(analysis)?),
        OutputFormat::Text => ("txt", format_report(analysis)),
    };

    let output_path = output_dir.join(format!("{}.analysis.{}", stem, extension));
    fs::write(&output_path, content)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(())
}

fn write_summary(path: &Path, results: &[SessionResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "first_index",
        "last_index",
        "total_words",
        "correct",
        "accuracy",
        "wpm",
        "prosody_score",
        "grade",
        "severity",
        "hesitations",
        "repetitions",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(analysis) = &result.analysis {
            let prosody = &analysis.prosody;
            wtr.write_record([
                filename,
                "success",
                &analysis.range.first_index.to_string(),
                &analysis.range.last_index.to_string(),
                &prosody.total_words.to_string(),
                &analysis.alignment.correct_count.to_string(),
                &format!("{:.1}", prosody.accuracy),
                &prosody.wpm.to_string(),
                &format!("{:.1}", prosody.prosody_score),
                &prosody.prosody_grade.to_string(),
                &analysis.error_patterns.summary.severity.to_string(),
                &analysis.alignment.hesitations.len().to_string(),
                &analysis.alignment.repetitions.len().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
