//! Analyze command - score a single reading session.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use fluency_core::{FluencyEngine, ReadingAnalysis, ReadingSession, WordStatus};

use super::load_config;

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Session file (JSON with ocrWords, spokenWords, recordingDurationSeconds)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Emit only the count summary instead of the full analysis
    #[arg(long)]
    summary: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text report
    Text,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Session file not found: {}", args.input.display());
    }

    info!("Analyzing session: {}", args.input.display());
    let session = ReadingSession::from_file(&args.input)?;
    let analysis = FluencyEngine::new(config).analyze(&session);

    let output = match (args.format, args.summary) {
        (OutputFormat::Json, false) => serde_json::to_string_pretty(&analysis)?,
        (OutputFormat::Json, true) => serde_json::to_string_pretty(&analysis.summary())?,
        (OutputFormat::Text, _) => format_report(&analysis),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Human-readable report of an analysis.
pub fn format_report(analysis: &ReadingAnalysis) -> String {
    let mut output = String::new();

    match analysis.range.bounds() {
        Some((first, last)) => output.push_str(&format!(
            "Range: words {}-{} ({} matched)\n",
            first, last, analysis.range.matched_count
        )),
        None => output.push_str("Range: no match\n"),
    }
    output.push('\n');

    output.push_str("Words:\n");
    for entry in &analysis.alignment.aligned {
        let line = match entry.status {
            WordStatus::Correct => format!("  ✓ {}\n", entry.expected_word),
            WordStatus::Misread => format!(
                "  ✗ {} (read as \"{}\")\n",
                entry.expected_word,
                entry.spoken_word.as_deref().unwrap_or("")
            ),
            WordStatus::Skipped => format!("  - {} (skipped)\n", entry.expected_word),
        };
        output.push_str(&line);
    }
    output.push('\n');

    let prosody = &analysis.prosody;
    output.push_str("Fluency:\n");
    output.push_str(&format!(
        "  Accuracy: {:.1}% ({}/{})\n",
        prosody.accuracy, analysis.alignment.correct_count, prosody.total_words
    ));
    output.push_str(&format!("  Rate:     {} wpm\n", prosody.wpm));
    output.push_str(&format!(
        "  Prosody:  {:.1} ({})\n",
        prosody.prosody_score, prosody.prosody_grade
    ));
    output.push_str(&format!(
        "  Hesitations: {}, repetitions: {}\n",
        analysis.alignment.hesitations.len(),
        analysis.alignment.repetitions.len()
    ));
    output.push('\n');

    let summary = &analysis.error_patterns.summary;
    output.push_str(&format!("Severity: {}\n", summary.severity));
    for (issue, recommendation) in summary.primary_issues.iter().zip(&summary.recommendations) {
        output.push_str(&format!("  - {}: {}\n", issue, recommendation));
    }

    output
}
