//! Locate command - find the span of the page a session covers.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use fluency_core::{FluencyEngine, RangeMatch, ReadingSession};

use super::load_config;

/// Arguments for the locate command.
#[derive(Args)]
pub struct LocateArgs {
    /// Session file
    #[arg(required = true)]
    input: PathBuf,

    /// Print the covered words instead of JSON
    #[arg(long)]
    words: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LocateOutput<'a> {
    #[serde(flatten)]
    range: RangeMatch,
    words: Vec<&'a str>,
}

pub async fn run(args: LocateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let session = ReadingSession::from_file(&args.input)?;

    let range = FluencyEngine::new(config).locate(&session.spoken_words, &session.ocr_words);
    let words: Vec<&str> = match range.bounds() {
        Some((first, last)) => session.ocr_words[first..=last]
            .iter()
            .map(|w| w.token.raw_text.as_str())
            .collect(),
        None => Vec::new(),
    };

    if args.words {
        if words.is_empty() {
            println!("{} No matching span found", style("ℹ").blue());
        } else {
            println!("{}", words.join(" "));
        }
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&LocateOutput { range, words })?
        );
    }

    Ok(())
}
