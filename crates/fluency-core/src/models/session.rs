//! Session input and full analysis output.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FluencyError, Result};
use crate::models::alignment::{AlignmentResult, RangeMatch};
use crate::models::analysis::{ErrorPatterns, ProsodyMetrics};
use crate::models::words::{OcrWord, Rect, SpokenWord};

/// Current version of the persisted analysis shape.
pub const SCHEMA_VERSION: u32 = 2;

/// Inclusive OCR index range chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSelection {
    pub first: usize,
    pub last: usize,
}

/// Everything the orchestration layer hands over for one reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSession {
    #[serde(default)]
    pub ocr_words: Vec<OcrWord>,

    #[serde(default)]
    pub spoken_words: Vec<SpokenWord>,

    /// Recording length, used when the words carry no timing.
    #[serde(default)]
    pub recording_duration_seconds: f64,

    /// Explicit selection that overrides range location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<WordSelection>,
}

impl ReadingSession {
    /// Parse and validate a session from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let session: Self = serde_json::from_str(json)?;
        session.validate()?;
        Ok(session)
    }

    /// Load and validate a session file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Check caller-supplied values the analysis cannot repair.
    pub fn validate(&self) -> Result<()> {
        if !self.recording_duration_seconds.is_finite() || self.recording_duration_seconds < 0.0 {
            return Err(FluencyError::InvalidInput(format!(
                "recording duration must be a non-negative number, got {}",
                self.recording_duration_seconds
            )));
        }

        if let Some(selection) = self.selection {
            if selection.first > selection.last || selection.last >= self.ocr_words.len() {
                return Err(FluencyError::InvalidInput(format!(
                    "selection {}..={} is outside the {} OCR words",
                    selection.first,
                    selection.last,
                    self.ocr_words.len()
                )));
            }
        }

        for (index, word) in self.spoken_words.iter().enumerate() {
            if let (Some(start), Some(end)) = (word.start_time_seconds, word.end_time_seconds) {
                if end < start {
                    return Err(FluencyError::InvalidInput(format!(
                        "spoken word {index} ends before it starts ({start} > {end})"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// How the expected span was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanSource {
    /// Taken from the caller's selection.
    Selection,
    /// Found by the range locator.
    Located,
    /// No span could be determined.
    Unmatched,
}

/// Complete result for one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingAnalysis {
    pub schema_version: u32,
    pub range: RangeMatch,
    pub span_source: SpanSource,
    /// Expected words, in order; `expectedIndex` in the alignment refers here.
    pub expected_words: Vec<String>,
    /// Area of the page covered by the span, for pre-selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Rect>,
    pub alignment: AlignmentResult,
    pub error_patterns: ErrorPatterns,
    pub prosody: ProsodyMetrics,
}
