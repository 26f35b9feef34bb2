//! Error pattern and prosody records derived from an alignment.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A misread that matched a pattern rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternHit {
    pub expected_index: usize,
    pub expected: String,
    pub spoken: String,
    /// The blend, digraph or letter pair that triggered the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Decoding errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhonicsPatterns {
    pub initial_sound_errors: Vec<PatternHit>,
    pub final_sound_errors: Vec<PatternHit>,
    pub blend_errors: Vec<PatternHit>,
    pub digraph_errors: Vec<PatternHit>,
}

/// Word-attack strategy errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingStrategyPatterns {
    pub first_letter_guessing: Vec<PatternHit>,
    pub skipped_words: Vec<String>,
}

/// Articulation substitutions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeechPatterns {
    pub r_sound_issues: Vec<PatternHit>,
    pub th_sound_issues: Vec<PatternHit>,
}

/// Confusions between letters that look alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualPatterns {
    pub letter_confusions: Vec<PatternHit>,
}

/// Error totals feeding the severity rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorCounts {
    pub skipped: u32,
    /// Misreads close to the expected word.
    pub misread: u32,
    /// Misreads unrelated to the expected word.
    pub substituted: u32,
}

impl ErrorCounts {
    pub fn total(&self) -> u32 {
        self.skipped + self.misread + self.substituted
    }
}

/// Overall error severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Excellent,
    Mild,
    Moderate,
    Significant,
}

impl Severity {
    /// Rate a total error count.
    pub fn from_error_count(errors: u32) -> Self {
        match errors {
            0 => Severity::Excellent,
            1..=4 => Severity::Mild,
            5..=9 => Severity::Moderate,
            _ => Severity::Significant,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Excellent => "Excellent",
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Significant => "Significant",
        };
        f.write_str(label)
    }
}

/// Flagged issues with matching recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternSummary {
    pub primary_issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub severity: Severity,
}

/// Categorized reading errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorPatterns {
    pub phonics_patterns: PhonicsPatterns,
    pub reading_strategy_patterns: ReadingStrategyPatterns,
    pub speech_patterns: SpeechPatterns,
    pub visual_patterns: VisualPatterns,
    pub counts: ErrorCounts,
    pub summary: PatternSummary,
}

/// Fluency grade derived from the prosody score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Proficient,
    Developing,
    NeedsSupport,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 3.8 {
            Grade::Excellent
        } else if score >= 3.0 {
            Grade::Proficient
        } else if score >= 2.0 {
            Grade::Developing
        } else {
            Grade::NeedsSupport
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::Excellent => "Excellent",
            Grade::Proficient => "Proficient",
            Grade::Developing => "Developing",
            Grade::NeedsSupport => "Needs Support",
        };
        f.write_str(label)
    }
}

/// The three banded sub-scores behind the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProsodyComponents {
    pub accuracy_score: f64,
    pub rate_score: f64,
    pub fluency_score: f64,
}

/// Accuracy, rate and composite fluency for one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProsodyMetrics {
    pub total_words: u32,
    pub words_read: u32,
    /// Percentage of expected words read correctly.
    pub accuracy: f64,
    pub wpm: u32,
    /// Composite in [1.0, 4.0], one decimal.
    pub prosody_score: f64,
    pub prosody_grade: Grade,
    pub reading_time_seconds: f64,
    pub components: ProsodyComponents,
}
