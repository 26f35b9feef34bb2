//! Normalization of persisted session records.
//!
//! Older clients stored hesitations and repetitions sometimes as a bare count
//! and sometimes as a list of events. Records are normalized here, at the
//! boundary, into a single [`SessionSummary`] so nothing downstream has to
//! handle both shapes.

use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, Result};
use crate::models::alignment::AlignmentResult;
use crate::models::analysis::{ErrorPatterns, Grade, ProsodyMetrics, Severity};
use crate::models::session::{ReadingAnalysis, SCHEMA_VERSION};

/// A field that was persisted either as a count or as a list of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountOrList {
    Count(u32),
    List(Vec<serde_json::Value>),
}

impl CountOrList {
    pub fn count(&self) -> u32 {
        match self {
            CountOrList::Count(n) => *n,
            CountOrList::List(items) => items.len() as u32,
        }
    }
}

/// A session record as found in storage, in any historical shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredSession {
    pub schema_version: Option<u32>,
    pub hesitations: Option<CountOrList>,
    pub repetitions: Option<CountOrList>,
    pub alignment: Option<AlignmentResult>,
    pub error_patterns: Option<ErrorPatterns>,
    pub prosody: Option<ProsodyMetrics>,

    // Flat fields written before prosody metrics were nested.
    pub accuracy: Option<f64>,
    pub wpm: Option<u32>,
    pub total_words: Option<u32>,
    pub correct_count: Option<u32>,
}

/// Count-only view of a session, used for history and dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub schema_version: u32,
    pub total_words: u32,
    pub correct_count: u32,
    pub accuracy: f64,
    pub wpm: u32,
    pub hesitation_count: u32,
    pub repetition_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
}

impl StoredSession {
    /// Parse a stored record.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert into the current summary shape.
    pub fn normalize(self) -> std::result::Result<SessionSummary, HistoryError> {
        if let Some(version) = self.schema_version {
            if version > SCHEMA_VERSION {
                return Err(HistoryError::UnsupportedVersion(version));
            }
        }

        let alignment = self.alignment.as_ref();
        let prosody = self.prosody.as_ref();

        let accuracy = prosody
            .map(|p| p.accuracy)
            .or(self.accuracy)
            .ok_or_else(|| HistoryError::MissingField("accuracy".to_string()))?;

        let hesitation_count = self
            .hesitations
            .as_ref()
            .map(CountOrList::count)
            .or_else(|| alignment.map(|a| a.hesitations.len() as u32))
            .unwrap_or(0);
        let repetition_count = self
            .repetitions
            .as_ref()
            .map(CountOrList::count)
            .or_else(|| alignment.map(|a| a.repetitions.len() as u32))
            .unwrap_or(0);

        Ok(SessionSummary {
            schema_version: SCHEMA_VERSION,
            total_words: prosody
                .map(|p| p.total_words)
                .or(self.total_words)
                .or_else(|| alignment.map(|a| a.aligned.len() as u32))
                .unwrap_or(0),
            correct_count: alignment
                .map(|a| a.correct_count)
                .or(self.correct_count)
                .unwrap_or(0),
            accuracy,
            wpm: prosody.map(|p| p.wpm).or(self.wpm).unwrap_or(0),
            hesitation_count,
            repetition_count,
            severity: self.error_patterns.as_ref().map(|e| e.summary.severity),
            grade: prosody.map(|p| p.prosody_grade),
        })
    }
}

impl ReadingAnalysis {
    /// Summary of a freshly computed analysis.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            schema_version: SCHEMA_VERSION,
            total_words: self.prosody.total_words,
            correct_count: self.alignment.correct_count,
            accuracy: self.prosody.accuracy,
            wpm: self.prosody.wpm,
            hesitation_count: self.alignment.hesitations.len() as u32,
            repetition_count: self.alignment.repetitions.len() as u32,
            severity: Some(self.error_patterns.summary.severity),
            grade: Some(self.prosody.prosody_grade),
        }
    }
}

/// Parse and normalize a stored record in one step.
pub fn normalize_record(json: &str) -> Result<SessionSummary> {
    Ok(StoredSession::from_json(json)?.normalize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FluencyError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_legacy_counts() {
        let summary = normalize_record(
            r#"{"accuracy": 92.5, "wpm": 88, "totalWords": 40, "correctCount": 37,
                "hesitations": 3, "repetitions": 1}"#,
        )
        .unwrap();

        assert_eq!(
            summary,
            SessionSummary {
                schema_version: SCHEMA_VERSION,
                total_words: 40,
                correct_count: 37,
                accuracy: 92.5,
                wpm: 88,
                hesitation_count: 3,
                repetition_count: 1,
                severity: None,
                grade: None,
            }
        );
    }

    #[test]
    fn test_legacy_lists() {
        let summary = normalize_record(
            r#"{"accuracy": 75.0,
                "hesitations": [{"index": 2, "word": "um"}, {"index": 7, "word": "uh"}],
                "repetitions": []}"#,
        )
        .unwrap();
        assert_eq!(summary.hesitation_count, 2);
        assert_eq!(summary.repetition_count, 0);
    }

    #[test]
    fn test_counts_from_nested_alignment() {
        let summary = normalize_record(
            r#"{"schemaVersion": 2, "accuracy": 50.0,
                "alignment": {
                    "aligned": [],
                    "correctCount": 0,
                    "hesitations": [{"spokenIndex": 0, "word": "um", "type": "filler"}],
                    "repetitions": []
                }}"#,
        )
        .unwrap();
        assert_eq!(summary.hesitation_count, 1);
    }

    #[test]
    fn test_missing_accuracy() {
        let err = normalize_record(r#"{"wpm": 80}"#).unwrap_err();
        assert!(matches!(
            err,
            FluencyError::History(HistoryError::MissingField(_))
        ));
    }

    #[test]
    fn test_future_version_rejected() {
        let err = normalize_record(r#"{"schemaVersion": 9, "accuracy": 1.0}"#).unwrap_err();
        assert!(matches!(
            err,
            FluencyError::History(HistoryError::UnsupportedVersion(9))
        ));
    }
}
