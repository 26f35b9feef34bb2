//! Range and alignment records.

use serde::{Deserialize, Serialize};

/// Contiguous span of OCR words the speech covers.
///
/// `first_index == last_index == -1` is the "no match" sentinel; it is a
/// normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeMatch {
    pub first_index: i64,
    pub last_index: i64,
    pub matched_count: u32,
}

impl RangeMatch {
    /// The "no match" sentinel.
    pub const NONE: RangeMatch = RangeMatch {
        first_index: -1,
        last_index: -1,
        matched_count: 0,
    };

    pub fn new(first: usize, last: usize, matched_count: u32) -> Self {
        Self {
            first_index: first as i64,
            last_index: last as i64,
            matched_count,
        }
    }

    /// Whether this is a real range rather than the sentinel.
    pub fn is_match(&self) -> bool {
        self.first_index >= 0 && self.last_index >= self.first_index
    }

    /// Inclusive OCR bounds, if any.
    pub fn bounds(&self) -> Option<(usize, usize)> {
        self.is_match()
            .then(|| (self.first_index as usize, self.last_index as usize))
    }
}

impl Default for RangeMatch {
    fn default() -> Self {
        Self::NONE
    }
}

/// Outcome for one expected word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordStatus {
    /// Read as written, or as a homophone.
    Correct,
    /// A different word was read in its place.
    Misread,
    /// Not read at all.
    Skipped,
}

/// Alignment outcome for a single expected word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedEntry {
    pub expected_index: usize,
    pub expected_word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoken_word: Option<String>,
    pub status: WordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

/// Why a hesitation was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HesitationKind {
    /// A filler word such as "um".
    Filler,
    /// Silence longer than the pause threshold before the word.
    Pause,
}

/// A hesitation observed in the spoken sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hesitation {
    /// Index into the spoken word list.
    pub spoken_index: usize,
    pub word: String,
    #[serde(rename = "type")]
    pub kind: HesitationKind,
    /// Length of the silence, for pauses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_seconds: Option<f64>,
}

/// A word said twice in a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repetition {
    /// Index of the repeated utterance in the spoken word list.
    pub spoken_index: usize,
    pub word: String,
}

/// A spoken word the alignment consumed without an expected counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedWord {
    pub spoken_index: usize,
    pub word: String,
}

/// Word-by-word alignment of the expected span.
///
/// `aligned` holds exactly one entry per expected word, in expected order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentResult {
    pub aligned: Vec<AlignedEntry>,
    pub correct_count: u32,
    #[serde(default)]
    pub hesitations: Vec<Hesitation>,
    #[serde(default)]
    pub repetitions: Vec<Repetition>,
    #[serde(default)]
    pub insertions: Vec<InsertedWord>,
}

impl AlignmentResult {
    /// Entries with the given status.
    pub fn with_status(&self, status: WordStatus) -> impl Iterator<Item = &AlignedEntry> {
        self.aligned.iter().filter(move |e| e.status == status)
    }

    pub fn misread_count(&self) -> usize {
        self.with_status(WordStatus::Misread).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.with_status(WordStatus::Skipped).count()
    }

    /// Words that received an utterance (correct or misread).
    pub fn words_read(&self) -> usize {
        self.correct_count as usize + self.misread_count()
    }

    /// Elapsed speaking time across the timed entries, if any are timed.
    pub fn spoken_interval(&self) -> Option<(f64, f64)> {
        let start = self.aligned.iter().find_map(|e| e.start_time)?;
        let end = self.aligned.iter().rev().find_map(|e| e.end_time)?;
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sentinel() {
        assert!(!RangeMatch::NONE.is_match());
        assert_eq!(RangeMatch::NONE.bounds(), None);
        assert_eq!(RangeMatch::new(2, 5, 3).bounds(), Some((2, 5)));
    }

    #[test]
    fn test_range_field_names() {
        let json = serde_json::to_value(RangeMatch::NONE).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"firstIndex": -1, "lastIndex": -1, "matchedCount": 0})
        );
    }

    #[test]
    fn test_entry_serialization() {
        let entry = AlignedEntry {
            expected_index: 0,
            expected_word: "the".to_string(),
            spoken_word: None,
            status: WordStatus::Skipped,
            confidence: None,
            start_time: None,
            end_time: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"expectedIndex": 0, "expectedWord": "the", "status": "skipped"})
        );
    }

    #[test]
    fn test_hesitation_type_field() {
        let hesitation = Hesitation {
            spoken_index: 1,
            word: "um".to_string(),
            kind: HesitationKind::Filler,
            pause_seconds: None,
        };
        let json = serde_json::to_value(&hesitation).unwrap();
        assert_eq!(json["type"], "filler");
    }
}
