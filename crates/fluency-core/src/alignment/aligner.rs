//! Word-level alignment of the expected span against the spoken words.

use tracing::debug;

use super::mark_fillers;
use crate::models::alignment::{
    AlignedEntry, AlignmentResult, Hesitation, HesitationKind, InsertedWord, Repetition,
    WordStatus,
};
use crate::models::config::AlignmentConfig;
use crate::models::words::SpokenWord;
use crate::text::{are_equivalent, normalize, similarity};

/// Aligns expected words with spoken words using a global edit-distance DP.
///
/// Extra spoken words cost less than skipped expected words, since an insertion
/// says little about reading failure.
pub struct SequenceAligner {
    config: AlignmentConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Match,
    Skip,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pairing {
    Equivalent,
    Fuzzy,
    Mismatch,
}

/// Spoken words left after the hesitation/repetition pre-pass.
struct CleanSpeech {
    /// Indices into the original spoken list.
    kept: Vec<usize>,
    hesitations: Vec<Hesitation>,
    repetitions: Vec<Repetition>,
}

impl SequenceAligner {
    /// Create an aligner with default scoring.
    pub fn new() -> Self {
        Self {
            config: AlignmentConfig::default(),
        }
    }

    /// Replace the scoring configuration.
    pub fn with_config(mut self, config: AlignmentConfig) -> Self {
        self.config = config;
        self
    }

    /// Align `expected` (the located span) against the full spoken sequence.
    ///
    /// Every expected word receives exactly one entry, in order. Fillers and
    /// immediate repetitions are reported separately and never count against
    /// the reader.
    pub fn align<S: AsRef<str>>(&self, expected: &[S], spoken: &[SpokenWord]) -> AlignmentResult {
        let speech = self.clean(spoken);
        let expected_norm: Vec<String> = expected.iter().map(|w| normalize(w.as_ref())).collect();

        let m = expected_norm.len();
        let n = speech.kept.len();
        let cols = n + 1;

        let pairing = |i: usize, j: usize| {
            self.pair(&expected_norm[i], spoken[speech.kept[j]].normalized())
        };

        let mut score = vec![0.0f64; (m + 1) * cols];
        let mut steps = vec![Step::Match; (m + 1) * cols];

        for i in 1..=m {
            score[i * cols] = -self.config.skip_cost * i as f64;
            steps[i * cols] = Step::Skip;
        }
        for j in 1..=n {
            score[j] = -self.config.insert_cost * j as f64;
            steps[j] = Step::Insert;
        }

        for i in 1..=m {
            for j in 1..=n {
                let gain = match pairing(i - 1, j - 1) {
                    Pairing::Equivalent => self.config.exact_score,
                    Pairing::Fuzzy => self.config.fuzzy_score,
                    Pairing::Mismatch => self.config.mismatch_score,
                };
                let matched = score[(i - 1) * cols + j - 1] + gain;
                let skipped = score[(i - 1) * cols + j] - self.config.skip_cost;
                let inserted = score[i * cols + j - 1] - self.config.insert_cost;

                let (best, step) = if matched >= skipped && matched >= inserted {
                    (matched, Step::Match)
                } else if skipped >= inserted {
                    (skipped, Step::Skip)
                } else {
                    (inserted, Step::Insert)
                };
                score[i * cols + j] = best;
                steps[i * cols + j] = step;
            }
        }

        let mut aligned = Vec::with_capacity(m);
        let mut insertions = Vec::new();
        let (mut i, mut j) = (m, n);

        while i > 0 || j > 0 {
            match steps[i * cols + j] {
                Step::Match => {
                    let word = &spoken[speech.kept[j - 1]];
                    let status = match pairing(i - 1, j - 1) {
                        Pairing::Equivalent => WordStatus::Correct,
                        Pairing::Fuzzy | Pairing::Mismatch => WordStatus::Misread,
                    };
                    aligned.push(AlignedEntry {
                        expected_index: i - 1,
                        expected_word: expected[i - 1].as_ref().to_string(),
                        spoken_word: Some(word.text().to_string()),
                        status,
                        confidence: Some(word.confidence),
                        start_time: word.start_time_seconds,
                        end_time: word.end_time_seconds,
                    });
                    i -= 1;
                    j -= 1;
                }
                Step::Skip => {
                    aligned.push(AlignedEntry {
                        expected_index: i - 1,
                        expected_word: expected[i - 1].as_ref().to_string(),
                        spoken_word: None,
                        status: WordStatus::Skipped,
                        confidence: None,
                        start_time: None,
                        end_time: None,
                    });
                    i -= 1;
                }
                Step::Insert => {
                    let index = speech.kept[j - 1];
                    insertions.push(InsertedWord {
                        spoken_index: index,
                        word: spoken[index].text().to_string(),
                    });
                    j -= 1;
                }
            }
        }

        aligned.reverse();
        insertions.reverse();

        let correct_count = aligned
            .iter()
            .filter(|e| e.status == WordStatus::Correct)
            .count() as u32;

        debug!(
            expected = m,
            spoken = n,
            correct = correct_count,
            inserted = insertions.len(),
            hesitations = speech.hesitations.len(),
            "aligned reading"
        );

        AlignmentResult {
            aligned,
            correct_count,
            hesitations: speech.hesitations,
            repetitions: speech.repetitions,
            insertions,
        }
    }

    fn pair(&self, expected: &str, spoken: &str) -> Pairing {
        if expected.is_empty() {
            Pairing::Mismatch
        } else if are_equivalent(expected, spoken) {
            Pairing::Equivalent
        } else if similarity(expected, spoken) >= self.config.fuzzy_threshold {
            Pairing::Fuzzy
        } else {
            Pairing::Mismatch
        }
    }

    /// Record hesitations and repetitions, and drop them from the sequence.
    fn clean(&self, spoken: &[SpokenWord]) -> CleanSpeech {
        let normalized: Vec<&str> = spoken.iter().map(|w| w.normalized()).collect();
        let fillers = mark_fillers(&normalized);

        let mut speech = CleanSpeech {
            kept: Vec::with_capacity(spoken.len()),
            hesitations: Vec::new(),
            repetitions: Vec::new(),
        };
        let mut previous_end: Option<f64> = None;
        let mut previous_word: Option<&str> = None;

        for (index, word) in spoken.iter().enumerate() {
            if let (Some(start), Some(end)) = (word.start_time_seconds, previous_end) {
                let gap = start - end;
                if gap > self.config.pause_threshold_seconds {
                    speech.hesitations.push(Hesitation {
                        spoken_index: index,
                        word: word.text().to_string(),
                        kind: HesitationKind::Pause,
                        pause_seconds: Some(gap),
                    });
                }
            }
            if word.end_time_seconds.is_some() {
                previous_end = word.end_time_seconds;
            }

            if fillers[index] {
                speech.hesitations.push(Hesitation {
                    spoken_index: index,
                    word: word.text().to_string(),
                    kind: HesitationKind::Filler,
                    pause_seconds: None,
                });
                previous_word = None;
                continue;
            }

            let current = normalized[index];
            if current.is_empty() {
                continue;
            }
            if previous_word == Some(current) {
                speech.repetitions.push(Repetition {
                    spoken_index: index,
                    word: word.text().to_string(),
                });
                continue;
            }

            previous_word = Some(current);
            speech.kept.push(index);
        }

        speech
    }
}

impl Default for SequenceAligner {
    fn default() -> Self {
        Self::new()
    }
}
