//! Accuracy, reading rate and composite fluency scoring.

use tracing::debug;

use crate::models::alignment::AlignmentResult;
use crate::models::analysis::{Grade, ProsodyComponents, ProsodyMetrics};

const ACCURACY_WEIGHT: f64 = 0.4;
const RATE_WEIGHT: f64 = 0.3;
const FLUENCY_WEIGHT: f64 = 0.3;

/// Minimum accuracy (%) for each sub-score band.
const ACCURACY_BANDS: [(f64, f64); 5] = [(95.0, 4.0), (90.0, 3.5), (85.0, 3.0), (80.0, 2.5), (75.0, 2.0)];

/// Words-per-minute window for each sub-score band, narrowest first.
const RATE_BANDS: [(u32, u32, f64); 5] = [
    (90, 140, 4.0),
    (80, 160, 3.5),
    (70, 180, 3.0),
    (60, 200, 2.5),
    (45, 220, 2.0),
];

/// Maximum errors per hundred words for each sub-score band.
const ERROR_RATE_BANDS: [(f64, f64); 5] = [(2.0, 4.0), (5.0, 3.5), (10.0, 3.0), (15.0, 2.5), (20.0, 2.0)];

/// Score for readings that fall outside every band.
const FLOOR_SCORE: f64 = 1.5;

/// Computes accuracy, words-per-minute and the composite prosody score.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProsodyScorer;

impl ProsodyScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score an alignment of `expected`.
    ///
    /// Reading time comes from the aligned word timings when any exist and
    /// falls back to `recording_duration_seconds` otherwise.
    pub fn score<S: AsRef<str>>(
        &self,
        expected: &[S],
        alignment: &AlignmentResult,
        recording_duration_seconds: f64,
    ) -> ProsodyMetrics {
        let total_words = expected.len() as u32;
        let words_read = alignment.words_read() as u32;
        let correct = alignment.correct_count;

        let reading_time_seconds = match alignment.spoken_interval() {
            Some((start, end)) => end - start,
            None => recording_duration_seconds,
        };

        let wpm = if reading_time_seconds > 0.0 {
            (words_read as f64 / (reading_time_seconds / 60.0)).round() as u32
        } else {
            0
        };

        let accuracy = if total_words > 0 {
            100.0 * correct as f64 / total_words as f64
        } else {
            0.0
        };

        // Nothing expected counts as nothing read correctly.
        let error_rate = if total_words > 0 {
            let errors = alignment.misread_count() + alignment.skipped_count();
            100.0 * errors as f64 / total_words as f64
        } else {
            100.0
        };

        let components = ProsodyComponents {
            accuracy_score: accuracy_score(accuracy),
            rate_score: rate_score(wpm),
            fluency_score: fluency_score(error_rate),
        };
        let composite = ACCURACY_WEIGHT * components.accuracy_score
            + RATE_WEIGHT * components.rate_score
            + FLUENCY_WEIGHT * components.fluency_score;
        let prosody_score = ((composite * 10.0).round() / 10.0).clamp(1.0, 4.0);

        debug!(accuracy, wpm, prosody_score, "scored prosody");

        ProsodyMetrics {
            total_words,
            words_read,
            accuracy,
            wpm,
            prosody_score,
            prosody_grade: Grade::from_score(prosody_score),
            reading_time_seconds,
            components,
        }
    }
}

fn accuracy_score(accuracy: f64) -> f64 {
    ACCURACY_BANDS
        .iter()
        .find(|(min, _)| accuracy >= *min)
        .map_or(FLOOR_SCORE, |(_, score)| *score)
}

fn rate_score(wpm: u32) -> f64 {
    RATE_BANDS
        .iter()
        .find(|(low, high, _)| (*low..=*high).contains(&wpm))
        .map_or(FLOOR_SCORE, |(_, _, score)| *score)
}

fn fluency_score(error_rate: f64) -> f64 {
    ERROR_RATE_BANDS
        .iter()
        .find(|(max, _)| error_rate <= *max)
        .map_or(FLOOR_SCORE, |(_, score)| *score)
}
