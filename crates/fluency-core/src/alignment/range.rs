//! Locating the OCR span covered by the speech.

use std::collections::HashMap;

use tracing::debug;

use super::{mark_fillers, SimilarityMatrix};
use crate::models::alignment::RangeMatch;
use crate::models::config::RangeConfig;
use crate::models::words::{OcrWord, SpokenWord};
use crate::parallel::map_indices;

/// Finds the contiguous run of OCR words a recording most likely covers.
///
/// The primary search runs a banded alignment from every OCR start offset and
/// keeps the best-scoring sweep. When no sweep reaches the minimum number of
/// matches, a greedy search over rare "anchor" words takes over.
pub struct RangeLocator {
    config: RangeConfig,
}

/// Running state of one sweep. Indices refer to the filtered OCR list.
#[derive(Debug, Clone, Copy)]
struct Sweep {
    score: f64,
    matches: u32,
    first: Option<usize>,
    last: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    ocr: usize,
}

impl RangeLocator {
    /// Create a locator with default thresholds.
    pub fn new() -> Self {
        Self {
            config: RangeConfig::default(),
        }
    }

    /// Replace the thresholds.
    pub fn with_config(mut self, config: RangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Locate the OCR range covered by `spoken`.
    ///
    /// Returns [`RangeMatch::NONE`] when either list is empty after filtering
    /// or when neither search finds evidence.
    pub fn locate(&self, spoken: &[SpokenWord], ocr: &[OcrWord]) -> RangeMatch {
        let spoken_words = content_words(spoken);

        // Punctuation-only OCR tokens are invisible to the search; `positions`
        // maps filtered indices back to the caller's.
        let (positions, ocr_words): (Vec<usize>, Vec<&str>) = ocr
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.token.is_unmatchable())
            .map(|(i, w)| (i, w.normalized()))
            .unzip();

        if spoken_words.is_empty() || ocr_words.is_empty() {
            debug!(
                spoken = spoken_words.len(),
                ocr = ocr_words.len(),
                "nothing to locate"
            );
            return RangeMatch::NONE;
        }

        let matrix = SimilarityMatrix::build(&spoken_words, &ocr_words);

        let located = self
            .banded_search(&matrix, spoken_words.len(), ocr_words.len())
            .or_else(|| {
                debug!("banded search found no range, trying anchors");
                self.anchor_search(&matrix, &spoken_words, &ocr_words)
            });

        match located {
            Some((first, last, matched)) => {
                let range = RangeMatch::new(positions[first], positions[last], matched);
                debug!(
                    first = range.first_index,
                    last = range.last_index,
                    matched,
                    "located range"
                );
                range
            }
            None => RangeMatch::NONE,
        }
    }

    fn banded_search(
        &self,
        matrix: &SimilarityMatrix,
        rows: usize,
        cols: usize,
    ) -> Option<(usize, usize, u32)> {
        let sweeps = map_indices(cols, |start| self.sweep(matrix, rows, cols, start));

        let mut best: Option<Sweep> = None;
        for sweep in sweeps {
            if sweep.matches < self.config.min_matches {
                continue;
            }
            if best.is_none_or(|b| sweep.score > b.score) {
                best = Some(sweep);
            }
        }

        let best = best?;
        Some((best.first?, best.last?, best.matches))
    }

    fn sweep(&self, matrix: &SimilarityMatrix, rows: usize, cols: usize, start: usize) -> Sweep {
        let mut state = Sweep {
            score: 0.0,
            matches: 0,
            first: None,
            last: None,
        };

        for row in 0..rows {
            let from = state.last.map_or(start, |last| last + 1);

            let mut extend: Option<(usize, f64)> = None;
            for col in from..cols {
                let sim = matrix.get(row, col);
                if sim < self.config.match_threshold {
                    continue;
                }
                let gain = sim - self.config.skip_penalty * (col - from) as f64;
                if extend.is_none_or(|(_, g)| gain > g) {
                    extend = Some((col, gain));
                }
            }

            let dropped = state.score - self.config.gap_penalty;
            match extend {
                Some((col, gain)) if state.score + gain >= dropped => {
                    state.score += gain;
                    state.matches += 1;
                    state.first.get_or_insert(col);
                    state.last = Some(col);
                }
                _ => state.score = dropped,
            }
        }

        state
    }

    fn anchor_search(
        &self,
        matrix: &SimilarityMatrix,
        spoken: &[&str],
        ocr: &[&str],
    ) -> Option<(usize, usize, u32)> {
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for word in ocr {
            *occurrences.entry(*word).or_default() += 1;
        }

        // Generated row by row, so already ordered by spoken index.
        let mut anchors = Vec::new();
        for (row, word) in spoken.iter().enumerate() {
            if word.chars().count() < self.config.anchor_min_length {
                continue;
            }
            for (col, target) in ocr.iter().enumerate() {
                if occurrences[target] > self.config.anchor_max_occurrences {
                    continue;
                }
                if matrix.get(row, col) >= self.config.anchor_threshold {
                    anchors.push(Anchor { ocr: col });
                }
            }
        }
        debug!(anchors = anchors.len(), "anchor candidates");

        let mut best: Vec<Anchor> = Vec::new();
        let mut run: Vec<Anchor> = Vec::new();
        for anchor in anchors {
            if run.last().is_some_and(|prev| anchor.ocr <= prev.ocr) {
                if run.len() > best.len() {
                    best = std::mem::take(&mut run);
                } else {
                    run.clear();
                }
            }
            run.push(anchor);
        }
        if run.len() > best.len() {
            best = run;
        }

        let first = best.first()?.ocr;
        let last = best.last()?.ocr;
        Some((first, last, best.len() as u32))
    }
}

impl Default for RangeLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized spoken words with fillers and unmatchable tokens removed.
fn content_words(spoken: &[SpokenWord]) -> Vec<&str> {
    let normalized: Vec<&str> = spoken
        .iter()
        .map(|w| w.normalized())
        .filter(|w| !w.is_empty())
        .collect();
    let fillers = mark_fillers(&normalized);

    normalized
        .into_iter()
        .zip(fillers)
        .filter_map(|(word, filler)| (!filler).then_some(word))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ocr(text: &str) -> Vec<OcrWord> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, w)| OcrWord::new(w, i))
            .collect()
    }

    fn spoken(text: &str) -> Vec<SpokenWord> {
        text.split_whitespace().map(SpokenWord::new).collect()
    }

    #[test]
    fn test_locates_middle_span() {
        let page = ocr("Once upon a time there lived a small fox. The fox liked to run. The end.");
        let speech = spoken("the fox liked to run");
        let range = RangeLocator::new().locate(&speech, &page);
        assert_eq!(range, RangeMatch::new(9, 13, 5));
    }

    #[test]
    fn test_tolerates_misreads_and_fillers() {
        let page = ocr("The quick brown fox jumps over the lazy dog");
        let speech = spoken("um the quick bown fox uh jumped over");
        let range = RangeLocator::new().locate(&speech, &page);
        assert_eq!(range.bounds(), Some((0, 5)));
    }

    #[test]
    fn test_punctuation_tokens_keep_positions() {
        let page = ocr("Hello — my friend , come here");
        let speech = spoken("my friend come");
        let range = RangeLocator::new().locate(&speech, &page);
        assert_eq!(range.bounds(), Some((2, 5)));
    }

    #[test]
    fn test_empty_inputs_return_sentinel() {
        let locator = RangeLocator::new();
        assert_eq!(locator.locate(&[], &ocr("a b c")), RangeMatch::NONE);
        assert_eq!(locator.locate(&spoken("a b"), &[]), RangeMatch::NONE);
        assert_eq!(locator.locate(&spoken("um uh"), &ocr("a b")), RangeMatch::NONE);
    }

    #[test]
    fn test_unrelated_speech_returns_sentinel() {
        let page = ocr("The quick brown fox jumps over the lazy dog");
        let speech = spoken("xylophone zebra");
        assert_eq!(RangeLocator::new().locate(&speech, &page), RangeMatch::NONE);
    }

    #[test]
    fn test_anchor_fallback_single_match() {
        // Only one spoken word clears the match threshold, so the banded
        // search cannot reach two matches and the anchor search decides.
        let page = ocr("Elephants wander across the savanna slowly");
        let speech = spoken("savanna");
        let range = RangeLocator::new().locate(&speech, &page);
        assert_eq!(range, RangeMatch::new(4, 4, 1));
    }

    #[test]
    fn test_anchor_fallback_skips_common_words() {
        let config = RangeConfig {
            min_matches: 5,
            ..RangeConfig::default()
        };
        let page = ocr("there there there garden gate there");
        let speech = spoken("there garden gate");
        let range = RangeLocator::new().with_config(config).locate(&speech, &page);
        // "there" occurs four times and cannot anchor
        assert_eq!(range, RangeMatch::new(3, 4, 2));
    }

    #[test]
    fn test_repeated_passage_keeps_first_occurrence() {
        let page = ocr("the fox ran the fox ran");
        let speech = spoken("the fox ran");
        let range = RangeLocator::new().locate(&speech, &page);
        // both copies score 3.0; the later start does not replace the earlier
        assert_eq!(range, RangeMatch::new(0, 2, 3));
    }

    #[test]
    fn test_equal_anchor_runs_keep_earliest() {
        let config = RangeConfig {
            min_matches: 5,
            ..RangeConfig::default()
        };
        let page = ocr("castle bridge and then forest river");
        let speech = spoken("forest river castle bridge");
        let range = RangeLocator::new().with_config(config).locate(&speech, &page);
        // runs [4, 5] and [0, 1] tie; the one found first wins
        assert_eq!(range, RangeMatch::new(4, 5, 2));
    }
}
