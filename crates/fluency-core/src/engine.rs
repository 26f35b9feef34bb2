//! End-to-end analysis of one reading session.

use tracing::{debug, info, warn};

use crate::alignment::{RangeLocator, SequenceAligner};
use crate::analysis::{ErrorPatternAnalyzer, ProsodyScorer};
use crate::models::alignment::{AlignmentResult, RangeMatch};
use crate::models::config::FluencyConfig;
use crate::models::session::{ReadingAnalysis, ReadingSession, SpanSource, SCHEMA_VERSION};
use crate::models::words::{BoundingBox, OcrWord, Rect, SpokenWord};
use crate::parallel;

/// Runs range location, alignment, pattern analysis and prosody scoring.
pub struct FluencyEngine {
    locator: RangeLocator,
    aligner: SequenceAligner,
    analyzer: ErrorPatternAnalyzer,
    scorer: ProsodyScorer,
}

impl FluencyEngine {
    pub fn new(config: FluencyConfig) -> Self {
        Self {
            locator: RangeLocator::new().with_config(config.range),
            aligner: SequenceAligner::new().with_config(config.alignment),
            analyzer: ErrorPatternAnalyzer::new().with_config(config.analysis),
            scorer: ProsodyScorer::new(),
        }
    }

    /// Find the OCR span the speech covers.
    pub fn locate(&self, spoken: &[SpokenWord], ocr: &[OcrWord]) -> RangeMatch {
        self.locator.locate(spoken, ocr)
    }

    /// Align an already-known expected span.
    pub fn align<S: AsRef<str>>(&self, expected: &[S], spoken: &[SpokenWord]) -> AlignmentResult {
        self.aligner.align(expected, spoken)
    }

    /// Analyze a full session.
    ///
    /// A caller selection takes precedence over range location. A selection
    /// that does not fit the OCR list is ignored; use
    /// [`ReadingSession::validate`] to reject it up front instead.
    pub fn analyze(&self, session: &ReadingSession) -> ReadingAnalysis {
        let (mut range, span_source) = self.span(session);

        let span: &[OcrWord] = match range.bounds() {
            Some((first, last)) => &session.ocr_words[first..=last],
            None => &[],
        };

        // Punctuation-only tokens inside the span are not words to be read.
        let expected_words: Vec<String> = span
            .iter()
            .filter(|w| !w.token.is_unmatchable())
            .map(|w| w.token.raw_text.clone())
            .collect();
        debug!(expected = expected_words.len(), source = ?span_source, "expected span");

        let alignment = self.aligner.align(&expected_words, &session.spoken_words);
        if span_source == SpanSource::Selection {
            range.matched_count = alignment.correct_count;
        }

        let (error_patterns, prosody) = parallel::join(
            || self.analyzer.analyze(&alignment),
            || {
                self.scorer.score(
                    &expected_words,
                    &alignment,
                    session.recording_duration_seconds,
                )
            },
        );

        info!(
            first = range.first_index,
            last = range.last_index,
            correct = alignment.correct_count,
            accuracy = prosody.accuracy,
            wpm = prosody.wpm,
            score = prosody.prosody_score,
            "reading analyzed"
        );

        ReadingAnalysis {
            schema_version: SCHEMA_VERSION,
            range,
            span_source,
            highlight: highlight(span),
            expected_words,
            alignment,
            error_patterns,
            prosody,
        }
    }

    fn span(&self, session: &ReadingSession) -> (RangeMatch, SpanSource) {
        if let Some(selection) = session.selection {
            if selection.first <= selection.last && selection.last < session.ocr_words.len() {
                return (
                    RangeMatch::new(selection.first, selection.last, 0),
                    SpanSource::Selection,
                );
            }
            warn!(
                first = selection.first,
                last = selection.last,
                ocr = session.ocr_words.len(),
                "ignoring selection outside the OCR words"
            );
        }

        let range = self.locate(&session.spoken_words, &session.ocr_words);
        let source = if range.is_match() {
            SpanSource::Located
        } else {
            SpanSource::Unmatched
        };
        (range, source)
    }
}

impl Default for FluencyEngine {
    fn default() -> Self {
        Self::new(FluencyConfig::default())
    }
}

/// Union of the span's bounding boxes, skipping words without one.
fn highlight(span: &[OcrWord]) -> Option<Rect> {
    span.iter()
        .filter(|w| w.bounding_box != BoundingBox::default())
        .map(|w| w.bounding_box.rect())
        .reduce(|a, b| a.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alignment::WordStatus;
    use crate::models::session::WordSelection;
    use crate::models::words::Point;
    use pretty_assertions::assert_eq;

    fn page(text: &str) -> Vec<OcrWord> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, w)| OcrWord::new(w, i))
            .collect()
    }

    fn speech(text: &str) -> Vec<SpokenWord> {
        text.split_whitespace().map(SpokenWord::new).collect()
    }

    fn boxed(x: f32, y: f32) -> BoundingBox {
        BoundingBox([
            Point { x, y },
            Point { x: x + 10.0, y },
            Point { x: x + 10.0, y: y + 5.0 },
            Point { x, y: y + 5.0 },
        ])
    }

    #[test]
    fn test_located_span() {
        let session = ReadingSession {
            ocr_words: page("Once upon a time the cat sat on the mat."),
            spoken_words: speech("cat sat on mat"),
            recording_duration_seconds: 3.0,
            selection: None,
        };
        let analysis = FluencyEngine::default().analyze(&session);

        assert_eq!(analysis.span_source, SpanSource::Located);
        assert_eq!(analysis.range, RangeMatch::new(5, 9, 4));
        assert_eq!(analysis.expected_words, vec!["cat", "sat", "on", "the", "mat."]);
        assert_eq!(analysis.alignment.correct_count, 4);
        assert_eq!(analysis.alignment.aligned[3].status, WordStatus::Skipped);
        assert_eq!(analysis.prosody.accuracy, 80.0);
        assert_eq!(analysis.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_selection_overrides_location() {
        let session = ReadingSession {
            ocr_words: page("Once upon a time"),
            spoken_words: speech("once upon"),
            recording_duration_seconds: 1.0,
            selection: Some(WordSelection { first: 0, last: 1 }),
        };
        let analysis = FluencyEngine::default().analyze(&session);

        assert_eq!(analysis.span_source, SpanSource::Selection);
        assert_eq!(analysis.range, RangeMatch::new(0, 1, 2));
        assert_eq!(analysis.prosody.accuracy, 100.0);
    }

    #[test]
    fn test_bad_selection_falls_back() {
        let session = ReadingSession {
            ocr_words: page("the cat sat on the mat"),
            spoken_words: speech("the cat sat on the mat"),
            recording_duration_seconds: 2.0,
            selection: Some(WordSelection { first: 3, last: 40 }),
        };
        let analysis = FluencyEngine::default().analyze(&session);
        assert_eq!(analysis.span_source, SpanSource::Located);
        assert_eq!(analysis.range.bounds(), Some((0, 5)));
    }

    #[test]
    fn test_unmatched_is_empty_analysis() {
        let session = ReadingSession {
            ocr_words: page("the cat sat on the mat"),
            spoken_words: Vec::new(),
            recording_duration_seconds: 2.0,
            selection: None,
        };
        let analysis = FluencyEngine::default().analyze(&session);

        assert_eq!(analysis.span_source, SpanSource::Unmatched);
        assert_eq!(analysis.range, RangeMatch::NONE);
        assert!(analysis.expected_words.is_empty());
        assert!(analysis.alignment.aligned.is_empty());
        assert_eq!(analysis.prosody.accuracy, 0.0);
        assert_eq!(analysis.highlight, None);
    }

    #[test]
    fn test_highlight_covers_span() {
        let ocr = vec![
            OcrWord::new("big", 0).with_bounding_box(boxed(0.0, 0.0)),
            OcrWord::new("red", 1).with_bounding_box(boxed(20.0, 0.0)),
            OcrWord::new("dog", 2).with_bounding_box(boxed(0.0, 30.0)),
        ];
        let session = ReadingSession {
            ocr_words: ocr,
            spoken_words: speech("red dog"),
            recording_duration_seconds: 1.0,
            selection: Some(WordSelection { first: 1, last: 2 }),
        };
        let analysis = FluencyEngine::default().analyze(&session);

        assert_eq!(
            analysis.highlight,
            Some(Rect {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 30.0,
                max_y: 35.0,
            })
        );

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["highlight"]["maxX"], 30.0);
        assert!(json["highlight"].get("max_x").is_none());
    }

    #[test]
    fn test_punctuation_not_expected() {
        let session = ReadingSession {
            ocr_words: page("Stop ! Look"),
            spoken_words: speech("stop look"),
            recording_duration_seconds: 1.0,
            selection: Some(WordSelection { first: 0, last: 2 }),
        };
        let analysis = FluencyEngine::default().analyze(&session);
        assert_eq!(analysis.expected_words, vec!["Stop", "Look"]);
        assert_eq!(analysis.alignment.correct_count, 2);
    }

    #[test]
    fn test_summary_from_analysis() {
        let session = ReadingSession {
            ocr_words: page("one two three"),
            spoken_words: speech("one um two three"),
            recording_duration_seconds: 2.0,
            selection: Some(WordSelection { first: 0, last: 2 }),
        };
        let summary = FluencyEngine::default().analyze(&session).summary();
        assert_eq!(summary.correct_count, 3);
        assert_eq!(summary.hesitation_count, 1);
        assert_eq!(summary.schema_version, SCHEMA_VERSION);
    }
}
