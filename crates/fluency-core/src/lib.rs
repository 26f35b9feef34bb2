//! Core library for oral reading fluency assessment.
//!
//! This crate provides:
//! - Word normalization and a layered similarity score (phonetic, OCR glyph
//!   confusions, prefixes, edit distance)
//! - Location of the OCR span a reader actually covered
//! - Word-by-word alignment with hesitation, repetition and insertion tracking
//! - Error pattern classification and composite prosody scoring
//! - Normalization of historical session records

pub mod alignment;
pub mod analysis;
pub mod engine;
pub mod error;
pub mod models;
pub mod text;

mod parallel;

pub use alignment::{RangeLocator, SequenceAligner};
pub use analysis::{ErrorPatternAnalyzer, ProsodyScorer};
pub use engine::FluencyEngine;
pub use error::{FluencyError, HistoryError, Result};
pub use models::alignment::{
    AlignedEntry, AlignmentResult, Hesitation, HesitationKind, InsertedWord, RangeMatch,
    Repetition, WordStatus,
};
pub use models::analysis::{ErrorPatterns, Grade, ProsodyMetrics, Severity};
pub use models::config::{AlignmentConfig, AnalysisConfig, FluencyConfig, RangeConfig};
pub use models::history::{normalize_record, CountOrList, SessionSummary, StoredSession};
pub use models::session::{ReadingAnalysis, ReadingSession, SpanSource, WordSelection};
pub use models::words::{BoundingBox, OcrWord, Point, Rect, SpokenWord, Token};
pub use text::{normalize, similarity};
