//! Input word records supplied by the OCR and speech collaborators.

use serde::{Deserialize, Serialize};

use crate::text::normalize;

/// A raw token paired with its normalized comparison form.
///
/// The normalized form is always recomputed on construction and on
/// deserialization, so a stored `normalized` value can never drift from the
/// current normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TokenRepr")]
pub struct Token {
    /// Text as supplied by the collaborator.
    #[serde(rename = "text")]
    pub raw_text: String,

    /// Canonical form used for comparison.
    #[serde(rename = "normalized")]
    pub normalized_text: String,
}

#[derive(Deserialize)]
struct TokenRepr {
    text: String,
}

impl From<TokenRepr> for Token {
    fn from(repr: TokenRepr) -> Self {
        Token::new(repr.text)
    }
}

impl Token {
    /// Create a token, normalizing the raw text.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw_text = raw.into();
        let normalized_text = normalize(&raw_text);
        Self {
            raw_text,
            normalized_text,
        }
    }

    /// Whether the token normalized to nothing and can never match.
    pub fn is_unmatchable(&self) -> bool {
        self.normalized_text.is_empty()
    }
}

/// A corner of a bounding polygon, in image pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Quadrilateral around an OCR word (top-left, top-right, bottom-right, bottom-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundingBox(pub [Point; 4]);

/// Axis-aligned rectangle (x1, y1, x2, y2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> Rect {
        let xs = self.0.iter().map(|p| p.x);
        let ys = self.0.iter().map(|p| p.y);

        Rect {
            min_x: xs.clone().fold(f32::INFINITY, f32::min),
            max_x: xs.fold(f32::NEG_INFINITY, f32::max),
            min_y: ys.clone().fold(f32::INFINITY, f32::min),
            max_y: ys.fold(f32::NEG_INFINITY, f32::max),
        }
    }
}

impl Rect {
    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// A word recognized on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrWord {
    #[serde(flatten)]
    pub token: Token,

    /// Bounding polygon (four corner points).
    #[serde(default)]
    pub bounding_box: BoundingBox,

    /// Position in document order.
    #[serde(default)]
    pub index: usize,
}

impl OcrWord {
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        Self {
            token: Token::new(text),
            bounding_box: BoundingBox::default(),
            index,
        }
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    pub fn normalized(&self) -> &str {
        &self.token.normalized_text
    }
}

fn full_confidence() -> f64 {
    1.0
}

/// A word produced by the speech recognizer, in utterance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpokenWord {
    #[serde(flatten)]
    pub token: Token,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_seconds: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_seconds: Option<f64>,

    /// Recognizer confidence (0.0 - 1.0).
    #[serde(default = "full_confidence")]
    pub confidence: f64,
}

impl SpokenWord {
    /// Create an untimed spoken word with full confidence.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            token: Token::new(text),
            start_time_seconds: None,
            end_time_seconds: None,
            confidence: 1.0,
        }
    }

    /// Set the utterance interval.
    pub fn with_timing(mut self, start: f64, end: f64) -> Self {
        self.start_time_seconds = Some(start);
        self.end_time_seconds = Some(end);
        self
    }

    /// Set the recognizer confidence, clamped to [0, 1].
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn normalized(&self) -> &str {
        &self.token.normalized_text
    }

    pub fn text(&self) -> &str {
        &self.token.raw_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_token_normalizes() {
        let token = Token::new("Don't!");
        assert_eq!(token.raw_text, "Don't!");
        assert_eq!(token.normalized_text, "donot");
        assert!(Token::new("--").is_unmatchable());
    }

    #[test]
    fn test_spoken_word_from_json() {
        let word: SpokenWord = serde_json::from_str(
            r#"{"text": "10", "startTimeSeconds": 0.5, "endTimeSeconds": 0.9, "confidence": 0.8}"#,
        )
        .unwrap();
        assert_eq!(word.normalized(), "ten");
        assert_eq!(word.start_time_seconds, Some(0.5));
        assert_eq!(word.confidence, 0.8);
    }

    #[test]
    fn test_spoken_word_defaults() {
        let word: SpokenWord = serde_json::from_str(r#"{"text": "cat"}"#).unwrap();
        assert_eq!(word.start_time_seconds, None);
        assert_eq!(word.confidence, 1.0);
    }

    #[test]
    fn test_stored_normalized_form_is_recomputed() {
        let word: OcrWord =
            serde_json::from_str(r#"{"text": "Cat,", "normalized": "dog", "index": 3}"#).unwrap();
        assert_eq!(word.normalized(), "cat");
        assert_eq!(word.index, 3);
    }

    #[test]
    fn test_bounding_box_rect() {
        let bbox = BoundingBox([
            Point { x: 10.0, y: 5.0 },
            Point { x: 40.0, y: 6.0 },
            Point { x: 41.0, y: 20.0 },
            Point { x: 9.0, y: 19.0 },
        ]);
        let rect = bbox.rect();
        assert_eq!(rect.min_x, 9.0);
        assert_eq!(rect.max_x, 41.0);
        assert_eq!(rect.min_y, 5.0);
        assert_eq!(rect.max_y, 20.0);
    }
}
