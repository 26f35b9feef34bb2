//! Analytics derived from a finished alignment.

mod patterns;
mod prosody;

pub use patterns::{ErrorPatternAnalyzer, BLENDS, DIGRAPHS, VISUAL_PAIRS};
pub use prosody::ProsodyScorer;
