//! Word normalization and similarity.

mod normalize;
mod phonetic;
mod similarity;
pub mod tables;

pub use normalize::normalize;
pub use phonetic::{phonetic_code, sounds_alike};
pub use similarity::{levenshtein, similarity, similarity_with_rule, SimilarityRule, RULES};
pub use tables::{are_confusable, are_equivalent, filler_len, is_filler};
