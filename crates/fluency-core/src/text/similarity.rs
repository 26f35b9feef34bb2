//! Word similarity scoring.
//!
//! Similarity is an ordered cascade of rules. Each rule either claims the pair
//! with a fixed score band or passes, and the first claim wins, so stronger
//! evidence always outranks weaker evidence:
//!
//! | rule        | score                           |
//! |-------------|---------------------------------|
//! | exact       | 1.0                             |
//! | phonetic    | 0.95                            |
//! | confusion   | 0.9                             |
//! | prefix      | 0.70-0.95 or 0.60-0.90          |
//! | levenshtein | `1 - d/max` plus a length bonus |

use super::phonetic::sounds_alike;
use super::tables::{are_confusable, GLYPH_CONFUSIONS};

/// One rule of the similarity cascade.
#[derive(Clone, Copy)]
pub struct SimilarityRule {
    /// Rule name, used in logs and tests.
    pub name: &'static str,
    /// Returns a score if the rule applies to the pair.
    pub score: fn(&str, &str) -> Option<f64>,
}

/// The cascade, strongest evidence first.
pub const RULES: [SimilarityRule; 5] = [
    SimilarityRule { name: "exact", score: exact },
    SimilarityRule { name: "phonetic", score: phonetic },
    SimilarityRule { name: "confusion", score: confusion },
    SimilarityRule { name: "prefix", score: shared_prefix },
    SimilarityRule { name: "levenshtein", score: edit_distance },
];

/// Similarity of two normalized words in [0, 1].
///
/// Symmetric in its arguments. An empty word only matches another empty word.
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_with_rule(a, b).0
}

/// Similarity together with the name of the rule that produced it.
pub fn similarity_with_rule(a: &str, b: &str) -> (f64, &'static str) {
    if a.is_empty() || b.is_empty() {
        return if a == b { (1.0, "exact") } else { (0.0, "empty") };
    }

    RULES
        .iter()
        .find_map(|rule| (rule.score)(a, b).map(|score| (score, rule.name)))
        .unwrap_or((0.0, "none"))
}

fn exact(a: &str, b: &str) -> Option<f64> {
    (a == b).then_some(1.0)
}

fn phonetic(a: &str, b: &str) -> Option<f64> {
    sounds_alike(a, b).then_some(0.95)
}

fn confusion(a: &str, b: &str) -> Option<f64> {
    if are_confusable(a, b) {
        return Some(0.9);
    }

    let glyph_match = GLYPH_CONFUSIONS.iter().any(|(x, y)| {
        (a.contains(x) || b.contains(x)) && a.replace(x, y) == b.replace(x, y)
            || (a.contains(y) || b.contains(y)) && a.replace(y, x) == b.replace(y, x)
    });
    glyph_match.then_some(0.9)
}

fn shared_prefix(a: &str, b: &str) -> Option<f64> {
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    let (min_len, max_len) = (len_a.min(len_b), len_a.max(len_b));
    if min_len < 3 {
        return None;
    }
    let ratio = min_len as f64 / max_len as f64;

    if a.starts_with(b) || b.starts_with(a) {
        return Some(0.70 + 0.25 * ratio);
    }

    let k = min_len.min(4);
    a.chars()
        .take(k)
        .eq(b.chars().take(k))
        .then(|| 0.60 + 0.30 * ratio)
}

fn edit_distance(a: &str, b: &str) -> Option<f64> {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return Some(1.0);
    }
    let distance = levenshtein(a, b) as f64;
    let bonus = (0.01 * max_len as f64).min(0.1);
    Some((1.0 - distance / max_len as f64 + bonus).clamp(0.0, 1.0))
}

/// Character-level Levenshtein distance with unit costs.
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}
