//! Static lookup tables for word comparison.
//!
//! All entries are stored in their normalized form (see [`super::normalize`]),
//! so "they're" appears as both `theyre` and `theyare`.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

/// Number words for the digit tokens 0-12.
pub const NUMBER_WORDS: [&str; 13] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve",
];

/// Trailing contraction suffixes and their expansions, checked in order.
pub const CONTRACTIONS: [(&str, &str); 6] = [
    ("n't", "not"),
    ("'re", "are"),
    ("'ve", "have"),
    ("'ll", "will"),
    ("'d", "would"),
    ("'s", ""),
];

/// Contractions whose stem changes when expanded.
pub const IRREGULAR_CONTRACTIONS: [(&str, &str); 3] =
    [("can't", "cannot"), ("won't", "willnot"), ("shan't", "shallnot")];

/// Single-token fillers.
pub const FILLER_WORDS: [&str; 5] = ["um", "uh", "er", "ah", "like"];

/// Two-token fillers.
pub const FILLER_PHRASES: [[&str; 2]; 2] = [["you", "know"], ["i", "mean"]];

/// OCR glyph confusions, applied in both directions.
pub const GLYPH_CONFUSIONS: [(&str, &str); 8] = [
    ("0", "o"),
    ("1", "l"),
    ("1", "i"),
    ("5", "s"),
    ("8", "b"),
    ("rn", "m"),
    ("cl", "d"),
    ("vv", "w"),
];

/// Words a speech recognizer commonly swaps for one another.
const CONFUSABLE_GROUPS: &[&[&str]] = &[
    &["the", "a", "uh"],
    &["and", "an"],
    &["to", "too", "two"],
    &["there", "their", "theyre", "theyare"],
    &["your", "youre", "youare"],
    &["were", "where"],
    &["then", "than"],
];

/// Homophones and irregular spellings that count as reading the word correctly.
const EQUIVALENT_GROUPS: &[&[&str]] = &[
    &["write", "right", "rite"],
    &["there", "their", "theyre", "theyare"],
    &["to", "too", "two"],
    &["your", "youre", "youare"],
    &["its", "it"],
    &["know", "no"],
    &["knew", "new"],
    &["hear", "here"],
    &["see", "sea"],
    &["be", "bee"],
    &["by", "buy", "bye"],
    &["for", "four", "fore"],
    &["one", "won"],
    &["eight", "ate"],
    &["son", "sun"],
    &["would", "wood"],
    &["blue", "blew"],
    &["meet", "meat"],
    &["road", "rode"],
    &["week", "weak"],
    &["whole", "hole"],
    &["hour", "our"],
    &["flower", "flour"],
    &["tail", "tale"],
    &["pair", "pear"],
    &["night", "knight"],
    &["peace", "piece"],
    &["through", "threw"],
    &["wait", "weight"],
    &["which", "witch"],
    &["weather", "whether"],
    &["dear", "deer"],
    &["color", "colour"],
    &["gray", "grey"],
    &["okay", "ok"],
];

fn index_groups(groups: &[&[&'static str]]) -> HashMap<&'static str, Vec<usize>> {
    let mut index: HashMap<&'static str, Vec<usize>> = HashMap::new();
    for (id, group) in groups.iter().enumerate() {
        for word in group.iter() {
            index.entry(*word).or_default().push(id);
        }
    }
    index
}

lazy_static! {
    /// Characters removed by normalization (apostrophes are handled separately).
    pub static ref NON_WORD_CHARS: Regex = Regex::new(r"[^\p{L}\p{N}']").unwrap();

    /// Typographic apostrophes folded to ASCII before stripping.
    pub static ref APOSTROPHES: Regex = Regex::new(r"[\u{2018}\u{2019}\u{02BC}`]").unwrap();

    pub static ref FILLERS: HashSet<&'static str> = FILLER_WORDS.iter().copied().collect();

    static ref CONFUSABLE_INDEX: HashMap<&'static str, Vec<usize>> =
        index_groups(CONFUSABLE_GROUPS);

    static ref EQUIVALENT_INDEX: HashMap<&'static str, Vec<usize>> =
        index_groups(EQUIVALENT_GROUPS);
}

fn share_group(index: &HashMap<&'static str, Vec<usize>>, a: &str, b: &str) -> bool {
    match (index.get(a), index.get(b)) {
        (Some(ga), Some(gb)) => ga.iter().any(|g| gb.contains(g)),
        _ => false,
    }
}

/// Whether two normalized words belong to the same mis-hearing group.
pub fn are_confusable(a: &str, b: &str) -> bool {
    share_group(&CONFUSABLE_INDEX, a, b)
}

/// Whether two normalized words are homophones or spelling variants.
pub fn are_equivalent(a: &str, b: &str) -> bool {
    a == b || share_group(&EQUIVALENT_INDEX, a, b)
}

/// Whether a normalized token is a single-word filler.
pub fn is_filler(word: &str) -> bool {
    FILLERS.contains(word)
}

/// Number of tokens forming a filler at the start of `words` (0, 1 or 2).
pub fn filler_len<S: AsRef<str>>(words: &[S]) -> usize {
    let Some(first) = words.first() else {
        return 0;
    };
    if is_filler(first.as_ref()) {
        return 1;
    }
    if let Some(second) = words.get(1) {
        let pair = [first.as_ref(), second.as_ref()];
        if FILLER_PHRASES.iter().any(|phrase| *phrase == pair) {
            return 2;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusable_groups() {
        assert!(are_confusable("the", "a"));
        assert!(are_confusable("then", "than"));
        assert!(are_confusable("their", "theyare"));
        assert!(!are_confusable("the", "and"));
        assert!(!are_confusable("cat", "cat"));
    }

    #[test]
    fn test_equivalent_groups() {
        assert!(are_equivalent("write", "rite"));
        assert!(are_equivalent("cat", "cat"));
        assert!(!are_equivalent("write", "wrote"));
    }

    #[test]
    fn test_filler_len() {
        assert_eq!(filler_len(&["um", "the"]), 1);
        assert_eq!(filler_len(&["you", "know", "the"]), 2);
        assert_eq!(filler_len(&["you", "said"]), 0);
        assert_eq!(filler_len::<&str>(&[]), 0);
    }
}
