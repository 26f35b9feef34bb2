//! Soundex-style phonetic fingerprints.

use lazy_static::lazy_static;
use rphonetic::{Encoder, Soundex};

/// Length of a phonetic code, including the leading letter.
const CODE_LEN: usize = 4;

/// Consonant classes for `a`..=`z`. `0` marks letters that carry no class and
/// let the previous class repeat after them.
const CLASSES: [char; 26] = [
    '0', '1', '2', '3', '0', '1', '2', '0', '0', '2', '2', '4', '5', //
    '5', '0', '1', '2', '6', '2', '3', '0', '1', '0', '2', '0', '2',
];

lazy_static! {
    // `h` and `w` are treated like vowels rather than skipped.
    static ref SOUNDEX: Soundex = Soundex::new(CLASSES, false);
}

/// Compute the four-character phonetic code of a normalized word.
///
/// The first letter is kept (upper-cased) and followed by up to three
/// consonant-class digits. Adjacent letters of the same class collapse into one
/// digit; any unmapped letter (vowels, `h`, `w`, `y`) resets that tracking so
/// the class may repeat after it. Short codes are padded with `'0'`.
///
/// Returns `None` for words that do not start with a letter.
pub fn phonetic_code(word: &str) -> Option<String> {
    if !word.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let letters: String = word.chars().filter(char::is_ascii_alphabetic).collect();
    let mut code = SOUNDEX.encode(&letters);
    if code.is_empty() {
        return None;
    }
    code.truncate(CODE_LEN);
    while code.len() < CODE_LEN {
        code.push('0');
    }
    Some(code)
}

/// Whether two words share a phonetic code.
pub fn sounds_alike(a: &str, b: &str) -> bool {
    match (phonetic_code(a), phonetic_code(b)) {
        (Some(ca), Some(cb)) => ca == cb,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_codes() {
        assert_eq!(phonetic_code("robert").as_deref(), Some("R163"));
        assert_eq!(phonetic_code("rupert").as_deref(), Some("R163"));
        assert_eq!(phonetic_code("tymczak").as_deref(), Some("T522"));
    }

    #[test]
    fn test_padding_and_collapse() {
        assert_eq!(phonetic_code("a").as_deref(), Some("A000"));
        assert_eq!(phonetic_code("lee").as_deref(), Some("L000"));
        // "ck" share a class and collapse to one digit
        assert_eq!(phonetic_code("jackson").as_deref(), Some("J250"));
    }

    #[test]
    fn test_vowel_resets_tracker() {
        // s-a-s: the vowel lets the class repeat
        assert_eq!(phonetic_code("sasa").as_deref(), Some("S200"));
        assert_eq!(phonetic_code("basis").as_deref(), Some("B220"));
        // h and w reset it too
        assert_eq!(phonetic_code("ashcraft").as_deref(), Some("A226"));
    }

    #[test]
    fn test_non_letter_start() {
        assert_eq!(phonetic_code(""), None);
        assert_eq!(phonetic_code("3rd"), None);
    }

    #[test]
    fn test_sounds_alike() {
        assert!(sounds_alike("there", "their"));
        assert!(sounds_alike("smith", "smyth"));
        assert!(!sounds_alike("cat", "dog"));
    }
}
