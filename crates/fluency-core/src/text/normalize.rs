//! Token normalization.

use super::tables::{
    APOSTROPHES, CONTRACTIONS, IRREGULAR_CONTRACTIONS, NON_WORD_CHARS, NUMBER_WORDS,
};

/// Canonicalize a raw token for comparison.
///
/// Lower-cases, strips everything but letters and digits, expands trailing
/// contractions and maps the digit tokens `0`-`12` to their number words.
/// Never fails; input without any word characters yields an empty string.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let folded = APOSTROPHES.replace_all(&lowered, "'");
    let stripped = NON_WORD_CHARS.replace_all(&folded, "");

    let expanded = expand_contraction(&stripped);
    let word: String = expanded.chars().filter(|c| *c != '\'').collect();

    number_word(&word).map(str::to_string).unwrap_or(word)
}

fn expand_contraction(word: &str) -> String {
    if let Some((_, full)) = IRREGULAR_CONTRACTIONS.iter().find(|(c, _)| *c == word) {
        return (*full).to_string();
    }

    for (suffix, replacement) in CONTRACTIONS {
        if let Some(stem) = word.strip_suffix(suffix) {
            return format!("{stem}{replacement}");
        }
    }

    word.to_string()
}

fn number_word(word: &str) -> Option<&'static str> {
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    word.parse::<usize>()
        .ok()
        .and_then(|n| NUMBER_WORDS.get(n).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_punctuation() {
        assert_eq!(normalize("Hello,"), "hello");
        assert_eq!(normalize("\"Stop!\""), "stop");
        assert_eq!(normalize("well-known"), "wellknown");
    }

    #[test]
    fn test_contractions() {
        assert_eq!(normalize("Don't"), "donot");
        assert_eq!(normalize("they're"), "theyare");
        assert_eq!(normalize("we've"), "wehave");
        assert_eq!(normalize("I'll"), "iwill");
        assert_eq!(normalize("she'd"), "shewould");
        assert_eq!(normalize("cat's"), "cat");
        assert_eq!(normalize("can't"), "cannot");
        assert_eq!(normalize("won\u{2019}t"), "willnot");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(normalize("10"), "ten");
        assert_eq!(normalize("0"), "zero");
        assert_eq!(normalize("12."), "twelve");
        assert_eq!(normalize("13"), "13");
        assert_eq!(normalize("3rd"), "3rd");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("..."), "");
        assert_eq!(normalize("'"), "");
    }

    #[test]
    fn test_idempotent_on_samples() {
        for raw in ["Don't", "10", "they're", "CAT'S", "rock'n'roll", "x's's"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {raw:?}");
        }
    }
}
