//! Classification of misreads into error patterns.

use tracing::debug;

use crate::models::alignment::{AlignmentResult, WordStatus};
use crate::models::analysis::{ErrorPatterns, PatternHit, PatternSummary, Severity};
use crate::models::config::AnalysisConfig;
use crate::text::{normalize, similarity};

/// Consonant blends checked for reduction.
pub const BLENDS: [&str; 15] = [
    "bl", "cl", "fl", "gl", "pl", "br", "cr", "dr", "fr", "gr", "tr", "sc", "sk", "sp", "st",
];

/// Consonant digraphs.
pub const DIGRAPHS: [&str; 5] = ["ch", "sh", "th", "ph", "wh"];

/// Letters that are easily confused by shape.
pub const VISUAL_PAIRS: [(char, char); 4] = [('b', 'd'), ('p', 'q'), ('m', 'n'), ('u', 'n')];

/// Sounds commonly produced in place of "th".
const TH_SUBSTITUTES: [char; 3] = ['d', 't', 'f'];

/// Similarity below which a misread is a substitution of an unrelated word.
const SUBSTITUTION_THRESHOLD: f64 = 0.6;

/// Buckets misread words into phonics, strategy, speech and visual patterns.
pub struct ErrorPatternAnalyzer {
    config: AnalysisConfig,
}

impl ErrorPatternAnalyzer {
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Analyze an alignment. A misread may land in several buckets.
    pub fn analyze(&self, alignment: &AlignmentResult) -> ErrorPatterns {
        let mut patterns = ErrorPatterns::default();

        for entry in &alignment.aligned {
            match entry.status {
                WordStatus::Correct => {}
                WordStatus::Skipped => {
                    patterns.counts.skipped += 1;
                    patterns
                        .reading_strategy_patterns
                        .skipped_words
                        .push(entry.expected_word.clone());
                }
                WordStatus::Misread => {
                    let expected = normalize(&entry.expected_word);
                    let spoken = normalize(entry.spoken_word.as_deref().unwrap_or_default());
                    let score = similarity(&expected, &spoken);

                    if score >= SUBSTITUTION_THRESHOLD {
                        patterns.counts.misread += 1;
                    } else {
                        patterns.counts.substituted += 1;
                    }

                    if !expected.is_empty() && !spoken.is_empty() {
                        let hit = |pattern: Option<String>| PatternHit {
                            expected_index: entry.expected_index,
                            expected: expected.clone(),
                            spoken: spoken.clone(),
                            pattern,
                        };
                        self.classify(&mut patterns, &expected, &spoken, score, hit);
                    }
                }
            }
        }

        patterns.summary = self.summarize(&patterns);
        debug!(
            errors = patterns.counts.total(),
            severity = %patterns.summary.severity,
            "analyzed error patterns"
        );
        patterns
    }

    fn classify(
        &self,
        patterns: &mut ErrorPatterns,
        expected: &str,
        spoken: &str,
        score: f64,
        hit: impl Fn(Option<String>) -> PatternHit,
    ) {
        let (e_first, s_first) = (expected.chars().next(), spoken.chars().next());

        let phonics = &mut patterns.phonics_patterns;
        if e_first != s_first {
            phonics.initial_sound_errors.push(hit(None));
        }
        if expected.chars().last() != spoken.chars().last() {
            phonics.final_sound_errors.push(hit(None));
        }
        if let Some(blend) = reduced(expected, spoken, &BLENDS) {
            phonics.blend_errors.push(hit(Some(blend.to_string())));
        }
        if let Some(digraph) = reduced(expected, spoken, &DIGRAPHS) {
            phonics.digraph_errors.push(hit(Some(digraph.to_string())));
        }

        if e_first == s_first
            && score < self.config.guessing_similarity
            && expected.chars().count() > 2
            && spoken.chars().count() > 2
        {
            patterns
                .reading_strategy_patterns
                .first_letter_guessing
                .push(hit(None));
        }

        let speech = &mut patterns.speech_patterns;
        if expected.contains('r') && spoken.contains('w') {
            speech.r_sound_issues.push(hit(Some("r→w".to_string())));
        }
        if expected.contains("th") && !spoken.contains("th") {
            if let Some(sub) = TH_SUBSTITUTES.iter().find(|c| spoken.contains(**c)) {
                speech.th_sound_issues.push(hit(Some(format!("th→{sub}"))));
            }
        }

        let swapped = VISUAL_PAIRS.iter().filter(|(x, y)| {
            expected.contains(*x) && spoken.contains(*y)
                || expected.contains(*y) && spoken.contains(*x)
        });
        for (x, y) in swapped {
            patterns
                .visual_patterns
                .letter_confusions
                .push(hit(Some(format!("{x}/{y}"))));
        }
    }

    fn summarize(&self, patterns: &ErrorPatterns) -> PatternSummary {
        let mut summary = PatternSummary {
            severity: Severity::from_error_count(patterns.counts.total()),
            ..PatternSummary::default()
        };
        let mut flag = |issue: &str, recommendation: &str| {
            summary.primary_issues.push(issue.to_string());
            summary.recommendations.push(recommendation.to_string());
        };

        let phonics = &patterns.phonics_patterns;
        if phonics.initial_sound_errors.len() >= self.config.initial_sound_flag {
            flag(
                "Consistent initial sound errors",
                "Practice beginning sounds with word families and picture-sound matching",
            );
        }
        if phonics.blend_errors.len() >= self.config.blend_flag {
            flag(
                "Difficulty with consonant blends",
                "Practice blending consonant clusters such as bl, st and tr",
            );
        }
        if patterns.reading_strategy_patterns.first_letter_guessing.len()
            >= self.config.guessing_flag
        {
            flag(
                "Guessing based on first letter",
                "Encourage reading through the whole word before saying it",
            );
        }
        let speech = &patterns.speech_patterns;
        if speech.r_sound_issues.len() >= self.config.r_sound_flag
            || speech.th_sound_issues.len() >= self.config.th_sound_flag
        {
            flag(
                "Speech sound difficulties",
                "Consider a speech-language screening for r and th sounds",
            );
        }

        summary
    }
}

impl Default for ErrorPatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// First pattern present in `expected` but missing from `spoken`.
fn reduced<'a>(expected: &str, spoken: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .find(|p| expected.contains(**p) && !spoken.contains(**p))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alignment::AlignedEntry;
    use pretty_assertions::assert_eq;

    fn entry(index: usize, expected: &str, spoken: Option<&str>, status: WordStatus) -> AlignedEntry {
        AlignedEntry {
            expected_index: index,
            expected_word: expected.to_string(),
            spoken_word: spoken.map(str::to_string),
            status,
            confidence: None,
            start_time: None,
            end_time: None,
        }
    }

    fn misreads(pairs: &[(&str, &str)]) -> AlignmentResult {
        AlignmentResult {
            aligned: pairs
                .iter()
                .enumerate()
                .map(|(i, (e, s))| entry(i, e, Some(s), WordStatus::Misread))
                .collect(),
            ..AlignmentResult::default()
        }
    }

    #[test]
    fn test_clean_reading_is_excellent() {
        let alignment = AlignmentResult {
            aligned: vec![entry(0, "cat", Some("cat"), WordStatus::Correct)],
            correct_count: 1,
            ..AlignmentResult::default()
        };
        let patterns = ErrorPatternAnalyzer::new().analyze(&alignment);
        assert_eq!(patterns.summary.severity, Severity::Excellent);
        assert!(patterns.summary.primary_issues.is_empty());
    }

    #[test]
    fn test_r_to_w() {
        let patterns = ErrorPatternAnalyzer::new().analyze(&misreads(&[("rabbit", "wabbit")]));
        let issues = &patterns.speech_patterns.r_sound_issues;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].expected, "rabbit");
        assert_eq!(issues[0].pattern.as_deref(), Some("r→w"));
        assert_eq!(patterns.phonics_patterns.initial_sound_errors.len(), 1);
        assert_eq!(patterns.counts.misread, 1);
        assert_eq!(patterns.summary.severity, Severity::Mild);
    }

    #[test]
    fn test_th_substitution() {
        let patterns = ErrorPatternAnalyzer::new().analyze(&misreads(&[("think", "fink")]));
        assert_eq!(
            patterns.speech_patterns.th_sound_issues[0].pattern.as_deref(),
            Some("th→f")
        );
        assert_eq!(
            patterns.phonics_patterns.digraph_errors[0].pattern.as_deref(),
            Some("th")
        );
    }

    #[test]
    fn test_blend_reduction() {
        let patterns =
            ErrorPatternAnalyzer::new().analyze(&misreads(&[("stop", "top"), ("black", "back")]));
        let blends: Vec<_> = patterns
            .phonics_patterns
            .blend_errors
            .iter()
            .map(|h| h.pattern.clone().unwrap_or_default())
            .collect();
        assert_eq!(blends, vec!["st".to_string(), "bl".to_string()]);
        assert_eq!(
            patterns.summary.primary_issues,
            vec!["Difficulty with consonant blends".to_string()]
        );
    }

    #[test]
    fn test_visual_confusion() {
        let patterns = ErrorPatternAnalyzer::new().analyze(&misreads(&[("bad", "dad")]));
        let hits = &patterns.visual_patterns.letter_confusions;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].pattern.as_deref(), Some("b/d"));
    }

    #[test]
    fn test_every_visual_pair_reported() {
        let patterns = ErrorPatternAnalyzer::new().analyze(&misreads(&[("bam", "dan")]));
        let pairs: Vec<_> = patterns
            .visual_patterns
            .letter_confusions
            .iter()
            .map(|h| h.pattern.clone().unwrap_or_default())
            .collect();
        assert_eq!(pairs, vec!["b/d".to_string(), "m/n".to_string()]);
    }

    #[test]
    fn test_first_letter_guessing() {
        let patterns = ErrorPatternAnalyzer::new()
            .analyze(&misreads(&[("horse", "house"), ("monkey", "mitten"), ("bottle", "banana")]));
        let guessing = &patterns.reading_strategy_patterns.first_letter_guessing;
        let guessed: Vec<_> = guessing.iter().map(|h| h.expected.as_str()).collect();
        assert_eq!(guessed, vec!["monkey", "bottle"]);
        assert!(patterns
            .summary
            .primary_issues
            .contains(&"Guessing based on first letter".to_string()));
        assert_eq!(patterns.counts.substituted, 2);
    }

    #[test]
    fn test_severity_counts_skips() {
        let mut alignment = AlignmentResult::default();
        for i in 0..6 {
            alignment
                .aligned
                .push(entry(i, "word", None, WordStatus::Skipped));
        }
        let patterns = ErrorPatternAnalyzer::new().analyze(&alignment);
        assert_eq!(patterns.counts.skipped, 6);
        assert_eq!(patterns.reading_strategy_patterns.skipped_words.len(), 6);
        assert_eq!(patterns.summary.severity, Severity::Moderate);
    }

    #[test]
    fn test_initial_sound_flag() {
        let patterns = ErrorPatternAnalyzer::new()
            .analyze(&misreads(&[("cat", "bat"), ("dog", "log"), ("pig", "wig")]));
        assert_eq!(patterns.phonics_patterns.initial_sound_errors.len(), 3);
        assert!(patterns
            .summary
            .primary_issues
            .contains(&"Consistent initial sound errors".to_string()));
    }
}
