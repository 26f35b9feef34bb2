//! Configuration structures for the fluency engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FluencyError, Result};

/// Main configuration for the fluency engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluencyConfig {
    /// Range location configuration.
    pub range: RangeConfig,

    /// Word alignment configuration.
    pub alignment: AlignmentConfig,

    /// Error pattern analysis configuration.
    pub analysis: AnalysisConfig,
}

/// Range locator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Minimum similarity for a spoken word to claim an OCR word.
    pub match_threshold: f64,

    /// Penalty per OCR word jumped over to reach a match.
    pub skip_penalty: f64,

    /// Penalty for dropping a spoken word that matches nothing.
    pub gap_penalty: f64,

    /// Matches required before a DP range is accepted.
    pub min_matches: u32,

    /// Minimum spoken word length for anchor candidates.
    pub anchor_min_length: usize,

    /// OCR words occurring more often than this are never anchors.
    pub anchor_max_occurrences: usize,

    /// Minimum similarity for an anchor pair.
    pub anchor_threshold: f64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.55,
            skip_penalty: 0.3,
            gap_penalty: 0.4,
            min_matches: 2,
            anchor_min_length: 4,
            anchor_max_occurrences: 2,
            anchor_threshold: 0.6,
        }
    }
}

/// Sequence aligner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Similarity at or above which a non-equal pair counts as a misread.
    pub fuzzy_threshold: f64,

    /// Score for an equal or phonetically equivalent pair.
    pub exact_score: f64,

    /// Score for a fuzzy pair.
    pub fuzzy_score: f64,

    /// Score for a strong mismatch.
    pub mismatch_score: f64,

    /// Cost of skipping an expected word.
    pub skip_cost: f64,

    /// Cost of an extra spoken word.
    pub insert_cost: f64,

    /// Silence between words (seconds) that counts as a hesitation.
    pub pause_threshold_seconds: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.6,
            exact_score: 1.0,
            fuzzy_score: 0.3,
            mismatch_score: -1.0,
            skip_cost: 1.0,
            insert_cost: 0.5,
            pause_threshold_seconds: 1.0,
        }
    }
}

/// Error pattern analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Similarity below which a same-first-letter misread counts as guessing.
    pub guessing_similarity: f64,

    /// Initial sound hits needed to flag the issue.
    pub initial_sound_flag: usize,

    /// Blend hits needed to flag the issue.
    pub blend_flag: usize,

    /// Guessing hits needed to flag the issue.
    pub guessing_flag: usize,

    /// r/w substitutions needed to flag speech difficulties.
    pub r_sound_flag: usize,

    /// th substitutions needed to flag speech difficulties.
    pub th_sound_flag: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            guessing_similarity: 0.5,
            initial_sound_flag: 3,
            blend_flag: 2,
            guessing_flag: 2,
            r_sound_flag: 3,
            th_sound_flag: 2,
        }
    }
}

impl FluencyConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that thresholds lie in their valid ranges.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(FluencyError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )))
            }
        };

        unit("range.match_threshold", self.range.match_threshold)?;
        unit("range.anchor_threshold", self.range.anchor_threshold)?;
        unit("alignment.fuzzy_threshold", self.alignment.fuzzy_threshold)?;
        unit("analysis.guessing_similarity", self.analysis.guessing_similarity)?;

        if self.range.skip_penalty < 0.0 || self.range.gap_penalty < 0.0 {
            return Err(FluencyError::Config(
                "range penalties must not be negative".to_string(),
            ));
        }
        if self.alignment.skip_cost < 0.0 || self.alignment.insert_cost < 0.0 {
            return Err(FluencyError::Config(
                "alignment costs must not be negative".to_string(),
            ));
        }
        if self.alignment.pause_threshold_seconds <= 0.0 {
            return Err(FluencyError::Config(
                "alignment.pause_threshold_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_validate() {
        assert!(FluencyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FluencyConfig =
            serde_json::from_str(r#"{"range": {"match_threshold": 0.7}}"#).unwrap();
        assert_eq!(config.range.match_threshold, 0.7);
        assert_eq!(config.range.skip_penalty, 0.3);
        assert_eq!(config.alignment, AlignmentConfig::default());
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let mut config = FluencyConfig::default();
        config.alignment.fuzzy_threshold = 1.5;
        assert!(matches!(config.validate(), Err(FluencyError::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FluencyConfig::default();
        config.range.gap_penalty = 0.5;
        config.save(&path).unwrap();

        let loaded = FluencyConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
