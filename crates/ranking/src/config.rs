//! Tuning knobs for the scoring formulas.
//!
//! Every constant the formulas use lives here with its default, so the
//! values can be adjusted from configuration instead of code.

use crate::error::ConfigError;
use crate::types::{Rating, SkillLevel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default exponent applied to similarity (`similarity ^ 2`).
pub const DEFAULT_SIMILARITY_EXPONENT: f64 = 2.0;
/// Default top-of-range for display scores.
pub const DEFAULT_DISPLAY_SCALE: f64 = 100.0;

/// Which scoring formula is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringVariant {
    /// `coverage x expertise`; the current formula.
    #[default]
    CoverageExpertise,
    /// Additive level-weighted formula with a transfer bonus (legacy).
    LevelWeighted,
}

impl ScoringVariant {
    /// Stable label used in config and on the command line.
    pub fn label(self) -> &'static str {
        match self {
            ScoringVariant::CoverageExpertise => "coverage-expertise",
            ScoringVariant::LevelWeighted => "level-weighted",
        }
    }
}

impl fmt::Display for ScoringVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScoringVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "coverage-expertise" | "coverage" => Ok(ScoringVariant::CoverageExpertise),
            "level-weighted" | "legacy" => Ok(ScoringVariant::LevelWeighted),
            other => Err(format!(
                "unknown scoring variant '{other}' (expected coverage-expertise or level-weighted)"
            )),
        }
    }
}

/// Multiplier applied per self-assessed rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingMultipliers {
    /// Rating 1.
    pub beginner: f64,
    /// Rating 2.
    pub intermediate: f64,
    /// Rating 3.
    pub advanced: f64,
}

impl RatingMultipliers {
    /// Multiplier for one rating.
    pub fn for_rating(&self, rating: Rating) -> f64 {
        match rating {
            Rating::Beginner => self.beginner,
            Rating::Intermediate => self.intermediate,
            Rating::Advanced => self.advanced,
        }
    }

    /// Smallest configured multiplier.
    pub fn min(&self) -> f64 {
        self.beginner.min(self.intermediate).min(self.advanced)
    }

    /// Largest configured multiplier.
    pub fn max(&self) -> f64 {
        self.beginner.max(self.intermediate).max(self.advanced)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for rating in Rating::ALL {
            let value = self.for_rating(rating);
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidMultiplier {
                    rating: rating.label().to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for RatingMultipliers {
    /// Exponential spread: Advanced counts six times Beginner.
    fn default() -> Self {
        Self {
            beginner: 1.0,
            intermediate: 3.0,
            advanced: 6.0,
        }
    }
}

/// Half-open `[min, max)` range of expertise multipliers with a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertiseBand {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
    /// Human-readable label.
    pub label: String,
}

impl ExpertiseBand {
    fn new(min: f64, max: f64, label: &str) -> Self {
        Self {
            min,
            max,
            label: label.to_string(),
        }
    }
}

/// Default expertise bands over the 1.0-6.0 multiplier range.
pub fn default_expertise_bands() -> Vec<ExpertiseBand> {
    vec![
        ExpertiseBand::new(1.0, 1.5, "Beginner"),
        ExpertiseBand::new(1.5, 2.5, "Early Career"),
        ExpertiseBand::new(2.5, 4.0, "Intermediate"),
        ExpertiseBand::new(4.0, 5.0, "Advanced"),
        ExpertiseBand::new(5.0, 6.1, "Expert"),
    ]
}

/// Per-level weights for the level-weighted formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelWeights {
    /// Level 1.
    pub category: f64,
    /// Level 2.
    pub sub_category: f64,
    /// Level 3.
    pub generic_skill: f64,
    /// Level 4.
    pub technology: f64,
}

impl LevelWeights {
    /// Weight for one level.
    pub fn for_level(&self, level: SkillLevel) -> f64 {
        match level {
            SkillLevel::Category => self.category,
            SkillLevel::SubCategory => self.sub_category,
            SkillLevel::GenericSkill => self.generic_skill,
            SkillLevel::Technology => self.technology,
        }
    }
}

impl Default for LevelWeights {
    /// Generic skills (L3) carry the most weight.
    fn default() -> Self {
        Self {
            category: 0.1,
            sub_category: 0.2,
            generic_skill: 0.5,
            technology: 0.3,
        }
    }
}

/// Settings for the legacy level-weighted formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelWeightedConfig {
    /// Weight by hierarchy level.
    pub level_weights: LevelWeights,
    /// Rating multipliers used by this formula (1x / 2x / 4x).
    pub rating_multipliers: RatingMultipliers,
    /// Bonus per technology held under a different level-3 skill.
    pub transfer_bonus_per_tech: f64,
    /// Upper bound on the transfer bonus.
    pub transfer_bonus_cap: f64,
}

impl Default for LevelWeightedConfig {
    fn default() -> Self {
        Self {
            level_weights: LevelWeights::default(),
            rating_multipliers: RatingMultipliers {
                beginner: 1.0,
                intermediate: 2.0,
                advanced: 4.0,
            },
            transfer_bonus_per_tech: 0.02,
            transfer_bonus_cap: 0.15,
        }
    }
}

/// All scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Active formula.
    pub variant: ScoringVariant,
    /// Exponent applied to similarity to get a relevancy weight.
    pub similarity_exponent: f64,
    /// Rating multipliers for the coverage x expertise formula.
    pub rating_multipliers: RatingMultipliers,
    /// Labels for expertise multiplier ranges, lowest first.
    pub expertise_bands: Vec<ExpertiseBand>,
    /// Share of matches (by similarity) that count toward maximum coverage.
    pub coverage_max_percentile: f64,
    /// Display score given to the top-ranked user.
    pub display_scale: f64,
    /// Legacy formula settings.
    pub legacy: LevelWeightedConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            variant: ScoringVariant::default(),
            similarity_exponent: DEFAULT_SIMILARITY_EXPONENT,
            rating_multipliers: RatingMultipliers::default(),
            expertise_bands: default_expertise_bands(),
            coverage_max_percentile: 1.0,
            display_scale: DEFAULT_DISPLAY_SCALE,
            legacy: LevelWeightedConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Reject values that would make scores meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.similarity_exponent.is_finite() || self.similarity_exponent <= 0.0 {
            return Err(ConfigError::InvalidExponent(self.similarity_exponent));
        }
        self.rating_multipliers.validate()?;

        if self.expertise_bands.is_empty() {
            return Err(ConfigError::EmptyExpertiseBands);
        }
        for band in &self.expertise_bands {
            if !(band.min.is_finite() && band.max.is_finite()) || band.min >= band.max {
                return Err(ConfigError::InvalidExpertiseBand {
                    label: band.label.clone(),
                    min: band.min,
                    max: band.max,
                });
            }
        }

        let p = self.coverage_max_percentile;
        if !p.is_finite() || p <= 0.0 || p > 1.0 {
            return Err(ConfigError::InvalidPercentile(p));
        }
        if !self.display_scale.is_finite() || self.display_scale <= 0.0 {
            return Err(ConfigError::InvalidDisplayScale(self.display_scale));
        }

        for level in SkillLevel::ALL {
            let value = self.legacy.level_weights.for_level(level);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidLevelWeight {
                    level: level.depth(),
                    value,
                });
            }
        }
        self.legacy.rating_multipliers.validate()?;
        let (per_tech, cap) = (
            self.legacy.transfer_bonus_per_tech,
            self.legacy.transfer_bonus_cap,
        );
        if !(per_tech.is_finite() && cap.is_finite()) || per_tech < 0.0 || cap < 0.0 {
            return Err(ConfigError::InvalidTransferBonus { per_tech, cap });
        }
        Ok(())
    }

    /// Upper end of the score a bucket plan must cover for this variant.
    ///
    /// Level-weighted buckets read the 0-100 normalized score; the
    /// canonical variant buckets the display score.
    pub fn bucket_scale(&self) -> f64 {
        match self.variant {
            ScoringVariant::LevelWeighted => DEFAULT_DISPLAY_SCALE,
            ScoringVariant::CoverageExpertise => self.display_scale,
        }
    }

    /// Label for an expertise multiplier.
    ///
    /// Bands are half-open; values below the lowest band take its label and
    /// values at or above the highest band take the highest label.
    pub fn expertise_label(&self, multiplier: f64) -> &str {
        if let Some(band) = self
            .expertise_bands
            .iter()
            .find(|b| b.min <= multiplier && multiplier < b.max)
        {
            return band.label.as_str();
        }
        let lowest = self
            .expertise_bands
            .iter()
            .min_by(|a, b| a.min.total_cmp(&b.min));
        let highest = self
            .expertise_bands
            .iter()
            .max_by(|a, b| a.max.total_cmp(&b.max));
        match (lowest, highest) {
            (Some(low), _) if multiplier < low.min => low.label.as_str(),
            (_, Some(high)) => high.label.as_str(),
            _ => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.similarity_exponent, 2.0);
        assert_eq!(config.rating_multipliers.for_rating(Rating::Advanced), 6.0);
        assert_eq!(config.legacy.rating_multipliers.max(), 4.0);
        assert_eq!(
            config.legacy.level_weights.for_level(SkillLevel::GenericSkill),
            0.5
        );
    }

    #[test]
    fn test_expertise_labels() {
        let config = ScoringConfig::default();
        assert_eq!(config.expertise_label(1.0), "Beginner");
        assert_eq!(config.expertise_label(1.49), "Beginner");
        assert_eq!(config.expertise_label(1.5), "Early Career");
        assert_eq!(config.expertise_label(3.0), "Intermediate");
        assert_eq!(config.expertise_label(4.0), "Advanced");
        assert_eq!(config.expertise_label(6.0), "Expert");
        assert_eq!(config.expertise_label(6.1), "Expert");
        assert_eq!(config.expertise_label(42.0), "Expert");
        assert_eq!(config.expertise_label(0.5), "Beginner");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ScoringConfig {
            similarity_exponent: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidExponent(0.0)));

        config.similarity_exponent = 2.0;
        config.rating_multipliers.advanced = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMultiplier { .. })
        ));

        config.rating_multipliers = RatingMultipliers::default();
        config.coverage_max_percentile = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPercentile(1.5)));

        config.coverage_max_percentile = 1.0;
        config.expertise_bands.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyExpertiseBands));

        config.expertise_bands = vec![ExpertiseBand::new(2.0, 1.0, "Backwards")];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidExpertiseBand { .. })
        ));

        config.expertise_bands = default_expertise_bands();
        config.legacy.transfer_bonus_cap = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTransferBonus { .. })
        ));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!(
            "coverage-expertise".parse::<ScoringVariant>(),
            Ok(ScoringVariant::CoverageExpertise)
        );
        assert_eq!(
            "LEVEL_WEIGHTED".parse::<ScoringVariant>(),
            Ok(ScoringVariant::LevelWeighted)
        );
        assert!("bm25".parse::<ScoringVariant>().is_err());
        assert_eq!(ScoringVariant::LevelWeighted.to_string(), "level-weighted");
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{"similarity_exponent": 3.0, "variant": "level-weighted"}"#)
                .unwrap();
        assert_eq!(config.similarity_exponent, 3.0);
        assert_eq!(config.variant, ScoringVariant::LevelWeighted);
        assert_eq!(config.rating_multipliers, RatingMultipliers::default());
        assert_eq!(config.expertise_bands.len(), 5);
    }
}
