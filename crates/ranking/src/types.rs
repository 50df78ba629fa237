//! Small value types shared across the ranking modules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Similarity between a query and a skill, clamped to the [0.0, 1.0] range.
///
/// Vector search reports `1 - cosine_distance`; anything outside the unit
/// interval (or NaN) is treated as noise from the collaborator and clamped.
///
/// # Examples
///
/// ```
/// use skillrank_ranking::Similarity;
///
/// assert_eq!(Similarity::new(0.75).value(), 0.75);
/// assert_eq!(Similarity::new(1.5).value(), 1.0);
/// assert_eq!(Similarity::new(-0.5).value(), 0.0);
/// assert_eq!(Similarity::from_distance(0.2).value(), 0.8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Similarity(f64);

impl Similarity {
    /// Create a new Similarity, clamping the value to [0.0, 1.0].
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Convert a cosine distance into a similarity.
    #[must_use]
    pub fn from_distance(distance: f64) -> Self {
        Self::new(1.0 - distance)
    }

    /// Get the inner similarity value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Superlinear relevancy weight, `similarity ^ exponent`.
    #[must_use]
    pub fn relevancy_weight(&self, exponent: f64) -> f64 {
        self.0.powf(exponent)
    }

    /// Qualitative reading of this similarity for display.
    #[must_use]
    pub fn quality(&self) -> MatchQuality {
        MatchQuality::from_similarity(self.0)
    }
}

impl Default for Similarity {
    fn default() -> Self {
        Self(0.0)
    }
}

impl From<f64> for Similarity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Similarity> for f64 {
    fn from(sim: Similarity) -> Self {
        sim.0
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Depth in the four-level skill hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SkillLevel {
    /// Level 1: broad category.
    Category = 1,
    /// Level 2: sub-category.
    SubCategory = 2,
    /// Level 3: generic skill.
    GenericSkill = 3,
    /// Level 4: concrete technology or tool.
    Technology = 4,
}

impl SkillLevel {
    /// All levels, root first.
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Category,
        SkillLevel::SubCategory,
        SkillLevel::GenericSkill,
        SkillLevel::Technology,
    ];

    /// Numeric depth (1-4).
    pub fn depth(self) -> u8 {
        self as u8
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            SkillLevel::Category => "Category",
            SkillLevel::SubCategory => "Sub-category",
            SkillLevel::GenericSkill => "Generic Skill",
            SkillLevel::Technology => "Technology",
        }
    }

    /// Short tag such as `L3`.
    pub fn tag(self) -> String {
        format!("L{}", self.depth())
    }
}

impl TryFrom<u8> for SkillLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SkillLevel::Category),
            2 => Ok(SkillLevel::SubCategory),
            3 => Ok(SkillLevel::GenericSkill),
            4 => Ok(SkillLevel::Technology),
            other => Err(format!("skill level must be 1-4, got {other}")),
        }
    }
}

impl From<SkillLevel> for u8 {
    fn from(level: SkillLevel) -> Self {
        level.depth()
    }
}

/// Self-assessed proficiency on a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    /// Rating 1.
    Beginner = 1,
    /// Rating 2.
    Intermediate = 2,
    /// Rating 3.
    Advanced = 3,
}

impl Rating {
    /// All ratings, lowest first.
    pub const ALL: [Rating; 3] = [Rating::Beginner, Rating::Intermediate, Rating::Advanced];

    /// Numeric value (1-3).
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Rating::Beginner => "Beginner",
            Rating::Intermediate => "Intermediate",
            Rating::Advanced => "Advanced",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rating::Beginner),
            2 => Ok(Rating::Intermediate),
            3 => Ok(Rating::Advanced),
            other => Err(format!("rating must be 1-3, got {other}")),
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

/// Qualitative bands over similarity, used when presenting matched skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchQuality {
    /// Similarity >= 0.85.
    Excellent,
    /// Similarity >= 0.70.
    Strong,
    /// Similarity >= 0.55.
    Good,
    /// Similarity >= 0.40.
    Moderate,
    /// Anything weaker.
    Weak,
}

impl MatchQuality {
    /// Classify a raw similarity value.
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= 0.85 {
            MatchQuality::Excellent
        } else if similarity >= 0.70 {
            MatchQuality::Strong
        } else if similarity >= 0.55 {
            MatchQuality::Good
        } else if similarity >= 0.40 {
            MatchQuality::Moderate
        } else {
            MatchQuality::Weak
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            MatchQuality::Excellent => "Excellent Match",
            MatchQuality::Strong => "Strong Match",
            MatchQuality::Good => "Good Match",
            MatchQuality::Moderate => "Moderate Match",
            MatchQuality::Weak => "Weak Match",
        }
    }
}
