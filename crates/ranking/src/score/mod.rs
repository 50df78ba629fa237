//! Per-user scoring against a query's matched skills.

mod coverage;
mod explainer;
mod legacy;

pub use coverage::CoverageExpertiseScorer;
pub use explainer::{
    explain, key_contributors, summarize_outcome, KEY_CONTRIBUTOR_MIN, KEY_CONTRIBUTOR_SHARE,
};
pub use legacy::{transfer_bonus, LevelWeightedScorer};

use crate::config::{ScoringConfig, ScoringVariant};
use crate::hierarchy::SkillHierarchy;
use crate::match_set::MatchSet;
use crate::types::{Rating, SkillLevel};
use crate::user_index::UserSkillIndex;
use serde::{Deserialize, Serialize};

/// Trait for computing a user's score against one query.
pub trait Scorer {
    /// Which formula this scorer implements.
    fn variant(&self) -> ScoringVariant;

    /// Query-wide normalisers. They depend only on `matches`, so a ranking
    /// pass computes them once and reuses them for every user.
    fn prepare(&self, matches: &MatchSet) -> QueryBounds;

    /// Score one user against bounds from [`Scorer::prepare`] on the same matches.
    fn score_with(
        &self,
        user: &UserSkillIndex,
        matches: &MatchSet,
        hierarchy: &SkillHierarchy,
        bounds: &QueryBounds,
    ) -> ScoreRecord;

    /// Score one user. Never fails; missing data degrades to zero.
    fn score(
        &self,
        user: &UserSkillIndex,
        matches: &MatchSet,
        hierarchy: &SkillHierarchy,
    ) -> ScoreRecord {
        let bounds = self.prepare(matches);
        self.score_with(user, matches, hierarchy, &bounds)
    }
}

/// Per-query denominators shared by every user in a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QueryBounds {
    /// Coverage a user holding every counted match would reach.
    pub max_coverage: f64,
    /// Raw score of a user holding every match at the top rating.
    pub max_possible: f64,
}

/// Build the scorer selected by `config.variant`.
pub fn scorer_for(config: &ScoringConfig) -> Box<dyn Scorer + Send + Sync> {
    match config.variant {
        ScoringVariant::CoverageExpertise => Box::new(CoverageExpertiseScorer::new(config.clone())),
        ScoringVariant::LevelWeighted => Box::new(LevelWeightedScorer::new(config.clone())),
    }
}

/// One matched skill's share of a user's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillContribution {
    /// Skill id.
    pub skill_id: String,
    /// Display title.
    pub title: String,
    /// Depth in the hierarchy.
    pub level: SkillLevel,
    /// Similarity to the query.
    pub similarity: f64,
    /// Coverage this skill adds (`similarity ^ exponent` in the canonical formula).
    pub relevancy_weight: f64,
    /// User's rating on the skill.
    pub rating: Rating,
    /// Multiplier for that rating.
    pub rating_multiplier: f64,
    /// `relevancy_weight * rating_multiplier`.
    pub expertise_contribution: f64,
    /// Share of the user's coverage, 0-100.
    pub coverage_percentage: f64,
}

/// Score for one (user, query) pair with its decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Formula that produced this record.
    pub variant: ScoringVariant,
    /// Sum of relevancy weights of matched skills the user holds.
    pub coverage_score: f64,
    /// Query-dependent normalisation denominator.
    pub max_coverage: f64,
    /// `coverage_score / max_coverage * 100`, clamped to [0, 100].
    pub coverage_percentage: f64,
    /// Weighted-average rating multiplier (1.0 when nothing matched).
    pub expertise_multiplier: f64,
    /// Label for the expertise multiplier.
    pub expertise_label: String,
    /// Ordering key.
    pub raw_score: f64,
    /// Score relative to the theoretical maximum (level-weighted formula only).
    pub normalized_score: Option<f64>,
    /// Score rescaled against the top-ranked user; zero until ranked.
    pub display_score: f64,
    /// Partial credit for transferable technologies (level-weighted formula only).
    pub transfer_bonus: f64,
    /// Number of matched skills the user holds.
    pub matched_count: usize,
    /// Number of those that are level-4 technologies.
    pub technology_matches: usize,
    /// Line items, largest coverage first.
    pub skill_contributions: Vec<SkillContribution>,
}

impl ScoreRecord {
    /// A record for a user with nothing in common with the query.
    pub fn empty(variant: ScoringVariant, max_coverage: f64, expertise_label: &str) -> Self {
        Self {
            variant,
            coverage_score: 0.0,
            max_coverage,
            coverage_percentage: 0.0,
            expertise_multiplier: 1.0,
            expertise_label: expertise_label.to_string(),
            raw_score: 0.0,
            normalized_score: None,
            display_score: 0.0,
            transfer_bonus: 0.0,
            matched_count: 0,
            technology_matches: 0,
            skill_contributions: Vec::new(),
        }
    }

    /// True when this user earned nothing and must not be ranked.
    pub fn is_zero(&self) -> bool {
        !(self.raw_score > 0.0)
    }

    /// The score buckets are drawn against for this formula.
    pub fn bucket_score(&self) -> f64 {
        match self.variant {
            ScoringVariant::CoverageExpertise => self.display_score,
            ScoringVariant::LevelWeighted => self.normalized_score.unwrap_or(0.0),
        }
    }
}

/// Sort line items by coverage (descending, stable) and attach their share.
pub(crate) fn finalize_contributions(
    contributions: &mut [SkillContribution],
    coverage_score: f64,
) {
    contributions.sort_by(|a, b| b.relevancy_weight.total_cmp(&a.relevancy_weight));
    for item in contributions.iter_mut() {
        item.coverage_percentage = ratio_percent(item.relevancy_weight, coverage_score);
    }
}

/// `part / whole * 100`, zero when `whole` is not positive.
pub(crate) fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
