//! Additive level-weighted scoring with a transfer bonus.
//!
//! Kept behind [`ScoringVariant::LevelWeighted`] for comparison against the
//! coverage x expertise formula.

use super::{
    finalize_contributions, ratio_percent, QueryBounds, ScoreRecord, Scorer, SkillContribution,
};
use crate::config::{ScoringConfig, ScoringVariant};
use crate::hierarchy::SkillHierarchy;
use crate::match_set::MatchSet;
use crate::types::SkillLevel;
use crate::user_index::UserSkillIndex;

/// Scorer for `sum(similarity * level_weight * rating_multiplier) + transfer_bonus`.
#[derive(Debug, Clone, Default)]
pub struct LevelWeightedScorer {
    config: ScoringConfig,
}

impl LevelWeightedScorer {
    /// Create a scorer with the given tuning.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score a perfect-similarity, top-rated user would earn.
    pub fn max_possible(&self, matches: &MatchSet) -> f64 {
        let legacy = &self.config.legacy;
        let top = legacy.rating_multipliers.max();
        matches
            .iter()
            .map(|m| legacy.level_weights.for_level(m.level) * top)
            .sum()
    }
}

/// Partial credit for technologies the user holds under a different
/// level-3 skill than one the query matched.
///
/// For every matched level-3 skill the user does not hold, each level-4
/// child of it that the user holds under another level-3 ancestor counts
/// once. The total is `count * per_tech`, capped at `cap`.
pub fn transfer_bonus(
    user: &UserSkillIndex,
    matches: &MatchSet,
    hierarchy: &SkillHierarchy,
    per_tech: f64,
    cap: f64,
) -> f64 {
    let mut transferable = 0usize;

    for matched in matches
        .iter()
        .filter(|m| m.level == SkillLevel::GenericSkill)
    {
        if user.contains(&matched.skill_id) {
            continue;
        }
        for tech in hierarchy.technologies_under(&matched.skill_id) {
            match user.level3_ancestor(tech, hierarchy) {
                Some(l3) if l3 != matched.skill_id => {
                    tracing::trace!(
                        target: "skillrank::score",
                        technology = tech,
                        matched_l3 = %matched.skill_id,
                        user_l3 = l3,
                        "Transferable technology"
                    );
                    transferable += 1;
                }
                _ => {}
            }
        }
    }

    (transferable as f64 * per_tech).min(cap)
}

impl Scorer for LevelWeightedScorer {
    fn variant(&self) -> ScoringVariant {
        ScoringVariant::LevelWeighted
    }

    fn prepare(&self, matches: &MatchSet) -> QueryBounds {
        let weights = &self.config.legacy.level_weights;
        QueryBounds {
            max_coverage: matches
                .iter()
                .map(|m| m.similarity.value() * weights.for_level(m.level))
                .sum(),
            max_possible: self.max_possible(matches),
        }
    }

    fn score_with(
        &self,
        user: &UserSkillIndex,
        matches: &MatchSet,
        hierarchy: &SkillHierarchy,
        bounds: &QueryBounds,
    ) -> ScoreRecord {
        let legacy = &self.config.legacy;
        let QueryBounds {
            max_coverage,
            max_possible,
        } = *bounds;

        let mut coverage_score = 0.0;
        let mut direct_score = 0.0;
        let mut technology_matches = 0;
        let mut contributions = Vec::new();

        for matched in matches {
            let Some(held) = user.get(&matched.skill_id) else {
                continue;
            };
            let weight = matched.similarity.value() * legacy.level_weights.for_level(matched.level);
            let multiplier = legacy.rating_multipliers.for_rating(held.rating);

            coverage_score += weight;
            direct_score += weight * multiplier;
            if matched.level == SkillLevel::Technology {
                technology_matches += 1;
            }

            contributions.push(SkillContribution {
                skill_id: matched.skill_id.clone(),
                title: matched.title.clone(),
                level: matched.level,
                similarity: matched.similarity.value(),
                relevancy_weight: weight,
                rating: held.rating,
                rating_multiplier: multiplier,
                expertise_contribution: weight * multiplier,
                coverage_percentage: 0.0,
            });
        }

        let bonus = transfer_bonus(
            user,
            matches,
            hierarchy,
            legacy.transfer_bonus_per_tech,
            legacy.transfer_bonus_cap,
        );
        let raw_score = direct_score + bonus;

        if raw_score <= 0.0 {
            let mut record = ScoreRecord::empty(
                ScoringVariant::LevelWeighted,
                max_coverage,
                self.config.expertise_label(1.0),
            );
            record.normalized_score = Some(0.0);
            return record;
        }

        let expertise_multiplier = if coverage_score > 0.0 {
            direct_score / coverage_score
        } else {
            1.0
        };
        let normalized = ratio_percent(raw_score, max_possible).min(100.0);
        finalize_contributions(&mut contributions, coverage_score);

        ScoreRecord {
            variant: ScoringVariant::LevelWeighted,
            coverage_score,
            max_coverage,
            coverage_percentage: ratio_percent(coverage_score, max_coverage).min(100.0),
            expertise_multiplier,
            expertise_label: self.config.expertise_label(expertise_multiplier).to_string(),
            raw_score,
            normalized_score: Some(normalized),
            display_score: 0.0,
            transfer_bonus: bonus,
            matched_count: contributions.len(),
            technology_matches,
            skill_contributions: contributions,
        }
    }
}
