//! Coverage x expertise scoring.
//!
//! Coverage is how much of the query's similarity-weighted mass a user
//! holds; expertise is the weighted-average rating multiplier over those
//! same skills. The raw score is their product, so a user needs both
//! breadth and depth to score well.

use super::{
    finalize_contributions, ratio_percent, QueryBounds, ScoreRecord, Scorer, SkillContribution,
};
use crate::config::{ScoringConfig, ScoringVariant};
use crate::hierarchy::SkillHierarchy;
use crate::match_set::MatchSet;
use crate::types::SkillLevel;
use crate::user_index::UserSkillIndex;

/// Scorer for the canonical coverage x expertise formula.
#[derive(Debug, Clone, Default)]
pub struct CoverageExpertiseScorer {
    config: ScoringConfig,
}

impl CoverageExpertiseScorer {
    /// Create a scorer with the given tuning.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Tuning in effect.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Maximum coverage any user could reach for this query.
    ///
    /// Sums relevancy weights over the top `ceil(p * n)` matches by
    /// similarity, where `p` is the configured percentile (1.0 = all).
    pub fn max_coverage(&self, matches: &MatchSet) -> f64 {
        if matches.is_empty() {
            return 0.0;
        }
        let exponent = self.config.similarity_exponent;
        let percentile = self.config.coverage_max_percentile.clamp(0.0, 1.0);
        let take = ((matches.len() as f64 * percentile).ceil() as usize).clamp(1, matches.len());
        matches
            .by_similarity()
            .into_iter()
            .take(take)
            .map(|m| m.similarity.relevancy_weight(exponent))
            .sum()
    }
}

impl Scorer for CoverageExpertiseScorer {
    fn variant(&self) -> ScoringVariant {
        ScoringVariant::CoverageExpertise
    }

    fn prepare(&self, matches: &MatchSet) -> QueryBounds {
        let max_coverage = self.max_coverage(matches);
        QueryBounds {
            max_coverage,
            max_possible: max_coverage * self.config.rating_multipliers.max(),
        }
    }

    fn score_with(
        &self,
        user: &UserSkillIndex,
        matches: &MatchSet,
        _hierarchy: &SkillHierarchy,
        bounds: &QueryBounds,
    ) -> ScoreRecord {
        let exponent = self.config.similarity_exponent;
        let max_coverage = bounds.max_coverage;

        let mut coverage_score = 0.0;
        let mut expertise_weighted_sum = 0.0;
        let mut technology_matches = 0;
        let mut contributions = Vec::new();

        for matched in matches {
            let Some(held) = user.get(&matched.skill_id) else {
                continue;
            };
            let weight = matched.similarity.relevancy_weight(exponent);
            if !(weight > 0.0) {
                continue;
            }
            let multiplier = self.config.rating_multipliers.for_rating(held.rating);

            coverage_score += weight;
            expertise_weighted_sum += weight * multiplier;
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

        if contributions.is_empty() {
            return ScoreRecord::empty(
                ScoringVariant::CoverageExpertise,
                max_coverage,
                self.config.expertise_label(1.0),
            );
        }

        let expertise_multiplier = if coverage_score > 0.0 {
            expertise_weighted_sum / coverage_score
        } else {
            1.0
        };
        let raw_score = coverage_score * expertise_multiplier;
        finalize_contributions(&mut contributions, coverage_score);

        ScoreRecord {
            variant: ScoringVariant::CoverageExpertise,
            coverage_score,
            max_coverage,
            coverage_percentage: ratio_percent(coverage_score, max_coverage).min(100.0),
            expertise_multiplier,
            expertise_label: self.config.expertise_label(expertise_multiplier).to_string(),
            raw_score,
            normalized_score: None,
            display_score: 0.0,
            transfer_bonus: 0.0,
            matched_count: contributions.len(),
            technology_matches,
            skill_contributions: contributions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{held, matched, user};
    use crate::types::Rating;

    const EPS: f64 = 1e-9;

    fn score(user_skills: Vec<crate::model::UserSkillAssignment>, matches: &MatchSet) -> ScoreRecord {
        let scorer = CoverageExpertiseScorer::default();
        let index = UserSkillIndex::from_profile(&user("u", user_skills));
        scorer.score(&index, matches, &SkillHierarchy::default())
    }

    #[test]
    fn test_single_advanced_match() {
        let matches = MatchSet::new(vec![matched("S1", 3, 0.9)]);
        let record = score(vec![held("S1", 3, 3, &[])], &matches);

        assert!((record.coverage_score - 0.81).abs() < EPS);
        assert!((record.max_coverage - 0.81).abs() < EPS);
        assert!((record.coverage_percentage - 100.0).abs() < EPS);
        assert!((record.expertise_multiplier - 6.0).abs() < EPS);
        assert!((record.raw_score - 4.86).abs() < EPS);
        assert_eq!(record.expertise_label, "Expert");
        assert_eq!(record.matched_count, 1);
        assert_eq!(record.skill_contributions[0].rating, Rating::Advanced);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let matches = MatchSet::new(vec![matched("S1", 3, 0.9)]);
        let record = score(vec![held("S9", 3, 3, &[])], &matches);
        assert!(record.is_zero());
        assert_eq!(record.coverage_score, 0.0);
        assert_eq!(record.coverage_percentage, 0.0);
        assert_eq!(record.expertise_multiplier, 1.0);
        assert_eq!(record.expertise_label, "Beginner");
        assert!(record.skill_contributions.is_empty());
    }

    #[test]
    fn test_empty_matches_and_empty_user() {
        let record = score(vec![held("S1", 3, 3, &[])], &MatchSet::default());
        assert!(record.is_zero());
        assert_eq!(record.max_coverage, 0.0);

        let matches = MatchSet::new(vec![matched("S1", 3, 0.9)]);
        let record = score(vec![], &matches);
        assert!(record.is_zero());
    }

    #[test]
    fn test_expertise_dominates_coverage() {
        let matches = MatchSet::new(vec![matched("S1", 3, 0.8), matched("S2", 3, 0.5)]);
        let u1 = score(vec![held("S1", 3, 1, &[])], &matches);
        let u2 = score(vec![held("S2", 3, 3, &[])], &matches);

        assert!((u1.max_coverage - 0.89).abs() < EPS);
        assert!((u1.coverage_score - 0.64).abs() < EPS);
        assert!((u1.coverage_percentage - 71.910_112_359_550_56).abs() < 1e-6);
        assert!((u1.raw_score - 0.64).abs() < EPS);
        assert!((u2.coverage_score - 0.25).abs() < EPS);
        assert!((u2.coverage_percentage - 28.089_887_640_449_44).abs() < 1e-6);
        assert!((u2.raw_score - 1.5).abs() < EPS);
        assert!(u2.raw_score > u1.raw_score);
    }

    #[test]
    fn test_weighted_average_expertise() {
        let matches = MatchSet::new(vec![matched("A", 3, 1.0), matched("B", 4, 0.5)]);
        // weights 1.0 (rating 2 -> 3x) and 0.25 (rating 1 -> 1x)
        let record = score(vec![held("A", 3, 2, &[]), held("B", 4, 1, &[])], &matches);
        let expected = (1.0 * 3.0 + 0.25 * 1.0) / 1.25;
        assert!((record.expertise_multiplier - expected).abs() < EPS);
        assert_eq!(record.expertise_label, "Intermediate");
        assert!((record.raw_score - 3.25).abs() < EPS);
        assert_eq!(record.technology_matches, 1);
    }

    #[test]
    fn test_contributions_sorted_with_shares() {
        let matches = MatchSet::new(vec![
            matched("low", 3, 0.5),
            matched("high", 3, 0.9),
            matched("mid", 4, 0.7),
        ]);
        let record = score(
            vec![held("low", 3, 1, &[]), held("high", 3, 2, &[]), held("mid", 4, 3, &[])],
            &matches,
        );
        let ids: Vec<&str> = record
            .skill_contributions
            .iter()
            .map(|c| c.skill_id.as_str())
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
        let total: f64 = record
            .skill_contributions
            .iter()
            .map(|c| c.coverage_percentage)
            .sum();
        assert!((total - 100.0).abs() < 1e-6);
        let mid = &record.skill_contributions[1];
        assert!((mid.expertise_contribution - 0.49 * 6.0).abs() < EPS);
    }

    #[test]
    fn test_exponent_is_configurable() {
        let config = ScoringConfig {
            similarity_exponent: 1.0,
            ..Default::default()
        };
        let scorer = CoverageExpertiseScorer::new(config);
        let matches = MatchSet::new(vec![matched("S1", 3, 0.9)]);
        let index = UserSkillIndex::from_profile(&user("u", vec![held("S1", 3, 1, &[])]));
        let record = scorer.score(&index, &matches, &SkillHierarchy::default());
        assert!((record.coverage_score - 0.9).abs() < EPS);
    }

    #[test]
    fn test_max_coverage_percentile() {
        let config = ScoringConfig {
            coverage_max_percentile: 0.5,
            ..Default::default()
        };
        let scorer = CoverageExpertiseScorer::new(config);
        let matches = MatchSet::new(vec![
            matched("a", 3, 0.5),
            matched("b", 3, 1.0),
            matched("c", 3, 0.1),
        ]);
        // ceil(0.5 * 3) = 2 best matches: 1.0 and 0.25
        assert!((scorer.max_coverage(&matches) - 1.25).abs() < EPS);

        let index = UserSkillIndex::from_profile(&user(
            "u",
            vec![held("a", 3, 1, &[]), held("b", 3, 1, &[]), held("c", 3, 1, &[])],
        ));
        let record = scorer.score(&index, &matches, &SkillHierarchy::default());
        assert_eq!(record.coverage_percentage, 100.0);
    }

    #[test]
    fn test_prepared_bounds_match_per_user_scoring() {
        let scorer = CoverageExpertiseScorer::default();
        let matches = MatchSet::new(vec![matched("a", 3, 0.8), matched("b", 4, 0.5)]);
        let bounds = scorer.prepare(&matches);
        assert!((bounds.max_coverage - 0.89).abs() < EPS);
        assert!((bounds.max_possible - 0.89 * 6.0).abs() < EPS);

        let index = UserSkillIndex::from_profile(&user("u", vec![held("a", 3, 2, &[])]));
        let hierarchy = SkillHierarchy::default();
        assert_eq!(
            scorer.score_with(&index, &matches, &hierarchy, &bounds),
            scorer.score(&index, &matches, &hierarchy)
        );
    }

    #[test]
    fn test_zero_similarity_match_contributes_nothing() {
        let matches = MatchSet::new(vec![matched("S1", 3, 0.0)]);
        let record = score(vec![held("S1", 3, 3, &[])], &matches);
        assert!(record.is_zero());
        assert_eq!(record.matched_count, 0);
    }
}
