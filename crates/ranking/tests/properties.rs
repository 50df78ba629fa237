//! Property tests for scoring and ranking invariants.

use proptest::prelude::*;
use skillrank_ranking::{
    score_and_rank, CoverageExpertiseScorer, MatchSet, MatchedSkill, RankedUser, RankingEngine,
    RankingOptions, Rating, Scorer, SkillHierarchy, SkillLevel, UserIdentity, UserProfile,
    UserSkillAssignment, UserSkillIndex,
};

fn rating_from(value: u8) -> Rating {
    match value % 3 {
        0 => Rating::Beginner,
        1 => Rating::Intermediate,
        _ => Rating::Advanced,
    }
}

fn build_matches(similarities: &[f64]) -> MatchSet {
    MatchSet::new(similarities.iter().enumerate().map(|(i, s)| {
        MatchedSkill::new(
            format!("S{i}"),
            SkillLevel::GenericSkill,
            format!("Skill {i}"),
            *s,
        )
    }))
}

/// Each user row holds skill `S{i}` when its `i`-th entry is `Some(rating)`.
fn build_users(rows: &[Vec<Option<u8>>]) -> Vec<UserProfile> {
    rows.iter()
        .enumerate()
        .map(|(u, row)| UserProfile {
            identity: UserIdentity::new(format!("u{u}@example.com"), None),
            assignments: row
                .iter()
                .enumerate()
                .filter_map(|(i, held)| {
                    held.map(|r| UserSkillAssignment {
                        skill_id: format!("S{i}"),
                        level: SkillLevel::GenericSkill,
                        rating: rating_from(r),
                        ancestor_ids: Vec::new(),
                    })
                })
                .collect(),
        })
        .collect()
}

fn population() -> impl Strategy<Value = (Vec<f64>, Vec<Vec<Option<u8>>>)> {
    prop::collection::vec(0.0f64..=1.0, 1..8).prop_flat_map(|sims| {
        let n = sims.len();
        let rows = prop::collection::vec(
            prop::collection::vec(prop::option::of(0u8..3), n),
            0..12,
        );
        (Just(sims), rows)
    })
}

fn ranked_for(sims: &[f64], rows: &[Vec<Option<u8>>]) -> (Vec<UserProfile>, Vec<RankedUser>) {
    let users = build_users(rows);
    let outcome = score_and_rank(
        &build_matches(sims),
        &users,
        &SkillHierarchy::default(),
        &RankingOptions::default(),
    );
    (users, outcome.ranked)
}

proptest! {
    /// Property: users with zero coverage never appear in the ranking.
    #[test]
    fn zero_coverage_users_are_not_ranked((sims, rows) in population()) {
        let matches = build_matches(&sims);
        let (users, ranked) = ranked_for(&sims, &rows);
        let scorer = CoverageExpertiseScorer::default();

        for user in &users {
            let record = scorer.score(
                &UserSkillIndex::from_profile(user),
                &matches,
                &SkillHierarchy::default(),
            );
            if record.coverage_score == 0.0 {
                prop_assert_eq!(record.raw_score, 0.0);
                prop_assert!(ranked.iter().all(|r| r.identity != user.identity));
            }
        }
        prop_assert!(ranked.iter().all(|r| r.record.raw_score > 0.0));
    }

    /// Property: raw scores are non-increasing and ranks are 1-based positions.
    #[test]
    fn ranking_is_ordered_with_positional_ranks((sims, rows) in population()) {
        let (_, ranked) = ranked_for(&sims, &rows);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].record.raw_score >= pair[1].record.raw_score);
        }
        for (i, user) in ranked.iter().enumerate() {
            prop_assert_eq!(user.rank, i + 1);
        }
    }

    /// Property: the leader always displays as 100.
    #[test]
    fn leader_displays_as_full_scale((sims, rows) in population()) {
        let (_, ranked) = ranked_for(&sims, &rows);
        if let Some(first) = ranked.first() {
            prop_assert!((first.record.display_score - 100.0).abs() < 1e-9);
        }
        for user in &ranked {
            prop_assert!(user.record.display_score <= 100.0 + 1e-9);
        }
    }

    /// Property: coverage percentage stays within [0, 100].
    #[test]
    fn coverage_percentage_is_bounded((sims, rows) in population()) {
        let (_, ranked) = ranked_for(&sims, &rows);
        for user in &ranked {
            let pct = user.record.coverage_percentage;
            prop_assert!((0.0..=100.0).contains(&pct), "coverage {} out of range", pct);
        }
    }

    /// Property: ranking an already-ranked sequence changes nothing.
    #[test]
    fn reranking_is_idempotent((sims, rows) in population()) {
        let (_, ranked) = ranked_for(&sims, &rows);
        let again = RankingEngine::default()
            .rank(ranked.clone().into_iter().map(RankedUser::into_parts));
        prop_assert_eq!(ranked, again);
    }

    /// Property: raising the similarity of a held skill never lowers the raw score.
    #[test]
    fn raising_held_similarity_never_lowers_score(
        (sims, rows) in population(),
        bump in 0.0f64..=1.0,
        pick in any::<prop::sample::Index>(),
    ) {
        let users = build_users(&rows);
        let scorer = CoverageExpertiseScorer::default();
        let hierarchy = SkillHierarchy::default();

        for user in &users {
            if user.assignments.is_empty() {
                continue;
            }
            let held = &user.assignments[pick.index(user.assignments.len())];
            let k: usize = held.skill_id[1..].parse().unwrap();

            let mut raised = sims.clone();
            raised[k] = (raised[k] + bump).min(1.0);

            let index = UserSkillIndex::from_profile(user);
            let before = scorer.score(&index, &build_matches(&sims), &hierarchy);
            let after = scorer.score(&index, &build_matches(&raised), &hierarchy);
            prop_assert!(
                after.raw_score + 1e-9 >= before.raw_score,
                "raw score fell from {} to {}",
                before.raw_score,
                after.raw_score
            );
        }
    }
}
