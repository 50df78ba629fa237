//! Total ordering of scored users and display-score rescaling.

use crate::config::DEFAULT_DISPLAY_SCALE;
use crate::model::UserIdentity;
use crate::score::ScoreRecord;
use serde::{Deserialize, Serialize};

/// A user's place in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedUser {
    /// 1-based position.
    pub rank: usize,
    /// Who.
    pub identity: UserIdentity,
    /// Score decomposition, with `display_score` filled in.
    pub record: ScoreRecord,
}

impl RankedUser {
    /// Ordering key.
    pub fn raw_score(&self) -> f64 {
        self.record.raw_score
    }

    /// Score relative to the top-ranked user.
    pub fn display_score(&self) -> f64 {
        self.record.display_score
    }

    /// Split back into the input shape of [`RankingEngine::rank`].
    pub fn into_parts(self) -> (UserIdentity, ScoreRecord) {
        (self.identity, self.record)
    }
}

/// Sorts score records and rescales them against the leader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingEngine {
    display_scale: f64,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_SCALE)
    }
}

impl RankingEngine {
    /// Engine whose top-ranked user reads as `display_scale`.
    pub fn new(display_scale: f64) -> Self {
        Self { display_scale }
    }

    /// Display score given to the leader.
    pub fn display_scale(&self) -> f64 {
        self.display_scale
    }

    /// Rank by `raw_score` descending.
    ///
    /// Zero-score users are dropped. Ties keep their input order; no
    /// secondary key is applied. Ranking an already-ranked sequence again
    /// yields the same ranks and display scores.
    pub fn rank(
        &self,
        scored: impl IntoIterator<Item = (UserIdentity, ScoreRecord)>,
    ) -> Vec<RankedUser> {
        let mut kept: Vec<(UserIdentity, ScoreRecord)> = Vec::new();
        let mut dropped = 0usize;
        for (identity, record) in scored {
            if record.is_zero() {
                dropped += 1;
                continue;
            }
            kept.push((identity, record));
        }

        kept.sort_by(|a, b| b.1.raw_score.total_cmp(&a.1.raw_score));

        let top = kept.first().map(|(_, r)| r.raw_score).unwrap_or(0.0);
        let ranked: Vec<RankedUser> = kept
            .into_iter()
            .enumerate()
            .map(|(i, (identity, mut record))| {
                record.display_score = if top > 0.0 {
                    record.raw_score / top * self.display_scale
                } else {
                    0.0
                };
                RankedUser {
                    rank: i + 1,
                    identity,
                    record,
                }
            })
            .collect();

        tracing::debug!(
            target: "skillrank::rank",
            ranked = ranked.len(),
            dropped,
            top_raw_score = top,
            "Ranked users"
        );

        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringVariant;

    fn scored(id: &str, raw: f64) -> (UserIdentity, ScoreRecord) {
        let mut record = ScoreRecord::empty(ScoringVariant::CoverageExpertise, 1.0, "Beginner");
        record.raw_score = raw;
        (UserIdentity::new(id, None), record)
    }

    fn ids(ranked: &[RankedUser]) -> Vec<&str> {
        ranked.iter().map(|r| r.identity.id.as_str()).collect()
    }

    #[test]
    fn test_orders_descending_with_ranks() {
        let ranked = RankingEngine::default().rank(vec![
            scored("a", 1.0),
            scored("b", 4.0),
            scored("c", 2.0),
        ]);
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(ranked[0].display_score(), 100.0);
        assert!((ranked[1].display_score() - 50.0).abs() < 1e-9);
        assert!((ranked[2].display_score() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = RankingEngine::default().rank(vec![
            scored("z", 2.0),
            scored("a", 2.0),
            scored("m", 2.0),
        ]);
        assert_eq!(ids(&ranked), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_zero_scores_are_dropped() {
        let ranked = RankingEngine::default().rank(vec![
            scored("a", 0.0),
            scored("b", 1.0),
            scored("c", f64::NAN),
        ]);
        assert_eq!(ids(&ranked), vec!["b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(RankingEngine::default().rank(Vec::new()).is_empty());
    }

    #[test]
    fn test_rerank_is_idempotent() {
        let engine = RankingEngine::default();
        let first = engine.rank(vec![
            scored("a", 3.0),
            scored("b", 3.0),
            scored("c", 7.5),
        ]);
        let second = engine.rank(first.clone().into_iter().map(RankedUser::into_parts));
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_display_scale() {
        let ranked = RankingEngine::new(10.0).rank(vec![scored("a", 2.0), scored("b", 1.0)]);
        assert_eq!(ranked[0].display_score(), 10.0);
        assert!((ranked[1].display_score() - 5.0).abs() < 1e-9);
    }
}
