//! One query, end to end: score every user, rank, bucket the tail.

use crate::bucket::{Bucket, BucketPlan};
use crate::config::ScoringConfig;
use crate::error::ConfigError;
use crate::hierarchy::SkillHierarchy;
use crate::match_set::MatchSet;
use crate::model::UserProfile;
use crate::rank::{RankedUser, RankingEngine};
use crate::score::{scorer_for, summarize_outcome};
use crate::user_index::UserSkillIndex;
use serde::{Deserialize, Serialize};

/// Number of users shown individually before bucketing starts.
pub const DEFAULT_TOP_N: usize = 5;

/// Everything a ranking pass needs besides its data.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingOptions {
    scoring: ScoringConfig,
    buckets: BucketPlan,
    top_n: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            buckets: BucketPlan::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl RankingOptions {
    /// Validate and bundle the options.
    ///
    /// The bucket plan must span the score range of the selected variant.
    pub fn new(
        scoring: ScoringConfig,
        buckets: BucketPlan,
        top_n: usize,
    ) -> Result<Self, ConfigError> {
        scoring.validate()?;
        let expected = scoring.bucket_scale();
        if (buckets.scale() - expected).abs() > 1e-9 {
            return Err(ConfigError::BucketScaleMismatch {
                plan: buckets.scale(),
                expected,
                variant: scoring.variant.to_string(),
            });
        }
        Ok(Self {
            scoring,
            buckets,
            top_n,
        })
    }

    /// Scoring parameters.
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Bucket ranges for the ranked tail.
    pub fn buckets(&self) -> &BucketPlan {
        &self.buckets
    }

    /// Users shown before bucketing.
    pub fn top_n(&self) -> usize {
        self.top_n
    }
}

/// Ranked users plus the bucketed tail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    /// Every user with a non-zero score, best first.
    pub ranked: Vec<RankedUser>,
    /// How many of `ranked` are shown individually.
    pub top_n: usize,
    /// Buckets over `ranked[top_n..]`; empty when nothing ranked.
    pub buckets: Vec<Bucket>,
    /// Tail users outside every bucket range.
    pub unplaced: Vec<RankedUser>,
}

impl RankingOutcome {
    /// True when no user scored.
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// The individually shown leaders.
    pub fn top(&self) -> &[RankedUser] {
        &self.ranked[..self.top_n.min(self.ranked.len())]
    }

    /// Users after the leaders.
    pub fn tail(&self) -> &[RankedUser] {
        &self.ranked[self.top_n.min(self.ranked.len())..]
    }

    /// Look up a bucket by name.
    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.name == name)
    }
}

/// Score, rank and bucket a user population against one query.
///
/// Pure: inputs are only read, and every call builds its own per-user
/// indices, so concurrent calls over the same data need no locking.
pub fn score_and_rank<'a>(
    matches: &MatchSet,
    users: impl IntoIterator<Item = &'a UserProfile>,
    hierarchy: &SkillHierarchy,
    options: &RankingOptions,
) -> RankingOutcome {
    if matches.is_empty() {
        tracing::debug!(target: "skillrank::rank", "Empty match set; nothing to rank");
        return RankingOutcome {
            top_n: options.top_n,
            ..Default::default()
        };
    }

    let scorer = scorer_for(&options.scoring);
    let bounds = scorer.prepare(matches);
    let mut candidates = 0usize;
    let scored: Vec<_> = users
        .into_iter()
        .map(|profile| {
            candidates += 1;
            let index = UserSkillIndex::from_profile(profile);
            let record = scorer.score_with(&index, matches, hierarchy, &bounds);
            tracing::trace!(
                target: "skillrank::score",
                user = %profile.identity.id,
                raw_score = record.raw_score,
                coverage = record.coverage_score,
                expertise = record.expertise_multiplier,
                "Scored user"
            );
            (profile.identity.clone(), record)
        })
        .collect();

    let ranked = RankingEngine::new(options.scoring.display_scale).rank(scored);

    tracing::info!(
        target: "skillrank::rank",
        variant = %scorer.variant(),
        "{}",
        summarize_outcome(ranked.len(), matches.len(), candidates)
    );

    if ranked.is_empty() {
        return RankingOutcome {
            top_n: options.top_n,
            ..Default::default()
        };
    }

    let tail_start = options.top_n.min(ranked.len());
    let partitioned = options.buckets.partition(&ranked[tail_start..]);

    RankingOutcome {
        ranked,
        top_n: options.top_n,
        buckets: partitioned.buckets,
        unplaced: partitioned.unplaced,
    }
}
