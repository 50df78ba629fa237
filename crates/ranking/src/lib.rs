//! Scoring and ranking of people against a skill query.
//!
//! This crate provides:
//! - Typed skill hierarchy, user skill index and query match set
//! - Coverage x expertise scoring, with a legacy level-weighted variant
//! - Stable ranking with display-score rescaling
//! - Validated presentation buckets and per-user explanations
//!
//! Everything here is synchronous and side-effect free; loading data is
//! the caller's job.

pub mod bucket;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod match_set;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod score;
pub mod types;
pub mod user_index;

#[cfg(test)]
mod test_support;

pub use bucket::{default_bucket_specs, Bucket, BucketPlan, BucketSpec, Buckets};
pub use config::{
    default_expertise_bands, ExpertiseBand, LevelWeightedConfig, LevelWeights, RatingMultipliers,
    ScoringConfig, ScoringVariant, DEFAULT_DISPLAY_SCALE, DEFAULT_SIMILARITY_EXPONENT,
};
pub use error::ConfigError;
pub use hierarchy::{HierarchyIssue, SkillHierarchy};
pub use match_set::MatchSet;
pub use model::{MatchedSkill, SkillNode, UserIdentity, UserProfile, UserSkillAssignment};
pub use pipeline::{score_and_rank, RankingOptions, RankingOutcome, DEFAULT_TOP_N};
pub use rank::{RankedUser, RankingEngine};
pub use score::{
    explain, key_contributors, scorer_for, summarize_outcome, transfer_bonus,
    CoverageExpertiseScorer, LevelWeightedScorer, QueryBounds, ScoreRecord, Scorer,
    SkillContribution, KEY_CONTRIBUTOR_MIN, KEY_CONTRIBUTOR_SHARE,
};
pub use types::{MatchQuality, Rating, Similarity, SkillLevel};
pub use user_index::{IndexedSkill, UserSkillIndex};
