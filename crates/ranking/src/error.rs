//! Configuration errors for the ranking core.
//!
//! Scoring itself never fails; only configuration can be rejected, and that
//! happens when the configuration is built, not mid-query.

use thiserror::Error;

/// Invalid scoring or bucketing configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Similarity exponent must be finite and positive.
    #[error("similarity exponent must be a positive finite number, got {0}")]
    InvalidExponent(f64),

    /// A rating multiplier is not a positive finite number.
    #[error("rating multiplier for {rating} must be a positive finite number, got {value}")]
    InvalidMultiplier {
        /// Rating label.
        rating: String,
        /// Offending value.
        value: f64,
    },

    /// No expertise bands were configured.
    #[error("at least one expertise band is required")]
    EmptyExpertiseBands,

    /// An expertise band has `min >= max`.
    #[error("expertise band '{label}' has an empty range [{min}, {max})")]
    InvalidExpertiseBand {
        /// Band label.
        label: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Coverage percentile outside (0, 1].
    #[error("coverage max percentile must be in (0, 1], got {0}")]
    InvalidPercentile(f64),

    /// Display scale must be finite and positive.
    #[error("display scale must be a positive finite number, got {0}")]
    InvalidDisplayScale(f64),

    /// A level weight is negative or not finite.
    #[error("level weight for L{level} must be a non-negative finite number, got {value}")]
    InvalidLevelWeight {
        /// Level depth.
        level: u8,
        /// Offending value.
        value: f64,
    },

    /// Transfer bonus settings are negative or not finite.
    #[error("transfer bonus per technology ({per_tech}) and cap ({cap}) must be non-negative")]
    InvalidTransferBonus {
        /// Bonus per transferable technology.
        per_tech: f64,
        /// Maximum bonus.
        cap: f64,
    },

    /// A bucket plan must name at least one bucket.
    #[error("bucket plan is empty")]
    EmptyBucketPlan,

    /// A bucket has a non-finite or inverted range.
    #[error("bucket '{name}' has an invalid range [{min}, {max}]")]
    InvalidBucketRange {
        /// Bucket name.
        name: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Two buckets share a name.
    #[error("bucket name '{0}' is used more than once")]
    DuplicateBucketName(String),

    /// Two bucket ranges overlap.
    #[error("buckets '{first}' and '{second}' overlap")]
    BucketOverlap {
        /// Higher bucket.
        first: String,
        /// Lower bucket.
        second: String,
    },

    /// Scores between two buckets would fall through.
    #[error("no bucket covers scores in [{from}, {to})")]
    BucketGap {
        /// Start of the uncovered range.
        from: f64,
        /// End of the uncovered range.
        to: f64,
    },

    /// The plan does not span the full score range.
    #[error("buckets span [{min}, {max}] but scores range over [0, {scale}]")]
    BucketCoverage {
        /// Lowest covered score.
        min: f64,
        /// Highest covered score.
        max: f64,
        /// Expected upper bound.
        scale: f64,
    },

    /// The bucket plan covers a different score range than the variant emits.
    #[error("bucket plan covers [0, {plan}] but {variant} scores range over [0, {expected}]")]
    BucketScaleMismatch {
        /// Scale the plan was built for.
        plan: f64,
        /// Scale the scoring variant produces.
        expected: f64,
        /// Active scoring variant.
        variant: String,
    },
}
