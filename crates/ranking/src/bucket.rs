//! Presentation tiers over the ranked tail.
//!
//! A [`BucketPlan`] is validated when it is built, so partitioning never
//! discovers a bad configuration mid-query. Ranges are half-open
//! `[min, max)` except the highest, which is closed on both ends.

use crate::config::DEFAULT_DISPLAY_SCALE;
use crate::error::ConfigError;
use crate::rank::RankedUser;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One named score range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSpec {
    /// Display name.
    pub name: String,
    /// Inclusive lower bound.
    pub min: f64,
    /// Upper bound (exclusive unless this is the top bucket).
    pub max: f64,
}

impl BucketSpec {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }
}

/// The default tiers over a 0-100 scale.
pub fn default_bucket_specs() -> Vec<BucketSpec> {
    vec![
        BucketSpec::new("Excellent Match", 80.0, 100.0),
        BucketSpec::new("Strong Match", 60.0, 80.0),
        BucketSpec::new("Good Match", 40.0, 60.0),
        BucketSpec::new("Other Matches", 0.0, 40.0),
    ]
}

/// Validated, gap-free, non-overlapping set of buckets spanning `[0, scale]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketPlan {
    specs: Vec<BucketSpec>,
    /// Index into `specs` of the highest range.
    top: usize,
    scale: f64,
}

impl Default for BucketPlan {
    fn default() -> Self {
        Self {
            specs: default_bucket_specs(),
            top: 0,
            scale: DEFAULT_DISPLAY_SCALE,
        }
    }
}

impl BucketPlan {
    /// Validate a list of `(name, min, max)` ranges against `[0, scale]`.
    ///
    /// The input order is kept for output; validation works on the ranges
    /// sorted from highest to lowest.
    pub fn new(specs: Vec<BucketSpec>, scale: f64) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::EmptyBucketPlan);
        }

        let mut names = HashSet::new();
        for spec in &specs {
            if !(spec.min.is_finite() && spec.max.is_finite()) || spec.min >= spec.max {
                return Err(ConfigError::InvalidBucketRange {
                    name: spec.name.clone(),
                    min: spec.min,
                    max: spec.max,
                });
            }
            if !names.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateBucketName(spec.name.clone()));
            }
        }

        let mut order: Vec<usize> = (0..specs.len()).collect();
        order.sort_by(|&a, &b| specs[b].min.total_cmp(&specs[a].min));

        for pair in order.windows(2) {
            let (higher, lower) = (&specs[pair[0]], &specs[pair[1]]);
            if lower.max > higher.min {
                return Err(ConfigError::BucketOverlap {
                    first: higher.name.clone(),
                    second: lower.name.clone(),
                });
            }
            if lower.max < higher.min {
                return Err(ConfigError::BucketGap {
                    from: lower.max,
                    to: higher.min,
                });
            }
        }

        let top = order[0];
        let bottom = order[order.len() - 1];
        if specs[bottom].min > 0.0 || specs[top].max < scale {
            return Err(ConfigError::BucketCoverage {
                min: specs[bottom].min,
                max: specs[top].max,
                scale,
            });
        }

        Ok(Self { specs, top, scale })
    }

    /// Ranges in configured order.
    pub fn specs(&self) -> &[BucketSpec] {
        &self.specs
    }

    /// Upper end of the score range this plan covers.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Index of the range containing `score`, if any.
    pub fn bucket_for(&self, score: f64) -> Option<usize> {
        self.specs.iter().enumerate().position(|(i, spec)| {
            if i == self.top {
                spec.min <= score && score <= spec.max
            } else {
                spec.min <= score && score < spec.max
            }
        })
    }

    /// Split ranked users into buckets, preserving rank order within each.
    ///
    /// Users whose score falls outside every range land in
    /// [`Buckets::unplaced`] rather than being dropped.
    pub fn partition(&self, users: &[RankedUser]) -> Buckets {
        let mut buckets: Vec<Bucket> = self
            .specs
            .iter()
            .map(|spec| Bucket {
                name: spec.name.clone(),
                min: spec.min,
                max: spec.max,
                users: Vec::new(),
            })
            .collect();
        let mut unplaced = Vec::new();

        for user in users {
            let score = user.record.bucket_score();
            match self.bucket_for(score) {
                Some(i) => buckets[i].users.push(user.clone()),
                None => {
                    tracing::warn!(
                        target: "skillrank::bucket",
                        user = %user.identity.id,
                        score,
                        "Score falls outside every bucket"
                    );
                    unplaced.push(user.clone());
                }
            }
        }

        Buckets { buckets, unplaced }
    }
}

/// Users sharing a score range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Display name.
    pub name: String,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Members in rank order.
    pub users: Vec<RankedUser>,
}

impl Bucket {
    /// Number of members.
    pub fn count(&self) -> usize {
        self.users.len()
    }

    /// One page of members (1-based `page`); empty past the end.
    pub fn page(&self, page: usize, per_page: usize) -> &[RankedUser] {
        if page == 0 || per_page == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(per_page);
        if start >= self.users.len() {
            return &[];
        }
        let end = start.saturating_add(per_page).min(self.users.len());
        &self.users[start..end]
    }

    /// Number of pages at `per_page` members each.
    pub fn page_count(&self, per_page: usize) -> usize {
        if per_page == 0 {
            0
        } else {
            self.users.len().div_ceil(per_page)
        }
    }
}

/// Result of [`BucketPlan::partition`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Buckets {
    /// One bucket per configured range, in configured order.
    pub buckets: Vec<Bucket>,
    /// Users no range claimed.
    pub unplaced: Vec<RankedUser>,
}
