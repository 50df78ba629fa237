//! Validation and adaptation of raw records into ranking types.
//!
//! Every "missing field" decision is made here, once, so the ranking core
//! can assume well-formed input. Bad records are dropped and counted;
//! nothing in this module fails.

use crate::raw::{AncestorOrder, RawMatch, RawSkillNode, RawUserDb};
use serde::{Deserialize, Serialize};
use skillrank_ranking::{
    MatchSet, MatchedSkill, Rating, Similarity, SkillHierarchy, SkillLevel, SkillNode,
    UserIdentity, UserProfile, UserSkillAssignment,
};
use std::collections::HashSet;

/// What happened while adapting a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Users accepted.
    pub users: usize,
    /// Skill assignments accepted.
    pub assignments: usize,
    /// Hierarchy nodes accepted.
    pub skills: usize,
    /// Vector-search hits accepted.
    pub matches: usize,
    /// Records dropped, as (location, reason).
    pub skipped: Vec<(String, String)>,
    /// Structural problems in the hierarchy; lookups still work.
    pub hierarchy_issues: Vec<String>,
}

impl Diagnostics {
    /// Record a dropped record.
    pub fn skip(&mut self, location: impl Into<String>, reason: impl Into<String>) {
        let (location, reason) = (location.into(), reason.into());
        tracing::warn!(
            target: "skillrank::dataset",
            %location,
            %reason,
            "Skipping record"
        );
        self.skipped.push((location, reason));
    }

    /// True when nothing was dropped and the hierarchy is consistent.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.hierarchy_issues.is_empty()
    }

    /// Fold another pass's counts into this one.
    pub fn merge(&mut self, other: Diagnostics) {
        self.users += other.users;
        self.assignments += other.assignments;
        self.skills += other.skills;
        self.matches += other.matches;
        self.skipped.extend(other.skipped);
        self.hierarchy_issues.extend(other.hierarchy_issues);
    }
}

fn level_from(value: i64) -> Option<SkillLevel> {
    u8::try_from(value)
        .ok()
        .and_then(|v| SkillLevel::try_from(v).ok())
}

fn rating_from(value: i64) -> Option<Rating> {
    u8::try_from(value).ok().and_then(|v| Rating::try_from(v).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Flatten a skills master tree into nodes with root-first ancestors.
///
/// Nested children inherit `parent ancestors + parent id`; a missing
/// level is inferred from nesting depth. Already-flat nodes keep their
/// declared `parent_id`/`ancestor_ids`. Repeated ids keep the first.
pub fn flatten_skill_tree(roots: Vec<RawSkillNode>, diagnostics: &mut Diagnostics) -> Vec<SkillNode> {
    let mut flat = Vec::new();
    let mut seen = HashSet::new();
    for root in roots {
        let ancestors = root.ancestor_ids.clone();
        let parent = root.parent_id.clone().or_else(|| ancestors.last().cloned());
        flatten_node(root, parent, ancestors, &mut seen, &mut flat, diagnostics);
    }
    diagnostics.skills += flat.len();
    flat
}

fn flatten_node(
    node: RawSkillNode,
    parent_id: Option<String>,
    ancestor_ids: Vec<String>,
    seen: &mut HashSet<String>,
    out: &mut Vec<SkillNode>,
    diagnostics: &mut Diagnostics,
) {
    let Some(id) = non_empty(node.id) else {
        diagnostics.skip(
            format!("skill under {}", parent_id.as_deref().unwrap_or("<root>")),
            "missing id",
        );
        return;
    };

    let level = match node.level {
        Some(raw) => level_from(raw),
        None => i64::try_from(ancestor_ids.len() + 1).ok().and_then(level_from),
    };
    let Some(level) = level else {
        diagnostics.skip(format!("skill {id}"), "level outside 1-4");
        return;
    };

    if !seen.insert(id.clone()) {
        diagnostics.skip(format!("skill {id}"), "duplicate id");
        return;
    }

    let mut child_ancestors = ancestor_ids.clone();
    child_ancestors.push(id.clone());

    out.push(SkillNode {
        id: id.clone(),
        level,
        title: non_empty(node.title).unwrap_or_else(|| id.clone()),
        description: node.description.unwrap_or_default(),
        parent_id,
        ancestor_ids,
    });

    for child in node.children {
        flatten_node(
            child,
            Some(id.clone()),
            child_ancestors.clone(),
            seen,
            out,
            diagnostics,
        );
    }
}

/// Build the hierarchy and record its structural issues.
pub fn build_hierarchy(nodes: Vec<SkillNode>, diagnostics: &mut Diagnostics) -> SkillHierarchy {
    let hierarchy = SkillHierarchy::from_nodes(nodes);
    for issue in hierarchy.validate() {
        tracing::warn!(target: "skillrank::dataset", %issue, "Hierarchy issue");
        diagnostics.hierarchy_issues.push(issue.to_string());
    }
    hierarchy
}

/// Adapt a user database into profiles.
///
/// Users without an identity are dropped, as are repeated identities
/// (first wins). Assignments with a missing id, a level outside 1-4 or a
/// rating outside 1-3 are dropped. A missing level or ancestor list is
/// filled from the hierarchy when it knows the skill; a missing rating
/// counts as Beginner.
pub fn adapt_users(
    db: RawUserDb,
    hierarchy: &SkillHierarchy,
    diagnostics: &mut Diagnostics,
) -> Vec<UserProfile> {
    let default_order = db.ancestor_order;
    let mut seen = HashSet::new();
    let mut profiles = Vec::with_capacity(db.users.len());

    for (position, raw) in db.users.into_iter().enumerate() {
        let Some(email) = non_empty(raw.email) else {
            diagnostics.skip(format!("user #{position}"), "missing email");
            continue;
        };
        if !seen.insert(email.to_lowercase()) {
            diagnostics.skip(format!("user {email}"), "duplicate identity");
            continue;
        }

        let mut assignments = Vec::with_capacity(raw.skills.len());
        for (index, skill) in raw.skills.into_iter().enumerate() {
            let location = format!("user {email} skill #{index}");
            let Some(skill_id) = non_empty(skill.skill_id) else {
                diagnostics.skip(location, "missing skill id");
                continue;
            };

            let level = match skill.skill_level {
                Some(raw_level) => level_from(raw_level),
                None => hierarchy.level_of(&skill_id),
            };
            let Some(level) = level else {
                diagnostics.skip(location, format!("skill {skill_id} has no level in 1-4"));
                continue;
            };

            let rating = match skill.rating {
                Some(raw_rating) => rating_from(raw_rating),
                None => Some(Rating::Beginner),
            };
            let Some(rating) = rating else {
                diagnostics.skip(location, format!("skill {skill_id} rating outside 1-3"));
                continue;
            };

            let order = skill.ancestor_order.unwrap_or(default_order);
            let mut ancestor_ids = order.to_root_first(skill.ancestor_ids);
            if ancestor_ids.is_empty() {
                if let Some(chain) = hierarchy.ancestors_of(&skill_id) {
                    ancestor_ids = chain.to_vec();
                }
            }

            assignments.push(UserSkillAssignment {
                skill_id,
                level,
                rating,
                ancestor_ids,
            });
        }

        diagnostics.assignments += assignments.len();
        profiles.push(UserProfile {
            identity: UserIdentity::new(email, non_empty(raw.name)),
            assignments,
        });
    }

    diagnostics.users += profiles.len();
    tracing::debug!(
        target: "skillrank::dataset",
        users = profiles.len(),
        assignments = diagnostics.assignments,
        "Adapted user records"
    );
    profiles
}

/// Adapt vector-search hits into a match set.
///
/// Similarity comes from `similarity`, else `1 - distance`; hits with
/// neither are dropped. Level and title fall back to the hit's metadata
/// and then the hierarchy.
pub fn adapt_matches(
    hits: Vec<RawMatch>,
    hierarchy: &SkillHierarchy,
    diagnostics: &mut Diagnostics,
) -> MatchSet {
    let mut kept = Vec::with_capacity(hits.len());

    for (position, hit) in hits.into_iter().enumerate() {
        let Some(skill_id) = non_empty(hit.skill_id) else {
            diagnostics.skip(format!("match #{position}"), "missing skill id");
            continue;
        };
        let location = format!("match {skill_id}");

        let similarity = match (hit.similarity, hit.distance) {
            (Some(s), _) if s.is_finite() => Similarity::new(s),
            (_, Some(d)) if d.is_finite() => Similarity::from_distance(d),
            _ => {
                diagnostics.skip(location, "no similarity or distance");
                continue;
            }
        };

        let metadata = hit.metadata.unwrap_or_default();
        let level = hit
            .level
            .or(metadata.level)
            .and_then(level_from)
            .or_else(|| hierarchy.level_of(&skill_id));
        let Some(level) = level else {
            diagnostics.skip(location, "level outside 1-4");
            continue;
        };

        let title = non_empty(hit.title)
            .or_else(|| non_empty(metadata.title))
            .unwrap_or_else(|| hierarchy.display_title(&skill_id).to_string());

        kept.push(MatchedSkill {
            skill_id,
            level,
            title,
            similarity,
        });
    }

    let matches = MatchSet::new(kept);
    diagnostics.matches += matches.len();
    matches
}
