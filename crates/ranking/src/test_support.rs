//! Test builders for the ranking crate.

use crate::model::{MatchedSkill, SkillNode, UserIdentity, UserProfile, UserSkillAssignment};
use crate::types::{Rating, SkillLevel};

fn level(depth: u8) -> SkillLevel {
    SkillLevel::try_from(depth).unwrap()
}

/// Hierarchy node whose parent is the last ancestor.
pub(crate) fn node(id: &str, depth: u8, title: &str, ancestors: &[&str]) -> SkillNode {
    SkillNode {
        id: id.to_string(),
        level: level(depth),
        title: title.to_string(),
        description: String::new(),
        parent_id: ancestors.last().map(|s| s.to_string()),
        ancestor_ids: ancestors.iter().map(|s| s.to_string()).collect(),
    }
}

/// Vector-search match.
pub(crate) fn matched(id: &str, depth: u8, similarity: f64) -> MatchedSkill {
    MatchedSkill::new(id, level(depth), format!("Skill {id}"), similarity)
}

/// Skill assignment held by a user.
pub(crate) fn held(id: &str, depth: u8, rating: u8, ancestors: &[&str]) -> UserSkillAssignment {
    UserSkillAssignment {
        skill_id: id.to_string(),
        level: level(depth),
        rating: Rating::try_from(rating).unwrap(),
        ancestor_ids: ancestors.iter().map(|s| s.to_string()).collect(),
    }
}

/// User with the given assignments.
pub(crate) fn user(id: &str, assignments: Vec<UserSkillAssignment>) -> UserProfile {
    UserProfile {
        identity: UserIdentity::new(format!("{id}@example.com"), Some(id.to_string())),
        assignments,
    }
}
