//! Typed records consumed by the scoring core.
//!
//! These are the validated shapes; the loosely typed collaborator payloads
//! are adapted into them before scoring starts.

use crate::types::{Rating, Similarity, SkillLevel};
use serde::{Deserialize, Serialize};

/// One node of the four-level skill hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillNode {
    /// Unique skill id.
    pub id: String,
    /// Depth in the hierarchy.
    pub level: SkillLevel,
    /// Display title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Immediate parent, absent for level-1 nodes.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Ancestors ordered root first, ending with the immediate parent.
    #[serde(default)]
    pub ancestor_ids: Vec<String>,
}

/// One skill returned by the vector search for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSkill {
    /// Skill id.
    pub skill_id: String,
    /// Depth in the hierarchy.
    pub level: SkillLevel,
    /// Display title.
    pub title: String,
    /// Normalised similarity to the query.
    pub similarity: Similarity,
}

impl MatchedSkill {
    /// Convenience constructor.
    pub fn new(
        skill_id: impl Into<String>,
        level: SkillLevel,
        title: impl Into<String>,
        similarity: f64,
    ) -> Self {
        Self {
            skill_id: skill_id.into(),
            level,
            title: title.into(),
            similarity: Similarity::new(similarity),
        }
    }
}

/// A skill a user selected for themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSkillAssignment {
    /// Skill id.
    pub skill_id: String,
    /// Depth in the hierarchy.
    pub level: SkillLevel,
    /// Self-assessed proficiency.
    pub rating: Rating,
    /// Ancestors ordered root first (same ordering as [`SkillNode::ancestor_ids`]).
    #[serde(default)]
    pub ancestor_ids: Vec<String>,
}

/// Who a score belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Stable identifier (an email address in practice).
    pub id: String,
    /// Display name.
    pub name: String,
}

impl UserIdentity {
    /// Build an identity, deriving the name from the id's local part when absent.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        let id = id.into();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| id.split('@').next().unwrap_or(&id).to_string());
        Self { id, name }
    }
}

/// A user and their skill assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity.
    pub identity: UserIdentity,
    /// Selected skills.
    pub assignments: Vec<UserSkillAssignment>,
}
