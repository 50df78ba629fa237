//! Per-user skill membership index.

use crate::hierarchy::SkillHierarchy;
use crate::model::{UserProfile, UserSkillAssignment};
use crate::types::{Rating, SkillLevel};
use std::collections::HashMap;

/// What the index keeps for one held skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSkill {
    /// Self-assessed proficiency.
    pub rating: Rating,
    /// Depth in the hierarchy.
    pub level: SkillLevel,
    /// Ancestors, root first.
    pub ancestor_ids: Vec<String>,
}

/// `skill_id -> {rating, level, ancestors}` for one user.
///
/// Built fresh for every scoring pass; nothing is cached across queries.
#[derive(Debug, Clone, Default)]
pub struct UserSkillIndex {
    skills: HashMap<String, IndexedSkill>,
}

impl UserSkillIndex {
    /// Index a user's assignments.
    ///
    /// If the same skill appears twice the higher rating is kept.
    pub fn from_assignments<'a>(
        assignments: impl IntoIterator<Item = &'a UserSkillAssignment>,
    ) -> Self {
        let mut skills: HashMap<String, IndexedSkill> = HashMap::new();
        for assignment in assignments {
            let entry = IndexedSkill {
                rating: assignment.rating,
                level: assignment.level,
                ancestor_ids: assignment.ancestor_ids.clone(),
            };
            match skills.get(&assignment.skill_id) {
                Some(existing) if existing.rating >= entry.rating => {}
                _ => {
                    skills.insert(assignment.skill_id.clone(), entry);
                }
            }
        }
        Self { skills }
    }

    /// Index a whole profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self::from_assignments(&profile.assignments)
    }

    /// Number of distinct skills held.
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// True when the user holds no skills.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Membership test.
    pub fn contains(&self, skill_id: &str) -> bool {
        self.skills.contains_key(skill_id)
    }

    /// Look up a held skill.
    pub fn get(&self, skill_id: &str) -> Option<&IndexedSkill> {
        self.skills.get(skill_id)
    }

    /// Rating for a held skill.
    pub fn rating_of(&self, skill_id: &str) -> Option<Rating> {
        self.skills.get(skill_id).map(|s| s.rating)
    }

    /// The level-3 skill this user files `skill_id` under.
    ///
    /// Uses the user's own ancestor chain first, then falls back to the
    /// hierarchy's chain for the skill.
    pub fn level3_ancestor<'a>(
        &'a self,
        skill_id: &str,
        hierarchy: &'a SkillHierarchy,
    ) -> Option<&'a str> {
        let held = self.skills.get(skill_id)?;
        hierarchy
            .level3_in_chain(&held.ancestor_ids)
            .or_else(|| hierarchy.level3_ancestor_of(skill_id))
    }
}
