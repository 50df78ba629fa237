//! Summary counts over a loaded dataset.

use crate::repository::UserRepository;
use serde::{Deserialize, Serialize};
use skillrank_ranking::{Rating, SkillHierarchy, SkillLevel};
use std::collections::BTreeMap;

/// Population and skill counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    /// Number of users.
    pub total_users: usize,
    /// Number of skill assignments across all users.
    pub total_assignments: usize,
    /// Assignments per hierarchy level (1-4, zeros included).
    pub assignments_by_level: BTreeMap<u8, usize>,
    /// Assignments per rating (1-3, zeros included).
    pub assignments_by_rating: BTreeMap<u8, usize>,
    /// Number of hierarchy nodes.
    pub hierarchy_nodes: usize,
}

impl DatasetStats {
    /// Count a repository against its hierarchy.
    pub fn collect(users: &dyn UserRepository, hierarchy: &SkillHierarchy) -> Self {
        let mut by_level: BTreeMap<u8, usize> =
            SkillLevel::ALL.iter().map(|l| (l.depth(), 0)).collect();
        let mut by_rating: BTreeMap<u8, usize> =
            Rating::ALL.iter().map(|r| (r.value(), 0)).collect();
        let mut total_assignments = 0;

        for user in users.all_users() {
            for assignment in &user.assignments {
                total_assignments += 1;
                *by_level.entry(assignment.level.depth()).or_default() += 1;
                *by_rating.entry(assignment.rating.value()).or_default() += 1;
            }
        }

        Self {
            total_users: users.len(),
            total_assignments,
            assignments_by_level: by_level,
            assignments_by_rating: by_rating,
            hierarchy_nodes: hierarchy.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use skillrank_ranking::{UserIdentity, UserProfile, UserSkillAssignment};

    fn held(id: &str, level: SkillLevel, rating: Rating) -> UserSkillAssignment {
        UserSkillAssignment {
            skill_id: id.to_string(),
            level,
            rating,
            ancestor_ids: Vec::new(),
        }
    }

    #[test]
    fn test_counts_by_level_and_rating() {
        let repo = InMemoryRepository::new(vec![
            UserProfile {
                identity: UserIdentity::new("a@x.io", None),
                assignments: vec![
                    held("rust", SkillLevel::GenericSkill, Rating::Advanced),
                    held("tokio", SkillLevel::Technology, Rating::Intermediate),
                ],
            },
            UserProfile {
                identity: UserIdentity::new("b@x.io", None),
                assignments: vec![held("rust", SkillLevel::GenericSkill, Rating::Beginner)],
            },
        ]);
        let stats = DatasetStats::collect(&repo, &SkillHierarchy::default());

        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_assignments, 3);
        assert_eq!(stats.assignments_by_level[&1], 0);
        assert_eq!(stats.assignments_by_level[&3], 2);
        assert_eq!(stats.assignments_by_level[&4], 1);
        assert_eq!(stats.assignments_by_rating[&1], 1);
        assert_eq!(stats.assignments_by_rating[&2], 1);
        assert_eq!(stats.assignments_by_rating[&3], 1);
        assert_eq!(stats.hierarchy_nodes, 0);
    }
}
