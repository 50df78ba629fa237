//! The query's matched skills, as received from vector search.

use crate::model::MatchedSkill;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Immutable, id-deduplicated list of matched skills.
///
/// Order is whatever the collaborator produced; nothing here assumes it is
/// sorted by similarity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MatchedSkill>", into = "Vec<MatchedSkill>")]
pub struct MatchSet {
    skills: Vec<MatchedSkill>,
}

impl MatchSet {
    /// Build a match set, dropping repeated skill ids (first occurrence wins).
    pub fn new(skills: impl IntoIterator<Item = MatchedSkill>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for skill in skills {
            if seen.insert(skill.skill_id.clone()) {
                kept.push(skill);
            } else {
                tracing::debug!(
                    target: "skillrank::matches",
                    skill_id = %skill.skill_id,
                    "Dropping duplicate match"
                );
            }
        }
        Self { skills: kept }
    }

    /// Number of matched skills.
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// True when the query matched nothing.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Iterate in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, MatchedSkill> {
        self.skills.iter()
    }

    /// Matched skills as a slice.
    pub fn as_slice(&self) -> &[MatchedSkill] {
        &self.skills
    }

    /// Look up a match by skill id.
    pub fn get(&self, skill_id: &str) -> Option<&MatchedSkill> {
        self.skills.iter().find(|m| m.skill_id == skill_id)
    }

    /// Matches ordered by descending similarity (stable for ties).
    pub fn by_similarity(&self) -> Vec<&MatchedSkill> {
        let mut sorted: Vec<&MatchedSkill> = self.skills.iter().collect();
        sorted.sort_by(|a, b| b.similarity.value().total_cmp(&a.similarity.value()));
        sorted
    }

    /// Apply the search-side filters: a similarity floor and a result cap.
    ///
    /// Surviving matches keep their original relative order.
    pub fn filtered(&self, min_similarity: f64, top_k: Option<usize>) -> Self {
        let mut allowed: Vec<&MatchedSkill> = self
            .by_similarity()
            .into_iter()
            .filter(|m| m.similarity.value() >= min_similarity)
            .collect();
        if let Some(k) = top_k {
            allowed.truncate(k);
        }
        let keep: HashSet<&str> = allowed.iter().map(|m| m.skill_id.as_str()).collect();
        Self {
            skills: self
                .skills
                .iter()
                .filter(|m| keep.contains(m.skill_id.as_str()))
                .cloned()
                .collect(),
        }
    }
}

impl From<Vec<MatchedSkill>> for MatchSet {
    fn from(skills: Vec<MatchedSkill>) -> Self {
        Self::new(skills)
    }
}

impl From<MatchSet> for Vec<MatchedSkill> {
    fn from(set: MatchSet) -> Self {
        set.skills
    }
}

impl FromIterator<MatchedSkill> for MatchSet {
    fn from_iter<I: IntoIterator<Item = MatchedSkill>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a MatchedSkill;
    type IntoIter = std::slice::Iter<'a, MatchedSkill>;

    fn into_iter(self) -> Self::IntoIter {
        self.skills.iter()
    }
}
