//! Flattened view of the four-level skill tree.

use crate::model::SkillNode;
use crate::types::SkillLevel;
use std::collections::HashMap;
use std::fmt;

/// O(1) lookups over a flattened skill forest.
///
/// Missing ids never raise: every accessor returns `None` (or an empty
/// slice) so callers can treat unknown references as "no extra context".
#[derive(Debug, Clone, Default)]
pub struct SkillHierarchy {
    nodes: HashMap<String, SkillNode>,
    children: HashMap<String, Vec<String>>,
}

/// Structural problems found by [`SkillHierarchy::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyIssue {
    /// `ancestor_ids.len()` does not equal `level - 1`.
    DepthMismatch {
        /// Offending node.
        id: String,
        /// Declared level.
        level: u8,
        /// Number of ancestors present.
        ancestors: usize,
    },
    /// An ancestor id does not resolve to any node.
    UnknownAncestor {
        /// Offending node.
        id: String,
        /// The unresolved ancestor.
        ancestor: String,
    },
    /// An ancestor is not strictly shallower than its position requires.
    AncestorLevel {
        /// Offending node.
        id: String,
        /// The misplaced ancestor.
        ancestor: String,
    },
    /// `parent_id` disagrees with the last entry of `ancestor_ids`.
    ParentMismatch {
        /// Offending node.
        id: String,
    },
}

impl fmt::Display for HierarchyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyIssue::DepthMismatch {
                id,
                level,
                ancestors,
            } => write!(
                f,
                "skill '{id}' is level {level} but has {ancestors} ancestors"
            ),
            HierarchyIssue::UnknownAncestor { id, ancestor } => {
                write!(f, "skill '{id}' references unknown ancestor '{ancestor}'")
            }
            HierarchyIssue::AncestorLevel { id, ancestor } => {
                write!(f, "skill '{id}' has ancestor '{ancestor}' at the wrong level")
            }
            HierarchyIssue::ParentMismatch { id } => {
                write!(f, "skill '{id}' parent_id does not match its ancestor chain")
            }
        }
    }
}

impl SkillHierarchy {
    /// Build the lookup tables from a flattened node list.
    ///
    /// The first node seen for an id wins; later duplicates are ignored.
    pub fn from_nodes(nodes: impl IntoIterator<Item = SkillNode>) -> Self {
        let mut hierarchy = Self::default();
        let mut order: Vec<String> = Vec::new();

        for node in nodes {
            if hierarchy.nodes.contains_key(&node.id) {
                tracing::warn!(
                    target: "skillrank::hierarchy",
                    id = %node.id,
                    "Duplicate skill id in hierarchy; keeping the first"
                );
                continue;
            }
            order.push(node.id.clone());
            hierarchy.nodes.insert(node.id.clone(), node);
        }

        for id in order {
            let parent = hierarchy
                .nodes
                .get(&id)
                .and_then(|n| n.parent_id.clone().or_else(|| n.ancestor_ids.last().cloned()));
            if let Some(parent) = parent {
                hierarchy.children.entry(parent).or_default().push(id);
            }
        }

        hierarchy
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the hierarchy has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.values()
    }

    /// Look up a node.
    pub fn get(&self, id: &str) -> Option<&SkillNode> {
        self.nodes.get(id)
    }

    /// Level of a node, if known.
    pub fn level_of(&self, id: &str) -> Option<SkillLevel> {
        self.nodes.get(id).map(|n| n.level)
    }

    /// Title of a node, falling back to the raw id.
    pub fn display_title<'a>(&'a self, id: &'a str) -> &'a str {
        self.nodes.get(id).map(|n| n.title.as_str()).unwrap_or(id)
    }

    /// Ancestor chain (root first) of a known node.
    pub fn ancestors_of(&self, id: &str) -> Option<&[String]> {
        self.nodes.get(id).map(|n| n.ancestor_ids.as_slice())
    }

    /// First ancestor of `id` that sits at level 3.
    pub fn level3_ancestor_of(&self, id: &str) -> Option<&str> {
        self.ancestors_of(id)
            .and_then(|chain| self.level3_in_chain(chain))
    }

    /// First id in an arbitrary chain whose hierarchy level is 3.
    ///
    /// Ids the hierarchy does not know are skipped.
    pub fn level3_in_chain<'a>(&self, chain: &'a [String]) -> Option<&'a str> {
        chain
            .iter()
            .find(|ancestor| self.level_of(ancestor) == Some(SkillLevel::GenericSkill))
            .map(String::as_str)
    }

    /// Direct children of a node, in input order.
    pub fn children_of(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Level-4 technologies directly under a node.
    pub fn technologies_under<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.children_of(id)
            .iter()
            .filter(move |child| self.level_of(child) == Some(SkillLevel::Technology))
            .map(String::as_str)
    }

    /// Titles for an ancestor chain, falling back to raw ids for unknown entries.
    pub fn titles_for(&self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .map(|id| self.display_title(id).to_string())
            .collect()
    }

    /// Check structural invariants without failing.
    ///
    /// Issues are reported for diagnostics; lookups keep working regardless.
    pub fn validate(&self) -> Vec<HierarchyIssue> {
        let mut issues = Vec::new();
        let mut ids: Vec<&String> = self.nodes.keys().collect();
        ids.sort();

        for id in ids {
            let node = &self.nodes[id];
            let expected = usize::from(node.level.depth()) - 1;
            if node.ancestor_ids.len() != expected {
                issues.push(HierarchyIssue::DepthMismatch {
                    id: id.clone(),
                    level: node.level.depth(),
                    ancestors: node.ancestor_ids.len(),
                });
            }

            for (position, ancestor) in node.ancestor_ids.iter().enumerate() {
                match self.nodes.get(ancestor) {
                    None => issues.push(HierarchyIssue::UnknownAncestor {
                        id: id.clone(),
                        ancestor: ancestor.clone(),
                    }),
                    Some(a) => {
                        let expected_depth = position + 1;
                        if a.level >= node.level || usize::from(a.level.depth()) != expected_depth
                        {
                            issues.push(HierarchyIssue::AncestorLevel {
                                id: id.clone(),
                                ancestor: ancestor.clone(),
                            });
                        }
                    }
                }
            }

            if node.parent_id.as_ref() != node.ancestor_ids.last() {
                issues.push(HierarchyIssue::ParentMismatch { id: id.clone() });
            }
        }

        issues
    }
}
