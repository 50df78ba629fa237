//! Loosely typed shapes of the collaborator payloads.
//!
//! These mirror what the ingestion and vector-search systems actually emit,
//! including their alternate field spellings. Nothing here is validated;
//! see [`crate::adapt`] for the conversion into ranking types.

use serde::{Deserialize, Deserializer, Serialize};

/// Order of ids in an ancestor list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AncestorOrder {
    /// Level-1 ancestor first, immediate parent last.
    #[default]
    RootFirst,
    /// Immediate parent first, level-1 ancestor last.
    NearestFirst,
}

impl AncestorOrder {
    /// Reorder `ids` so the root comes first.
    pub fn to_root_first(self, mut ids: Vec<String>) -> Vec<String> {
        if self == AncestorOrder::NearestFirst {
            ids.reverse();
        }
        ids
    }
}

/// A user database file: either `{"metadata", "users": [...]}` or a bare list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawUserFile {
    /// Wrapped form written by ingestion.
    Db(RawUserDb),
    /// A plain list of users.
    List(Vec<RawUser>),
}

impl RawUserFile {
    /// Normalise to the wrapped form.
    pub fn into_db(self) -> RawUserDb {
        match self {
            RawUserFile::Db(db) => db,
            RawUserFile::List(users) => RawUserDb {
                metadata: None,
                ancestor_order: AncestorOrder::default(),
                users,
            },
        }
    }
}

/// Wrapped user database.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUserDb {
    /// Free-form ingestion metadata.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Default order of every `ancestor_ids` list in the file.
    #[serde(default)]
    pub ancestor_order: AncestorOrder,
    /// User records.
    pub users: Vec<RawUser>,
}

/// One user as ingested.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    /// Identity; `userEmail` in raw exports.
    #[serde(default, alias = "userEmail")]
    pub email: Option<String>,
    /// Display name.
    #[serde(default, alias = "userName")]
    pub name: Option<String>,
    /// Assignments; `selectedSkills` in raw exports.
    #[serde(default, alias = "selectedSkills")]
    pub skills: Vec<RawAssignment>,
}

/// One skill assignment as ingested.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAssignment {
    /// Skill id.
    #[serde(default)]
    pub skill_id: Option<String>,
    /// Hierarchy depth.
    #[serde(default, alias = "level", deserialize_with = "lenient_int")]
    pub skill_level: Option<i64>,
    /// Self-assessed rating.
    #[serde(default, deserialize_with = "lenient_int")]
    pub rating: Option<i64>,
    /// Ancestor ids; `parent_ids` in raw exports.
    #[serde(default, alias = "parent_ids", deserialize_with = "lenient_ids")]
    pub ancestor_ids: Vec<String>,
    /// Overrides the file-level ancestor order for this record.
    #[serde(default)]
    pub ancestor_order: Option<AncestorOrder>,
}

/// A skills master file: either a bare list of roots or `{"skills": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSkillFile {
    /// Bare list.
    List(Vec<RawSkillNode>),
    /// Wrapped list.
    Wrapped {
        /// Top-level nodes.
        skills: Vec<RawSkillNode>,
    },
}

impl RawSkillFile {
    /// Top-level nodes.
    pub fn into_roots(self) -> Vec<RawSkillNode> {
        match self {
            RawSkillFile::List(nodes) | RawSkillFile::Wrapped { skills: nodes } => nodes,
        }
    }
}

/// A skill node, either nested (with `children`/`skills`) or already flat.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSkillNode {
    /// Skill id.
    #[serde(default)]
    pub id: Option<String>,
    /// Hierarchy depth; inferred from nesting when absent.
    #[serde(default, deserialize_with = "lenient_int")]
    pub level: Option<i64>,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Parent id (flat form).
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Ancestors, root first (flat form).
    #[serde(default, deserialize_with = "lenient_ids")]
    pub ancestor_ids: Vec<String>,
    /// Nested children.
    #[serde(default, alias = "skills")]
    pub children: Vec<RawSkillNode>,
}

/// Vector-search output: a bare list or wrapped in `results`/`matches`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawMatchFile {
    /// Bare list.
    List(Vec<RawMatch>),
    /// Wrapped list.
    Wrapped {
        /// Hits.
        #[serde(alias = "matches")]
        results: Vec<RawMatch>,
    },
}

impl RawMatchFile {
    /// The hits.
    pub fn into_matches(self) -> Vec<RawMatch> {
        match self {
            RawMatchFile::List(hits) | RawMatchFile::Wrapped { results: hits } => hits,
        }
    }
}

/// One vector-search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMatch {
    /// Skill id; `key` in raw index output.
    #[serde(default, alias = "key")]
    pub skill_id: Option<String>,
    /// Hierarchy depth.
    #[serde(default, deserialize_with = "lenient_int")]
    pub level: Option<i64>,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Similarity in [0, 1].
    #[serde(default)]
    pub similarity: Option<f64>,
    /// Cosine distance, used when `similarity` is absent.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Index metadata carrying level/title when not at top level.
    #[serde(default)]
    pub metadata: Option<RawMatchMetadata>,
}

/// Metadata stored alongside a vector.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMatchMetadata {
    /// Hierarchy depth (often string-encoded).
    #[serde(default, deserialize_with = "lenient_int")]
    pub level: Option<i64>,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntRepr {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accept `3`, `3.0` or `"3"`; anything unparseable becomes `None`.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<IntRepr>::deserialize(deserializer)? {
        None => None,
        Some(IntRepr::Int(v)) => Some(v),
        Some(IntRepr::Float(v)) if v.is_finite() && v.fract() == 0.0 => Some(v as i64),
        Some(IntRepr::Float(_)) => None,
        Some(IntRepr::Text(s)) => s.trim().parse().ok(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdsRepr {
    List(Vec<String>),
    Encoded(String),
}

/// Accept a list of ids or a JSON-encoded list; bad encodings become empty.
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<IdsRepr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(IdsRepr::List(ids)) => ids,
        Some(IdsRepr::Encoded(text)) if text.trim().is_empty() => Vec::new(),
        Some(IdsRepr::Encoded(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(
                target: "skillrank::dataset",
                error = %e,
                "Ignoring malformed encoded ancestor list"
            );
            Vec::new()
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_aliases() {
        let raw: RawUser = serde_json::from_str(
            r#"{
                "userEmail": "ada@example.com",
                "selectedSkills": [
                    {"skill_id": "S1", "level": 3, "rating": 2, "parent_ids": ["C1", "SC1"]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(raw.email.as_deref(), Some("ada@example.com"));
        assert_eq!(raw.skills.len(), 1);
        assert_eq!(raw.skills[0].skill_level, Some(3));
        assert_eq!(raw.skills[0].ancestor_ids, vec!["C1", "SC1"]);
    }

    #[test]
    fn test_lenient_numbers() {
        let raw: RawAssignment =
            serde_json::from_str(r#"{"skill_id": "S1", "skill_level": "4", "rating": 3.0}"#)
                .unwrap();
        assert_eq!(raw.skill_level, Some(4));
        assert_eq!(raw.rating, Some(3));

        let raw: RawAssignment =
            serde_json::from_str(r#"{"skill_id": "S1", "skill_level": "four", "rating": null}"#)
                .unwrap();
        assert_eq!(raw.skill_level, None);
        assert_eq!(raw.rating, None);
    }

    #[test]
    fn test_encoded_ancestor_ids() {
        let raw: RawAssignment = serde_json::from_str(
            r#"{"skill_id": "S1", "rating": 2, "parent_ids": "[\"C1\", \"SC1\"]"}"#,
        )
        .unwrap();
        assert_eq!(raw.ancestor_ids, vec!["C1", "SC1"]);

        let raw: RawAssignment =
            serde_json::from_str(r#"{"skill_id": "S1", "ancestor_ids": "not json"}"#).unwrap();
        assert!(raw.ancestor_ids.is_empty());
    }

    #[test]
    fn test_string_encoded_metadata_level() {
        let raw: RawMatch = serde_json::from_str(
            r#"{"key": "S1", "distance": 0.2,
                "metadata": {"level": "3", "title": "Rust", "parent_id": "SC1"}}"#,
        )
        .unwrap();
        let meta = raw.metadata.unwrap();
        assert_eq!(meta.level, Some(3));
        assert_eq!(meta.title.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_file_shapes() {
        let list: RawUserFile = serde_json::from_str(r#"[{"email": "a@x.io"}]"#).unwrap();
        assert_eq!(list.into_db().users.len(), 1);

        let db: RawUserFile = serde_json::from_str(
            r#"{"metadata": {"source": "s3"}, "ancestor_order": "nearest_first", "users": []}"#,
        )
        .unwrap();
        let db = db.into_db();
        assert_eq!(db.ancestor_order, AncestorOrder::NearestFirst);
        assert!(db.metadata.is_some());

        let hits: RawMatchFile =
            serde_json::from_str(r#"{"matches": [{"skill_id": "S1", "similarity": 0.5}]}"#)
                .unwrap();
        assert_eq!(hits.into_matches().len(), 1);

        let tree: RawSkillFile =
            serde_json::from_str(r#"{"skills": [{"id": "C1", "skills": [{"id": "SC1"}]}]}"#)
                .unwrap();
        let roots = tree.into_roots();
        assert_eq!(roots[0].children.len(), 1);
    }

    #[test]
    fn test_ancestor_order() {
        let ids = vec!["SC1".to_string(), "C1".to_string()];
        assert_eq!(
            AncestorOrder::NearestFirst.to_root_first(ids.clone()),
            vec!["C1", "SC1"]
        );
        assert_eq!(AncestorOrder::RootFirst.to_root_first(ids.clone()), ids);
    }
}
