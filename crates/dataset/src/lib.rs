//! Data boundary for skillrank.
//!
//! This crate provides:
//! - Raw shapes of the user database, skills master and vector-search output
//! - Validation and adaptation into ranking types, with diagnostics
//! - A user repository and summary statistics
//! - An atomically replaceable dataset snapshot
//!
//! # Examples
//!
//! ```
//! use skillrank_dataset::{adapt_users, Diagnostics, RawUserFile, UserRepository, InMemoryRepository};
//! use skillrank_ranking::SkillHierarchy;
//!
//! let file: RawUserFile = serde_json::from_str(
//!     r#"{"users": [{"userEmail": "ada@example.com",
//!                    "selectedSkills": [{"skill_id": "rust", "skill_level": 3, "rating": 3}]}]}"#,
//! ).unwrap();
//!
//! let mut diagnostics = Diagnostics::default();
//! let users = adapt_users(file.into_db(), &SkillHierarchy::default(), &mut diagnostics);
//! let repo = InMemoryRepository::new(users);
//! assert_eq!(repo.user_by_identity("ada@example.com").unwrap().assignments.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Validation of raw records.
pub mod adapt;
mod error;
/// Raw collaborator payloads.
pub mod raw;
/// User lookup.
pub mod repository;
/// Summary counts.
pub mod stats;
/// File loading and snapshots.
pub mod store;

pub use adapt::{adapt_matches, adapt_users, build_hierarchy, flatten_skill_tree, Diagnostics};
pub use error::DatasetError;
pub use raw::{
    AncestorOrder, RawAssignment, RawMatch, RawMatchFile, RawMatchMetadata, RawSkillFile,
    RawSkillNode, RawUser, RawUserDb, RawUserFile,
};
pub use repository::{InMemoryRepository, UserRepository};
pub use stats::DatasetStats;
pub use store::{load_hierarchy, load_matches, load_users, DataPaths, Dataset, DatasetStore};
