//! Loading data files and holding the current dataset snapshot.
//!
//! # Concurrency Model
//!
//! A [`Dataset`] is immutable once built. [`DatasetStore`] keeps the
//! current one as `Arc<Dataset>` behind a `parking_lot::RwLock`:
//!
//! - Readers call [`DatasetStore::snapshot`], clone the `Arc` and release
//!   the lock at once; a ranking pass then runs against that snapshot
//!   without holding any lock.
//! - Reloads build the replacement completely before taking the write
//!   lock, so the lock only covers a pointer swap and no reader can see a
//!   half-loaded dataset.

use crate::adapt::{adapt_matches, adapt_users, build_hierarchy, flatten_skill_tree, Diagnostics};
use crate::error::DatasetError;
use crate::raw::{RawMatchFile, RawSkillFile, RawUserFile};
use crate::repository::{InMemoryRepository, UserRepository};
use crate::stats::DatasetStats;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use skillrank_ranking::{MatchSet, SkillHierarchy, UserProfile};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a dataset is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    /// User database JSON.
    pub users: PathBuf,
    /// Skills master JSON; without it, users must carry their own levels.
    pub hierarchy: Option<PathBuf>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and flatten a skills master file.
pub fn load_hierarchy(
    path: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<SkillHierarchy, DatasetError> {
    let file: RawSkillFile = read_json(path)?;
    let nodes = flatten_skill_tree(file.into_roots(), diagnostics);
    Ok(build_hierarchy(nodes, diagnostics))
}

/// Load a user database file.
pub fn load_users(
    path: &Path,
    hierarchy: &SkillHierarchy,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<UserProfile>, DatasetError> {
    let file: RawUserFile = read_json(path)?;
    Ok(adapt_users(file.into_db(), hierarchy, diagnostics))
}

/// Load vector-search hits for one query.
pub fn load_matches(
    path: &Path,
    hierarchy: &SkillHierarchy,
    diagnostics: &mut Diagnostics,
) -> Result<MatchSet, DatasetError> {
    let file: RawMatchFile = read_json(path)?;
    Ok(adapt_matches(file.into_matches(), hierarchy, diagnostics))
}

/// An immutable, fully adapted user population and skill hierarchy.
#[derive(Debug, Default)]
pub struct Dataset {
    hierarchy: SkillHierarchy,
    users: InMemoryRepository,
    diagnostics: Diagnostics,
}

impl Dataset {
    /// Assemble a dataset from already adapted parts.
    pub fn new(hierarchy: SkillHierarchy, users: Vec<UserProfile>, diagnostics: Diagnostics) -> Self {
        Self {
            hierarchy,
            users: InMemoryRepository::new(users),
            diagnostics,
        }
    }

    /// Load the hierarchy (if any) and then the users.
    pub fn load(paths: &DataPaths) -> Result<Self, DatasetError> {
        let mut diagnostics = Diagnostics::default();
        let hierarchy = match &paths.hierarchy {
            Some(path) => load_hierarchy(path, &mut diagnostics)?,
            None => SkillHierarchy::default(),
        };
        let users = load_users(&paths.users, &hierarchy, &mut diagnostics)?;

        tracing::info!(
            target: "skillrank::dataset",
            users = users.len(),
            skills = hierarchy.len(),
            skipped = diagnostics.skipped.len(),
            "Loaded dataset"
        );
        Ok(Self::new(hierarchy, users, diagnostics))
    }

    /// Skill hierarchy.
    pub fn hierarchy(&self) -> &SkillHierarchy {
        &self.hierarchy
    }

    /// User population.
    pub fn users(&self) -> &InMemoryRepository {
        &self.users
    }

    /// What was dropped while loading.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Summary counts.
    pub fn stats(&self) -> DatasetStats {
        DatasetStats::collect(&self.users, &self.hierarchy)
    }
}

/// Holder of the current dataset with atomic replacement.
#[derive(Debug, Default)]
pub struct DatasetStore {
    current: RwLock<Arc<Dataset>>,
}

impl DatasetStore {
    /// Start from an already built dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            current: RwLock::new(Arc::new(dataset)),
        }
    }

    /// Load from files.
    pub fn open(paths: &DataPaths) -> Result<Self, DatasetError> {
        Ok(Self::new(Dataset::load(paths)?))
    }

    /// The dataset current at the time of the call.
    pub fn snapshot(&self) -> Arc<Dataset> {
        Arc::clone(&self.current.read())
    }

    /// Swap in a new dataset, returning the previous one.
    pub fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        self.swap(Arc::new(dataset))
    }

    fn swap(&self, next: Arc<Dataset>) -> Arc<Dataset> {
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Rebuild from files and swap. On failure the current dataset stays.
    ///
    /// Returns the dataset this call loaded, even if a concurrent reload has
    /// already replaced it.
    pub fn reload(&self, paths: &DataPaths) -> Result<Arc<Dataset>, DatasetError> {
        let next = Arc::new(Dataset::load(paths)?);
        let users = next.users().len();
        self.swap(Arc::clone(&next));
        tracing::info!(target: "skillrank::dataset", users, "Dataset reloaded");
        Ok(next)
    }
}
