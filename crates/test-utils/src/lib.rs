//! Shared test utilities for skillrank crates.
//!
//! This crate provides common test fixtures and utilities used across
//! multiple crates in the skillrank workspace.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = skillrank_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value"
/// // When _guard drops, MY_VAR is restored to its original value
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// Every `SKILLRANK_*` variable the configuration layer reads.
pub const SKILLRANK_ENV_VARS: [&str; 7] = [
    "SKILLRANK_CONFIG",
    "SKILLRANK_USERS_FILE",
    "SKILLRANK_HIERARCHY_FILE",
    "SKILLRANK_TOP_USERS",
    "SKILLRANK_MIN_SIMILARITY",
    "SKILLRANK_TOP_K",
    "SKILLRANK_SCORING_VARIANT",
];

/// Clear every `SKILLRANK_*` variable for the lifetime of the returned guards.
pub fn clear_skillrank_env() -> Vec<EnvVarGuard> {
    SKILLRANK_ENV_VARS
        .iter()
        .map(|key| set_env_var(key, None))
        .collect()
}

/// A small skills master tree: one category, one sub-category, three
/// generic skills and four technologies.
pub const SAMPLE_HIERARCHY: &str = r#"[
  {"id": "eng", "level": 1, "title": "Engineering", "skills": [
    {"id": "backend", "level": 2, "title": "Backend Development", "skills": [
      {"id": "rust", "level": 3, "title": "Rust Programming", "skills": [
        {"id": "tokio", "level": 4, "title": "Tokio"},
        {"id": "axum", "level": 4, "title": "Axum"}
      ]},
      {"id": "go", "level": 3, "title": "Go Programming", "skills": [
        {"id": "gin", "level": 4, "title": "Gin"}
      ]},
      {"id": "serverless", "level": 3, "title": "Serverless Architecture", "skills": [
        {"id": "lambda", "level": 4, "title": "AWS Lambda"}
      ]}
    ]}
  ]}
]"#;

/// Users for [`SAMPLE_HIERARCHY`], in the raw export format.
pub const SAMPLE_USERS: &str = r#"{
  "metadata": {"source": "fixture"},
  "users": [
    {"userEmail": "ada@example.com", "userName": "Ada", "selectedSkills": [
      {"skill_id": "rust", "skill_level": 3, "rating": 3, "parent_ids": ["eng", "backend"]},
      {"skill_id": "tokio", "skill_level": 4, "rating": 3, "parent_ids": ["eng", "backend", "rust"]}
    ]},
    {"email": "bo@example.com", "skills": [
      {"skill_id": "rust", "level": 3, "rating": 1},
      {"skill_id": "go", "level": 3, "rating": 2}
    ]},
    {"email": "cy@example.com", "name": "Cy", "skills": [
      {"skill_id": "gin", "skill_level": 4, "rating": 2}
    ]},
    {"email": "dee@example.com", "skills": [
      {"skill_id": "rust", "skill_level": 3, "rating": 9}
    ]}
  ]
}"#;

/// Vector-search hits for a "rust async services" style query.
pub const SAMPLE_MATCHES: &str = r#"[
  {"skill_id": "rust", "level": 3, "title": "Rust Programming", "similarity": 0.9},
  {"key": "tokio", "distance": 0.2, "metadata": {"level": "4", "title": "Tokio"}},
  {"skill_id": "go", "level": 3, "similarity": 0.5}
]"#;

/// Standard test fixture with pre-created directory structure.
///
/// Holds the tempdir and provides access to common paths.
/// The tempdir is automatically cleaned up when this struct is dropped.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
    /// Path to ~/.skillrank in the temp environment
    pub config_dir: PathBuf,
    /// Directory for data files
    pub data_dir: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with the standard directory structure.
    ///
    /// Creates:
    /// - `$HOME/.skillrank/`
    /// - `$HOME/data/`
    ///
    /// Does NOT set HOME env var - use `home_guard()` for that.
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let config_dir = tempdir.path().join(".skillrank");
        let data_dir = tempdir.path().join("data");

        std::fs::create_dir_all(&config_dir)?;
        std::fs::create_dir_all(&data_dir)?;

        Ok(Self {
            tempdir,
            config_dir,
            data_dir,
        })
    }

    /// Get the path that should be set as HOME.
    pub fn home_path(&self) -> &Path {
        self.tempdir.path()
    }

    /// Create an RAII guard that sets HOME to this fixture's temp directory.
    pub fn home_guard(&self) -> EnvVarGuard {
        set_env_var("HOME", Some(&self.home_path().to_string_lossy()))
    }

    /// Write `~/.skillrank/config.toml`.
    pub fn write_config(&self, content: &str) -> std::io::Result<PathBuf> {
        let path = self.config_dir.join("config.toml");
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a file under the data directory.
    pub fn write_data(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.data_dir.join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write the sample hierarchy, users and matches.
    ///
    /// Returns `(users, hierarchy, matches)` paths.
    pub fn write_sample_dataset(&self) -> std::io::Result<(PathBuf, PathBuf, PathBuf)> {
        Ok((
            self.write_data("users.json", SAMPLE_USERS)?,
            self.write_data("skills.json", SAMPLE_HIERARCHY)?,
            self.write_data("matches.json", SAMPLE_MATCHES)?,
        ))
    }
}
