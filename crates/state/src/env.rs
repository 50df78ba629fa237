use anyhow::{Context, Result};
use skillrank_ranking::ScoringVariant;
use std::path::PathBuf;
use std::str::FromStr;

/// Variable naming an alternate config file.
pub const ENV_CONFIG: &str = "SKILLRANK_CONFIG";
/// User database JSON.
pub const ENV_USERS_FILE: &str = "SKILLRANK_USERS_FILE";
/// Skills master JSON.
pub const ENV_HIERARCHY_FILE: &str = "SKILLRANK_HIERARCHY_FILE";
/// Users shown individually before bucketing.
pub const ENV_TOP_USERS: &str = "SKILLRANK_TOP_USERS";
/// Similarity floor for query matches.
pub const ENV_MIN_SIMILARITY: &str = "SKILLRANK_MIN_SIMILARITY";
/// Maximum number of query matches kept.
pub const ENV_TOP_K: &str = "SKILLRANK_TOP_K";
/// Active scoring formula.
pub const ENV_SCORING_VARIANT: &str = "SKILLRANK_SCORING_VARIANT";

/// Returns the user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("home directory not found"))
}

/// Returns the path to the config file (`SKILLRANK_CONFIG` or `~/.skillrank/config.toml`).
pub fn config_file() -> Option<PathBuf> {
    if let Some(custom) = non_empty(ENV_CONFIG) {
        return Some(PathBuf::from(custom));
    }
    home_dir().ok().map(|h| h.join(".skillrank/config.toml"))
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse an environment variable, failing loudly on a malformed value.
fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value '{raw}' for {key}")),
    }
}

/// Returns the users file from `SKILLRANK_USERS_FILE`.
pub fn env_users_file() -> Option<PathBuf> {
    non_empty(ENV_USERS_FILE).map(PathBuf::from)
}

/// Returns the hierarchy file from `SKILLRANK_HIERARCHY_FILE`.
pub fn env_hierarchy_file() -> Option<PathBuf> {
    non_empty(ENV_HIERARCHY_FILE).map(PathBuf::from)
}

/// Returns `SKILLRANK_TOP_USERS`.
pub fn env_top_users() -> Result<Option<usize>> {
    parse_env(ENV_TOP_USERS)
}

/// Returns `SKILLRANK_MIN_SIMILARITY`.
pub fn env_min_similarity() -> Result<Option<f64>> {
    parse_env(ENV_MIN_SIMILARITY)
}

/// Returns `SKILLRANK_TOP_K`.
pub fn env_top_k() -> Result<Option<usize>> {
    parse_env(ENV_TOP_K)
}

/// Returns `SKILLRANK_SCORING_VARIANT`.
pub fn env_scoring_variant() -> Result<Option<ScoringVariant>> {
    parse_env(ENV_SCORING_VARIANT)
}
