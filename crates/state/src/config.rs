//! Configuration file support for skillrank.
//!
//! Loads settings from `~/.skillrank/config.toml` (or `$SKILLRANK_CONFIG`)
//! with the following precedence:
//! CLI arguments > Environment variables > Config file > defaults
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.skillrank/config.toml
//!
//! [scoring]
//! # coverage-expertise (default) or level-weighted
//! variant = "coverage-expertise"
//! similarity_exponent = 2.0
//! coverage_max_percentile = 1.0
//! display_scale = 100.0
//!
//! [scoring.rating_multipliers]
//! beginner = 1.0
//! intermediate = 3.0
//! advanced = 6.0
//!
//! [search]
//! min_similarity = 0.35
//! top_k = 20
//!
//! [display]
//! top_users = 5
//! users_per_page = 10
//!
//! [data]
//! # Relative paths are resolved against the config file's directory
//! users_file = "users.json"
//! hierarchy_file = "skills.json"
//!
//! [[buckets]]
//! name = "Excellent Match"
//! min = 80.0
//! max = 100.0
//! ```
//!
//! Everything is validated when settings are built: a bad bucket plan or
//! scoring parameter fails here, never in the middle of a ranking pass.

use crate::env;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skillrank_ranking::{
    default_bucket_specs, BucketPlan, BucketSpec, RankingOptions, ScoringConfig, ScoringVariant,
    DEFAULT_DISPLAY_SCALE, DEFAULT_TOP_N,
};
use std::path::{Path, PathBuf};

/// Default similarity floor for query matches.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.35;
/// Default cap on query matches.
pub const DEFAULT_TOP_K: usize = 20;
/// Default page size inside a bucket.
pub const DEFAULT_USERS_PER_PAGE: usize = 10;

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scoring formula and its tuning knobs.
    pub scoring: ScoringConfig,
    /// Query match filtering.
    pub search: SearchConfig,
    /// Output shaping.
    pub display: DisplayConfig,
    /// Input files.
    pub data: DataConfig,
    /// Bucket ranges; defaults to four tiers over the display scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buckets: Option<Vec<BucketSpec>>,
}

/// Filters applied to vector-search hits before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Matches below this similarity are dropped.
    pub min_similarity: f64,
    /// At most this many matches are kept, best first.
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_similarity: DEFAULT_MIN_SIMILARITY,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// How results are presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Users shown individually before bucketing.
    pub top_users: usize,
    /// Page size inside a bucket.
    pub users_per_page: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_users: DEFAULT_TOP_N,
            users_per_page: DEFAULT_USERS_PER_PAGE,
        }
    }
}

/// Where the user database and skills master live.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// User database JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_file: Option<PathBuf>,
    /// Skills master JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy_file: Option<PathBuf>,
}

impl DataConfig {
    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [&mut self.users_file, &mut self.hierarchy_file]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// One layer of overrides on top of the config file.
///
/// The environment and the command line each produce one of these; a
/// `None` field leaves the lower layer's value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// User database JSON.
    pub users_file: Option<PathBuf>,
    /// Skills master JSON.
    pub hierarchy_file: Option<PathBuf>,
    /// Users shown before bucketing.
    pub top_users: Option<usize>,
    /// Similarity floor.
    pub min_similarity: Option<f64>,
    /// Match cap.
    pub top_k: Option<usize>,
    /// Scoring formula.
    pub variant: Option<ScoringVariant>,
}

impl Overrides {
    /// Read the `SKILLRANK_*` variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            users_file: env::env_users_file(),
            hierarchy_file: env::env_hierarchy_file(),
            top_users: env::env_top_users()?,
            min_similarity: env::env_min_similarity()?,
            top_k: env::env_top_k()?,
            variant: env::env_scoring_variant()?,
        })
    }

    /// Write every set field into `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.users_file {
            config.data.users_file = Some(path.clone());
        }
        if let Some(path) = &self.hierarchy_file {
            config.data.hierarchy_file = Some(path.clone());
        }
        if let Some(n) = self.top_users {
            config.display.top_users = n;
        }
        if let Some(min) = self.min_similarity {
            config.search.min_similarity = min;
        }
        if let Some(k) = self.top_k {
            config.search.top_k = k;
        }
        if let Some(variant) = self.variant {
            config.scoring.variant = variant;
        }
    }
}

/// Loads a configuration file.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Err` if the file exists but fails to parse.
pub fn load_config_from(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut config: Config =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    if let Some(dir) = path.parent() {
        config.data.resolve_relative_to(dir);
    }

    tracing::debug!(
        target: "skillrank::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}

/// Loads the configuration file at [`env::config_file`] if it exists.
pub fn load_config() -> Result<Option<Config>> {
    match env::config_file() {
        Some(path) => load_config_from(&path),
        None => Ok(None),
    }
}

/// Default tiers stretched from 0-100 to `[0, scale]`.
fn scaled_default_buckets(scale: f64) -> Vec<BucketSpec> {
    let factor = scale / DEFAULT_DISPLAY_SCALE;
    default_bucket_specs()
        .into_iter()
        .map(|b| BucketSpec::new(b.name, b.min * factor, b.max * factor))
        .collect()
}

/// Validated, merged settings ready to drive a ranking pass.
#[derive(Debug, Clone)]
pub struct Settings {
    config: Config,
    ranking: RankingOptions,
    source: Option<PathBuf>,
}

impl Settings {
    /// Config file, then `SKILLRANK_*` variables, then `cli`.
    pub fn load(cli: &Overrides) -> Result<Self> {
        let source = env::config_file().filter(|p| p.exists());
        let mut config = match &source {
            Some(path) => load_config_from(path)?.unwrap_or_default(),
            None => Config::default(),
        };
        Overrides::from_env()?.apply(&mut config);
        cli.apply(&mut config);
        Self::build(config, source)
    }

    /// Validate an already merged configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        Self::build(config, None)
    }

    fn build(config: Config, source: Option<PathBuf>) -> Result<Self> {
        let search = &config.search;
        if !search.min_similarity.is_finite() || !(0.0..=1.0).contains(&search.min_similarity) {
            anyhow::bail!(
                "search.min_similarity must be within [0, 1], got {}",
                search.min_similarity
            );
        }
        if search.top_k == 0 {
            anyhow::bail!("search.top_k must be at least 1");
        }
        if config.display.users_per_page == 0 {
            anyhow::bail!("display.users_per_page must be at least 1");
        }

        let scale = config.scoring.bucket_scale();
        let specs = config
            .buckets
            .clone()
            .unwrap_or_else(|| scaled_default_buckets(scale));
        let plan = BucketPlan::new(specs, scale).context("invalid bucket configuration")?;
        let ranking = RankingOptions::new(config.scoring.clone(), plan, config.display.top_users)
            .context("invalid scoring configuration")?;

        tracing::debug!(
            target: "skillrank::config",
            variant = %config.scoring.variant,
            top_users = config.display.top_users,
            min_similarity = config.search.min_similarity,
            top_k = config.search.top_k,
            "Resolved settings"
        );

        Ok(Self {
            config,
            ranking,
            source,
        })
    }

    /// The effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Options for `score_and_rank`.
    pub fn ranking_options(&self) -> &RankingOptions {
        &self.ranking
    }

    /// Match filters.
    pub fn search(&self) -> &SearchConfig {
        &self.config.search
    }

    /// Output shaping.
    pub fn display(&self) -> &DisplayConfig {
        &self.config.display
    }

    /// Input files.
    pub fn data(&self) -> &DataConfig {
        &self.config.data
    }

    /// Config file the settings were read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The effective configuration as TOML, bucket plan included.
    pub fn to_toml(&self) -> Result<String> {
        let mut effective = self.config.clone();
        effective.buckets = Some(self.ranking.buckets().specs().to_vec());
        toml::to_string_pretty(&effective).context("failed to serialize configuration")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config: Config::default(),
            ranking: RankingOptions::default(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[scoring]
variant = "level-weighted"

[display]
top_users = 3
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scoring.variant, ScoringVariant::LevelWeighted);
        assert_eq!(config.scoring.similarity_exponent, 2.0);
        assert_eq!(config.display.top_users, 3);
        assert_eq!(config.display.users_per_page, DEFAULT_USERS_PER_PAGE);
        assert_eq!(config.search, SearchConfig::default());
        assert!(config.buckets.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_buckets() {
        let toml_str = r#"
[[buckets]]
name = "Top"
min = 50.0
max = 100.0

[[buckets]]
name = "Rest"
min = 0.0
max = 50.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let settings = Settings::from_config(config).unwrap();
        let names: Vec<&str> = settings
            .ranking_options()
            .buckets()
            .specs()
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(names, ["Top", "Rest"]);
    }

    #[test]
    fn test_gap_in_buckets_is_rejected() {
        let config = Config {
            buckets: Some(vec![
                BucketSpec::new("Top", 60.0, 100.0),
                BucketSpec::new("Rest", 0.0, 50.0),
            ]),
            ..Default::default()
        };
        let err = Settings::from_config(config).unwrap_err();
        assert!(format!("{err:#}").contains("invalid bucket configuration"));
    }

    #[test]
    fn test_bad_scoring_is_rejected() {
        let mut config = Config::default();
        config.scoring.similarity_exponent = -1.0;
        let err = Settings::from_config(config).unwrap_err();
        assert!(format!("{err:#}").contains("similarity exponent"));
    }

    #[test]
    fn test_bad_search_values_are_rejected() {
        let mut config = Config::default();
        config.search.min_similarity = 1.5;
        assert!(Settings::from_config(config).is_err());

        let mut config = Config::default();
        config.search.top_k = 0;
        assert!(Settings::from_config(config).is_err());

        let mut config = Config::default();
        config.display.users_per_page = 0;
        assert!(Settings::from_config(config).is_err());
    }

    #[test]
    fn test_default_buckets_follow_display_scale() {
        let mut config = Config::default();
        config.scoring.display_scale = 10.0;
        let settings = Settings::from_config(config).unwrap();
        let plan = settings.ranking_options().buckets();
        assert_eq!(plan.scale(), 10.0);
        assert_eq!(plan.specs()[0].min, 8.0);
        assert_eq!(plan.specs()[0].max, 10.0);
    }

    #[test]
    fn test_legacy_buckets_use_percent_scale() {
        let mut config = Config::default();
        config.scoring.variant = ScoringVariant::LevelWeighted;
        config.scoring.display_scale = 10.0;
        let settings = Settings::from_config(config).unwrap();
        assert_eq!(settings.ranking_options().buckets().scale(), 100.0);
    }

    #[test]
    fn test_overrides_apply_only_set_fields() {
        let mut config = Config::default();
        config.display.top_users = 9;
        Overrides {
            top_k: Some(4),
            variant: Some(ScoringVariant::LevelWeighted),
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.display.top_users, 9);
        assert_eq!(config.search.top_k, 4);
        assert_eq!(config.scoring.variant, ScoringVariant::LevelWeighted);
    }

    #[test]
    fn test_to_toml_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        assert!(text.contains("[[buckets]]"));
        assert!(text.contains("coverage-expertise"));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.scoring, ScoringConfig::default());
        assert_eq!(parsed.buckets.map(|b| b.len()), Some(4));
    }

    #[test]
    fn test_relative_data_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[data]\nusers_file = \"users.json\"\nhierarchy_file = \"/abs/skills.json\"\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap().unwrap();
        assert_eq!(config.data.users_file, Some(dir.path().join("users.json")));
        assert_eq!(
            config.data.hierarchy_file,
            Some(PathBuf::from("/abs/skills.json"))
        );
    }

    #[test]
    fn test_missing_file_is_none_and_bad_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(&dir.path().join("absent.toml"))
            .unwrap()
            .is_none());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[scoring\nvariant = ").unwrap();
        assert!(load_config_from(&bad).is_err());
    }
}
