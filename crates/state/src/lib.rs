//! Configuration for skillrank.
//!
//! This crate provides utilities for:
//! - Locating and parsing `~/.skillrank/config.toml`.
//! - Reading `SKILLRANK_*` environment overrides.
//! - Merging both with command-line overrides into validated [`Settings`].

pub mod config;
pub mod env;

pub use config::{
    load_config, load_config_from, Config, DataConfig, DisplayConfig, Overrides, SearchConfig,
    Settings, DEFAULT_MIN_SIMILARITY, DEFAULT_TOP_K, DEFAULT_USERS_PER_PAGE,
};
pub use env::{
    config_file, env_hierarchy_file, env_min_similarity, env_scoring_variant, env_top_k,
    env_top_users, env_users_file, home_dir,
};
