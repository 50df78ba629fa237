//! CLI command handlers for the skillrank application.

mod config;
mod rank;
mod stats;
mod user;

pub(crate) use config::handle_config_command;
pub(crate) use rank::{handle_rank_command, RankArgs};
pub(crate) use stats::handle_stats_command;
pub(crate) use user::handle_user_command;

use crate::cli::DataArgs;
use anyhow::{Context, Result};
use serde::Serialize;
use skillrank_dataset::{DataPaths, Dataset};
use skillrank_state::{Overrides, Settings};

impl DataArgs {
    /// Command-line layer for the file settings.
    fn overrides(&self) -> Overrides {
        Overrides {
            users_file: self.users.clone(),
            hierarchy_file: self.hierarchy.clone(),
            ..Default::default()
        }
    }
}

/// Resolve file locations from merged settings.
fn data_paths(settings: &Settings) -> Result<DataPaths> {
    let users = settings.data().users_file.clone().context(
        "no users file configured; pass --users or set SKILLRANK_USERS_FILE",
    )?;
    Ok(DataPaths {
        users,
        hierarchy: settings.data().hierarchy_file.clone(),
    })
}

fn load_dataset(settings: &Settings) -> Result<Dataset> {
    let paths = data_paths(settings)?;
    Dataset::load(&paths).context("failed to load dataset")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
