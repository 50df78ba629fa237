//! Command-line front end for skillrank.
//!
//! Loads settings (config file, `SKILLRANK_*` variables and flags), reads
//! the JSON data files and drives the ranking engine over them.

mod app;
mod cli;
mod commands;

pub use app::run;
pub use cli::{Cli, Commands, DataArgs, OutputFormat};
