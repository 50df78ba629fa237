//! Command-line interface for the `skillrank` application.
//!
//! This crate serves as the main entry point for the executable; the
//! command handlers live in the library half of the crate.

fn main() -> anyhow::Result<()> {
    skillrank::run()
}
