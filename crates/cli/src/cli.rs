use clap::{Args, Parser, Subcommand, ValueEnum};
use skillrank_ranking::ScoringVariant;
use std::path::PathBuf;

/// How command output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Command-line interface for the `skillrank` application.
#[derive(Debug, Parser)]
#[command(
    name = "skillrank",
    version,
    about = "Ranks people against skill-search results by coverage and expertise"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Input file overrides shared by every data command.
#[derive(Debug, Clone, Default, Args)]
pub struct DataArgs {
    /// User database JSON (overrides `SKILLRANK_USERS_FILE` and `data.users_file`).
    #[arg(long, value_name = "FILE")]
    pub users: Option<PathBuf>,
    /// Skills master JSON (overrides `SKILLRANK_HIERARCHY_FILE` and `data.hierarchy_file`).
    #[arg(long, value_name = "FILE")]
    pub hierarchy: Option<PathBuf>,
}

/// Available `skillrank` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scores and ranks every user against a set of vector-search hits.
    Rank {
        /// Vector-search hits for one query (JSON).
        #[arg(long, value_name = "FILE")]
        matches: PathBuf,
        #[command(flatten)]
        data: DataArgs,
        /// Users listed individually before bucketing.
        #[arg(long, value_name = "N")]
        top_n: Option<usize>,
        /// Scoring formula: coverage-expertise or level-weighted.
        #[arg(long, value_name = "VARIANT")]
        variant: Option<ScoringVariant>,
        /// Drop matches below this similarity.
        #[arg(long, value_name = "SIMILARITY")]
        min_similarity: Option<f64>,
        /// Keep at most this many matches.
        #[arg(long, value_name = "K")]
        top_k: Option<usize>,
        /// Page shown inside each bucket (1-based).
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Output format: text or json.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Shows one user's skills grouped by hierarchy level.
    User {
        /// User email (case-insensitive).
        #[arg(required = true)]
        email: String,
        #[command(flatten)]
        data: DataArgs,
        /// Output format: text or json.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Prints dataset statistics and load diagnostics.
    Stats {
        #[command(flatten)]
        data: DataArgs,
        /// Output format: text or json.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Prints the effective configuration as TOML.
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rank_arguments() {
        let cli = Cli::try_parse_from([
            "skillrank",
            "rank",
            "--matches",
            "hits.json",
            "--users",
            "users.json",
            "--variant",
            "legacy",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Rank {
                matches,
                data,
                variant,
                format,
                page,
                top_n,
                ..
            } => {
                assert_eq!(matches, PathBuf::from("hits.json"));
                assert_eq!(data.users, Some(PathBuf::from("users.json")));
                assert_eq!(data.hierarchy, None);
                assert_eq!(variant, Some(ScoringVariant::LevelWeighted));
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(page, 1);
                assert_eq!(top_n, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rank_requires_matches() {
        assert!(Cli::try_parse_from(["skillrank", "rank"]).is_err());
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        assert!(Cli::try_parse_from([
            "skillrank",
            "rank",
            "--matches",
            "hits.json",
            "--variant",
            "vibes"
        ])
        .is_err());
    }
}
