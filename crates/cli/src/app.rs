use crate::cli::{Cli, Commands};
use crate::commands::{
    handle_config_command, handle_rank_command, handle_stats_command, handle_user_command,
    RankArgs,
};
use anyhow::Result;
use clap::Parser;

/// Parse arguments, set up logging and dispatch to a command handler.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Rank {
            matches,
            data,
            top_n,
            variant,
            min_similarity,
            top_k,
            page,
            format,
        } => handle_rank_command(RankArgs {
            matches,
            data,
            top_n,
            variant,
            min_similarity,
            top_k,
            page,
            format,
        }),
        Commands::User {
            email,
            data,
            format,
        } => handle_user_command(&email, data, format),
        Commands::Stats { data, format } => handle_stats_command(data, format),
        Commands::Config => handle_config_command(),
    }
}
