use super::{load_dataset, print_json};
use crate::cli::{DataArgs, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use skillrank_dataset::{DatasetStats, Diagnostics};
use skillrank_ranking::{Rating, ScoringVariant, SkillLevel};
use skillrank_state::{Config, Settings};
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Serialize)]
struct StatsReport<'a> {
    stats: DatasetStats,
    diagnostics: &'a Diagnostics,
    variant: ScoringVariant,
    config_source: Option<&'a Path>,
    config: &'a Config,
}

fn render_text(report: &StatsReport<'_>) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    let _ = writeln!(out, "Users:       {}", stats.total_users);
    let _ = writeln!(out, "Assignments: {}", stats.total_assignments);
    let _ = writeln!(out, "Skills:      {}", stats.hierarchy_nodes);

    let _ = writeln!(out, "\nBy level:");
    for level in SkillLevel::ALL {
        let count = stats
            .assignments_by_level
            .get(&level.depth())
            .copied()
            .unwrap_or(0);
        let _ = writeln!(out, "  {} {:<14} {}", level.tag(), level.label(), count);
    }
    let _ = writeln!(out, "\nBy rating:");
    for rating in Rating::ALL {
        let count = stats
            .assignments_by_rating
            .get(&rating.value())
            .copied()
            .unwrap_or(0);
        let _ = writeln!(out, "  {} {:<14} {}", rating.value(), rating.label(), count);
    }

    let diagnostics = report.diagnostics;
    if !diagnostics.skipped.is_empty() {
        let _ = writeln!(out, "\nSkipped records ({}):", diagnostics.skipped.len());
        for (location, reason) in &diagnostics.skipped {
            let _ = writeln!(out, "  {location}: {reason}");
        }
    }
    if !diagnostics.hierarchy_issues.is_empty() {
        let _ = writeln!(
            out,
            "\nHierarchy issues ({}):",
            diagnostics.hierarchy_issues.len()
        );
        for issue in &diagnostics.hierarchy_issues {
            let _ = writeln!(out, "  {issue}");
        }
    }

    let source = report
        .config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let config = report.config;
    let _ = writeln!(out, "\nScoring: {} (config: {source})", report.variant);
    let _ = writeln!(
        out,
        "Search:  min similarity {}, top {} matches",
        config.search.min_similarity, config.search.top_k
    );
    let _ = writeln!(
        out,
        "Display: top {} users, {} per bucket page",
        config.display.top_users, config.display.users_per_page
    );
    out
}

/// Handle the `stats` command.
pub(crate) fn handle_stats_command(data: DataArgs, format: OutputFormat) -> Result<()> {
    let settings = Settings::load(&data.overrides())?;
    let dataset = load_dataset(&settings)?;
    let report = StatsReport {
        stats: dataset.stats(),
        diagnostics: dataset.diagnostics(),
        variant: settings.ranking_options().scoring().variant,
        config_source: settings.source(),
        config: settings.config(),
    };

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print!("{}", render_text(&report));
            Ok(())
        }
    }
}
