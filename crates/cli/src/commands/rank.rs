use super::{load_dataset, print_json};
use crate::cli::{DataArgs, OutputFormat};
use anyhow::{Context, Result};
use serde::Serialize;
use skillrank_dataset::{load_matches, Diagnostics, UserRepository};
use skillrank_ranking::{
    explain, score_and_rank, summarize_outcome, MatchQuality, MatchSet, MatchedSkill,
    RankedUser, RankingOutcome, ScoringVariant,
};
use skillrank_state::{Overrides, Settings};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Arguments of `skillrank rank`.
#[derive(Debug)]
pub(crate) struct RankArgs {
    pub matches: PathBuf,
    pub data: DataArgs,
    pub top_n: Option<usize>,
    pub variant: Option<ScoringVariant>,
    pub min_similarity: Option<f64>,
    pub top_k: Option<usize>,
    pub page: usize,
    pub format: OutputFormat,
}

/// A matched skill with its qualitative band.
#[derive(Debug, Serialize)]
struct MatchView<'a> {
    #[serde(flatten)]
    skill: &'a MatchedSkill,
    quality: MatchQuality,
}

/// A ranked user with a one-line explanation.
#[derive(Debug, Serialize)]
struct RankedView<'a> {
    #[serde(flatten)]
    user: &'a RankedUser,
    explanation: String,
}

/// One page of one bucket.
#[derive(Debug, Serialize)]
struct BucketView<'a> {
    name: &'a str,
    min: f64,
    max: f64,
    count: usize,
    page: usize,
    page_count: usize,
    users: &'a [RankedUser],
}

#[derive(Debug, Serialize)]
struct RankReport<'a> {
    variant: ScoringVariant,
    summary: String,
    matched_skills: Vec<MatchView<'a>>,
    top: Vec<RankedView<'a>>,
    buckets: Vec<BucketView<'a>>,
    unplaced: &'a [RankedUser],
}

fn build_report<'a>(
    variant: ScoringVariant,
    matches: &'a MatchSet,
    outcome: &'a RankingOutcome,
    candidates: usize,
    page: usize,
    per_page: usize,
) -> RankReport<'a> {
    RankReport {
        variant,
        summary: summarize_outcome(outcome.ranked.len(), matches.len(), candidates),
        matched_skills: matches
            .by_similarity()
            .into_iter()
            .map(|skill| MatchView {
                skill,
                quality: skill.similarity.quality(),
            })
            .collect(),
        top: outcome
            .top()
            .iter()
            .map(|user| RankedView {
                user,
                explanation: explain(&user.record),
            })
            .collect(),
        buckets: outcome
            .buckets
            .iter()
            .map(|bucket| BucketView {
                name: &bucket.name,
                min: bucket.min,
                max: bucket.max,
                count: bucket.count(),
                page,
                page_count: bucket.page_count(per_page),
                users: bucket.page(page, per_page),
            })
            .collect(),
        unplaced: &outcome.unplaced,
    }
}

fn user_line(out: &mut String, user: &RankedUser) {
    let _ = writeln!(
        out,
        "  {:>3}. {} <{}>  {:.1}",
        user.rank,
        user.identity.name,
        user.identity.id,
        user.record.bucket_score()
    );
}

fn render_text(report: &RankReport<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", report.summary, report.variant);

    if !report.matched_skills.is_empty() {
        let _ = writeln!(out, "\nMatched skills:");
        for m in &report.matched_skills {
            let _ = writeln!(
                out,
                "  {:.2}  {:<15} {} {}",
                m.skill.similarity.value(),
                m.quality.label(),
                m.skill.level.tag(),
                m.skill.title
            );
        }
    }

    if report.top.is_empty() {
        let _ = writeln!(out, "\nNo users matched.");
        return out;
    }

    let _ = writeln!(out, "\nTop {}:", report.top.len());
    for entry in &report.top {
        user_line(&mut out, entry.user);
        let _ = writeln!(out, "       {}", entry.explanation);
    }

    for bucket in &report.buckets {
        let _ = writeln!(
            out,
            "\n{} [{}, {}]: {} user(s)",
            bucket.name, bucket.min, bucket.max, bucket.count
        );
        if bucket.page_count > 1 {
            let _ = writeln!(out, "  page {}/{}", bucket.page, bucket.page_count);
        }
        for user in bucket.users {
            user_line(&mut out, user);
        }
    }

    if !report.unplaced.is_empty() {
        let _ = writeln!(out, "\nUnplaced: {} user(s)", report.unplaced.len());
        for user in report.unplaced {
            user_line(&mut out, user);
        }
    }
    out
}

/// Handle the `rank` command.
pub(crate) fn handle_rank_command(args: RankArgs) -> Result<()> {
    let mut overrides: Overrides = args.data.overrides();
    overrides.top_users = args.top_n;
    overrides.variant = args.variant;
    overrides.min_similarity = args.min_similarity;
    overrides.top_k = args.top_k;
    let settings = Settings::load(&overrides)?;

    let dataset = load_dataset(&settings)?;
    let mut diagnostics = Diagnostics::default();
    let hits = load_matches(&args.matches, dataset.hierarchy(), &mut diagnostics)
        .context("failed to load matches")?;
    let search = settings.search();
    let matches = hits.filtered(search.min_similarity, Some(search.top_k));
    tracing::debug!(
        target: "skillrank::cli",
        hits = hits.len(),
        kept = matches.len(),
        "Filtered matches"
    );

    let users = dataset.users();
    let outcome = score_and_rank(
        &matches,
        users.all_users(),
        dataset.hierarchy(),
        settings.ranking_options(),
    );
    let report = build_report(
        settings.ranking_options().scoring().variant,
        &matches,
        &outcome,
        users.len(),
        args.page.max(1),
        settings.display().users_per_page,
    );

    match args.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print!("{}", render_text(&report));
            Ok(())
        }
    }
}
