use super::{load_dataset, print_json};
use crate::cli::{DataArgs, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use skillrank_dataset::UserRepository;
use skillrank_ranking::{SkillHierarchy, SkillLevel, UserIdentity, UserProfile};
use skillrank_state::Settings;
use std::fmt::Write as _;

#[derive(Debug, Serialize)]
struct SkillEntry {
    skill_id: String,
    title: String,
    rating: u8,
    rating_label: &'static str,
    /// Ancestor titles, root first.
    path: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LevelGroup {
    level: u8,
    label: &'static str,
    skills: Vec<SkillEntry>,
}

#[derive(Debug, Serialize)]
struct UserReport {
    identity: UserIdentity,
    total_skills: usize,
    levels: Vec<LevelGroup>,
}

/// Group a profile by hierarchy level, deepest last, skipping empty levels.
fn profile_report(profile: &UserProfile, hierarchy: &SkillHierarchy) -> UserReport {
    let levels = SkillLevel::ALL
        .iter()
        .filter_map(|&level| {
            let skills: Vec<SkillEntry> = profile
                .assignments
                .iter()
                .filter(|a| a.level == level)
                .map(|a| SkillEntry {
                    skill_id: a.skill_id.clone(),
                    title: hierarchy.display_title(&a.skill_id).to_string(),
                    rating: a.rating.value(),
                    rating_label: a.rating.label(),
                    path: hierarchy.titles_for(&a.ancestor_ids),
                })
                .collect();
            (!skills.is_empty()).then(|| LevelGroup {
                level: level.depth(),
                label: level.label(),
                skills,
            })
        })
        .collect();

    UserReport {
        identity: profile.identity.clone(),
        total_skills: profile.assignments.len(),
        levels,
    }
}

fn render_text(report: &UserReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} <{}>: {} skill(s)",
        report.identity.name, report.identity.id, report.total_skills
    );
    for group in &report.levels {
        let _ = writeln!(
            out,
            "\nL{} {} ({})",
            group.level,
            group.label,
            group.skills.len()
        );
        for skill in &group.skills {
            let _ = write!(out, "  {} [{}]", skill.title, skill.rating_label);
            if !skill.path.is_empty() {
                let _ = write!(out, "  {}", skill.path.join(" > "));
            }
            out.push('\n');
        }
    }
    out
}

/// Handle the `user` command.
pub(crate) fn handle_user_command(
    email: &str,
    data: DataArgs,
    format: OutputFormat,
) -> Result<()> {
    let settings = Settings::load(&data.overrides())?;
    let dataset = load_dataset(&settings)?;
    let profile = dataset
        .users()
        .user_by_identity(email)
        .ok_or_else(|| anyhow::anyhow!("user not found: {email}"))?;

    let report = profile_report(profile, dataset.hierarchy());
    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print!("{}", render_text(&report));
            Ok(())
        }
    }
}
