//! Human-readable explanations for score records.

use super::{ScoreRecord, SkillContribution};

/// Share of a user's coverage the key contributors must account for.
pub const KEY_CONTRIBUTOR_SHARE: f64 = 0.8;
/// Minimum number of key contributors shown (when that many exist).
pub const KEY_CONTRIBUTOR_MIN: usize = 3;

/// Shortest prefix of the contribution list covering `share` of the
/// user's coverage, never shorter than `min` entries.
///
/// The full list stays on the record; this is a reporting view.
pub fn key_contributors(record: &ScoreRecord, share: f64, min: usize) -> &[SkillContribution] {
    let items = record.skill_contributions.as_slice();
    if items.len() <= min {
        return items;
    }

    let target = record.coverage_score * share.clamp(0.0, 1.0);
    let mut running = 0.0;
    let mut end = items.len();
    for (i, item) in items.iter().enumerate() {
        running += item.relevancy_weight;
        if running + f64::EPSILON * record.coverage_score >= target {
            end = i + 1;
            break;
        }
    }

    &items[..end.max(min)]
}

/// One-line summary of why a user scored the way they did.
pub fn explain(record: &ScoreRecord) -> String {
    if record.is_zero() {
        return "No matching skills".to_string();
    }

    let mut parts = Vec::new();

    if record.matched_count > 0 {
        parts.push(format!(
            "Covers {:.0}% of the query",
            record.coverage_percentage
        ));
        parts.push(format!(
            "{} expertise ({:.1}x)",
            record.expertise_label, record.expertise_multiplier
        ));

        let key = key_contributors(record, KEY_CONTRIBUTOR_SHARE, KEY_CONTRIBUTOR_MIN);
        let titles: Vec<&str> = key.iter().map(|c| c.title.as_str()).collect();
        if titles.len() == 1 {
            parts.push(format!("Key skill: {}", titles[0]));
        } else {
            parts.push(format!("Key skills: {}", titles.join(", ")));
        }
    }

    if record.transfer_bonus > 0.0 {
        parts.push(format!(
            "Transferable experience (+{:.2})",
            record.transfer_bonus
        ));
    }

    parts.join("; ")
}

/// Summary line for a whole ranking pass.
pub fn summarize_outcome(ranked: usize, matched_skills: usize, candidates: usize) -> String {
    let mut parts = Vec::new();

    parts.push(format!(
        "Ranked {} of {} users",
        ranked, candidates
    ));
    if matched_skills == 1 {
        parts.push("against 1 matched skill".to_string());
    } else {
        parts.push(format!("against {} matched skills", matched_skills));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringVariant;
    use crate::types::{Rating, SkillLevel};

    fn contribution(id: &str, weight: f64) -> SkillContribution {
        SkillContribution {
            skill_id: id.to_string(),
            title: format!("Skill {id}"),
            level: SkillLevel::GenericSkill,
            similarity: weight.sqrt(),
            relevancy_weight: weight,
            rating: Rating::Intermediate,
            rating_multiplier: 3.0,
            expertise_contribution: weight * 3.0,
            coverage_percentage: 0.0,
        }
    }

    fn record_with(weights: &[f64]) -> ScoreRecord {
        let mut record = ScoreRecord::empty(ScoringVariant::CoverageExpertise, 10.0, "Intermediate");
        record.skill_contributions = weights
            .iter()
            .enumerate()
            .map(|(i, w)| contribution(&format!("s{i}"), *w))
            .collect();
        record.coverage_score = weights.iter().sum();
        record.expertise_multiplier = 3.0;
        record.raw_score = record.coverage_score * 3.0;
        record.matched_count = weights.len();
        record.coverage_percentage = record.coverage_score * 10.0;
        record
    }

    #[test]
    fn test_key_contributors_reach_share() {
        // total 10; 80% needs 5 + 2 + 1 = 8
        let record = record_with(&[5.0, 2.0, 1.0, 1.0, 0.5, 0.5]);
        assert_eq!(key_contributors(&record, 0.8, 2).len(), 3);
    }

    #[test]
    fn test_key_contributors_minimum() {
        let record = record_with(&[9.0, 0.5, 0.25, 0.25]);
        assert_eq!(key_contributors(&record, 0.8, 3).len(), 3);
    }

    #[test]
    fn test_key_contributors_short_list_returned_whole() {
        let record = record_with(&[1.0, 0.5]);
        assert_eq!(key_contributors(&record, 0.8, 3).len(), 2);
        let empty = record_with(&[]);
        assert!(key_contributors(&empty, 0.8, 3).is_empty());
    }

    #[test]
    fn test_explain_zero_record() {
        let record = ScoreRecord::empty(ScoringVariant::CoverageExpertise, 1.0, "Beginner");
        assert_eq!(explain(&record), "No matching skills");
    }

    #[test]
    fn test_explain_mentions_parts() {
        let record = record_with(&[4.0, 1.0]);
        let text = explain(&record);
        assert!(text.contains("Covers 50% of the query"));
        assert!(text.contains("Intermediate expertise (3.0x)"));
        assert!(text.contains("Key skills: Skill s0, Skill s1"));
        assert!(!text.contains("Transferable"));
    }

    #[test]
    fn test_explain_transfer_only() {
        let mut record = ScoreRecord::empty(ScoringVariant::LevelWeighted, 1.0, "Beginner");
        record.raw_score = 0.04;
        record.transfer_bonus = 0.04;
        assert_eq!(explain(&record), "Transferable experience (+0.04)");
    }

    #[test]
    fn test_summarize_outcome() {
        assert_eq!(
            summarize_outcome(3, 1, 10),
            "Ranked 3 of 10 users against 1 matched skill"
        );
        assert_eq!(
            summarize_outcome(0, 4, 2),
            "Ranked 0 of 2 users against 4 matched skills"
        );
    }
}
