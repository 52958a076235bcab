//! Skill-set matching and score policies.
//!
//! Two independent formulas live here:
//! - the recommender score (`calculate_matching_score`), a plain matched/total ratio;
//! - the employer-facing composite (`composite_candidate_score`), which adds
//!   project and certification bonuses and is capped at 95.

use serde::{Deserialize, Serialize};

use crate::matching::skills::similarity;

/// Minimum similarity for a candidate skill to satisfy a required skill.
pub const SIMILARITY_THRESHOLD: f64 = 0.70;

/// Score given when a job states no requirements at all.
pub const NEUTRAL_SCORE: u32 = 50;

/// Upper bound of the composite candidate score.
pub const COMPOSITE_CAP: u32 = 95;

const COMPOSITE_SKILL_WEIGHT: f64 = 60.0;

/// Required skills split by whether the candidate covers them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl SkillMatch {
    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len()
    }
}

/// Integer score (0 to 100) and the two-decimal percentage it was rounded from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: u32,
    pub percentage: f64,
}

/// Full outcome of matching one skill profile against one requirement list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub score: u32,
    pub percentage: f64,
}

/// Matches and scores in one step.
pub fn evaluate(candidate_skills: &[String], required_skills: &[String]) -> MatchResult {
    let SkillMatch { matched, missing } = match_skills(candidate_skills, required_skills);
    let MatchScore { score, percentage } = calculate_matching_score(matched.len(), missing.len());
    MatchResult {
        matched_skills: matched,
        missing_skills: missing,
        score,
        percentage,
    }
}

/// Classifies every required skill exactly once.
///
/// A required skill is matched by the first candidate skill (in candidate order)
/// whose similarity reaches [`SIMILARITY_THRESHOLD`]; later, possibly closer
/// candidates are not considered.
pub fn match_skills(candidate_skills: &[String], required_skills: &[String]) -> SkillMatch {
    let mut result = SkillMatch::default();

    for required in required_skills {
        let covered = candidate_skills
            .iter()
            .any(|candidate| similarity(candidate, required) >= SIMILARITY_THRESHOLD);

        if covered {
            result.matched.push(required.clone());
        } else {
            result.missing.push(required.clone());
        }
    }

    result
}

/// Recommender score: `matched / (matched + missing)`.
///
/// With nothing to match the neutral score (50) is returned.
pub fn calculate_matching_score(matched: usize, missing: usize) -> MatchScore {
    let total = matched + missing;
    if total == 0 {
        return MatchScore {
            score: NEUTRAL_SCORE,
            percentage: NEUTRAL_SCORE as f64,
        };
    }

    let percentage = matched as f64 / total as f64 * 100.0;
    MatchScore {
        score: percentage.round() as u32,
        percentage: round_to_cents(percentage),
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Step bonus for the number of projects a student has published.
pub fn project_bonus(projects: usize) -> u32 {
    match projects {
        0 => 0,
        1..=2 => 10,
        3..=4 => 15,
        _ => 20,
    }
}

/// Step bonus for the number of certifications a student holds.
pub fn certification_bonus(certifications: usize) -> u32 {
    match certifications {
        0 => 0,
        1 => 10,
        2 => 15,
        _ => 20,
    }
}

/// Employer-facing composite score.
///
/// Skills use exact token membership (not the fuzzy similarity) and are worth up
/// to 60 points; a job without requirements contributes 0 skill points.
pub fn composite_candidate_score(
    required_skills: &[String],
    student_skills: &[String],
    projects: usize,
    certifications: usize,
) -> u32 {
    let skill_points = if required_skills.is_empty() {
        0.0
    } else {
        let overlap = required_skills
            .iter()
            .filter(|required| student_skills.contains(required))
            .count();
        overlap as f64 / required_skills.len() as f64 * COMPOSITE_SKILL_WEIGHT
    };

    let sum = skill_points
        + project_bonus(projects) as f64
        + certification_bonus(certifications) as f64;

    (sum.round() as u32).min(COMPOSITE_CAP)
}

/// Human-readable explanation of a recommender score.
pub fn build_reasoning(matched: usize, missing: usize, score: u32) -> String {
    let total = matched + missing;
    if score >= 80 {
        format!("Excellent match. You have {matched} of {total} required skills.")
    } else if score >= 60 {
        format!(
            "Good match. You have {matched} of {total} required skills. You are missing {missing}."
        )
    } else if score >= 40 {
        format!("Moderate match. You have {matched} of {total} required skills.")
    } else {
        format!("Low match. You only have {matched} of {total} required skills.")
    }
}
