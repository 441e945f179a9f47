use serde::Serialize;

use crate::normalize::normalize_text;
use crate::{Candidate, Internship};

use super::location::score_location;
use super::skills::score_skills;
use super::weights::{MATCH_WEIGHTS, STIPEND_BONUS_THRESHOLD};

/// One scored (candidate, internship) pair.
///
/// `why` keeps the fixed evaluation order: location, skills, education,
/// sector, women-empowerment bonus, stipend bonus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMatch {
    pub score: f64,
    pub internship: Internship,
    pub why: Vec<String>,
}

/// Score one internship for a candidate.
///
/// Each field matcher runs exactly once, in the fixed order above; their
/// contributions are summed and the total is rounded to 4 decimal places
/// (half away from zero, i.e. `f64::round` on the scaled value). Total over
/// all well-formed inputs: absent fields contribute 0 rather than failing.
pub fn score_internship(candidate: &Candidate, internship: &Internship) -> ScoredMatch {
    let mut total = 0.0;
    let mut why = Vec::new();

    let (location_score, location_why) = score_location(candidate, internship);
    total += location_score;
    why.extend(location_why);

    let (skill_score, skill_why) = score_skills(&candidate.skills, &internship.skills);
    total += skill_score;
    why.extend(skill_why);

    if education_fits(candidate, internship) {
        total += MATCH_WEIGHTS.education;
        if let Some(education) = candidate.education.as_deref() {
            why.push(format!("Education fits: {education}"));
        }
    }

    if sector_matches(candidate, internship) {
        total += MATCH_WEIGHTS.sector;
        if let Some(sector) = internship.sector.as_deref().filter(|s| !s.trim().is_empty()) {
            why.push(format!("Sector preference: {sector}"));
        }
    }

    if internship.women_empowerment {
        total += MATCH_WEIGHTS.women_bonus;
        why.push("Supports women empowerment".to_string());
    }

    let stipend = internship.stipend.unwrap_or(0.0);
    if stipend >= STIPEND_BONUS_THRESHOLD {
        total += MATCH_WEIGHTS.stipend_bonus;
        why.push(format!("Stipend ≥ ₹8000 (₹{stipend})"));
    }

    ScoredMatch {
        score: round4(total),
        internship: internship.clone(),
        why,
    }
}

fn education_fits(candidate: &Candidate, internship: &Internship) -> bool {
    let Some(education) = normalize_text(candidate.education.as_deref()) else {
        return false;
    };

    internship
        .education_levels
        .iter()
        .any(|level| normalize_text(Some(level.as_str())).as_deref() == Some(education.as_str()))
}

fn sector_matches(candidate: &Candidate, internship: &Internship) -> bool {
    matches!(
        (
            normalize_text(candidate.sector.as_deref()),
            normalize_text(internship.sector.as_deref()),
        ),
        (Some(a), Some(b)) if a == b
    )
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
