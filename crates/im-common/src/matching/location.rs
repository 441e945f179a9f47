use crate::normalize::normalize_text;
use crate::{Candidate, Internship};

use super::weights::MATCH_WEIGHTS;

// Tier fractions of the shared location weight budget.
const STATE_TIER: f64 = 0.40;
const DISTRICT_TIER: f64 = 0.35;
const CITY_TIER: f64 = 0.25;

/// Hierarchical location match across three independent tiers.
///
/// Each tier scores only when both sides normalize to a non-empty value and
/// those values are equal. Requiring both sides to be present is what keeps a
/// doubly-absent field (e.g. neither side names a district) from counting as
/// a match. Tiers do not depend on each other: a candidate may match on
/// district while omitting state entirely.
pub fn score_location(candidate: &Candidate, internship: &Internship) -> (f64, Vec<String>) {
    let mut score = 0.0;
    let mut why = Vec::new();

    if tier_matches(candidate.state.as_deref(), internship.state.as_deref()) {
        score += MATCH_WEIGHTS.location * STATE_TIER;
        if let Some(state) = non_empty(internship.state.as_deref()) {
            why.push(format!("State match: {state}"));
        }
    }

    if tier_matches(candidate.district.as_deref(), internship.district.as_deref()) {
        score += MATCH_WEIGHTS.location * DISTRICT_TIER;
        if let Some(district) = non_empty(internship.district.as_deref()) {
            why.push(format!("District match: {district}"));
        }
    }

    if tier_matches(candidate.city.as_deref(), internship.city.as_deref()) {
        score += MATCH_WEIGHTS.location * CITY_TIER;
        if let Some(city) = non_empty(internship.city.as_deref()) {
            why.push(format!("City match: {city}"));
        }
    }

    (score, why)
}

fn tier_matches(candidate: Option<&str>, internship: Option<&str>) -> bool {
    matches!(
        (normalize_text(candidate), normalize_text(internship)),
        (Some(a), Some(b)) if a == b
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
