use std::cmp::Ordering;

use thiserror::Error;

use crate::{Candidate, Internship};

use super::scoring::{score_internship, ScoredMatch};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
    #[error("top_k must be a positive integer")]
    InvalidTopK,
}

/// Score every listing for the candidate and return the top `top_k` results,
/// sorted descending by score.
///
/// `top_k == 0` is a caller bug and is rejected instead of being clamped; the
/// HTTP boundary applies its own default before calling in. The sort is
/// stable, so equal-score listings keep their catalog order and repeated runs
/// over the same inputs produce identical output.
pub fn rank(
    candidate: &Candidate,
    internships: &[Internship],
    top_k: usize,
) -> Result<Vec<ScoredMatch>, RankError> {
    if top_k == 0 {
        return Err(RankError::InvalidTopK);
    }

    let mut scored: Vec<_> = internships
        .iter()
        .map(|internship| score_internship(candidate, internship))
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(top_k);

    Ok(scored)
}
