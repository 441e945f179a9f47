use std::collections::BTreeSet;

use crate::normalize::normalize_set;

use super::weights::MATCH_WEIGHTS;

/// Jaccard similarity over two normalized skill sets.
///
/// Either side being empty yields 0.0 by definition. An empty intersection
/// over an empty union is zero similarity here, never a division error.
pub fn jaccard_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Skill overlap score plus a single reason naming the overlapping skills in
/// lexicographic order.
pub fn score_skills(candidate_skills: &[String], internship_skills: &[String]) -> (f64, Vec<String>) {
    let candidate_set = normalize_set(candidate_skills);
    let internship_set = normalize_set(internship_skills);

    let score = jaccard_similarity(&candidate_set, &internship_set) * MATCH_WEIGHTS.skills;
    if score <= 0.0 {
        return (0.0, Vec::new());
    }

    // BTreeSet intersection iterates in sorted order already.
    let overlap: Vec<_> = candidate_set
        .intersection(&internship_set)
        .cloned()
        .collect();

    (score, vec![format!("Skills overlap: {}", overlap.join(", "))])
}
