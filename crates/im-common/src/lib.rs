pub mod api;
pub mod catalog;
pub mod logging;
pub mod matching;
pub mod normalize;

use serde::{Deserialize, Serialize};

/// One internship opportunity in the catalog. Loaded once at startup and
/// immutable afterwards.
///
/// Location fields are already flattened: top-level `state`/`district`/`city`
/// from the source record win over a nested `location` object, and the legacy
/// `gender_empowerment` flag has been folded into `women_empowerment`.
/// Display-only attributes (title, organization, ...) live in `extra` and are
/// passed through to responses untouched; scoring never reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Internship {
    pub state: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub skills: Vec<String>,
    pub education_levels: Vec<String>,
    pub sector: Option<String>,
    pub women_empowerment: bool,
    pub stipend: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Candidate profile built from one recommend request. Never persisted.
///
/// `name` and `gender` are descriptive only; scoring ignores them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub education: Option<String>,
    pub skills: Vec<String>,
    pub sector: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
}

/// Nested location object accepted on both listings and candidate payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationFields {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}
