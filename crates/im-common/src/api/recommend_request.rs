use serde::Deserialize;

use crate::{Candidate, LocationFields};

/// Candidate payload for `POST /recommend`.
///
/// Accepts both current and legacy key names (`education`/`education_level`,
/// `sector`/`sector_interest`) and location either as flat fields or nested
/// under `location`. Precedence is resolved once in [`into_candidate`], not
/// inside the scoring code.
///
/// [`into_candidate`]: RecommendRequest::into_candidate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub sector_interest: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub location: Option<LocationFields>,
}

impl RecommendRequest {
    /// Resolve fallbacks into a scoring-ready candidate: flat location fields
    /// win over the nested object, `education` over `education_level`,
    /// `sector` over `sector_interest`.
    pub fn into_candidate(self) -> Candidate {
        let location = self.location.unwrap_or_default();

        Candidate {
            name: self.name,
            gender: self.gender,
            education: self.education.or(self.education_level),
            skills: self.skills,
            sector: self.sector.or(self.sector_interest),
            state: self.state.or(location.state),
            district: self.district.or(location.district),
            city: self.city.or(location.city),
        }
    }
}
