use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::{Internship, LocationFields};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One listing as it appears in the source file, before location flattening.
///
/// Every field is optional so that a sparse record degrades to absent values
/// instead of failing the whole load. Unknown keys are collected into `extra`
/// and survive the round trip untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInternship {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub location: Option<LocationFields>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education_levels: Vec<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub women_empowerment: Option<bool>,
    #[serde(default)]
    pub gender_empowerment: Option<bool>,
    #[serde(default)]
    pub stipend: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawInternship {
    /// Flatten into the scoring model. Top-level location fields win over the
    /// nested `location` object; `women_empowerment` falls back to the legacy
    /// `gender_empowerment` flag. Total: a record with neither top-level nor
    /// nested location resolves to all-absent rather than erroring.
    pub fn resolve(self) -> Internship {
        let location = self.location.unwrap_or_default();

        Internship {
            state: self.state.or(location.state),
            district: self.district.or(location.district),
            city: self.city.or(location.city),
            skills: self.skills,
            education_levels: self.education_levels,
            sector: self.sector,
            women_empowerment: self
                .women_empowerment
                .or(self.gender_empowerment)
                .unwrap_or(false),
            stipend: self.stipend,
            extra: self.extra,
        }
    }
}

/// Distinct field values across the catalog, for populating selection UIs.
/// Everything is sorted so the view is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOptions {
    pub states: Vec<String>,
    pub sectors: Vec<String>,
    pub districts_by_state: BTreeMap<String, Vec<String>>,
    pub cities_by_state_district: BTreeMap<String, Vec<String>>,
}

/// The immutable internship catalog, loaded once at startup and shared
/// read-only across requests.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    internships: Vec<Internship>,
}

impl Catalog {
    pub fn from_records(internships: Vec<Internship>) -> Self {
        Self { internships }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: Vec<RawInternship> = serde_json::from_str(json)?;
        Ok(Self::from_records(
            raw.into_iter().map(RawInternship::resolve).collect(),
        ))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&contents).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn internships(&self) -> &[Internship] {
        &self.internships
    }

    pub fn len(&self) -> usize {
        self.internships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.internships.is_empty()
    }

    /// Aggregate the distinct states, sectors, districts-per-state and
    /// cities-per-(state, district) of the catalog. City maps are keyed
    /// `"{state}||{district}"`. Raw (unnormalized) values are reported, since
    /// this view feeds user-facing dropdowns.
    pub fn options(&self) -> CatalogOptions {
        let mut states = BTreeSet::new();
        let mut sectors = BTreeSet::new();
        let mut districts_by_state: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut cities: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for internship in &self.internships {
            if let Some(state) = internship.state.as_deref().filter(|s| !s.is_empty()) {
                states.insert(state.to_string());
                let districts = districts_by_state.entry(state.to_string()).or_default();

                if let Some(district) = internship.district.as_deref().filter(|d| !d.is_empty()) {
                    districts.insert(district.to_string());
                    let key = format!("{state}||{district}");
                    let city_set = cities.entry(key).or_default();

                    if let Some(city) = internship.city.as_deref().filter(|c| !c.is_empty()) {
                        city_set.insert(city.to_string());
                    }
                }
            }

            if let Some(sector) = internship.sector.as_deref().filter(|s| !s.is_empty()) {
                sectors.insert(sector.to_string());
            }
        }

        CatalogOptions {
            states: states.into_iter().collect(),
            sectors: sectors.into_iter().collect(),
            districts_by_state: districts_by_state
                .into_iter()
                .map(|(state, districts)| (state, districts.into_iter().collect()))
                .collect(),
            cities_by_state_district: cities
                .into_iter()
                .map(|(key, city_set)| (key, city_set.into_iter().collect()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn top_level_location_wins_over_nested() {
        let catalog = Catalog::from_json_str(
            r#"[{
                "title": "Frontend Intern",
                "state": "Maharashtra",
                "location": {"state": "Karnataka", "district": "Bengaluru Urban", "city": "Bengaluru"}
            }]"#,
        )
        .unwrap();

        let internship = &catalog.internships()[0];
        assert_eq!(internship.state.as_deref(), Some("Maharashtra"));
        assert_eq!(internship.district.as_deref(), Some("Bengaluru Urban"));
        assert_eq!(internship.city.as_deref(), Some("Bengaluru"));
    }

    #[test]
    fn flattening_tolerates_fully_absent_location() {
        let catalog = Catalog::from_json_str(r#"[{"title": "Remote Research Intern"}]"#).unwrap();

        let internship = &catalog.internships()[0];
        assert_eq!(internship.state, None);
        assert_eq!(internship.district, None);
        assert_eq!(internship.city, None);
        assert!(!internship.women_empowerment);
        assert_eq!(internship.stipend, None);
    }

    #[test]
    fn legacy_gender_empowerment_flag_is_honored() {
        let catalog = Catalog::from_json_str(
            r#"[
                {"gender_empowerment": true},
                {"women_empowerment": false, "gender_empowerment": true},
                {"women_empowerment": true}
            ]"#,
        )
        .unwrap();

        let flags: Vec<_> = catalog
            .internships()
            .iter()
            .map(|i| i.women_empowerment)
            .collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn pass_through_fields_survive_serialization() {
        let catalog = Catalog::from_json_str(
            r#"[{"title": "Data Intern", "organization": "NITI Aayog", "stipend": 9000}]"#,
        )
        .unwrap();

        let value = serde_json::to_value(&catalog.internships()[0]).unwrap();
        assert_eq!(value["title"], "Data Intern");
        assert_eq!(value["organization"], "NITI Aayog");
        assert_eq!(value["stipend"], 9000.0);
    }

    #[test]
    fn load_fails_on_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/internships.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn load_fails_on_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = Catalog::load(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn options_aggregates_sorted_distinct_values() {
        let catalog = Catalog::from_json_str(
            r#"[
                {"state": "Maharashtra", "district": "Pune", "city": "Pune", "sector": "Technology"},
                {"state": "Maharashtra", "district": "Pune", "city": "Pimpri-Chinchwad", "sector": "Manufacturing"},
                {"state": "Maharashtra", "district": "Mumbai Suburban", "city": "Mumbai", "sector": "Technology"},
                {"state": "Karnataka", "sector": "Agriculture"},
                {"sector": "Healthcare"}
            ]"#,
        )
        .unwrap();

        let options = catalog.options();

        assert_eq!(options.states, vec!["Karnataka", "Maharashtra"]);
        assert_eq!(
            options.sectors,
            vec!["Agriculture", "Healthcare", "Manufacturing", "Technology"]
        );
        assert_eq!(
            options.districts_by_state["Maharashtra"],
            vec!["Mumbai Suburban", "Pune"]
        );
        // a state without districts still appears, with an empty list
        assert_eq!(options.districts_by_state["Karnataka"], Vec::<String>::new());
        assert_eq!(
            options.cities_by_state_district["Maharashtra||Pune"],
            vec!["Pimpri-Chinchwad", "Pune"]
        );
    }
}
