/// Scoring weights. The four topical weights sum to 1.0; the two flat bonuses
/// sit on top, so the maximum reachable total is 1.10. That overshoot is the
/// documented contract, not a normalization bug.
pub const MATCH_WEIGHTS: Weights = Weights {
    location: 0.25,
    skills: 0.35,
    education: 0.20,
    sector: 0.20,
    women_bonus: 0.05,
    stipend_bonus: 0.05,
};

/// Listings paying at least this stipend earn the stipend bonus.
pub const STIPEND_BONUS_THRESHOLD: f64 = 8000.0;

#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub location: f64,
    pub skills: f64,
    pub education: f64,
    pub sector: f64,
    pub women_bonus: f64,
    pub stipend_bonus: f64,
}

impl Weights {
    pub fn topical_sum(&self) -> f64 {
        self.location + self.skills + self.education + self.sector
    }

    pub fn max_total(&self) -> f64 {
        self.topical_sum() + self.women_bonus + self.stipend_bonus
    }
}
