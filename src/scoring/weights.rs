//! Effective weight computation. Culture is the only optional dimension:
//! when a job declares no culture attributes, its weight is redistributed
//! proportionally across the other three so that the weights of present
//! components always sum to 1.0.

use crate::config::ComponentWeights;

/// Weights actually applied to one scoring run.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    /// None when the job declares no culture attributes.
    pub culture: Option<f64>,
}

impl EffectiveWeights {
    pub fn resolve(base: ComponentWeights, culture_present: bool) -> Self {
        if culture_present {
            return Self {
                skills: base.skills,
                experience: base.experience,
                education: base.education,
                culture: Some(base.culture),
            };
        }

        // Redistribute the culture weight proportionally over the rest.
        let remainder = base.skills + base.experience + base.education;
        Self {
            skills: base.skills / remainder,
            experience: base.experience / remainder,
            education: base.education / remainder,
            culture: None,
        }
    }

    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.education + self.culture.unwrap_or(0.0)
    }
}
