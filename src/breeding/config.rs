//! BreedingConfig — tunable constants of the inheritance engine
//!
//! Defaults are the shipped game balance. Configs load from JSON so a
//! balance patch does not need a rebuild.

use super::BreedingError;
use serde::{Deserialize, Serialize};

/// What `BreedingRequest::complete` does before incubation has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarlyCompletion {
    /// Complete anyway; readiness is the caller's check
    #[default]
    Allow,
    /// Refuse with `BreedingError::IncubationIncomplete`
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedingConfig {
    /// Per-digit probability of inheriting the parent average (pedigree formula)
    pub inheritance_ratio: f64,
    /// Parent weight of the blended formula; random weight is `1 - blend_weight`
    pub blend_weight: f64,
    /// Chance an offspring receives a catalog ability
    pub special_ability_chance: f64,
    /// Success chance before seasonal and shrine bonuses
    pub base_success_rate: f64,
    /// Added to the success chance when the pair carries a shrine blessing
    pub shrine_bonus: f64,
    pub early_completion: EarlyCompletion,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            inheritance_ratio: 0.6,
            blend_weight: 0.6,
            special_ability_chance: 0.05,
            base_success_rate: 0.7,
            shrine_bonus: 1.0,
            early_completion: EarlyCompletion::Allow,
        }
    }
}

impl BreedingConfig {
    /// Default balance, but incubation must finish before completion
    pub fn strict() -> Self {
        Self {
            early_completion: EarlyCompletion::Reject,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, BreedingError> {
        let config: BreedingConfig =
            serde_json::from_str(json).map_err(|e| BreedingError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Every probability and weight must lie in `[0, 1]`
    pub fn validate(&self) -> Result<(), BreedingError> {
        let unit = [
            ("inheritance_ratio", self.inheritance_ratio),
            ("blend_weight", self.blend_weight),
            ("special_ability_chance", self.special_ability_chance),
            ("base_success_rate", self.base_success_rate),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(BreedingError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if !self.shrine_bonus.is_finite() || self.shrine_bonus < 0.0 {
            return Err(BreedingError::InvalidConfig(format!(
                "shrine_bonus must be a non-negative number, got {}",
                self.shrine_bonus
            )));
        }
        Ok(())
    }
}
