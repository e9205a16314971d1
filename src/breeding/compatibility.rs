//! Compatibility — advisory prediction for a candidate pair
//!
//! Pure: reads genomes and the bond gate, never draws randomness and
//! never mutates anything.

use super::{BondGate, Parent};
use crate::genome::{Base7Digit, PersonalityScores, RarityTier};
use log::debug;
use serde::{Deserialize, Serialize};

/// How genetic distance classifies a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBand {
    /// distance < 1
    TooSimilar,
    /// 2 <= distance <= 4
    SweetSpot,
    /// distance > 5
    TooDifferent,
    /// everything else
    Ordinary,
}

impl DistanceBand {
    /// Step table; the sweet spot is checked first and is inclusive at both ends
    pub fn for_distance(distance: f64) -> Self {
        if (2.0..=4.0).contains(&distance) {
            DistanceBand::SweetSpot
        } else if distance < 1.0 {
            DistanceBand::TooSimilar
        } else if distance > 5.0 {
            DistanceBand::TooDifferent
        } else {
            DistanceBand::Ordinary
        }
    }

    pub fn success_rate(self) -> f64 {
        match self {
            DistanceBand::SweetSpot => 0.8,
            DistanceBand::TooSimilar => 0.3,
            DistanceBand::TooDifferent => 0.4,
            DistanceBand::Ordinary => 0.5,
        }
    }
}

pub fn success_rate_for_distance(distance: f64) -> f64 {
    DistanceBand::for_distance(distance).success_rate()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityRange {
    pub min: PersonalityScores,
    pub max: PersonalityScores,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedTraits {
    pub personality_range: PersonalityRange,
    pub rarity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingCompatibility {
    pub compatible: bool,
    /// Set when `compatible` is false
    pub reason: Option<String>,
    pub success_rate: f64,
    pub distance: f64,
    pub band: Option<DistanceBand>,
    pub predicted_traits: Option<PredictedTraits>,
}

impl BreedingCompatibility {
    fn incompatible(reason: String) -> Self {
        Self {
            compatible: false,
            reason: Some(reason),
            success_rate: 0.0,
            distance: 0.0,
            band: None,
            predicted_traits: None,
        }
    }

    /// One-paragraph summary for the breeding screen
    pub fn prediction_message(&self, parent1_name: &str, parent2_name: &str) -> String {
        let rate = if self.success_rate > 0.7 {
            "high"
        } else if self.success_rate > 0.4 {
            "moderate"
        } else {
            "low"
        };
        let rarity = self.predicted_traits.as_ref().map(|t| t.rarity).unwrap_or(0);
        format!(
            "Breeding {} and {}:\nSuccess rate: {} ({}%)\nExpected rarity: {}",
            parent1_name,
            parent2_name,
            rate,
            (self.success_rate * 100.0).round() as u32,
            RarityTier::from_rarity(rarity).name()
        )
    }
}

/// `round(mean) + offset` per axis, clamped
fn shifted_average(a: &PersonalityScores, b: &PersonalityScores, offset: i64) -> PersonalityScores {
    PersonalityScores::from_fn(|axis| {
        let avg = Base7Digit::average(a.get(axis), b.get(axis));
        Base7Digit::clamped(avg.value() as i64 + offset)
    })
}

/// Predict the outcome of breeding `parent1` with `parent2`
pub fn analyze_compatibility<G: BondGate + ?Sized>(
    gate: &G,
    parent1: &Parent<'_>,
    parent2: &Parent<'_>,
) -> BreedingCompatibility {
    for parent in [parent1, parent2] {
        if !gate.is_breeding_eligible(parent.id) {
            return BreedingCompatibility::incompatible(format!(
                "Both companions must reach kizuna level 7 (Reincarnation) to breed; '{}' has not",
                parent.id
            ));
        }
    }

    let distance = parent1.genome.distance(parent2.genome);
    let band = DistanceBand::for_distance(distance);

    let p1 = parent1.genome.personality_scores();
    let p2 = parent2.genome.personality_scores();
    let personality_range = PersonalityRange {
        min: shifted_average(&p1, &p2, -1),
        max: shifted_average(&p1, &p2, 1),
    };

    let r1 = parent1.genome.abilities().rarity as f64;
    let r2 = parent2.genome.abilities().rarity as f64;
    let rarity = ((r1 + r2) / 2.0 + 1.0).round().min(6.0) as u8;

    debug!(
        "Compatibility {} x {}: distance={:.3} band={:?} rarity={}",
        parent1.id, parent2.id, distance, band, rarity
    );

    BreedingCompatibility {
        compatible: true,
        reason: None,
        success_rate: band.success_rate(),
        distance,
        band: Some(band),
        predicted_traits: Some(PredictedTraits {
            personality_range,
            rarity,
        }),
    }
}
