//! Inheritance — two parent genomes in, one offspring genome out
//!
//! Two digit formulas exist and callers pick one on purpose:
//! - `breed_genomes` (pedigree breeding, request completion): per digit,
//!   inherit the rounded parent average with probability
//!   `inheritance_ratio`, otherwise draw a fresh uniform digit
//! - `blend_genomes` (direct companion breeding): per digit,
//!   `floor(w * avg + (1 - w) * random) mod 7`

use super::{BreedingContext, BreedingError};
use crate::genome::{Base7Digit, Genome};
use crate::random::RandomSource;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Days an egg incubates after a successful breeding
pub const INCUBATION_DAYS: u32 = 7;

/// Rare abilities an offspring can be born with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAbility {
    CelestialResonance,
    TemporalEcho,
    ElementMastery,
    ShrineBlessing,
    SeasonalAttunement,
    AncientWisdom,
}

impl SpecialAbility {
    pub const CATALOG: [SpecialAbility; 6] = [
        SpecialAbility::CelestialResonance,
        SpecialAbility::TemporalEcho,
        SpecialAbility::ElementMastery,
        SpecialAbility::ShrineBlessing,
        SpecialAbility::SeasonalAttunement,
        SpecialAbility::AncientWisdom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpecialAbility::CelestialResonance => "Celestial Resonance",
            SpecialAbility::TemporalEcho => "Temporal Echo",
            SpecialAbility::ElementMastery => "Element Mastery",
            SpecialAbility::ShrineBlessing => "Shrine Blessing",
            SpecialAbility::SeasonalAttunement => "Seasonal Attunement",
            SpecialAbility::AncientWisdom => "Ancient Wisdom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SpecialAbility::CelestialResonance => "Enhanced emotional expression",
            SpecialAbility::TemporalEcho => "Remembers past interactions longer",
            SpecialAbility::ElementMastery => "Stronger yantra affinity",
            SpecialAbility::ShrineBlessing => "Permanent +10% kizuna gain",
            SpecialAbility::SeasonalAttunement => "Adapts to seasonal events faster",
            SpecialAbility::AncientWisdom => "Unlocks rare dialogue options",
        }
    }
}

/// Pedigree formula, drawn independently for all 180 digits
pub fn breed_genomes<R: RandomSource + ?Sized>(
    parent1: &Genome,
    parent2: &Genome,
    inheritance_ratio: f64,
    rng: &mut R,
) -> Genome {
    Genome::from_fn(|kind, i| {
        let a = parent1.strand(kind).digits()[i];
        let b = parent2.strand(kind).digits()[i];
        if rng.chance(inheritance_ratio) {
            Base7Digit::average(a, b)
        } else {
            rng.next_digit()
        }
    })
}

/// Blended formula: `floor(w * round((p1 + p2) / 2) + (1 - w) * random) mod 7`
pub fn blend_genomes<R: RandomSource + ?Sized>(
    parent1: &Genome,
    parent2: &Genome,
    blend_weight: f64,
    rng: &mut R,
) -> Genome {
    Genome::from_fn(|kind, i| {
        let avg = Base7Digit::average(parent1.strand(kind).digits()[i], parent2.strand(kind).digits()[i]);
        let noise = rng.next_digit();
        let mixed = blend_weight * avg.value() as f64 + (1.0 - blend_weight) * noise.value() as f64;
        Base7Digit::wrapping(mixed.floor() as i64)
    })
}

/// One Bernoulli trial; on success an ability picked uniformly from the catalog.
/// Parent ability strands play no part in the roll.
pub fn roll_special_ability<R: RandomSource + ?Sized>(chance: f64, rng: &mut R) -> Option<SpecialAbility> {
    if !rng.chance(chance) {
        return None;
    }
    let idx = rng.pick_index(SpecialAbility::CATALOG.len());
    Some(SpecialAbility::CATALOG[idx])
}

/// A companion offered for breeding
#[derive(Debug, Clone, Copy)]
pub struct Parent<'a> {
    /// Companion ID checked against the bond gate
    pub id: &'a str,
    pub genome: &'a Genome,
}

impl<'a> Parent<'a> {
    pub fn new(id: &'a str, genome: &'a Genome) -> Self {
        Self { id, genome }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BreedingPair<'a> {
    pub parent1: Parent<'a>,
    pub parent2: Parent<'a>,
    /// Shrine visited before breeding
    pub shrine_blessing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offspring {
    /// Blended genome of the egg
    pub genome: Genome,
    /// Human-readable summary of what was passed down
    pub inherited_traits: Vec<String>,
    /// Rare catalog ability, if the roll hit
    pub special_ability: Option<SpecialAbility>,
}

/// Result of a breeding attempt. A failed roll is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingOutcome {
    /// Whether the success roll passed
    pub success: bool,
    /// Present only on success
    pub offspring: Option<Offspring>,
    /// Why no egg was produced
    pub reason: Option<String>,
    /// 0 when no egg was produced
    pub incubation_days: u32,
    /// Probability the success roll was made against
    pub success_chance: f64,
}

/// `clamp(base + seasonal + shrine, 0, 1)`
pub fn success_chance(ctx: &BreedingContext<'_>, shrine_blessing: bool) -> f64 {
    let seasonal = ctx.calendar.current_breeding_bonus();
    let shrine = if shrine_blessing { ctx.config.shrine_bonus } else { 0.0 };
    (ctx.config.base_success_rate + seasonal + shrine).clamp(0.0, 1.0)
}

/// Direct companion-to-companion breeding.
///
/// Both parents are checked against the bond gate before anything is
/// drawn from `rng`; an ineligible parent is an error and consumes no
/// randomness. Then one success roll, and on success the blended genome
/// and the special-ability roll.
pub fn attempt_breeding<R: RandomSource + ?Sized>(
    ctx: &BreedingContext<'_>,
    pair: &BreedingPair<'_>,
    rng: &mut R,
) -> Result<BreedingOutcome, BreedingError> {
    for parent in [&pair.parent1, &pair.parent2] {
        if !ctx.gate.is_breeding_eligible(parent.id) {
            warn!("Breeding refused: '{}' has not reached the breeding bond level", parent.id);
            return Err(BreedingError::IneligibleParent {
                companion_id: parent.id.to_string(),
            });
        }
    }

    let chance = success_chance(ctx, pair.shrine_blessing);
    if !rng.chance(chance) {
        info!(
            "Breeding {} x {} unsuccessful (chance={:.2})",
            pair.parent1.id, pair.parent2.id, chance
        );
        return Ok(BreedingOutcome {
            success: false,
            offspring: None,
            reason: Some(
                "Breeding was unsuccessful. Try again during a seasonal event or visit a shrine.".into(),
            ),
            incubation_days: 0,
            success_chance: chance,
        });
    }

    let genome = blend_genomes(pair.parent1.genome, pair.parent2.genome, ctx.config.blend_weight, rng);
    let special_ability = roll_special_ability(ctx.config.special_ability_chance, rng);
    info!(
        "Bred {} x {} (chance={:.2}, rarity={}, ability={:?})",
        pair.parent1.id,
        pair.parent2.id,
        chance,
        genome.rarity_tier().name(),
        special_ability.map(SpecialAbility::name)
    );

    Ok(BreedingOutcome {
        success: true,
        offspring: Some(Offspring {
            genome,
            inherited_traits: vec![
                "Personality blend of both parents".into(),
                "Color combination".into(),
                "Element affinity fusion".into(),
            ],
            special_ability,
        }),
        reason: None,
        incubation_days: INCUBATION_DAYS,
        success_chance: chance,
    })
}
