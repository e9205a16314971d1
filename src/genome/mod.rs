//! Genome — three base-7 strands that define a companion
//!
//! A genome = personality strand + appearance strand + ability strand,
//! each exactly 60 digits in `0..=6`. Everything a companion is (temper,
//! look, rare powers) is decoded from these digits.

mod codec;
mod digit;
mod strand;
mod traits;

pub use codec::{deserialize_genome, serialize_genome, GenomeRecord};
pub use digit::{Base7Digit, DriftDirection};
pub use strand::{Strand, StrandKind, STRAND_LEN};
pub use traits::{
    AppearanceTraits, PersonalityAxis, PersonalityScores, RarityTier, SpecialAbilities, AXIS_COUNT,
    FEATURE_COUNT,
};

use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Total digit positions across all strands
pub const GENOME_DIGITS: usize = STRAND_LEN * 3;

/// The genome of one companion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GenomeRecord", into = "GenomeRecord")]
pub struct Genome {
    pub personality: Strand,
    pub appearance: Strand,
    pub ability: Strand,
}

impl Genome {
    pub fn new(personality: Strand, appearance: Strand, ability: Strand) -> Self {
        Self {
            personality,
            appearance,
            ability,
        }
    }

    /// Three independent random strands
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self {
            personality: Strand::random(rng),
            appearance: Strand::random(rng),
            ability: Strand::random(rng),
        }
    }

    /// Encode `scores` into the personality strand; the rest is random
    pub fn with_personality<R: RandomSource + ?Sized>(scores: &PersonalityScores, rng: &mut R) -> Self {
        Self {
            personality: scores.encode(rng),
            appearance: Strand::random(rng),
            ability: Strand::random(rng),
        }
    }

    /// Build each strand from a per-position function over the kind
    pub fn from_fn(mut f: impl FnMut(StrandKind, usize) -> Base7Digit) -> Self {
        Self {
            personality: Strand::from_fn(|i| f(StrandKind::Personality, i)),
            appearance: Strand::from_fn(|i| f(StrandKind::Appearance, i)),
            ability: Strand::from_fn(|i| f(StrandKind::Ability, i)),
        }
    }

    pub fn strand(&self, kind: StrandKind) -> &Strand {
        match kind {
            StrandKind::Personality => &self.personality,
            StrandKind::Appearance => &self.appearance,
            StrandKind::Ability => &self.ability,
        }
    }

    pub fn personality_scores(&self) -> PersonalityScores {
        PersonalityScores::from_strand(&self.personality)
    }

    pub fn appearance_traits(&self) -> AppearanceTraits {
        AppearanceTraits::from_strand(&self.appearance)
    }

    pub fn abilities(&self) -> SpecialAbilities {
        SpecialAbilities::from_strand(&self.ability)
    }

    pub fn rarity_tier(&self) -> RarityTier {
        RarityTier::from_rarity(self.abilities().rarity)
    }

    /// Mean absolute digit difference over all 180 positions, in `[0, 6]`
    pub fn distance(&self, other: &Genome) -> f64 {
        let total: u32 = StrandKind::ALL
            .iter()
            .map(|k| self.strand(*k).manhattan(other.strand(*k)))
            .sum();
        total as f64 / GENOME_DIGITS as f64
    }

    /// Personality drift on a copy of this genome
    pub fn with_drift<R: RandomSource + ?Sized>(
        &self,
        axis: PersonalityAxis,
        direction: DriftDirection,
        amount: usize,
        rng: &mut R,
    ) -> Genome {
        Genome {
            personality: self.personality.drift(axis, direction, amount, rng),
            ..self.clone()
        }
    }

    /// SHA-256 over the three strand strings
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for kind in StrandKind::ALL {
            hasher.update(kind.label().as_bytes());
            hasher.update(self.strand(kind).to_string().as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenomeError {
    #[error("Invalid base-7 digit '{found}' at position {position} of {strand} strand")]
    InvalidDigit {
        strand: String,
        position: usize,
        found: char,
    },

    #[error("{strand} strand has {length} digits, expected 60")]
    InvalidLength { strand: String, length: usize },

    #[error("Digit value {0} is outside 0..=6")]
    DigitOutOfRange(u8),

    #[error("Malformed genome: {0}")]
    Malformed(String),
}
