//! Typed trait views decoded from the three strands
//!
//! Personality is spread over 7 contiguous sections of the personality
//! strand. With 60 digits and 7 axes, each section holds 8 digits and the
//! first 4 sections take one extra, so the sections are
//! `0..9, 9..18, 18..27, 27..36, 36..44, 44..52, 52..60`.

use super::{Base7Digit, Strand, STRAND_LEN};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The seven personality axes, in strand order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityAxis {
    /// 0 = shy, 6 = outgoing
    Shyness,
    /// 0 = logical, 6 = emotional
    Emotionality,
    /// 0 = calm, 6 = energetic
    Energy,
    /// 0 = solitary, 6 = social
    Sociability,
    /// 0 = cautious, 6 = brave
    Bravery,
    /// 0 = practical, 6 = creative
    Creativity,
    /// 0 = conservative, 6 = open
    Openness,
}

pub const AXIS_COUNT: usize = 7;

impl PersonalityAxis {
    pub const ALL: [PersonalityAxis; AXIS_COUNT] = [
        PersonalityAxis::Shyness,
        PersonalityAxis::Emotionality,
        PersonalityAxis::Energy,
        PersonalityAxis::Sociability,
        PersonalityAxis::Bravery,
        PersonalityAxis::Creativity,
        PersonalityAxis::Openness,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PersonalityAxis::Shyness => "shyness",
            PersonalityAxis::Emotionality => "emotionality",
            PersonalityAxis::Energy => "energy",
            PersonalityAxis::Sociability => "sociability",
            PersonalityAxis::Bravery => "bravery",
            PersonalityAxis::Creativity => "creativity",
            PersonalityAxis::Openness => "openness",
        }
    }

    /// Positions of this axis in the personality strand
    pub fn section(self) -> Range<usize> {
        let base = STRAND_LEN / AXIS_COUNT;
        let extra = STRAND_LEN % AXIS_COUNT;
        let i = self.index();
        let start = i * base + i.min(extra);
        let len = base + usize::from(i < extra);
        start..start + len
    }
}

/// One score per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalityScores {
    pub shyness: Base7Digit,
    pub emotionality: Base7Digit,
    pub energy: Base7Digit,
    pub sociability: Base7Digit,
    pub bravery: Base7Digit,
    pub creativity: Base7Digit,
    pub openness: Base7Digit,
}

impl PersonalityScores {
    pub fn from_fn(mut f: impl FnMut(PersonalityAxis) -> Base7Digit) -> Self {
        Self {
            shyness: f(PersonalityAxis::Shyness),
            emotionality: f(PersonalityAxis::Emotionality),
            energy: f(PersonalityAxis::Energy),
            sociability: f(PersonalityAxis::Sociability),
            bravery: f(PersonalityAxis::Bravery),
            creativity: f(PersonalityAxis::Creativity),
            openness: f(PersonalityAxis::Openness),
        }
    }

    pub fn get(&self, axis: PersonalityAxis) -> Base7Digit {
        match axis {
            PersonalityAxis::Shyness => self.shyness,
            PersonalityAxis::Emotionality => self.emotionality,
            PersonalityAxis::Energy => self.energy,
            PersonalityAxis::Sociability => self.sociability,
            PersonalityAxis::Bravery => self.bravery,
            PersonalityAxis::Creativity => self.creativity,
            PersonalityAxis::Openness => self.openness,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonalityAxis, Base7Digit)> + '_ {
        PersonalityAxis::ALL.into_iter().map(move |axis| (axis, self.get(axis)))
    }

    /// Decode: rounded mean of each axis section
    pub fn from_strand(strand: &Strand) -> Self {
        Self::from_fn(|axis| {
            let section = strand.slice(axis.section());
            let sum: u32 = section.iter().map(|d| d.value() as u32).sum();
            let mean = sum as f64 / section.len() as f64;
            Base7Digit::clamped(mean.round() as i64)
        })
    }

    /// Encode with drift capacity: every position gets the axis score
    /// plus an independent offset in `{-1, 0, 1}`, clamped. Decoding the
    /// result usually, but not always, gives back `self`.
    pub fn encode<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Strand {
        let mut digits = Vec::with_capacity(STRAND_LEN);
        for (axis, score) in self.iter() {
            for _ in axis.section() {
                digits.push(Base7Digit::clamped(score.value() as i64 + rng.next_offset()));
            }
        }
        Strand::padded(&digits, rng)
    }
}

/// Decoded appearance fields (digits 0..15 of the appearance strand)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceTraits {
    /// 0 = spherical, 6 = elongated
    pub body_shape: u8,
    /// 0 = tiny, 6 = large
    pub size: u8,
    pub primary_color: u8,
    pub secondary_color: u8,
    /// solid, gradient, spots, stripes, ...
    pub pattern: u8,
    /// Feature ids, ten digits
    pub features: Vec<u8>,
}

pub const FEATURE_COUNT: usize = 10;

impl AppearanceTraits {
    pub fn from_strand(strand: &Strand) -> Self {
        let d = strand.digits();
        Self {
            body_shape: d[0].value(),
            size: d[1].value(),
            primary_color: d[2].value(),
            secondary_color: d[3].value(),
            pattern: d[4].value(),
            features: strand.slice(5..5 + FEATURE_COUNT).iter().map(|x| x.value()).collect(),
        }
    }

    /// Encode the five fields and up to ten features (each reduced mod 7),
    /// then pad with random digits.
    pub fn encode<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Strand {
        let mut digits: Vec<Base7Digit> = [
            self.body_shape,
            self.size,
            self.primary_color,
            self.secondary_color,
            self.pattern,
        ]
        .iter()
        .map(|v| Base7Digit::wrapping(*v as i64))
        .collect();
        digits.extend(
            self.features
                .iter()
                .take(FEATURE_COUNT)
                .map(|f| Base7Digit::wrapping(*f as i64)),
        );
        Strand::padded(&digits, rng)
    }
}

/// Decoded ability fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialAbilities {
    /// `min(6, sixes / 10)`
    pub rarity: u8,
    /// Power ids, digits 0..10
    pub special_powers: Vec<u8>,
    /// Seasonal affinities, digits 10..17
    pub affinities: Vec<u8>,
}

impl SpecialAbilities {
    pub fn from_strand(strand: &Strand) -> Self {
        let sixes = strand.count(Base7Digit::MAX);
        Self {
            rarity: (sixes / 10).min(6) as u8,
            special_powers: strand.slice(0..10).iter().map(|d| d.value()).collect(),
            affinities: strand.slice(10..17).iter().map(|d| d.value()).collect(),
        }
    }
}

/// Display tier for a rarity value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Eternal,
}

impl RarityTier {
    /// Values past 6 saturate at `Eternal`
    pub fn from_rarity(rarity: u8) -> Self {
        match rarity {
            0 => RarityTier::Common,
            1 => RarityTier::Uncommon,
            2 => RarityTier::Rare,
            3 => RarityTier::Epic,
            4 => RarityTier::Legendary,
            5 => RarityTier::Mythic,
            _ => RarityTier::Eternal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RarityTier::Common => "Common",
            RarityTier::Uncommon => "Uncommon",
            RarityTier::Rare => "Rare",
            RarityTier::Epic => "Epic",
            RarityTier::Legendary => "Legendary",
            RarityTier::Mythic => "Mythic",
            RarityTier::Eternal => "Eternal",
        }
    }
}
