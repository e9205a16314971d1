//! Strand — a fixed run of 60 base-7 digits
//!
//! Three strands make a genome. Builders that produce fewer or more
//! digits are padded with random digits or truncated, so a `Strand`
//! value always holds exactly `STRAND_LEN` digits.

use super::{Base7Digit, DriftDirection, GenomeError, PersonalityAxis};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Digits per strand
pub const STRAND_LEN: usize = 60;

/// Which of the three strands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrandKind {
    /// Personality dominance (7 axes)
    Personality,
    /// Appearance blueprint (first 15 digits used)
    Appearance,
    /// Special abilities and rarity
    Ability,
}

impl StrandKind {
    pub const ALL: [StrandKind; 3] = [StrandKind::Personality, StrandKind::Appearance, StrandKind::Ability];

    pub fn label(self) -> &'static str {
        match self {
            StrandKind::Personality => "personality",
            StrandKind::Appearance => "appearance",
            StrandKind::Ability => "ability",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Strand([Base7Digit; STRAND_LEN]);

impl Strand {
    pub fn from_digits(digits: [Base7Digit; STRAND_LEN]) -> Self {
        Self(digits)
    }

    /// Build a `kind` strand from a slice that must be exactly `STRAND_LEN` long
    pub fn from_slice(digits: &[Base7Digit], kind: StrandKind) -> Result<Self, GenomeError> {
        let arr: [Base7Digit; STRAND_LEN] = digits.try_into().map_err(|_| GenomeError::InvalidLength {
            strand: kind.label().into(),
            length: digits.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn from_fn(f: impl FnMut(usize) -> Base7Digit) -> Self {
        Self(std::array::from_fn(f))
    }

    /// A strand with every digit equal to `digit`
    pub fn uniform(digit: Base7Digit) -> Self {
        Self([digit; STRAND_LEN])
    }

    /// 60 independent uniform digits
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::from_fn(|_| rng.next_digit())
    }

    /// Truncate `prefix` to 60 digits, or pad it with random digits
    pub fn padded<R: RandomSource + ?Sized>(prefix: &[Base7Digit], rng: &mut R) -> Self {
        Self::from_fn(|i| match prefix.get(i) {
            Some(d) => *d,
            None => rng.next_digit(),
        })
    }

    /// Parse a 60-character string of `'0'..='6'` without clamping
    pub fn parse(input: &str, kind: StrandKind) -> Result<Self, GenomeError> {
        let length = input.chars().count();
        if length != STRAND_LEN {
            return Err(GenomeError::InvalidLength {
                strand: kind.label().into(),
                length,
            });
        }
        let mut digits = [Base7Digit::MIN; STRAND_LEN];
        for (position, c) in input.chars().enumerate() {
            digits[position] = Base7Digit::from_char(c).ok_or_else(|| GenomeError::InvalidDigit {
                strand: kind.label().into(),
                position,
                found: c,
            })?;
        }
        Ok(Self(digits))
    }

    pub fn digits(&self) -> &[Base7Digit; STRAND_LEN] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<Base7Digit> {
        self.0.get(index).copied()
    }

    pub fn slice(&self, range: Range<usize>) -> &[Base7Digit] {
        &self.0[range]
    }

    pub fn iter(&self) -> impl Iterator<Item = Base7Digit> + '_ {
        self.0.iter().copied()
    }

    /// Occurrences of `digit`
    pub fn count(&self, digit: Base7Digit) -> usize {
        self.0.iter().filter(|d| **d == digit).count()
    }

    /// Sum of absolute per-position differences
    pub fn manhattan(&self, other: &Strand) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.abs_diff(*b) as u32)
            .sum()
    }

    /// Move `amount` randomly chosen digits of one axis section one step
    /// in `direction`. Returns a new strand; `self` is untouched.
    pub fn drift<R: RandomSource + ?Sized>(
        &self,
        axis: PersonalityAxis,
        direction: DriftDirection,
        amount: usize,
        rng: &mut R,
    ) -> Strand {
        let section = axis.section();
        let mut digits = self.0;
        for _ in 0..amount {
            let idx = section.start + rng.pick_index(section.len());
            digits[idx] = digits[idx].drift(direction);
        }
        log::debug!("Drifted {} by {:?} x{}", axis.name(), direction, amount);
        Strand(digits)
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.0 {
            write!(f, "{}", d.to_char())?;
        }
        Ok(())
    }
}
