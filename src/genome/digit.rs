//! Base7Digit — the smallest unit of a companion genome

use super::GenomeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a personality drift step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftDirection {
    Decrease,
    Increase,
}

impl DriftDirection {
    pub fn delta(self) -> i64 {
        match self {
            DriftDirection::Decrease => -1,
            DriftDirection::Increase => 1,
        }
    }
}

/// A digit in `0..=6`. Every constructor clamps, wraps, or rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Base7Digit(u8);

impl Base7Digit {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(6);

    /// `None` if `value > 6`
    pub fn new(value: u8) -> Option<Self> {
        (value <= 6).then_some(Self(value))
    }

    /// Saturate into `0..=6`
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 6) as u8)
    }

    /// Reduce modulo 7
    pub fn wrapping(value: i64) -> Self {
        Self(value.rem_euclid(7) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// `round((a + b) / 2)`, halves rounding up
    pub fn average(a: Self, b: Self) -> Self {
        Self((a.0 + b.0 + 1) / 2)
    }

    /// One step in `direction`, saturating at the ends
    pub fn drift(self, direction: DriftDirection) -> Self {
        Self::clamped(self.0 as i64 + direction.delta())
    }

    pub fn abs_diff(self, other: Self) -> u8 {
        self.0.abs_diff(other.0)
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='6' => Some(Self(c as u8 - b'0')),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        (b'0' + self.0) as char
    }
}

impl TryFrom<u8> for Base7Digit {
    type Error = GenomeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(GenomeError::DigitOutOfRange(value))
    }
}

impl From<Base7Digit> for u8 {
    fn from(d: Base7Digit) -> u8 {
        d.0
    }
}

impl fmt::Display for Base7Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> impl Iterator<Item = Base7Digit> {
        (0..=6).filter_map(Base7Digit::new)
    }

    #[test]
    fn test_new_rejects_seven() {
        assert!(Base7Digit::new(6).is_some());
        assert!(Base7Digit::new(7).is_none());
        assert!(Base7Digit::try_from(9u8).is_err());
    }

    #[test]
    fn test_average_matches_rounded_mean() {
        for a in all() {
            for b in all() {
                let avg = Base7Digit::average(a, b);
                let expected = ((a.value() as f64 + b.value() as f64) / 2.0).round() as u8;
                assert_eq!(avg.value(), expected, "average({}, {})", a, b);
                assert!(avg <= Base7Digit::MAX);
            }
        }
    }

    #[test]
    fn test_clamp_and_wrap() {
        assert_eq!(Base7Digit::clamped(-3), Base7Digit::MIN);
        assert_eq!(Base7Digit::clamped(11), Base7Digit::MAX);
        assert_eq!(Base7Digit::wrapping(7).value(), 0);
        assert_eq!(Base7Digit::wrapping(-1).value(), 6);
        assert_eq!(Base7Digit::wrapping(15).value(), 1);
    }

    #[test]
    fn test_drift_saturates() {
        assert_eq!(Base7Digit::MAX.drift(DriftDirection::Increase), Base7Digit::MAX);
        assert_eq!(Base7Digit::MIN.drift(DriftDirection::Decrease), Base7Digit::MIN);
        let three = Base7Digit::clamped(3);
        assert_eq!(three.drift(DriftDirection::Increase).value(), 4);
        assert_eq!(three.drift(DriftDirection::Decrease).value(), 2);
    }

    #[test]
    fn test_char_conversion() {
        for d in all() {
            assert_eq!(Base7Digit::from_char(d.to_char()), Some(d));
        }
        assert_eq!(Base7Digit::from_char('7'), None);
        assert_eq!(Base7Digit::from_char('x'), None);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let ok: Base7Digit = serde_json::from_str("4").unwrap();
        assert_eq!(ok.value(), 4);
        assert!(serde_json::from_str::<Base7Digit>("8").is_err());
    }
}
