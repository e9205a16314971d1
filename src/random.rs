//! RandomSource — the single stream of randomness behind every breeding draw
//!
//! All stochastic operations take an explicit source so outcomes are
//! reproducible: seed a `rand::rngs::StdRng` in tests, hand in
//! `rand::thread_rng()` in the game loop.

use crate::genome::Base7Digit;
use rand::{Rng, RngCore};

/// Uniform source of floats in `[0, 1)`
pub trait RandomSource {
    /// Next uniform float in `[0, 1)`
    fn next_float(&mut self) -> f64;

    /// Uniform base-7 digit
    fn next_digit(&mut self) -> Base7Digit {
        let raw = (self.next_float() * 7.0).floor() as i64;
        Base7Digit::clamped(raw)
    }

    /// Bernoulli trial succeeding with `probability`
    fn chance(&mut self, probability: f64) -> bool {
        self.next_float() < probability
    }

    /// Uniform index into a collection of `len` items (`len` must be > 0)
    fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_float() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Uniform offset in `{-1, 0, 1}`
    fn next_offset(&mut self) -> i64 {
        self.pick_index(3) as i64 - 1
    }
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn next_float(&mut self) -> f64 {
        self.gen::<f64>()
    }
}
