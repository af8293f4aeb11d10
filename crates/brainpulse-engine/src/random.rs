use std::{fmt, str::FromStr};

use rand::{
    Rng, RngCore, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Source of uniform randomness consumed by every trial generator.
///
/// Any [`rand::RngCore`] is a `RandomSource`, so generators can be driven by the
/// thread RNG in production and by a seeded [`Pcg32`] (see [`TrialSeed`]) in
/// tests and replays.
pub trait RandomSource {
    /// Returns a uniformly distributed value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl<R> RandomSource for R
where
    R: RngCore + ?Sized,
{
    fn next_f64(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Sampling helpers built on top of [`RandomSource::next_f64`].
///
/// Every helper consumes exactly one draw, except [`Self::shuffle`] which
/// consumes `len - 1` draws.
pub trait RandomSourceExt: RandomSource {
    /// Returns `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Returns a uniform index in `0..bound`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be positive");
        let index = (self.next_f64() * bound as f64) as usize;
        // guards against a source that returns exactly 1.0
        index.min(bound - 1)
    }

    /// Returns a uniform index in `0..bound` that is never `excluded`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is less than 2 or `excluded` is out of range.
    fn below_excluding(&mut self, bound: usize, excluded: usize) -> usize {
        assert!(bound >= 2 && excluded < bound);
        let index = self.below(bound - 1);
        if index >= excluded { index + 1 } else { index }
    }

    /// Returns a uniform integer in `min..=max`.
    #[expect(clippy::cast_possible_truncation)]
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        min + self.below((max - min) as usize + 1) as u32
    }

    /// Picks a uniformly random element.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    /// Shuffles `items` in place (Fisher-Yates).
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

impl<R> RandomSourceExt for R where R: RandomSource + ?Sized {}

/// Seed for deterministic trial generation.
///
/// A 128-bit seed that initializes a [`Pcg32`]. The same seed always produces
/// the same trials, which makes game runs reproducible for debugging and
/// testing. Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use brainpulse_engine::{DifficultyLevel, TrialSeed, trial::arithmetic};
///
/// let seed: TrialSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let first = arithmetic::generate(DifficultyLevel::MAX, 5, &mut seed.rng());
/// let second = arithmetic::generate(DifficultyLevel::MAX, 5, &mut seed.rng());
/// assert_eq!(first, second);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialSeed([u8; 16]);

impl TrialSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh seed from the thread RNG.
    #[must_use]
    pub fn random() -> Self {
        rand::rng().random()
    }

    /// Creates the random source for this seed.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for TrialSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid seed: expected 32 hex characters, got {input:?}")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for TrialSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(invalid());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| invalid())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for TrialSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TrialSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<TrialSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TrialSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        TrialSeed(seed)
    }
}

/// Random source replaying a fixed list of draws, for exact-path tests.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct ScriptedSource {
    draws: std::collections::VecDeque<f64>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        self.draws.pop_front().expect("scripted source exhausted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_stays_in_bounds_for_extreme_draws() {
        let mut source = ScriptedSource::new([0.0, 0.999_999, 1.0]);
        assert_eq!(source.below(4), 0);
        assert_eq!(source.below(4), 3);
        assert_eq!(source.below(4), 3);
    }

    #[test]
    fn test_below_excluding_skips_excluded_index() {
        let mut source = ScriptedSource::new([0.0, 0.5, 0.99]);
        assert_eq!(source.below_excluding(9, 0), 1);
        assert_eq!(source.below_excluding(9, 4), 5);
        assert_eq!(source.below_excluding(9, 8), 7);
    }

    #[test]
    fn test_range_inclusive_hits_both_ends() {
        let mut source = ScriptedSource::new([0.0, 0.99]);
        assert_eq!(source.range_inclusive(2, 9), 2);
        assert_eq!(source.range_inclusive(2, 9), 9);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = TrialSeed::from_bytes([3; 16]).rng();
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_hex_format() {
        let seed = TrialSeed::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, "\"0123456789abcdeffedcba9876543210\"");
        let parsed: TrialSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, seed);
    }

    #[test]
    fn test_seed_rejects_malformed_hex() {
        assert!("xyz".parse::<TrialSeed>().is_err());
        assert!("0123456789abcdef0123456789abcde".parse::<TrialSeed>().is_err());
        assert!(
            "ghijklmnopqrstuvwxyzghijklmnopqr"
                .parse::<TrialSeed>()
                .is_err()
        );
    }

    #[test]
    fn test_same_seed_same_draws() {
        let seed = TrialSeed::random();
        let mut a = seed.rng();
        let mut b = seed.rng();
        for _ in 0..20 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }
}
