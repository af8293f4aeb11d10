//! Spatial N-back: does this grid position match the one shown N trials ago?

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DifficultyLevel, RandomSource, RandomSourceExt as _};

use super::{Tint, Trial};

/// Side length of the square stimulus grid.
pub const GRID_SIZE: usize = 3;
/// Number of cells on the grid, numbered left-to-right, top-to-bottom.
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

const SYMBOLS: [char; 9] = ['🧠', '⚡', '💡', '🔮', '✨', '🌟', '💫', '🎯', '🧩'];

#[derive(Debug, Clone, PartialEq)]
pub struct NBackConfig {
    /// How many trials back a position is compared to.
    pub n: usize,
    pub stimulus_time: Duration,
    pub inter_stimulus: Duration,
    /// Trials generated when no explicit count is requested.
    pub round_count: usize,
    /// Probability that a scored trial repeats the position N back.
    pub match_ratio: f64,
}

static CONFIGS: [NBackConfig; DifficultyLevel::COUNT] = [
    NBackConfig {
        n: 1,
        stimulus_time: Duration::from_millis(2500),
        inter_stimulus: Duration::from_millis(500),
        round_count: 15,
        match_ratio: 0.35,
    },
    NBackConfig {
        n: 1,
        stimulus_time: Duration::from_millis(2000),
        inter_stimulus: Duration::from_millis(400),
        round_count: 18,
        match_ratio: 0.35,
    },
    NBackConfig {
        n: 2,
        stimulus_time: Duration::from_millis(2000),
        inter_stimulus: Duration::from_millis(400),
        round_count: 20,
        match_ratio: 0.30,
    },
    NBackConfig {
        n: 2,
        stimulus_time: Duration::from_millis(1500),
        inter_stimulus: Duration::from_millis(300),
        round_count: 22,
        match_ratio: 0.30,
    },
    NBackConfig {
        n: 3,
        stimulus_time: Duration::from_millis(1200),
        inter_stimulus: Duration::from_millis(300),
        round_count: 25,
        match_ratio: 0.25,
    },
];

impl NBackConfig {
    #[must_use]
    pub fn for_level(level: DifficultyLevel) -> &'static Self {
        &CONFIGS[level.index()]
    }

    /// Stimulus plus gap: the full window a player has to respond.
    #[must_use]
    pub fn trial_period(&self) -> Duration {
        self.stimulus_time + self.inter_stimulus
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NBackTrial {
    /// Zero-based position in the sequence.
    pub index: usize,
    /// Grid cell, `0..GRID_CELLS`.
    pub position: u8,
    pub symbol: char,
    pub tint: Tint,
    /// Whether `position` equals the position N trials back.
    pub is_match: bool,
    /// The first N trials have nothing to compare against and are never scored.
    pub is_filler: bool,
}

impl Trial for NBackTrial {
    /// `true` when the player says "same position as N back".
    type Response = bool;

    fn is_scored(&self) -> bool {
        !self.is_filler
    }

    fn is_correct(&self, response: &bool) -> bool {
        !self.is_filler && *response == self.is_match
    }
}

/// Generates an N-back sequence.
///
/// With `count = None` the level's [`NBackConfig::round_count`] is used. The
/// first `n` trials are filler at random positions. Every later trial repeats
/// the position `n` back with probability [`NBackConfig::match_ratio`],
/// otherwise it draws uniformly from the other cells.
pub fn generate<R>(difficulty: DifficultyLevel, count: Option<usize>, rng: &mut R) -> Vec<NBackTrial>
where
    R: RandomSource + ?Sized,
{
    let config = NBackConfig::for_level(difficulty);
    let count = count.unwrap_or(config.round_count);
    let n = config.n;
    let mut trials: Vec<NBackTrial> = Vec::with_capacity(count);

    for index in 0..count {
        let (position, is_match, is_filler) = if index < n {
            (rng.below(GRID_CELLS), false, true)
        } else {
            let n_back = usize::from(trials[index - n].position);
            if rng.chance(config.match_ratio) {
                (n_back, true, false)
            } else {
                (rng.below_excluding(GRID_CELLS, n_back), false, false)
            }
        };

        #[expect(clippy::cast_possible_truncation)]
        let position = position as u8;
        trials.push(NBackTrial {
            index,
            position,
            symbol: *rng.pick(&SYMBOLS),
            tint: *rng.pick(&Tint::ALL),
            is_match,
            is_filler,
        });
    }

    trials
}

#[cfg(test)]
mod tests {
    use crate::TrialSeed;

    use super::*;

    #[test]
    fn test_default_count_comes_from_config() {
        for level in DifficultyLevel::all() {
            let mut rng = TrialSeed::from_bytes([level.get(); 16]).rng();
            let trials = generate(level, None, &mut rng);
            assert_eq!(trials.len(), NBackConfig::for_level(level).round_count);
        }
    }

    #[test]
    fn test_explicit_count_overrides_config() {
        let mut rng = TrialSeed::from_bytes([9; 16]).rng();
        assert_eq!(generate(DifficultyLevel::MAX, Some(7), &mut rng).len(), 7);
        assert!(generate(DifficultyLevel::MAX, Some(0), &mut rng).is_empty());
    }

    #[test]
    fn test_filler_trials_are_never_matches() {
        let level = DifficultyLevel::MAX;
        let n = NBackConfig::for_level(level).n;
        let mut rng = TrialSeed::from_bytes([11; 16]).rng();
        let trials = generate(level, Some(40), &mut rng);
        for trial in &trials[..n] {
            assert!(trial.is_filler);
            assert!(!trial.is_match);
            assert!(!trial.is_scored());
        }
        assert!(trials[n..].iter().all(|t| !t.is_filler));
    }

    #[test]
    fn test_is_match_recomputed_from_positions() {
        for level in DifficultyLevel::all() {
            let n = NBackConfig::for_level(level).n;
            let mut rng = TrialSeed::from_bytes([level.get() * 3; 16]).rng();
            let trials = generate(level, Some(400), &mut rng);
            for i in n..trials.len() {
                assert_eq!(
                    trials[i].is_match,
                    trials[i].position == trials[i - n].position,
                    "trial {i} at level {level}"
                );
                assert!(usize::from(trials[i].position) < GRID_CELLS);
            }
        }
    }

    #[test]
    fn test_indices_are_sequential() {
        let mut rng = TrialSeed::from_bytes([12; 16]).rng();
        let trials = generate(DifficultyLevel::DEFAULT, None, &mut rng);
        assert!(trials.iter().enumerate().all(|(i, t)| t.index == i));
    }

    #[test]
    fn test_config_grows_harder_with_level() {
        for pair in CONFIGS.windows(2) {
            assert!(pair[1].match_ratio <= pair[0].match_ratio);
            assert!(pair[1].stimulus_time <= pair[0].stimulus_time);
            assert!(pair[1].n >= pair[0].n);
            assert!(pair[1].round_count > pair[0].round_count);
        }
    }
}
