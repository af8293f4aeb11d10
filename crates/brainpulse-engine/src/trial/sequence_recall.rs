//! Sequence memory: replay a sequence of flashed grid cells.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DifficultyLevel, RandomSource, RandomSourceExt as _};

use super::Trial;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceConfig {
    /// Grid dimension; the grid has `grid_size * grid_size` cells.
    pub grid_size: usize,
    pub start_length: usize,
    pub max_length: usize,
    /// How long each cell stays lit.
    pub flash_time: Duration,
    /// Gap between two flashes.
    pub pause_time: Duration,
}

static CONFIGS: [SequenceConfig; DifficultyLevel::COUNT] = [
    SequenceConfig {
        grid_size: 3,
        start_length: 3,
        max_length: 6,
        flash_time: Duration::from_millis(800),
        pause_time: Duration::from_millis(300),
    },
    SequenceConfig {
        grid_size: 3,
        start_length: 3,
        max_length: 7,
        flash_time: Duration::from_millis(650),
        pause_time: Duration::from_millis(250),
    },
    SequenceConfig {
        grid_size: 4,
        start_length: 4,
        max_length: 8,
        flash_time: Duration::from_millis(500),
        pause_time: Duration::from_millis(200),
    },
    SequenceConfig {
        grid_size: 4,
        start_length: 5,
        max_length: 9,
        flash_time: Duration::from_millis(400),
        pause_time: Duration::from_millis(150),
    },
    SequenceConfig {
        grid_size: 5,
        start_length: 5,
        max_length: 9,
        flash_time: Duration::from_millis(300),
        pause_time: Duration::from_millis(100),
    },
];

impl SequenceConfig {
    #[must_use]
    pub fn for_level(level: DifficultyLevel) -> &'static Self {
        &CONFIGS[level.index()]
    }

    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Time needed to flash a whole sequence of `length` cells.
    #[must_use]
    pub fn showing_time(&self, length: usize) -> Duration {
        #[expect(clippy::cast_possible_truncation)]
        let length = length as u32;
        (self.flash_time + self.pause_time) * length
    }
}

/// One sequence to replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRound {
    /// Cell indices in flash order, `0..grid_size * grid_size`.
    pub cells: Vec<u8>,
    pub grid_size: usize,
}

impl Trial for SequenceRound {
    /// The full sequence of tapped cells.
    type Response = Vec<u8>;

    fn is_correct(&self, response: &Vec<u8>) -> bool {
        *response == self.cells
    }
}

/// Outcome of comparing a (possibly partial) input to the target sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceCheck {
    /// Every tapped cell so far matches the target prefix.
    pub correct: bool,
    /// Index of the first mismatching tap.
    pub failed_at: Option<usize>,
}

/// Generates a round of `length` cells on a `grid_size` × `grid_size` grid.
///
/// A cell never follows itself; non-adjacent repeats are allowed.
///
/// # Panics
///
/// Panics if the grid has fewer than two cells.
pub fn generate_round<R>(grid_size: usize, length: usize, rng: &mut R) -> SequenceRound
where
    R: RandomSource + ?Sized,
{
    let cell_count = grid_size * grid_size;
    assert!(cell_count >= 2, "grid must have at least two cells");

    let mut cells: Vec<u8> = Vec::with_capacity(length);
    for _ in 0..length {
        let cell = match cells.last() {
            Some(&last) => rng.below_excluding(cell_count, usize::from(last)),
            None => rng.below(cell_count),
        };
        #[expect(clippy::cast_possible_truncation)]
        cells.push(cell as u8);
    }

    SequenceRound { cells, grid_size }
}

/// Generates a round of `length` cells on the level's grid.
pub fn generate<R>(difficulty: DifficultyLevel, length: usize, rng: &mut R) -> SequenceRound
where
    R: RandomSource + ?Sized,
{
    generate_round(SequenceConfig::for_level(difficulty).grid_size, length, rng)
}

/// Compares `input` index-by-index against the prefix of `target`.
///
/// A shorter input that matches so far is still correct. An input longer than
/// the target fails at the first index past its end.
#[must_use]
pub fn check_sequence(target: &[u8], input: &[u8]) -> SequenceCheck {
    let failed_at = input
        .iter()
        .enumerate()
        .position(|(i, cell)| target.get(i) != Some(cell));
    SequenceCheck {
        correct: failed_at.is_none(),
        failed_at,
    }
}
