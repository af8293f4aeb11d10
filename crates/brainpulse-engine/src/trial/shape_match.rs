//! Speed match: decide whether each shape is the same as the one before it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DifficultyLevel, RandomSource, RandomSourceExt as _};

use super::{Tint, Trial};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Star,
    Diamond,
    Hexagon,
    Cross,
    Heart,
    Pentagon,
    Octagon,
    Arrow,
    Moon,
}

static SHAPES: [Shape; 12] = Shape::ALL;

impl Shape {
    /// All shapes, in the order pools are cut from.
    pub const ALL: [Self; 12] = [
        Self::Circle,
        Self::Square,
        Self::Triangle,
        Self::Star,
        Self::Diamond,
        Self::Hexagon,
        Self::Cross,
        Self::Heart,
        Self::Pentagon,
        Self::Octagon,
        Self::Arrow,
        Self::Moon,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeMatchConfig {
    /// How long each shape stays on screen, also the answer window.
    pub display_time: Duration,
    /// Number of distinct shapes in the pool.
    pub num_shapes: usize,
    /// Probability that a trial repeats the previous shape.
    pub match_ratio: f64,
}

static CONFIGS: [ShapeMatchConfig; DifficultyLevel::COUNT] = [
    ShapeMatchConfig {
        display_time: Duration::from_millis(2000),
        num_shapes: 4,
        match_ratio: 0.5,
    },
    ShapeMatchConfig {
        display_time: Duration::from_millis(1500),
        num_shapes: 5,
        match_ratio: 0.45,
    },
    ShapeMatchConfig {
        display_time: Duration::from_millis(1200),
        num_shapes: 7,
        match_ratio: 0.4,
    },
    ShapeMatchConfig {
        display_time: Duration::from_millis(800),
        num_shapes: 9,
        match_ratio: 0.35,
    },
    ShapeMatchConfig {
        display_time: Duration::from_millis(500),
        num_shapes: 12,
        match_ratio: 0.3,
    },
];

impl ShapeMatchConfig {
    #[must_use]
    pub fn for_level(level: DifficultyLevel) -> &'static Self {
        &CONFIGS[level.index()]
    }

    /// The first `num_shapes` shapes of [`Shape::ALL`].
    #[must_use]
    pub fn shape_pool(&self) -> &'static [Shape] {
        &SHAPES[..self.num_shapes]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeMatchTrial {
    pub shape: Shape,
    pub tint: Tint,
    /// Whether the shape equals the previous trial's shape.
    pub is_match: bool,
    /// The first trial has nothing to compare against and is never scored.
    pub is_first: bool,
}

impl Trial for ShapeMatchTrial {
    /// `true` when the player says "same as before".
    type Response = bool;

    fn is_scored(&self) -> bool {
        !self.is_first
    }

    fn is_correct(&self, response: &bool) -> bool {
        !self.is_first && *response == self.is_match
    }
}

/// Generates `count` trials where each trial is compared to the one before it.
///
/// The first trial is unscored (`is_first = true`, `is_match = false`). Every
/// later trial repeats the previous shape with probability
/// [`ShapeMatchConfig::match_ratio`], otherwise it draws uniformly from the
/// rest of the pool.
pub fn generate<R>(difficulty: DifficultyLevel, count: usize, rng: &mut R) -> Vec<ShapeMatchTrial>
where
    R: RandomSource + ?Sized,
{
    let config = ShapeMatchConfig::for_level(difficulty);
    let pool = config.shape_pool();
    let mut trials: Vec<ShapeMatchTrial> = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(previous) = trials.last().map(|t| t.shape) else {
            trials.push(ShapeMatchTrial {
                shape: *rng.pick(pool),
                tint: *rng.pick(&Tint::ALL),
                is_match: false,
                is_first: true,
            });
            continue;
        };

        let should_match = rng.chance(config.match_ratio);
        let shape = if should_match {
            previous
        } else {
            let previous_index = pool
                .iter()
                .position(|s| *s == previous)
                .unwrap_or_default();
            pool[rng.below_excluding(pool.len(), previous_index)]
        };

        trials.push(ShapeMatchTrial {
            shape,
            tint: *rng.pick(&Tint::ALL),
            is_match: should_match,
            is_first: false,
        });
    }

    trials
}
