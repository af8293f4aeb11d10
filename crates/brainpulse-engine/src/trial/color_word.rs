//! Color Stroop: name the ink color a color word is printed in.

use std::time::Duration;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{DifficultyLevel, RandomSource, RandomSourceExt as _};

use super::Trial;

/// Number of answer options shown for every trial.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Color {
    #[display("RED")]
    Red,
    #[display("BLUE")]
    Blue,
    #[display("GREEN")]
    Green,
    #[display("YELLOW")]
    Yellow,
    #[display("PURPLE")]
    Purple,
    #[display("ORANGE")]
    Orange,
}

static COLORS: [Color; 6] = Color::ALL;

impl Color {
    pub const ALL: [Self; 6] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Purple,
        Self::Orange,
    ];

    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Red => "#F44336",
            Self::Blue => "#2196F3",
            Self::Green => "#4CAF50",
            Self::Yellow => "#FFEB3B",
            Self::Purple => "#9C27B0",
            Self::Orange => "#FF9800",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorWordConfig {
    /// Probability that the ink matches the word.
    pub congruent_ratio: f64,
    /// Time before an unanswered trial is skipped.
    pub display_time: Duration,
    /// Number of colors in the pool, never fewer than [`OPTION_COUNT`].
    pub num_colors: usize,
}

static CONFIGS: [ColorWordConfig; DifficultyLevel::COUNT] = [
    ColorWordConfig {
        congruent_ratio: 0.5,
        display_time: Duration::from_millis(3000),
        num_colors: 4,
    },
    ColorWordConfig {
        congruent_ratio: 0.4,
        display_time: Duration::from_millis(2500),
        num_colors: 4,
    },
    ColorWordConfig {
        congruent_ratio: 0.3,
        display_time: Duration::from_millis(2000),
        num_colors: 5,
    },
    ColorWordConfig {
        congruent_ratio: 0.2,
        display_time: Duration::from_millis(1500),
        num_colors: 5,
    },
    ColorWordConfig {
        congruent_ratio: 0.15,
        display_time: Duration::from_millis(1000),
        num_colors: 6,
    },
];

impl ColorWordConfig {
    #[must_use]
    pub fn for_level(level: DifficultyLevel) -> &'static Self {
        &CONFIGS[level.index()]
    }

    #[must_use]
    pub fn color_pool(&self) -> &'static [Color] {
        &COLORS[..self.num_colors]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorWordTrial {
    /// The color the word names.
    pub word: Color,
    /// The color the word is printed in; the correct answer.
    pub ink: Color,
    pub is_congruent: bool,
    /// Shuffled answer options; `ink` appears exactly once.
    pub options: [Color; OPTION_COUNT],
}

impl Trial for ColorWordTrial {
    type Response = Color;

    fn is_correct(&self, response: &Color) -> bool {
        *response == self.ink
    }
}

/// Generates `count` independent Stroop trials.
///
/// Each trial is congruent with probability
/// [`ColorWordConfig::congruent_ratio`]; an incongruent trial draws its ink
/// uniformly from the pool minus the word color. The options are the ink plus
/// three distinct other pool colors, shuffled.
pub fn generate<R>(difficulty: DifficultyLevel, count: usize, rng: &mut R) -> Vec<ColorWordTrial>
where
    R: RandomSource + ?Sized,
{
    let config = ColorWordConfig::for_level(difficulty);
    let pool = config.color_pool();
    (0..count).map(|_| generate_trial(pool, config, rng)).collect()
}

fn generate_trial<R>(pool: &[Color], config: &ColorWordConfig, rng: &mut R) -> ColorWordTrial
where
    R: RandomSource + ?Sized,
{
    let is_congruent = rng.chance(config.congruent_ratio);
    let word_index = rng.below(pool.len());
    let word = pool[word_index];
    let ink = if is_congruent {
        word
    } else {
        pool[rng.below_excluding(pool.len(), word_index)]
    };

    let mut distractors: Vec<Color> = pool.iter().copied().filter(|c| *c != ink).collect();
    rng.shuffle(&mut distractors);

    let mut options = ArrayVec::<Color, OPTION_COUNT>::new();
    options.push(ink);
    options.extend(distractors.into_iter().take(OPTION_COUNT - 1));
    rng.shuffle(&mut options);
    let options = options
        .into_inner()
        .expect("color pool should hold at least four colors");

    ColorWordTrial {
        word,
        ink,
        is_congruent,
        options,
    }
}
