//! Quick math: pick the answer to a small arithmetic problem.

use std::time::Duration;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{DifficultyLevel, RandomSource, RandomSourceExt as _};

use super::Trial;

/// Number of answer choices, the correct answer included.
pub const CHOICE_COUNT: usize = 4;

/// Failed distractor draws tolerated before the offset range is widened.
const DRAWS_PER_WIDENING: usize = 16;
/// Total distractor draws before falling back to consecutive values.
const MAX_DISTRACTOR_DRAWS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize)]
pub enum Operator {
    #[display("+")]
    #[serde(rename = "+")]
    Add,
    #[display("-")]
    #[serde(rename = "-")]
    Subtract,
    #[display("×")]
    #[serde(rename = "×")]
    Multiply,
    #[display("÷")]
    #[serde(rename = "÷")]
    Divide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticConfig {
    /// Maximum number of digits per operand.
    pub max_digits: u32,
    pub operators: &'static [Operator],
    /// Answer window for each problem.
    pub time_per_problem: Duration,
}

const ADD_SUB: &[Operator] = &[Operator::Add, Operator::Subtract];
const ADD_SUB_MUL: &[Operator] = &[Operator::Add, Operator::Subtract, Operator::Multiply];
const ALL_OPERATORS: &[Operator] = &[
    Operator::Add,
    Operator::Subtract,
    Operator::Multiply,
    Operator::Divide,
];

static CONFIGS: [ArithmeticConfig; DifficultyLevel::COUNT] = [
    ArithmeticConfig {
        max_digits: 1,
        operators: ADD_SUB,
        time_per_problem: Duration::from_millis(5000),
    },
    ArithmeticConfig {
        max_digits: 1,
        operators: ADD_SUB_MUL,
        time_per_problem: Duration::from_millis(4000),
    },
    ArithmeticConfig {
        max_digits: 2,
        operators: ADD_SUB_MUL,
        time_per_problem: Duration::from_millis(3500),
    },
    ArithmeticConfig {
        max_digits: 2,
        operators: ALL_OPERATORS,
        time_per_problem: Duration::from_millis(2500),
    },
    ArithmeticConfig {
        max_digits: 3,
        operators: ALL_OPERATORS,
        time_per_problem: Duration::from_millis(2000),
    },
];

impl ArithmeticConfig {
    #[must_use]
    pub fn for_level(level: DifficultyLevel) -> &'static Self {
        &CONFIGS[level.index()]
    }

    /// Largest operand with [`Self::max_digits`] digits.
    #[must_use]
    pub const fn max_operand(&self) -> u32 {
        10_u32.pow(self.max_digits) - 1
    }
}

/// One problem, displayed as `"a op b = ?"`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[display("{a} {operator} {b} = ?")]
pub struct ArithmeticTrial {
    pub a: u32,
    pub b: u32,
    pub operator: Operator,
    pub answer: u32,
    /// Shuffled choices; `answer` appears exactly once.
    pub choices: [u32; CHOICE_COUNT],
}

impl Trial for ArithmeticTrial {
    type Response = u32;

    fn is_correct(&self, response: &u32) -> bool {
        *response == self.answer
    }
}

/// Generates `count` independent problems.
pub fn generate<R>(difficulty: DifficultyLevel, count: usize, rng: &mut R) -> Vec<ArithmeticTrial>
where
    R: RandomSource + ?Sized,
{
    let config = ArithmeticConfig::for_level(difficulty);
    (0..count).map(|_| generate_trial(config, rng)).collect()
}

fn generate_trial<R>(config: &ArithmeticConfig, rng: &mut R) -> ArithmeticTrial
where
    R: RandomSource + ?Sized,
{
    let operator = *rng.pick(config.operators);
    let (a, b, answer) = generate_operands(operator, config, rng);

    let mut choices = ArrayVec::<u32, CHOICE_COUNT>::new();
    choices.push(answer);
    choices.extend(generate_distractors(answer, rng));
    rng.shuffle(&mut choices);

    let mut array = [answer; CHOICE_COUNT];
    array.copy_from_slice(&choices);

    ArithmeticTrial {
        a,
        b,
        operator,
        answer,
        choices: array,
    }
}

fn generate_operands<R>(operator: Operator, config: &ArithmeticConfig, rng: &mut R) -> (u32, u32, u32)
where
    R: RandomSource + ?Sized,
{
    let max = config.max_operand();
    let single_digit = config.max_digits <= 1;

    match operator {
        Operator::Add => {
            let a = rng.range_inclusive(1, max);
            let b = rng.range_inclusive(1, max);
            (a, b, a + b)
        }
        Operator::Subtract => {
            let a = rng.range_inclusive(1, max);
            let b = rng.range_inclusive(1, a);
            (a, b, a - b)
        }
        Operator::Multiply => {
            let cap_a = max.min(if single_digit { 9 } else { 20 });
            let cap_b = max.min(if single_digit { 9 } else { 12 });
            let a = rng.range_inclusive(2, cap_a);
            let b = rng.range_inclusive(2, cap_b);
            (a, b, a * b)
        }
        Operator::Divide => {
            // built backwards so the quotient is always whole
            let cap_answer = max.min(if single_digit { 9 } else { 15 });
            let answer = rng.range_inclusive(2, cap_answer);
            let b = rng.range_inclusive(2, max.min(12));
            (answer * b, b, answer)
        }
    }
}

/// Draws three distinct non-negative values near `answer`, none equal to it.
///
/// Offsets are drawn from `±[1, max(5, ceil(20% of answer))]`. The range grows
/// by 5 after every [`DRAWS_PER_WIDENING`] rejected draws, and after
/// [`MAX_DISTRACTOR_DRAWS`] the remaining slots are filled with the closest
/// unused values above `answer`.
fn generate_distractors<R>(answer: u32, rng: &mut R) -> ArrayVec<u32, { CHOICE_COUNT - 1 }>
where
    R: RandomSource + ?Sized,
{
    let mut distractors = ArrayVec::<u32, { CHOICE_COUNT - 1 }>::new();
    let mut range = 5.max(answer.div_ceil(5));
    let mut rejected = 0;

    for _ in 0..MAX_DISTRACTOR_DRAWS {
        if distractors.is_full() {
            return distractors;
        }
        let offset = i64::from(rng.range_inclusive(1, range));
        let signed = if rng.chance(0.5) { -offset } else { offset };
        let candidate = i64::from(answer) + signed;
        match u32::try_from(candidate) {
            Ok(value) if !distractors.contains(&value) => distractors.push(value),
            _ => {
                rejected += 1;
                if rejected % DRAWS_PER_WIDENING == 0 {
                    range += 5;
                }
            }
        }
    }

    let mut next = answer;
    while !distractors.is_full() {
        next += 1;
        if !distractors.contains(&next) {
            distractors.push(next);
        }
    }
    distractors
}

#[cfg(test)]
mod tests {
    use crate::{TrialSeed, random::ScriptedSource};

    use super::*;

    #[test]
    fn test_division_is_exact() {
        for level in [DifficultyLevel::new(4), DifficultyLevel::MAX] {
            let mut rng = TrialSeed::from_bytes([level.get() * 7; 16]).rng();
            let trials = generate(level, 500, &mut rng);
            let divisions: Vec<_> = trials
                .iter()
                .filter(|t| t.operator == Operator::Divide)
                .collect();
            assert!(!divisions.is_empty());
            for trial in divisions {
                assert_eq!(trial.a % trial.b, 0, "{trial}");
                assert_eq!(trial.answer, trial.a / trial.b, "{trial}");
            }
        }
    }

    #[test]
    fn test_answer_appears_exactly_once() {
        for level in DifficultyLevel::all() {
            let mut rng = TrialSeed::from_bytes([level.get() + 20; 16]).rng();
            for trial in generate(level, 300, &mut rng) {
                assert_eq!(trial.choices.len(), CHOICE_COUNT);
                let hits = trial.choices.iter().filter(|c| **c == trial.answer).count();
                assert_eq!(hits, 1, "{trial}: {:?}", trial.choices);
                let mut distinct = trial.choices.to_vec();
                distinct.sort_unstable();
                distinct.dedup();
                assert_eq!(distinct.len(), CHOICE_COUNT);
            }
        }
    }

    #[test]
    fn test_operands_respect_config() {
        for level in DifficultyLevel::all() {
            let config = ArithmeticConfig::for_level(level);
            let max = config.max_operand();
            let single_digit = config.max_digits <= 1;
            let mut rng = TrialSeed::from_bytes([level.get() + 30; 16]).rng();
            for trial in generate(level, 300, &mut rng) {
                assert!(config.operators.contains(&trial.operator));
                match trial.operator {
                    Operator::Add => {
                        assert!((1..=max).contains(&trial.a), "{trial}");
                        assert!((1..=max).contains(&trial.b), "{trial}");
                        assert_eq!(trial.answer, trial.a + trial.b);
                    }
                    Operator::Subtract => {
                        assert!((1..=max).contains(&trial.a), "{trial}");
                        assert!((1..=trial.a).contains(&trial.b), "{trial}");
                        assert_eq!(trial.answer, trial.a - trial.b);
                    }
                    Operator::Multiply => {
                        let cap_a = max.min(if single_digit { 9 } else { 20 });
                        let cap_b = max.min(if single_digit { 9 } else { 12 });
                        assert!((2..=cap_a).contains(&trial.a), "{level}: {trial}");
                        assert!((2..=cap_b).contains(&trial.b), "{level}: {trial}");
                        assert_eq!(trial.answer, trial.a * trial.b);
                    }
                    Operator::Divide => {
                        let cap_answer = max.min(if single_digit { 9 } else { 15 });
                        assert!((2..=cap_answer).contains(&trial.answer), "{level}: {trial}");
                        assert!((2..=max.min(12)).contains(&trial.b), "{level}: {trial}");
                        assert_eq!(trial.a, trial.answer * trial.b);
                    }
                }
            }
        }
    }

    #[test]
    fn test_distractors_near_zero_stay_non_negative() {
        // 0 - 0 is impossible, but a 1 - 1 problem has answer 0
        let mut rng = TrialSeed::from_bytes([4; 16]).rng();
        for _ in 0..100 {
            let distractors = generate_distractors(0, &mut rng);
            assert_eq!(distractors.len(), CHOICE_COUNT - 1);
            assert!(!distractors.contains(&0));
        }
    }

    #[test]
    fn test_distractors_terminate_on_degenerate_source() {
        // a source that always yields the same offset can never find three values
        let mut source = ScriptedSource::new(std::iter::repeat_n(0.0, MAX_DISTRACTOR_DRAWS * 2));
        let distractors = generate_distractors(10, &mut source);
        let mut sorted = distractors.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, [9, 11, 12]);
    }

    #[test]
    fn test_display_format() {
        let trial = ArithmeticTrial {
            a: 12,
            b: 4,
            operator: Operator::Divide,
            answer: 3,
            choices: [3, 1, 5, 8],
        };
        assert_eq!(trial.to_string(), "12 ÷ 4 = ?");
    }

    #[test]
    fn test_config_grows_harder_with_level() {
        for pair in CONFIGS.windows(2) {
            assert!(pair[1].max_digits >= pair[0].max_digits);
            assert!(pair[1].operators.len() >= pair[0].operators.len());
            assert!(pair[1].time_per_problem < pair[0].time_per_problem);
        }
    }
}
