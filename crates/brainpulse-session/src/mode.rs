use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Session intensity chosen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    Rest,
    Activation,
    Development,
}

/// Static configuration of a [`GameMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeConfig {
    pub title: &'static str,
    pub description: &'static str,
    /// Games played per session.
    pub game_count: usize,
    /// Disabled modes cannot start a session.
    pub enabled: bool,
}

impl GameMode {
    pub const ALL: [Self; 3] = [Self::Rest, Self::Activation, Self::Development];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Activation => "activation",
            Self::Development => "development",
        }
    }

    #[must_use]
    pub const fn config(self) -> ModeConfig {
        match self {
            Self::Rest => ModeConfig {
                title: "Rest",
                description: "Light brain check for relaxed days",
                game_count: 3,
                enabled: false,
            },
            Self::Activation => ModeConfig {
                title: "Activation",
                description: "Standard daily brain condition check",
                game_count: 4,
                enabled: true,
            },
            Self::Development => ModeConfig {
                title: "Development",
                description: "Intensive brain workout for growth",
                game_count: 1,
                enabled: true,
            },
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown game mode {input:?} (expected rest, activation or development)")]
pub struct ParseGameModeError {
    input: String,
}

impl FromStr for GameMode {
    type Err = ParseGameModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.id() == s)
            .ok_or_else(|| ParseGameModeError {
                input: s.to_owned(),
            })
    }
}

/// Cognitive ability a mini-game measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CognitiveDomain {
    #[display("reaction")]
    Reaction,
    #[display("memory")]
    Memory,
    #[display("attention")]
    Attention,
    #[display("flexibility")]
    Flexibility,
    #[display("processing")]
    Processing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_config_table() {
        assert!(!GameMode::Rest.config().enabled);
        assert_eq!(GameMode::Rest.config().game_count, 3);
        assert_eq!(GameMode::Activation.config().game_count, 4);
        assert_eq!(GameMode::Development.config().game_count, 1);
    }

    #[test]
    fn test_mode_parses_its_id() {
        for mode in GameMode::ALL {
            assert_eq!(mode.to_string().parse::<GameMode>().unwrap(), mode);
        }
        assert!("relax".parse::<GameMode>().is_err());
    }
}
