use std::time::Duration;

use brainpulse_engine::GameKind;

use crate::{CognitiveDomain, GameMode};

/// Registration entry of a mini-game.
///
/// The [`GameKind`] doubles as the generator handle: it selects which trial
/// generator and game run the orchestrator's caller creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniGameDefinition {
    pub kind: GameKind,
    pub description: &'static str,
    pub domain: CognitiveDomain,
    pub modes: Vec<GameMode>,
    pub estimated_duration: Duration,
}

impl MiniGameDefinition {
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub fn is_available_in(&self, mode: GameMode) -> bool {
        self.modes.contains(&mode)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RegistryError {
    #[display("game {id:?} is already registered")]
    DuplicateGame { id: &'static str },
}

/// Ordered set of mini-games, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct GameRegistry {
    games: Vec<MiniGameDefinition>,
}

impl GameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in games.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for definition in builtin_definitions() {
            registry
                .register(definition)
                .expect("built-in game ids should be unique");
        }
        registry
    }

    /// Appends `definition`; ids must be unique.
    pub fn register(&mut self, definition: MiniGameDefinition) -> Result<(), RegistryError> {
        if self.game_by_id(definition.id()).is_some() {
            return Err(RegistryError::DuplicateGame {
                id: definition.id(),
            });
        }
        self.games.push(definition);
        Ok(())
    }

    /// All games in registration order.
    #[must_use]
    pub fn games(&self) -> &[MiniGameDefinition] {
        &self.games
    }

    pub fn games_for_mode(&self, mode: GameMode) -> impl Iterator<Item = &MiniGameDefinition> {
        self.games.iter().filter(move |game| game.is_available_in(mode))
    }

    #[must_use]
    pub fn game_by_id(&self, id: &str) -> Option<&MiniGameDefinition> {
        self.games.iter().find(|game| game.id() == id)
    }

    /// The first `game_count` games available for `mode`, in registration order.
    #[must_use]
    pub fn select_session_games(&self, mode: GameMode) -> Vec<&MiniGameDefinition> {
        self.games_for_mode(mode)
            .take(mode.config().game_count)
            .collect()
    }
}

const ESTIMATED_DURATION: Duration = Duration::from_secs(45);

fn builtin_definitions() -> [MiniGameDefinition; 5] {
    let activation = || vec![GameMode::Activation];
    [
        MiniGameDefinition {
            kind: GameKind::ShapeMatch,
            description: "Compare shapes: is it the same as the last one?",
            domain: CognitiveDomain::Processing,
            modes: activation(),
            estimated_duration: ESTIMATED_DURATION,
        },
        MiniGameDefinition {
            kind: GameKind::ColorWord,
            description: "Tap the ink color, not the word meaning",
            domain: CognitiveDomain::Attention,
            modes: activation(),
            estimated_duration: ESTIMATED_DURATION,
        },
        MiniGameDefinition {
            kind: GameKind::SequenceRecall,
            description: "Remember and repeat the flashing sequence",
            domain: CognitiveDomain::Memory,
            modes: activation(),
            estimated_duration: ESTIMATED_DURATION,
        },
        MiniGameDefinition {
            kind: GameKind::Arithmetic,
            description: "Solve arithmetic problems as fast as you can",
            domain: CognitiveDomain::Processing,
            modes: activation(),
            estimated_duration: ESTIMATED_DURATION,
        },
        MiniGameDefinition {
            kind: GameKind::SpatialNBack,
            description: "Does this position match the one N steps back?",
            domain: CognitiveDomain::Memory,
            modes: vec![GameMode::Development],
            estimated_duration: ESTIMATED_DURATION,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = GameRegistry::builtin();
        let duplicate = registry.games()[0].clone();
        let err = registry.register(duplicate).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateGame { id: "speed-match" }
        ));
        assert_eq!(registry.games().len(), 5);
    }

    #[test]
    fn test_activation_selects_first_four_in_order() {
        let registry = GameRegistry::builtin();
        let ids: Vec<_> = registry
            .select_session_games(GameMode::Activation)
            .iter()
            .map(|g| g.id())
            .collect();
        assert_eq!(
            ids,
            ["speed-match", "color-stroop", "sequence-memory", "quick-math"]
        );
    }

    #[test]
    fn test_development_plays_nback_only() {
        let registry = GameRegistry::builtin();
        let games = registry.select_session_games(GameMode::Development);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].kind, GameKind::SpatialNBack);
        assert!(registry.select_session_games(GameMode::Rest).is_empty());
    }

    #[test]
    fn test_lookup_by_id() {
        let registry = GameRegistry::builtin();
        assert_eq!(
            registry.game_by_id("n-back").unwrap().domain,
            CognitiveDomain::Memory
        );
        assert!(registry.game_by_id("tetris").is_none());
    }
}
