//! Mutable simulation state touched by effects.
//!
//! Effects never reach for globals: every handler receives the
//! [`GameState`] explicitly, mutates it in place and narrates what happened
//! through the [`MessageLog`].
mod cave;
mod common;
mod monster;
mod object;
mod player;

pub use cave::{Cave, Occupant, Square, SquareFlags, Trap};
pub use common::{Direction, MonsterId, ObjectId, Position, Source};
pub use monster::{
    MonTimed, Monster, MonsterLore, MonsterMessage, MonsterRace, MonsterRegistry, RaceFlags,
    SpellFlags, pain_message,
};
pub use object::{ElementFlags, ItemClass, Object, ObjectRegistry};
pub use player::{Element, PlayerState, PlayerTimed, ProtectFlags, Stat};

use crate::config::EngineConfig;
use crate::env::GameRng;
use crate::project::{distance, los};

/// Player-facing narration, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageLog {
    messages: Vec<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::trace!(%message, "narration");
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Takes every message, leaving the log empty.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

/// Canonical snapshot of the level the effects play out on.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub cave: Cave,
    pub monsters: MonsterRegistry,
    pub objects: ObjectRegistry,
    pub player: PlayerState,
    pub messages: MessageLog,
    pub rng: GameRng,
}

impl GameState {
    /// Creates a state with the player standing on `player_grid`.
    pub fn new(mut cave: Cave, player_grid: Position, seed: u64) -> Self {
        cave.set_occupant(player_grid, Occupant::Player);
        Self {
            cave,
            monsters: MonsterRegistry::new(),
            objects: ObjectRegistry::new(),
            player: PlayerState::new(player_grid),
            messages: MessageLog::new(),
            rng: GameRng::new(seed),
        }
    }

    /// Grid an effect source acts from, if it has one on the level.
    pub fn source_grid(&self, source: Source) -> Option<Position> {
        match source {
            Source::Player => Some(self.player.grid),
            Source::Monster(id) => self.monsters.get(id).map(|mon| mon.grid),
            Source::Trap(grid) => Some(grid),
            Source::None | Source::Object(_) | Source::ChestTrap(_) => None,
        }
    }

    /// True when the grid is within sight range and line of sight of the player.
    pub fn in_view(&self, grid: Position, config: &EngineConfig) -> bool {
        distance(self.player.grid, grid) <= config.max_sight && los(&self.cave, self.player.grid, grid)
    }

    /// True when the player can currently see the grid.
    pub fn player_sees(&self, grid: Position, config: &EngineConfig) -> bool {
        !self.player.is_blind()
            && self.in_view(grid, config)
            && (self.cave.is_lit(grid) || distance(self.player.grid, grid) <= config.light_radius)
    }

    /// True when the monster is visible to a player who is not blind.
    pub fn monster_is_visible(&self, id: MonsterId) -> bool {
        self.monsters.get(id).is_some_and(|mon| mon.visible)
    }

    /// Moves the player, keeping the occupancy map in sync.
    pub fn move_player(&mut self, grid: Position) -> bool {
        if self.cave.occupant(grid) != Occupant::None {
            return false;
        }
        self.cave.set_occupant(self.player.grid, Occupant::None);
        self.cave.set_occupant(grid, Occupant::Player);
        self.player.grid = grid;
        true
    }

    /// Keeps player and monster positions in step with the occupancy map after
    /// two squares swapped occupants.
    pub(crate) fn sync_occupants(&mut self, grids: &[Position]) {
        for grid in grids {
            match self.cave.occupant(*grid) {
                Occupant::Player => self.player.grid = *grid,
                Occupant::Monster(id) => {
                    if let Some(mon) = self.monsters.get_mut(id) {
                        mon.grid = *grid;
                    }
                }
                Occupant::None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_grid_resolves_each_source() {
        let mut state = GameState::new(Cave::new(8, 8), Position::new(2, 2), 1);
        let race = state.monsters.add_race(MonsterRace::new("kobold", 2, 8));
        let id = state
            .monsters
            .spawn(&mut state.cave, race, Position::new(5, 5))
            .unwrap();
        assert_eq!(state.source_grid(Source::Player), Some(Position::new(2, 2)));
        assert_eq!(state.source_grid(Source::Monster(id)), Some(Position::new(5, 5)));
        assert_eq!(state.source_grid(Source::None), None);
    }

    #[test]
    fn blind_player_sees_nothing() {
        let config = EngineConfig::default();
        let mut state = GameState::new(Cave::new(8, 8), Position::new(2, 2), 1);
        state.cave.set_flag(Position::new(4, 2), SquareFlags::GLOW, true);
        assert!(state.player_sees(Position::new(4, 2), &config));
        state.player.timed[PlayerTimed::Blind as usize] = 3;
        assert!(!state.player_sees(Position::new(4, 2), &config));
        assert!(state.in_view(Position::new(4, 2), &config));
    }

    #[test]
    fn message_log_drains() {
        let mut log = MessageLog::new();
        log.push("one");
        log.push(String::from("two"));
        assert!(log.contains("one"));
        assert_eq!(log.drain(), vec!["one".to_string(), "two".to_string()]);
        assert!(log.is_empty());
    }
}
