//! Forcing a creature away from the centre of a blast.

use crate::env::MapOracle;
use crate::state::{
    Direction, GameState, MonsterId, MonsterMessage, Occupant, Position, RaceFlags,
};

use super::view::angle_between;

/// Window of acceptable angles for each of the eight scan directions.
fn accepts(slot: usize, angle: i32) -> bool {
    match slot {
        // south
        0 => (114..=157).contains(&angle),
        // north
        1 => (23..=66).contains(&angle),
        // east
        2 => angle <= 21 || angle >= 159,
        // west
        3 => (68..=112).contains(&angle),
        // south-east
        4 => (136..=179).contains(&angle),
        // south-west
        5 => (91..=134).contains(&angle),
        // north-east
        6 => (1..=44).contains(&angle),
        // north-west
        _ => (46..=89).contains(&angle),
    }
}

/// Whoever stands on `from` may trade places with whoever stands on `to`.
fn may_pass(state: &GameState, from: Position, to: Position) -> bool {
    let level_of = |grid: Position| {
        state
            .cave
            .monster_at(grid)
            .and_then(|id| state.monsters.race_of(id))
            .map(|race| (race.level, race.mexp))
    };
    match (state.cave.occupant(from), state.cave.occupant(to)) {
        (_, Occupant::None) => true,
        (Occupant::Monster(_), Occupant::Monster(_)) => match (level_of(from), level_of(to)) {
            (Some((_, mine)), Some((_, theirs))) => theirs <= mine,
            _ => false,
        },
        (Occupant::Monster(_), Occupant::Player) => {
            level_of(from).is_some_and(|(level, _)| state.player.lev * 2 <= level)
        }
        (Occupant::Player, Occupant::Monster(_)) => {
            level_of(to).is_some_and(|(level, _)| level <= state.player.lev * 2)
        }
        _ => true,
    }
}

/// Pushes whatever stands on `target` up to `grids` steps directly away
/// from `centre`.
///
/// Each step tries the directions within 44 degrees of the push, starting
/// from a random one. A creature can shove past a weaker one. Passable but
/// opaque terrain (rubble) is entered and ends the push, and so does a step
/// with nowhere to go.
pub fn thrust_away(state: &mut GameState, centre: Position, target: Position, grids: i32) {
    let angle = angle_between(centre, target);
    let mut grid = target;
    let mut step = 0;

    while step < grids {
        step += 1;
        let first = state.rng.randint0(8) as usize;
        let mut walled = false;
        let mut moved = false;
        for d in first..first + 8 {
            let slot = d % 8;
            if !accepts(slot, angle) {
                continue;
            }
            let next = grid.step(Direction::DDD[slot]);
            if state.cave.occupant(next) != Occupant::None && !may_pass(state, grid, next) {
                continue;
            }
            if state.cave.is_projectable(next) {
                swap(state, grid, next);
                grid = next;
                moved = true;
                break;
            }
            if state.cave.is_passable(next) {
                // Entered, but there is no way out again.
                swap(state, grid, next);
                grid = next;
                step = grids;
                moved = true;
                break;
            }
            walled = true;
        }
        if !moved {
            if walled && state.cave.occupant(grid) == Occupant::Player {
                state.messages.push("You come to rest next to a wall.");
            }
            break;
        }
    }

    if state.cave.feat(grid).is_fiery() {
        match state.cave.occupant(grid) {
            Occupant::Player => state.messages.push("You are thrown into molten lava!"),
            Occupant::Monster(id) => burn_in_lava(state, id),
            Occupant::None => {}
        }
    }
}

fn swap(state: &mut GameState, a: Position, b: Position) {
    state.cave.swap_occupants(a, b);
    state.sync_occupants(&[a, b]);
}

fn burn_in_lava(state: &mut GameState, id: MonsterId) {
    let Some(race) = state.monsters.race_of(id) else {
        return;
    };
    if race.flags.contains(RaceFlags::IM_FIRE) {
        return;
    }
    let dam = 100 + state.rng.randint1(100);
    let name = state.monsters.describe(id);
    let Some(mon) = state.monsters.get_mut(id) else {
        return;
    };
    mon.hp -= dam;
    if mon.hp < 0 {
        state
            .messages
            .push(capitalise(&format!("{name} {}", MonsterMessage::Disintegrates.text())));
        state.monsters.delete(&mut state.cave, id);
    }
}

pub(crate) fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TerrainKind;
    use crate::state::{Cave, MonsterRace};

    #[test]
    fn monster_is_pushed_straight_away() {
        let mut state = GameState::new(Cave::new(20, 9), Position::new(2, 4), 5);
        let race = state.monsters.add_race(MonsterRace::new("kobold", 3, 12));
        let id = state.monsters.spawn(&mut state.cave, race, Position::new(5, 4)).unwrap();
        thrust_away(&mut state, Position::new(2, 4), Position::new(5, 4), 3);
        let grid = state.monsters.get(id).unwrap().grid;
        assert_eq!(grid.x, 8);
        assert_eq!(state.cave.monster_at(grid), Some(id));
        assert_eq!(state.cave.occupant(Position::new(5, 4)), Occupant::None);
    }

    #[test]
    fn player_stops_against_walls() {
        let mut state = GameState::new(Cave::new(6, 6), Position::new(4, 2), 5);
        thrust_away(&mut state, Position::new(1, 2), Position::new(4, 2), 5);
        assert_eq!(state.player.grid.x, 4);
        assert_eq!(state.cave.occupant(state.player.grid), Occupant::Player);
        assert!(state.messages.contains("You come to rest next to a wall."));
    }

    #[test]
    fn rubble_ends_the_push() {
        let mut state = GameState::new(Cave::new(20, 9), Position::new(5, 4), 5);
        state.cave.set_feat(Position::new(6, 4), TerrainKind::PassableRubble);
        for y in [3, 5] {
            state.cave.set_feat(Position::new(6, y), TerrainKind::Granite);
        }
        thrust_away(&mut state, Position::new(2, 4), Position::new(5, 4), 4);
        assert_eq!(state.player.grid, Position::new(6, 4));
    }

    #[test]
    fn weaker_monsters_cannot_pass_the_player() {
        let mut state = GameState::new(Cave::new(20, 3), Position::new(6, 1), 5);
        state.player.lev = 10;
        let race = state.monsters.add_race(MonsterRace::new("rat", 1, 5));
        let id = state.monsters.spawn(&mut state.cave, race, Position::new(5, 1)).unwrap();
        thrust_away(&mut state, Position::new(2, 1), Position::new(5, 1), 2);
        assert_eq!(state.monsters.get(id).unwrap().grid, Position::new(5, 1));
        assert_eq!(state.player.grid, Position::new(6, 1));
    }
}
