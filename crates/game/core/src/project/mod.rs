//! Projections: geometry, blast areas and the per-target dispatchers.
//!
//! [`project`] is the single entry point. It traces the path, builds the
//! blast area, then hands every affected grid to the terrain, object,
//! monster and player dispatchers in that order.
mod blast;
mod feature;
mod kind;
mod monster;
mod object;
mod path;
mod player;
mod resist;
mod thrust;
mod view;

pub use blast::{Blast, BlastGrid, BlastGrids, blast_area, damage_at_distance};
pub use kind::{ProjectionInfo, ProjectionKind, ProjectionTable};
pub use object::inven_damage;
pub(crate) use player::killer;
pub(crate) use thrust::capitalise;
pub use path::{ProjectPath, project_path};
pub use resist::{Resistance, adjust_dam};
pub use thrust::thrust_away;
pub use view::{angle_between, angle_to_grid, distance, los};

use bitflags::bitflags;

use crate::env::Env;
use crate::state::{GameState, ObjectId, Position, Source};

bitflags! {
    /// How a projection travels and what it may affect.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ProjectFlags: u16 {
        /// Start at the target instead of the caster.
        const JUMP  = 1 << 0;
        /// Affect every grid along the path.
        const BEAM  = 1 << 1;
        /// Keep going past the target.
        const THRU  = 1 << 2;
        /// Stop at the first occupied grid.
        const STOP  = 1 << 3;
        /// Affect terrain.
        const GRID  = 1 << 4;
        /// Affect floor objects.
        const ITEM  = 1 << 5;
        /// Affect monsters.
        const KILL  = 1 << 6;
        /// Affect the player.
        const PLAY  = 1 << 7;
        /// No visual display.
        const HIDE  = 1 << 8;
        /// The effect is already known to be obvious.
        const AWARE = 1 << 9;
        /// Monsters of the caster's race are spared.
        const SAFE  = 1 << 10;
        /// A cone spreading from the caster.
        const ARC   = 1 << 11;
        /// No "You are hit by ..." message for a blind player.
        const QUIET = 1 << 12;
        /// A player-cast projection may hit the player.
        const SELF  = 1 << 13;
    }
}

/// One projection, as handed to [`project`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    pub origin: Source,
    pub radius: i32,
    pub target: Position,
    pub damage: i32,
    pub kind: ProjectionKind,
    pub flags: ProjectFlags,
    /// Width of an arc in degrees.
    pub degrees: i32,
    /// Diameter of the source; full damage reaches `diameter / 10` grids.
    pub diameter: i32,
    /// Caster power, used by side effects of strong attacks.
    pub power: i32,
    /// Object the projection comes from, for narration.
    pub object: Option<ObjectId>,
}

impl Projection {
    pub fn new(origin: Source, target: Position, kind: ProjectionKind, damage: i32) -> Self {
        Self {
            origin,
            radius: 0,
            target,
            damage,
            kind,
            flags: ProjectFlags::empty(),
            degrees: 0,
            diameter: 0,
            power: 0,
            object: None,
        }
    }

    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_flags(mut self, flags: ProjectFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_arc(mut self, degrees: i32, diameter: i32) -> Self {
        self.degrees = degrees;
        self.diameter = diameter;
        self
    }

    pub fn with_diameter(mut self, diameter: i32) -> Self {
        self.diameter = diameter;
        self
    }

    pub fn with_power(mut self, power: i32) -> Self {
        self.power = power;
        self
    }

    pub fn with_object(mut self, object: ObjectId) -> Self {
        self.object = Some(object);
        self
    }
}

/// Per-grid input shared by the four dispatchers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Hit {
    pub origin: Source,
    pub distance: i32,
    pub grid: Position,
    pub dam: i32,
    pub kind: ProjectionKind,
}

/// Fires a projection and applies it to everything in the blast area.
///
/// Returns true when the player noticed anything.
pub fn project(env: Env<'_>, state: &mut GameState, projection: &Projection) -> bool {
    let blast = blast_area(state, env.config(), projection);
    let flags = blast.flags;
    let hit_at = |index: usize| {
        let entry = &blast.grids[index];
        Hit {
            origin: projection.origin,
            distance: entry.distance,
            grid: entry.grid,
            dam: blast.damage_at(entry.distance),
            kind: projection.kind,
        }
    };

    tracing::trace!(
        kind = %projection.kind,
        centre = %blast.centre,
        grids = blast.grids.len(),
        radius = blast.radius,
        "projection"
    );

    let mut notice = false;

    if flags.contains(ProjectFlags::GRID) {
        for index in 0..blast.grids.len() {
            notice |= feature::project_feature(env, state, hit_at(index));
        }
    }

    if flags.contains(ProjectFlags::ITEM) {
        for index in 0..blast.grids.len() {
            notice |= object::project_object(state, hit_at(index));
        }
    }

    if flags.contains(ProjectFlags::KILL) {
        let mut hits = 0;
        for index in 0..blast.grids.len() {
            let outcome = monster::project_monster(env, state, hit_at(index), flags);
            notice |= outcome.obvious;
            if outcome.hit {
                hits += 1;
            }
            if state.player.is_dead || state.player.leaving {
                return notice;
            }
        }
        tracing::trace!(hits, "monsters hit");
    }

    if flags.contains(ProjectFlags::PLAY)
        && let Some(index) = blast
            .grids
            .iter()
            .position(|entry| entry.grid == state.player.grid)
    {
        notice |= player::project_player(env, state, hit_at(index), flags, projection.power);
    }

    notice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::effect::EffectTable;
    use crate::state::{Cave, MonsterRace, SquareFlags};

    struct Tables {
        effects: EffectTable,
        projections: ProjectionTable,
        config: EngineConfig,
    }

    impl Tables {
        fn new() -> Self {
            Self {
                effects: EffectTable::standard(),
                projections: ProjectionTable::standard(),
                config: EngineConfig::default(),
            }
        }

        fn env(&self) -> Env<'_> {
            Env::new(&self.effects, &self.projections, &self.config)
        }
    }

    #[test]
    fn bolt_stops_at_the_first_monster() {
        let tables = Tables::new();
        let mut state = GameState::new(Cave::new(20, 10), Position::new(2, 5), 7);
        let race = state.monsters.add_race(MonsterRace::new("jackal", 1, 30));
        let near = state.monsters.spawn(&mut state.cave, race, Position::new(6, 5)).unwrap();
        let far = state.monsters.spawn(&mut state.cave, race, Position::new(9, 5)).unwrap();

        let bolt = Projection::new(Source::Player, Position::new(9, 5), ProjectionKind::Missile, 10)
            .with_flags(ProjectFlags::STOP | ProjectFlags::KILL | ProjectFlags::THRU);
        assert!(project(tables.env(), &mut state, &bolt));
        assert_eq!(state.monsters.get(near).unwrap().hp, 20);
        assert_eq!(state.monsters.get(far).unwrap().hp, 30);
    }

    #[test]
    fn beam_hits_every_monster_on_the_line() {
        let tables = Tables::new();
        let mut state = GameState::new(Cave::new(20, 10), Position::new(2, 5), 7);
        let race = state.monsters.add_race(MonsterRace::new("jackal", 1, 30));
        let near = state.monsters.spawn(&mut state.cave, race, Position::new(6, 5)).unwrap();
        let far = state.monsters.spawn(&mut state.cave, race, Position::new(9, 5)).unwrap();

        let beam = Projection::new(Source::Player, Position::new(9, 5), ProjectionKind::Missile, 10)
            .with_flags(ProjectFlags::BEAM | ProjectFlags::KILL | ProjectFlags::THRU);
        project(tables.env(), &mut state, &beam);
        assert_eq!(state.monsters.get(near).unwrap().hp, 20);
        assert_eq!(state.monsters.get(far).unwrap().hp, 20);
    }

    #[test]
    fn player_cast_ball_spares_the_caster_unless_self() {
        let tables = Tables::new();
        let mut state = GameState::new(Cave::new(12, 12), Position::new(5, 5), 7);
        let ball = Projection::new(Source::Player, Position::new(5, 5), ProjectionKind::Missile, 20)
            .with_radius(2)
            .with_flags(ProjectFlags::PLAY | ProjectFlags::KILL);
        project(tables.env(), &mut state, &ball);
        assert_eq!(state.player.hp, state.player.mhp);

        let spot = ball.with_flags(ProjectFlags::SELF);
        assert!(project(tables.env(), &mut state, &spot));
        assert_eq!(state.player.hp, state.player.mhp - 20);
    }

    #[test]
    fn trap_blast_hits_the_player_and_leaves_no_tags() {
        let tables = Tables::new();
        let mut state = GameState::new(Cave::new(12, 12), Position::new(5, 5), 7);
        let trap = Position::new(4, 5);
        let blast = Projection::new(Source::Trap(trap), trap, ProjectionKind::Missile, 12)
            .with_radius(1)
            .with_flags(ProjectFlags::PLAY | ProjectFlags::KILL | ProjectFlags::GRID);
        project(tables.env(), &mut state, &blast);
        // distance 1 from the centre: (12 + 1) / 2
        assert_eq!(state.player.hp, state.player.mhp - 6);
        for y in 0..12 {
            for x in 0..12 {
                assert!(!state.cave.has_flag(Position::new(x, y), SquareFlags::PROJECT));
            }
        }
    }
}
