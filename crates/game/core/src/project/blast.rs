//! Blast-area construction.
//!
//! The blast area is the ordered list of grids a projection touches, each
//! tagged with its distance from the centre of the explosion, together with
//! the damage dealt at every distance.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::env::MapOracle;
use crate::state::{GameState, Position, Source, SquareFlags};

use super::path::project_path;
use super::view::{angle_between, distance, los};
use super::{ProjectFlags, Projection};

/// One grid of a blast area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlastGrid {
    pub grid: Position,
    /// Distance from the centre of the explosion; zero along beams.
    pub distance: i32,
    /// The player could see the grid when the blast was built.
    pub seen: bool,
}

pub type BlastGrids = ArrayVec<BlastGrid, { EngineConfig::MAX_BLAST_GRIDS }>;

/// Result of [`blast_area`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blast {
    /// Grids in non-decreasing order of distance.
    pub grids: BlastGrids,
    pub centre: Position,
    /// Effective radius after arc capping.
    pub radius: i32,
    /// Effective flags; a zero-width arc becomes a beam.
    pub flags: ProjectFlags,
    damage: Vec<i32>,
}

impl Blast {
    /// Damage dealt at `distance` from the centre.
    pub fn damage_at(&self, distance: i32) -> i32 {
        usize::try_from(distance)
            .ok()
            .and_then(|d| self.damage.get(d))
            .copied()
            .unwrap_or(0)
    }

    pub fn contains(&self, grid: Position) -> bool {
        self.grids.iter().any(|entry| entry.grid == grid)
    }
}

/// Damage at `distance` for a blast of `radius` around a source of `diameter`.
///
/// Nothing lands beyond the radius. Without a diameter damage falls off as
/// `(dam + d) / (d + 1)`; with one it holds at full strength out to
/// `diameter / 10` grids before falling off.
pub fn damage_at_distance(dam: i32, radius: i32, diameter: i32, distance: i32) -> i32 {
    if distance > radius {
        0
    } else if diameter == 0 || distance == 0 {
        (dam + distance) / (distance + 1)
    } else {
        dam.min(diameter * dam / ((distance + 1) * 10))
    }
}

struct Builder<'s> {
    state: &'s mut GameState,
    grids: BlastGrids,
    truncated: bool,
}

impl Builder<'_> {
    /// Queues `grid` unless it is already queued. Returns false once full.
    fn push(&mut self, grid: Position, distance: i32) -> bool {
        if self.state.cave.has_flag(grid, SquareFlags::PROJECT) {
            return true;
        }
        let entry = BlastGrid {
            grid,
            distance,
            seen: false,
        };
        if self.grids.try_push(entry).is_err() {
            self.truncated = true;
            return false;
        }
        self.state.cave.set_flag(grid, SquareFlags::PROJECT, true);
        true
    }

    fn is_full(&self) -> bool {
        self.grids.is_full()
    }
}

/// Builds the blast area of `projection`.
///
/// Grids are tagged with [`SquareFlags::PROJECT`] while the area is built so
/// none is queued twice; every tag is cleared again before returning.
pub fn blast_area(state: &mut GameState, config: &EngineConfig, projection: &Projection) -> Blast {
    let mut flags = projection.flags;
    let mut radius = projection.radius;
    let target = projection.target;

    let source = if flags.contains(ProjectFlags::JUMP) {
        flags.remove(ProjectFlags::JUMP);
        target
    } else {
        match projection.origin {
            Source::Player | Source::Monster(_) => {
                state.source_grid(projection.origin).unwrap_or(target)
            }
            _ => target,
        }
    };

    if flags.contains(ProjectFlags::ARC) && projection.degrees <= 0 && radius != 0 {
        flags.remove(ProjectFlags::ARC);
        flags.insert(ProjectFlags::BEAM | ProjectFlags::THRU);
    }

    let mut builder = Builder {
        state,
        grids: BlastGrids::new(),
        truncated: false,
    };

    let mut centre = source;
    let mut path_len = 0;
    let mut centerline = target;

    if source == target {
        builder.push(target, 0);
    } else {
        let path = project_path(
            &builder.state.cave,
            config.projection_range(),
            source,
            target,
            flags,
        );
        path_len = path.len();
        if let Some(last) = path.get(path_len.saturating_sub(1).min(EngineConfig::MAX_ARC_RADIUS as usize)) {
            centerline = *last;
        }

        let mut walk = path.len();
        if flags.contains(ProjectFlags::BEAM) && radius > 0 && (radius as usize) < walk {
            walk = radius as usize;
        }

        if !flags.contains(ProjectFlags::ARC) {
            for (i, grid) in path.iter().take(walk).enumerate() {
                if radius > 0 && !builder.state.cave.is_passable(*grid) {
                    break;
                }
                centre = *grid;
                if flags.contains(ProjectFlags::BEAM) {
                    builder.push(*grid, 0);
                } else if i + 1 == walk {
                    builder.push(*grid, 0);
                }
            }
        }
    }

    if radius > 0 && !flags.contains(ProjectFlags::BEAM) {
        if flags.contains(ProjectFlags::ARC) && path_len != 0 {
            centre = source;
            radius = radius.min(EngineConfig::MAX_ARC_RADIUS);
        }
        if builder.grids.is_empty() {
            builder.push(centre, 0);
        }
        explode(&mut builder, centre, centerline, radius, flags, projection.degrees);
    }

    if builder.truncated {
        tracing::debug!(
            kind = %projection.kind,
            capacity = EngineConfig::MAX_BLAST_GRIDS,
            "blast area truncated"
        );
    }

    let Builder { state, mut grids, .. } = builder;
    for entry in grids.iter_mut() {
        state.cave.set_flag(entry.grid, SquareFlags::PROJECT, false);
        entry.seen = state.player_sees(entry.grid, config);
    }
    grids.sort_by_key(|entry| entry.distance);

    let damage = (0..=EngineConfig::MAX_RANGE as i32)
        .map(|d| damage_at_distance(projection.damage, radius, projection.diameter, d))
        .collect();

    Blast {
        grids,
        centre,
        radius,
        flags,
        damage,
    }
}

fn explode(
    builder: &mut Builder<'_>,
    centre: Position,
    centerline: Position,
    radius: i32,
    flags: ProjectFlags,
    degrees: i32,
) {
    let arc = flags.contains(ProjectFlags::ARC);
    let rotate = 90 - angle_between(centre, centerline);

    for y in (centre.y - radius)..=(centre.y + radius) {
        for x in (centre.x - radius)..=(centre.x + radius) {
            let grid = Position::new(x, y);
            if grid == centre {
                continue;
            }
            if builder.is_full() {
                builder.truncated = true;
                return;
            }
            if !builder.state.cave.contains(grid) {
                continue;
            }
            let dist = distance(centre, grid);
            if dist > radius {
                continue;
            }
            if arc {
                let diff = (90 - (angle_between(centre, grid) + rotate).abs() % 180).abs();
                if diff >= (degrees + 6) / 4 {
                    continue;
                }
            }
            if reaches(builder, centre, grid, flags) && !builder.push(grid, dist) {
                return;
            }
        }
    }
}

/// Whether the explosion at `centre` reaches `grid`.
///
/// Walls normally stop explosions. With [`ProjectFlags::THRU`] a wall is
/// still hit when it borders a grid the centre can see.
fn reaches(builder: &Builder<'_>, centre: Position, grid: Position, flags: ProjectFlags) -> bool {
    let cave = &builder.state.cave;
    if los(cave, centre, grid) {
        return true;
    }
    if !flags.contains(ProjectFlags::THRU) || cave.is_projectable(grid) {
        return false;
    }
    (-1..=1).any(|dy| {
        (-1..=1).any(|dx| {
            let next = grid.offset(dx, dy);
            (dx != 0 || dy != 0) && cave.is_projectable(next) && los(cave, centre, next)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TerrainKind;
    use crate::project::ProjectionKind;
    use crate::state::Cave;

    fn state(w: u32, h: u32, player: Position) -> GameState {
        GameState::new(Cave::new(w, h), player, 11)
    }

    #[test]
    fn falloff_never_increases() {
        for &(dam, radius, diameter) in &[(100, 3, 0), (300, 20, 20), (55, 5, 40), (7, 2, 10)] {
            let mut last = i32::MAX;
            for d in 0..=EngineConfig::MAX_RANGE as i32 {
                let now = damage_at_distance(dam, radius, diameter, d);
                assert!(now <= last, "dam {dam} radius {radius} diameter {diameter} at {d}");
                last = now;
            }
        }
        assert_eq!(damage_at_distance(100, 2, 0, 3), 0);
        assert_eq!(damage_at_distance(100, 5, 20, 1), 100);
    }

    #[test]
    fn bolt_hits_only_the_last_path_grid() {
        let mut state = state(20, 10, Position::new(2, 5));
        let config = EngineConfig::default();
        let bolt = Projection::new(Source::Player, Position::new(8, 5), ProjectionKind::Missile, 10);
        let blast = blast_area(&mut state, &config, &bolt);
        assert_eq!(blast.grids.len(), 1);
        assert_eq!(blast.grids[0].grid, Position::new(8, 5));
        assert_eq!(blast.grids[0].distance, 0);
        assert_eq!(blast.damage_at(0), 10);
    }

    #[test]
    fn beam_hits_every_path_grid() {
        let mut state = state(20, 10, Position::new(2, 5));
        let config = EngineConfig::default();
        let beam = Projection::new(Source::Player, Position::new(8, 5), ProjectionKind::Missile, 10)
            .with_flags(ProjectFlags::BEAM);
        let path = project_path(&state.cave, 20, Position::new(2, 5), Position::new(8, 5), ProjectFlags::BEAM);
        let blast = blast_area(&mut state, &config, &beam);
        assert_eq!(blast.grids.len(), path.len());
        assert!(path.iter().all(|grid| blast.contains(*grid)));
        assert!(blast.grids.iter().all(|entry| entry.distance == 0));
    }

    #[test]
    fn ball_explodes_before_a_wall() {
        let mut state = state(20, 12, Position::new(2, 5));
        state.cave.set_feat(Position::new(10, 5), TerrainKind::Granite);
        let config = EngineConfig::default();
        let ball = Projection::new(Source::Player, Position::new(12, 5), ProjectionKind::Fire, 30)
            .with_radius(2)
            .with_flags(ProjectFlags::STOP);
        let blast = blast_area(&mut state, &config, &ball);
        assert_eq!(blast.centre, Position::new(9, 5));
        assert!(blast.contains(Position::new(9, 5)));
        assert!(blast.contains(Position::new(10, 5)));
        assert!(!blast.contains(Position::new(11, 5)));
        let distances: Vec<i32> = blast.grids.iter().map(|e| e.distance).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn arc_spreads_from_the_source_towards_the_target() {
        let mut state = state(30, 30, Position::new(5, 15));
        let config = EngineConfig::default();
        let breath = Projection::new(Source::Player, Position::new(20, 15), ProjectionKind::Fire, 50)
            .with_radius(10)
            .with_flags(ProjectFlags::ARC)
            .with_arc(30, 20);
        let blast = blast_area(&mut state, &config, &breath);
        assert_eq!(blast.centre, Position::new(5, 15));
        assert!(blast.contains(Position::new(12, 15)));
        assert!(!blast.contains(Position::new(2, 15)));
        assert!(!blast.contains(Position::new(5, 8)));
    }

    #[test]
    fn zero_width_arc_is_a_beam() {
        let mut state = state(30, 30, Position::new(5, 15));
        let config = EngineConfig::default();
        let arc = Projection::new(Source::Player, Position::new(20, 15), ProjectionKind::Fire, 50)
            .with_radius(4)
            .with_flags(ProjectFlags::ARC);
        let blast = blast_area(&mut state, &config, &arc);
        assert!(blast.flags.contains(ProjectFlags::BEAM));
        assert_eq!(blast.grids.len(), 4);
    }

    #[test]
    fn huge_blast_is_capped() {
        let mut state = state(60, 60, Position::new(2, 2));
        let config = EngineConfig::default();
        let ball = Projection::new(Source::None, Position::new(30, 30), ProjectionKind::Mana, 100)
            .with_radius(20);
        let blast = blast_area(&mut state, &config, &ball);
        assert_eq!(blast.grids.len(), EngineConfig::MAX_BLAST_GRIDS);
        assert_eq!(blast.grids[0].grid, Position::new(30, 30));
        assert!(!state.cave.has_flag(Position::new(30, 30), SquareFlags::PROJECT));
    }
}
