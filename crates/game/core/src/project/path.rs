//! Projection path tracing.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::env::MapOracle;
use crate::state::Position;

use super::ProjectFlags;

/// Grids a projection passes through, in order, never including its start.
pub type ProjectPath = ArrayVec<Position, { EngineConfig::PATH_CAPACITY }>;

/// Traces the path of a projection from `start` towards `end`.
///
/// Every step saves the grid it entered and then stops if the path has
/// reached `range` (diagonal steps count one and a half), if it arrived at
/// `end` without [`ProjectFlags::THRU`], if the grid blocks projections, or
/// if the grid is occupied and [`ProjectFlags::STOP`] is set.
pub fn project_path<M: MapOracle + ?Sized>(
    map: &M,
    range: i32,
    start: Position,
    end: Position,
    flags: ProjectFlags,
) -> ProjectPath {
    let mut path = ProjectPath::new();
    let range = range.min(EngineConfig::PATH_CAPACITY as i32);
    if start == end || range <= 0 {
        return path;
    }

    let (ay, sy) = if end.y < start.y { (start.y - end.y, -1) } else { (end.y - start.y, 1) };
    let (ax, sx) = if end.x < start.x { (start.x - end.x, -1) } else { (end.x - start.x, 1) };

    let half = ay * ax;
    let full = half << 1;

    // Whether the walk must end after recording `grid`.
    let stops_at = |grid: Position, travelled: i32| -> bool {
        travelled >= range
            || (!flags.contains(ProjectFlags::THRU) && grid == end)
            || !map.is_projectable(grid)
            || (flags.contains(ProjectFlags::STOP) && map.is_occupied(grid))
    };

    let mut k = 0;
    if ay > ax {
        let mut frac = ax * ax;
        let m = frac << 1;
        let mut grid = Position::new(start.x, start.y + sy);
        loop {
            if path.try_push(grid).is_err() {
                break;
            }
            if stops_at(grid, path.len() as i32 + (k >> 1)) {
                break;
            }
            if m != 0 {
                frac += m;
                if frac >= half {
                    grid.x += sx;
                    frac -= full;
                    k += 1;
                }
            }
            grid.y += sy;
        }
    } else if ax > ay {
        let mut frac = ay * ay;
        let m = frac << 1;
        let mut grid = Position::new(start.x + sx, start.y);
        loop {
            if path.try_push(grid).is_err() {
                break;
            }
            if stops_at(grid, path.len() as i32 + (k >> 1)) {
                break;
            }
            if m != 0 {
                frac += m;
                if frac >= half {
                    grid.y += sy;
                    frac -= full;
                    k += 1;
                }
            }
            grid.x += sx;
        }
    } else {
        let mut grid = Position::new(start.x + sx, start.y + sy);
        loop {
            if path.try_push(grid).is_err() {
                break;
            }
            let n = path.len() as i32;
            if stops_at(grid, n + (n >> 1)) {
                break;
            }
            grid.x += sx;
            grid.y += sy;
        }
    }
    path
}
