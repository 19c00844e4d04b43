//! Integer grid geometry: distance, line of sight and direction angles.

use crate::env::MapOracle;
use crate::state::Position;

/// Octagonal distance: the longer axis plus half the shorter one.
pub fn distance(a: Position, b: Position) -> i32 {
    let ay = (a.y - b.y).abs();
    let ax = (a.x - b.x).abs();
    if ay > ax { ay + (ax >> 1) } else { ax + (ay >> 1) }
}

/// True when nothing between `a` and `b` blocks projections.
///
/// The end points themselves are never checked, so a wall is visible from
/// the floor next to it. Adjacent grids always see each other.
pub fn los<M: MapOracle + ?Sized>(map: &M, a: Position, b: Position) -> bool {
    let dy = b.y - a.y;
    let dx = b.x - a.x;
    let ay = dy.abs();
    let ax = dx.abs();

    if ax < 2 && ay < 2 {
        return true;
    }

    let open = |x: i32, y: i32| map.is_projectable(Position::new(x, y));

    // Straight lines.
    if dx == 0 {
        let sy = dy.signum();
        let mut ty = a.y + sy;
        while ty != b.y {
            if !open(a.x, ty) {
                return false;
            }
            ty += sy;
        }
        return true;
    }
    if dy == 0 {
        let sx = dx.signum();
        let mut tx = a.x + sx;
        while tx != b.x {
            if !open(tx, a.y) {
                return false;
            }
            tx += sx;
        }
        return true;
    }

    let sx = dx.signum();
    let sy = dy.signum();

    // Knight's moves.
    if ax == 1 && ay == 2 && open(a.x, a.y + sy) {
        return true;
    }
    if ay == 1 && ax == 2 && open(a.x + sx, a.y) {
        return true;
    }

    let f2 = ax * ay;
    let f1 = f2 << 1;

    if ax >= ay {
        let mut qy = ay * ay;
        let m = qy << 1;
        let mut tx = a.x + sx;
        let mut ty = if qy == f2 {
            qy -= f1;
            a.y + sy
        } else {
            a.y
        };
        while tx != b.x {
            if !open(tx, ty) {
                return false;
            }
            qy += m;
            if qy < f2 {
                tx += sx;
            } else if qy > f2 {
                ty += sy;
                if !open(tx, ty) {
                    return false;
                }
                qy -= f1;
                tx += sx;
            } else {
                ty += sy;
                qy -= f1;
                tx += sx;
            }
        }
    } else {
        let mut qx = ax * ax;
        let m = qx << 1;
        let mut ty = a.y + sy;
        let mut tx = if qx == f2 {
            qx -= f1;
            a.x + sx
        } else {
            a.x
        };
        while ty != b.y {
            if !open(tx, ty) {
                return false;
            }
            qx += m;
            if qx < f2 {
                ty += sy;
            } else if qx > f2 {
                tx += sx;
                if !open(tx, ty) {
                    return false;
                }
                qx -= f1;
                ty += sy;
            } else {
                tx += sx;
                qx -= f1;
                ty += sy;
            }
        }
    }
    true
}

/// `tan` of every odd degree from 1 to 89, scaled by 1000.
const TAN_ODD_DEGREES: [i32; 45] = [
    17, 52, 87, 123, 158, 194, 231, 268, 306, 344, 384, 424, 466, 510, 554, 601, 649, 700, 754,
    810, 869, 933, 1000, 1072, 1150, 1235, 1327, 1428, 1540, 1664, 1804, 1963, 2145, 2356, 2605,
    2904, 3271, 3732, 4331, 5145, 6314, 8144, 11430, 19081, 57290,
];

/// Direction of the offset `(dx, dy)` in units of two degrees.
///
/// East is 0, north 45, west 90 and south 135; the result stays in
/// `0..=180`. A zero offset reads as east.
pub fn angle_to_grid(dx: i32, dy: i32) -> i32 {
    let adx = dx.abs();
    let ady = dy.abs();
    let a = TAN_ODD_DEGREES
        .iter()
        .filter(|tan| ady * 1000 > adx * **tan)
        .count() as i32;
    match (dy <= 0, dx >= 0) {
        (true, true) => a,
        (true, false) => 90 - a,
        (false, false) => 90 + a,
        (false, true) => 180 - a,
    }
}

/// Angle from `from` towards `to`.
pub fn angle_between(from: Position, to: Position) -> i32 {
    angle_to_grid(to.x - from.x, to.y - from.y)
}
