//! Dungeon level grid: terrain, square markers, traps and occupants.

use bitflags::bitflags;

use crate::env::{MapDimensions, MapOracle, TerrainKind};

use super::common::{MonsterId, Position};

bitflags! {
    /// Per-square markers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SquareFlags: u8 {
        /// The square is lit.
        const GLOW = 1 << 0;
        /// The player remembers the square.
        const MARK = 1 << 1;
        /// A glyph of warding protects the square.
        const WARD = 1 << 2;
        /// Scratch tag used while building a blast area.
        const PROJECT = 1 << 3;
    }
}

/// Floor trap placed on a square.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trap {
    pub name: String,
    pub visible: bool,
    pub disabled: bool,
}

impl Trap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: false,
            disabled: false,
        }
    }
}

/// Who is standing on a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occupant {
    #[default]
    None,
    Player,
    Monster(MonsterId),
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square {
    pub feat: TerrainKind,
    pub info: SquareFlags,
    pub trap: Option<Trap>,
    pub occupant: Occupant,
}

/// Mutable level grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cave {
    width: u32,
    height: u32,
    squares: Vec<Square>,
    /// Dungeon level; zero is the town.
    pub depth: i32,
    pub daytime: bool,
}

impl Cave {
    /// Creates a level of plain floor surrounded by permanent rock.
    pub fn new(width: u32, height: u32) -> Self {
        let dims = MapDimensions::new(width, height);
        let mut squares = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let feat = if dims.contains_fully(Position::new(x, y)) {
                    TerrainKind::Floor
                } else {
                    TerrainKind::Permanent
                };
                squares.push(Square {
                    feat,
                    ..Square::default()
                });
            }
        }
        Self {
            width,
            height,
            squares,
            depth: 1,
            daytime: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions()
            .contains(position)
            .then(|| (position.y as u32 * self.width + position.x as u32) as usize)
    }

    pub fn square(&self, position: Position) -> Option<&Square> {
        self.index(position).map(|i| &self.squares[i])
    }

    pub fn square_mut(&mut self, position: Position) -> Option<&mut Square> {
        self.index(position).map(move |i| &mut self.squares[i])
    }

    /// Terrain at `position`; permanent rock outside the map.
    pub fn feat(&self, position: Position) -> TerrainKind {
        self.square(position)
            .map_or(TerrainKind::Permanent, |square| square.feat)
    }

    pub fn set_feat(&mut self, position: Position, feat: TerrainKind) {
        if let Some(square) = self.square_mut(position) {
            square.feat = feat;
        }
    }

    pub fn has_flag(&self, position: Position, flag: SquareFlags) -> bool {
        self.square(position)
            .is_some_and(|square| square.info.contains(flag))
    }

    pub fn set_flag(&mut self, position: Position, flag: SquareFlags, on: bool) {
        if let Some(square) = self.square_mut(position) {
            square.info.set(flag, on);
        }
    }

    pub fn occupant(&self, position: Position) -> Occupant {
        self.square(position)
            .map_or(Occupant::None, |square| square.occupant)
    }

    pub fn set_occupant(&mut self, position: Position, occupant: Occupant) {
        if let Some(square) = self.square_mut(position) {
            square.occupant = occupant;
        }
    }

    pub fn monster_at(&self, position: Position) -> Option<MonsterId> {
        match self.occupant(position) {
            Occupant::Monster(id) => Some(id),
            _ => None,
        }
    }

    pub fn trap(&self, position: Position) -> Option<&Trap> {
        self.square(position).and_then(|square| square.trap.as_ref())
    }

    pub fn trap_mut(&mut self, position: Position) -> Option<&mut Trap> {
        self.square_mut(position)
            .and_then(|square| square.trap.as_mut())
    }

    pub fn place_trap(&mut self, position: Position, trap: Trap) {
        if let Some(square) = self.square_mut(position) {
            square.trap = Some(trap);
        }
    }

    /// True for a floor grid with no occupant and no trap.
    pub fn is_empty(&self, position: Position) -> bool {
        self.square(position).is_some_and(|square| {
            square.feat.is_floor() && square.occupant == Occupant::None && square.trap.is_none()
        })
    }

    pub fn is_lit(&self, position: Position) -> bool {
        self.has_flag(position, SquareFlags::GLOW) || self.feat(position).is_bright()
    }

    /// Swaps whoever stands on `a` with whoever stands on `b`.
    pub fn swap_occupants(&mut self, a: Position, b: Position) {
        let first = self.occupant(a);
        let second = self.occupant(b);
        self.set_occupant(a, second);
        self.set_occupant(b, first);
    }
}

impl MapOracle for Cave {
    fn dimensions(&self) -> MapDimensions {
        MapDimensions::new(self.width, self.height)
    }

    fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.square(position).map(|square| square.feat)
    }

    fn is_occupied(&self, position: Position) -> bool {
        self.occupant(position) != Occupant::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_level_is_walled_floor() {
        let cave = Cave::new(5, 4);
        assert_eq!(cave.feat(Position::new(0, 0)), TerrainKind::Permanent);
        assert_eq!(cave.feat(Position::new(2, 2)), TerrainKind::Floor);
        assert_eq!(cave.feat(Position::new(-1, 2)), TerrainKind::Permanent);
        assert!(!cave.is_projectable(Position::new(9, 9)));
    }

    #[test]
    fn swapping_occupants_moves_both() {
        let mut cave = Cave::new(5, 5);
        let a = Position::new(1, 1);
        let b = Position::new(2, 1);
        cave.set_occupant(a, Occupant::Player);
        cave.set_occupant(b, Occupant::Monster(MonsterId(3)));
        cave.swap_occupants(a, b);
        assert_eq!(cave.occupant(a), Occupant::Monster(MonsterId(3)));
        assert_eq!(cave.occupant(b), Occupant::Player);
        assert!(cave.is_occupied(a));
    }
}
