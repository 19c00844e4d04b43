use std::fmt;

/// Discrete grid position expressed in tile coordinates.
///
/// `y` grows southward, `x` grows eastward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the grid displaced by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the neighbouring grid in `dir` (the grid itself for `Target`).
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Aim direction in keypad layout. `Target` (5) means "use the current target".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    SouthWest,
    South,
    SouthEast,
    West,
    #[default]
    Target,
    East,
    NorthWest,
    North,
    NorthEast,
}

impl Direction {
    /// Canonical scan order for pushing and starring: S, N, E, W, SE, SW, NE, NW.
    pub const DDD: [Direction; 8] = [
        Direction::South,
        Direction::North,
        Direction::East,
        Direction::West,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthEast,
        Direction::NorthWest,
    ];

    /// Grid delta `(dx, dy)` for this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::SouthWest => (-1, 1),
            Direction::South => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::West => (-1, 0),
            Direction::Target => (0, 0),
            Direction::East => (1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
        }
    }

    /// Keypad digit for this direction.
    pub const fn keypad(self) -> u8 {
        match self {
            Direction::SouthWest => 1,
            Direction::South => 2,
            Direction::SouthEast => 3,
            Direction::West => 4,
            Direction::Target => 5,
            Direction::East => 6,
            Direction::NorthWest => 7,
            Direction::North => 8,
            Direction::NorthEast => 9,
        }
    }

    pub const fn from_keypad(digit: u8) -> Option<Self> {
        Some(match digit {
            1 => Direction::SouthWest,
            2 => Direction::South,
            3 => Direction::SouthEast,
            4 => Direction::West,
            5 => Direction::Target,
            6 => Direction::East,
            7 => Direction::NorthWest,
            8 => Direction::North,
            9 => Direction::NorthEast,
            _ => return None,
        })
    }
}

/// Identifier of a live monster in the [`MonsterRegistry`](super::MonsterRegistry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterId(pub u32);

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m#{}", self.0)
    }
}

/// Identifier of an object in the [`ObjectRegistry`](super::ObjectRegistry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "o#{}", self.0)
    }
}

/// Who or what is responsible for an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Source {
    #[default]
    None,
    /// A floor trap at the given grid.
    Trap(Position),
    Player,
    Monster(MonsterId),
    /// A carried or wielded object (cursed gear, activations).
    Object(ObjectId),
    /// A trap on a chest.
    ChestTrap(ObjectId),
}

impl Source {
    pub const fn is_player(self) -> bool {
        matches!(self, Source::Player)
    }

    pub const fn monster(self) -> Option<MonsterId> {
        match self {
            Source::Monster(id) => Some(id),
            _ => None,
        }
    }
}
