use crate::state::Position;

/// Read-only terrain query surface used by the path tracer and blast builder.
///
/// Grids outside [`MapOracle::dimensions`] behave as permanent rock: they are
/// neither passable nor projectable.
pub trait MapOracle {
    fn dimensions(&self) -> MapDimensions;
    fn terrain(&self, position: Position) -> Option<TerrainKind>;

    /// True when a monster or the player stands on the grid.
    fn is_occupied(&self, _position: Position) -> bool {
        false
    }

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// True when projections may travel through the grid.
    fn is_projectable(&self, position: Position) -> bool {
        self.terrain(position).is_some_and(TerrainKind::is_projectable)
    }

    /// True when creatures may stand on the grid.
    fn is_passable(&self, position: Position) -> bool {
        self.terrain(position).is_some_and(TerrainKind::is_passable)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    /// True for grids inside the map that are not on its outer edge.
    pub fn contains_fully(&self, position: Position) -> bool {
        position.x > 0
            && position.y > 0
            && position.x < self.width as i32 - 1
            && position.y < self.height as i32 - 1
    }
}

/// Terrain features a dungeon grid can hold.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TerrainKind {
    #[default]
    Floor,
    OpenDoor,
    BrokenDoor,
    ClosedDoor,
    LockedDoor,
    SecretDoor,
    Rubble,
    PassableRubble,
    Magma,
    Quartz,
    MagmaTreasure,
    QuartzTreasure,
    Granite,
    Permanent,
    Lava,
}

impl TerrainKind {
    pub const fn is_passable(self) -> bool {
        matches!(
            self,
            TerrainKind::Floor
                | TerrainKind::OpenDoor
                | TerrainKind::BrokenDoor
                | TerrainKind::PassableRubble
                | TerrainKind::Lava
        )
    }

    pub const fn is_projectable(self) -> bool {
        matches!(
            self,
            TerrainKind::Floor | TerrainKind::OpenDoor | TerrainKind::BrokenDoor | TerrainKind::Lava
        )
    }

    pub const fn is_floor(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }

    /// Granite, permanent rock and mineral veins.
    pub const fn is_wall(self) -> bool {
        matches!(
            self,
            TerrainKind::Granite
                | TerrainKind::Permanent
                | TerrainKind::Magma
                | TerrainKind::Quartz
                | TerrainKind::MagmaTreasure
                | TerrainKind::QuartzTreasure
        )
    }

    /// Anything diggable: walls other than permanent rock, plus rubble.
    pub const fn is_rock(self) -> bool {
        (self.is_wall() && !self.is_permanent()) || self.is_rubble()
    }

    pub const fn is_door(self) -> bool {
        matches!(
            self,
            TerrainKind::OpenDoor
                | TerrainKind::BrokenDoor
                | TerrainKind::ClosedDoor
                | TerrainKind::LockedDoor
                | TerrainKind::SecretDoor
        )
    }

    pub const fn is_closed_door(self) -> bool {
        matches!(
            self,
            TerrainKind::ClosedDoor | TerrainKind::LockedDoor | TerrainKind::SecretDoor
        )
    }

    pub const fn is_locked_door(self) -> bool {
        matches!(self, TerrainKind::LockedDoor)
    }

    pub const fn is_secret_door(self) -> bool {
        matches!(self, TerrainKind::SecretDoor)
    }

    pub const fn is_rubble(self) -> bool {
        matches!(self, TerrainKind::Rubble | TerrainKind::PassableRubble)
    }

    pub const fn is_magma(self) -> bool {
        matches!(self, TerrainKind::Magma | TerrainKind::MagmaTreasure)
    }

    pub const fn is_quartz(self) -> bool {
        matches!(self, TerrainKind::Quartz | TerrainKind::QuartzTreasure)
    }

    pub const fn has_treasure(self) -> bool {
        matches!(self, TerrainKind::MagmaTreasure | TerrainKind::QuartzTreasure)
    }

    pub const fn is_fiery(self) -> bool {
        matches!(self, TerrainKind::Lava)
    }

    /// Terrain that glows on its own and cannot be darkened.
    pub const fn is_bright(self) -> bool {
        matches!(self, TerrainKind::Lava)
    }

    pub const fn is_permanent(self) -> bool {
        matches!(self, TerrainKind::Permanent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doors_and_walls_block_projection() {
        assert!(TerrainKind::Floor.is_projectable());
        assert!(TerrainKind::OpenDoor.is_projectable());
        assert!(!TerrainKind::ClosedDoor.is_projectable());
        assert!(!TerrainKind::Granite.is_projectable());
        assert!(TerrainKind::PassableRubble.is_passable());
        assert!(!TerrainKind::PassableRubble.is_projectable());
    }

    #[test]
    fn rock_excludes_permanent_walls() {
        assert!(TerrainKind::Granite.is_rock());
        assert!(TerrainKind::Rubble.is_rock());
        assert!(!TerrainKind::Permanent.is_rock());
        assert!(TerrainKind::Permanent.is_wall());
    }

    #[test]
    fn dimensions_bound_checks() {
        let dims = MapDimensions::new(4, 3);
        assert!(dims.contains(Position::new(3, 2)));
        assert!(!dims.contains(Position::new(4, 0)));
        assert!(dims.contains_fully(Position::new(1, 1)));
        assert!(!dims.contains_fully(Position::new(0, 1)));
    }
}
