/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Maximum distance a projection may travel.
    pub max_range: i32,
    /// Maximum distance at which the player can see a lit grid.
    pub max_sight: i32,
    /// Radius of the player's own light source.
    pub light_radius: i32,
    /// Food units added per point of a nourish effect.
    pub food_value: i32,
    /// Upper bound on the number of balls a single swarm effect releases.
    pub max_swarm: i32,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Hard bound on projection range; sizes the per-distance damage table.
    pub const MAX_RANGE: usize = 20;
    /// Capacity of a traced projection path.
    pub const PATH_CAPACITY: usize = 512;
    /// Capacity of one blast area.
    pub const MAX_BLAST_GRIDS: usize = 256;
    /// Arcs never spread further than this from their source.
    pub const MAX_ARC_RADIUS: i32 = 20;
    /// Deepest dungeon level; scales level-dependent bonuses.
    pub const MAX_DEPTH: i32 = 128;
    /// Number of adjacent grids (used by neighbour scans).
    pub const NEIGHBOURS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_RANGE: i32 = 20;
    pub const DEFAULT_MAX_SIGHT: i32 = 20;
    pub const DEFAULT_LIGHT_RADIUS: i32 = 1;
    pub const DEFAULT_FOOD_VALUE: i32 = 100;
    pub const DEFAULT_MAX_SWARM: i32 = 10;

    pub fn new() -> Self {
        Self {
            max_range: Self::DEFAULT_MAX_RANGE,
            max_sight: Self::DEFAULT_MAX_SIGHT,
            light_radius: Self::DEFAULT_LIGHT_RADIUS,
            food_value: Self::DEFAULT_FOOD_VALUE,
            max_swarm: Self::DEFAULT_MAX_SWARM,
        }
    }

    pub fn with_max_range(max_range: i32) -> Self {
        Self {
            max_range,
            ..Self::new()
        }
    }

    /// Projection range actually used by the tracer, never above the hard bound.
    pub fn projection_range(&self) -> i32 {
        self.max_range.clamp(0, Self::MAX_RANGE as i32)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
