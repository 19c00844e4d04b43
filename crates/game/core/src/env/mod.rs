//! Read-only world data and deterministic randomness.
//!
//! The [`Env`] aggregate bundles the effect table, the projection table and
//! the engine configuration so handlers can consult them without hard
//! coupling to where they were loaded from.
mod map;
mod rng;

pub use map::{MapDimensions, MapOracle, TerrainKind};
pub use rng::GameRng;

use crate::config::EngineConfig;
use crate::effect::EffectTable;
use crate::project::ProjectionTable;

/// Aggregates the read-only tables required by the engine and dispatchers.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a> {
    effects: &'a EffectTable,
    projections: &'a ProjectionTable,
    config: &'a EngineConfig,
}

impl<'a> Env<'a> {
    pub fn new(
        effects: &'a EffectTable,
        projections: &'a ProjectionTable,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            effects,
            projections,
            config,
        }
    }

    pub fn effects(&self) -> &'a EffectTable {
        self.effects
    }

    pub fn projections(&self) -> &'a ProjectionTable {
        self.projections
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }
}
