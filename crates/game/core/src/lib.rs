//! Effect resolution and projection engine.
//!
//! `effect-core` turns declarative effect chains (potions, wands, spells,
//! traps, monster breaths) into changes to the game state. It owns the dice
//! grammar, the effect registry and handlers, and the projection geometry
//! with its per-target dispatchers. It performs no I/O: registries and
//! configuration are built in code or handed over by `effect-content`.
//!
//! All mutation flows through [`effect::execute`] (or [`project::project`]
//! for a bare projection), with the read-only tables bundled in [`Env`].
pub mod config;
pub mod dice;
pub mod effect;
pub mod env;
pub mod error;
pub mod project;
pub mod state;

pub use config::EngineConfig;
pub use dice::{Aspect, Dice, DiceError, RandomValue};
pub use effect::{
    ChainError, Effect, EffectChain, EffectKind, EffectNode, EffectRequest, EffectSelector,
    EffectTable, ExecuteError, RegistryError, SimpleEffect, describe, execute, execute_simple,
};
pub use env::{Env, GameRng, MapDimensions, MapOracle, TerrainKind};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use project::{
    ProjectFlags, Projection, ProjectionKind, ProjectionTable, adjust_dam, project, project_path,
};
pub use state::{
    Cave, Direction, GameState, MessageLog, MonsterId, ObjectId, PlayerState, Position, Source,
};
