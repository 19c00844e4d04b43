//! Data-driven effect content and loaders.
//!
//! This crate ships the data files behind the effect engine and the loaders
//! that read them:
//! - Effect kinds' descriptive table (data-driven via RON)
//! - Projection types' resistance and naming table (data-driven via RON)
//! - Named effect chains for objects, spells and traps (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! Loaded tables are handed to `effect-core` and never appear in game state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ChainCatalog, ChainLoader, ConfigLoader, Content, ContentFactory, EffectTableLoader,
    NodeSpec, ProjectionTableLoader,
};
