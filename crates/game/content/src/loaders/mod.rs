//! Content loaders for reading effect data from files.
//!
//! Each loader turns one RON or TOML file into the `effect-core` type it
//! describes and checks it the way the engine expects (complete tables,
//! well-formed chains).

pub mod chains;
pub mod config;
pub mod factory;
pub mod tables;

pub use chains::{ChainCatalog, ChainLoader, NodeSpec};
pub use config::ConfigLoader;
pub use factory::{Content, ContentFactory};
pub use tables::{EffectTableLoader, ProjectionTableLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
