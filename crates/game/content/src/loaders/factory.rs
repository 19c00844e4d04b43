//! Content factory for building the engine's tables from data files.

use std::path::{Path, PathBuf};

use effect_core::{EffectTable, EngineConfig, Env, ProjectionTable};

use crate::loaders::{
    ChainCatalog, ChainLoader, ConfigLoader, EffectTableLoader, LoadResult, ProjectionTableLoader,
};

/// Content factory that loads all effect content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── effects.ron
/// ├── projections.ron
/// └── chains.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the effect-kind table from `effects.ron`.
    pub fn load_effects(&self) -> LoadResult<EffectTable> {
        EffectTableLoader::load(&self.data_dir.join("effects.ron"))
    }

    /// Load the projection-type table from `projections.ron`.
    pub fn load_projections(&self) -> LoadResult<ProjectionTable> {
        ProjectionTableLoader::load(&self.data_dir.join("projections.ron"))
    }

    /// Load named effect chains from `chains.ron`.
    pub fn load_chains(&self) -> LoadResult<ChainCatalog> {
        ChainLoader::load(&self.data_dir.join("chains.ron"))
    }

    /// Load everything at once.
    pub fn load_all(&self) -> LoadResult<Content> {
        tracing::info!(dir = %self.data_dir.display(), "loading effect content");
        Ok(Content {
            config: self.load_config()?,
            effects: self.load_effects()?,
            projections: self.load_projections()?,
            chains: self.load_chains()?,
        })
    }
}

/// Every table the engine needs, plus the named chains.
#[derive(Clone, Debug)]
pub struct Content {
    pub config: EngineConfig,
    pub effects: EffectTable,
    pub projections: ProjectionTable,
    pub chains: ChainCatalog,
}

impl Content {
    /// Borrows the tables as an engine environment.
    pub fn env(&self) -> Env<'_> {
        Env::new(&self.effects, &self.projections, &self.config)
    }
}
