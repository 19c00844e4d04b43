//! Engine configuration loader.

use std::path::Path;

use effect_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their defaults, so an empty file yields
    /// [`EngineConfig::default`].
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_range > EngineConfig::MAX_RANGE as i32 {
            tracing::warn!(
                max_range = config.max_range,
                limit = EngineConfig::MAX_RANGE,
                "max_range above the hard limit; projections will be clamped"
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_files_keep_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_range = 12\nfood_value = 50").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.max_range, 12);
        assert_eq!(config.food_value, 50);
        assert_eq!(config.max_swarm, EngineConfig::DEFAULT_MAX_SWARM);
    }

    #[test]
    fn empty_file_is_the_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn bad_values_are_reported() {
        let err = ConfigLoader::parse("max_range = \"far\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config TOML"));
        assert!(ConfigLoader::load(Path::new("/no/such/config.toml")).is_err());
    }
}
