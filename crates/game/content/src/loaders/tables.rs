//! Effect-kind and projection-type table loaders.
//!
//! Both files are RON lists with one row per kind. Rows may come in any
//! order, but every kind must appear exactly once.

use std::path::Path;

use effect_core::effect::EffectInfo;
use effect_core::project::ProjectionInfo;
use effect_core::{EffectTable, ProjectionTable};

use crate::loaders::{LoadResult, read_file};

/// Loader for the effect-kind table (`effects.ron`).
pub struct EffectTableLoader;

impl EffectTableLoader {
    /// Load the effect table from a RON file.
    pub fn load(path: &Path) -> LoadResult<EffectTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse the effect table from RON text.
    pub fn parse(content: &str) -> LoadResult<EffectTable> {
        let rows: Vec<EffectInfo> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effects RON: {}", e))?;
        let count = rows.len();
        let table = EffectTable::from_entries(rows)
            .map_err(|e| anyhow::anyhow!("Invalid effect table: {}", e))?;
        tracing::debug!(rows = count, "loaded effect table");
        Ok(table)
    }
}

/// Loader for the projection-type table (`projections.ron`).
pub struct ProjectionTableLoader;

impl ProjectionTableLoader {
    /// Load the projection table from a RON file.
    pub fn load(path: &Path) -> LoadResult<ProjectionTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse the projection table from RON text.
    pub fn parse(content: &str) -> LoadResult<ProjectionTable> {
        let rows: Vec<ProjectionInfo> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse projections RON: {}", e))?;
        for row in &rows {
            if row.denominator.base <= 0 && row.denominator.dice <= 0 && row.numerator != 0 {
                tracing::warn!(
                    kind = %row.kind,
                    "projection has a resistance numerator but no denominator"
                );
            }
        }
        let count = rows.len();
        let table = ProjectionTable::from_entries(rows)
            .map_err(|e| anyhow::anyhow!("Invalid projection table: {}", e))?;
        tracing::debug!(rows = count, "loaded projection table");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_rows_must_be_complete() {
        let err = EffectTableLoader::parse("[(kind: Bolt, desc: \"fires a bolt\")]").unwrap_err();
        assert!(err.to_string().contains("Invalid effect table"));
    }

    #[test]
    fn duplicate_projection_rows_are_rejected() {
        let mut rows: Vec<ProjectionInfo> = ProjectionTable::standard().iter().cloned().collect();
        rows.push(rows[0].clone());
        let text = ron::to_string(&rows).unwrap();
        let err = ProjectionTableLoader::parse(&text).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn row_order_does_not_matter() {
        let mut rows: Vec<EffectInfo> = EffectTable::standard().iter().cloned().collect();
        rows.reverse();
        let text = ron::to_string(&rows).unwrap();
        assert_eq!(EffectTableLoader::parse(&text).unwrap(), EffectTable::standard());
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = ProjectionTableLoader::parse("[(kind: Fire,").unwrap_err();
        assert!(err.to_string().contains("Failed to parse projections RON"));
    }
}
