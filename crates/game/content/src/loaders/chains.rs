//! Named effect-chain loader.
//!
//! Chains are written flat, the way object and spell files list their
//! effects, and nested into [`EffectChain`] trees on load:
//!
//! ```text
//! [
//!     (
//!         name: "Wand of Fire Bolts",
//!         effects: [
//!             (effect: "BOLT_OR_BEAM", subtype: "FIRE", dice: "12d8", other: -10),
//!         ],
//!     ),
//! ]
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use effect_core::effect::Subtype;
use effect_core::{ChainError, Dice, EffectChain, EffectKind, EffectNode};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// One node as written in a chain file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    /// Effect kind name, e.g. `TIMED_INC`.
    pub effect: String,
    /// Subtype name, interpreted per effect kind.
    pub subtype: String,
    /// Dice expression; empty means none.
    pub dice: String,
    pub radius: i32,
    pub other: i32,
    pub y: i32,
    pub x: i32,
    pub msg: Option<String>,
}

impl NodeSpec {
    /// Builds the engine node; `index` is the node's position in its chain.
    pub fn to_node(&self, index: usize) -> Result<EffectNode, ChainError> {
        let name = self.effect.trim();
        let kind = EffectKind::from_str(name).map_err(|_| ChainError::UnknownEffect {
            name: name.to_string(),
        })?;
        let mut node = EffectNode::new(kind)
            .with_subtype(Subtype::parse(kind, &self.subtype)?)
            .with_radius(self.radius)
            .with_other(self.other)
            .with_target(self.y, self.x);
        if !self.dice.trim().is_empty() {
            let dice = Dice::parse(&self.dice)
                .map_err(|source| ChainError::invalid_dice(index, kind, source))?;
            node = node.with_dice(dice);
        }
        if let Some(msg) = &self.msg {
            node = node.with_msg(msg.clone());
        }
        Ok(node)
    }
}

#[derive(Debug, Deserialize)]
struct ChainSpec {
    name: String,
    effects: Vec<NodeSpec>,
}

/// Chains keyed by name.
#[derive(Clone, Debug, Default)]
pub struct ChainCatalog {
    chains: BTreeMap<String, EffectChain>,
}

impl ChainCatalog {
    pub fn get(&self, name: &str) -> Option<&EffectChain> {
        self.chains.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EffectChain)> {
        self.chains.iter().map(|(name, chain)| (name.as_str(), chain))
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// Loader for named effect chains (`chains.ron`).
pub struct ChainLoader;

impl ChainLoader {
    /// Load every chain from a RON file.
    pub fn load(path: &Path) -> LoadResult<ChainCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse every chain from RON text.
    ///
    /// Fails on the first malformed chain, naming it.
    pub fn parse(content: &str) -> LoadResult<ChainCatalog> {
        let specs: Vec<ChainSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse chains RON: {}", e))?;

        let mut chains = BTreeMap::new();
        for spec in specs {
            let nodes = spec
                .effects
                .iter()
                .enumerate()
                .map(|(index, node)| node.to_node(index))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| anyhow::anyhow!("Invalid chain {:?}: {}", spec.name, e))?;

            let chain = EffectChain::from_flat(nodes);
            if chains.insert(spec.name.clone(), chain).is_some() {
                anyhow::bail!("Duplicate chain name {:?}", spec.name);
            }
        }
        tracing::debug!(chains = chains.len(), "loaded effect chains");
        Ok(ChainCatalog { chains })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use effect_core::project::ProjectionKind;

    #[test]
    fn nodes_parse_kind_subtype_and_dice() {
        let spec = NodeSpec {
            effect: "BOLT".into(),
            subtype: "FIRE".into(),
            dice: "6d8".into(),
            ..NodeSpec::default()
        };
        let node = spec.to_node(0).unwrap();
        assert_eq!(node.kind, EffectKind::Bolt);
        assert_eq!(node.subtype, Subtype::Projection(ProjectionKind::Fire));
        assert!(node.dice.is_some());
    }

    #[test]
    fn bad_nodes_name_the_problem() {
        let unknown = NodeSpec {
            effect: "FIREWORKS".into(),
            ..NodeSpec::default()
        };
        assert_eq!(
            unknown.to_node(0),
            Err(ChainError::UnknownEffect {
                name: "FIREWORKS".into()
            })
        );

        let bad_subtype = NodeSpec {
            effect: "BALL".into(),
            subtype: "GLITTER".into(),
            ..NodeSpec::default()
        };
        assert!(matches!(
            bad_subtype.to_node(0),
            Err(ChainError::UnknownSubtype { .. })
        ));

        let bad_dice = NodeSpec {
            effect: "HEAL_HP".into(),
            dice: "3d".into(),
            ..NodeSpec::default()
        };
        assert!(matches!(
            bad_dice.to_node(4),
            Err(ChainError::InvalidDice { index: 4, .. })
        ));
    }

    #[test]
    fn random_blocks_nest_their_children() {
        let text = r#"[
            (
                name: "Potion of Dragon Breath",
                effects: [
                    (effect: "RANDOM", dice: "2"),
                    (effect: "BREATH", subtype: "FIRE", dice: "80", other: 20),
                    (effect: "BREATH", subtype: "COLD", dice: "80", other: 20),
                ],
            ),
        ]"#;
        let catalog = ChainLoader::parse(text).unwrap();
        let chain = catalog.get("Potion of Dragon Breath").unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.flatten().len(), 3);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let text = r#"[
            (name: "Twice", effects: [(effect: "DAMAGE", dice: "1")]),
            (name: "Twice", effects: [(effect: "DAMAGE", dice: "2")]),
        ]"#;
        let err = ChainLoader::parse(text).unwrap_err();
        assert!(err.to_string().contains("Duplicate chain name"));
    }

    #[test]
    fn errors_name_the_chain() {
        let text = r#"[(name: "Broken", effects: [(effect: "NOPE")])]"#;
        let err = ChainLoader::parse(text).unwrap_err();
        assert!(err.to_string().contains("\"Broken\""));
    }
}
