//! Effect chains as a tagged tree.
//!
//! Data files describe a chain as a flat list in which a control node
//! (`RANDOM`, `SELECT`) owns the nodes that follow it. [`EffectChain::from_flat`]
//! turns that list into [`Effect`] values so the engine can recurse over
//! structure instead of skipping pointers.

use crate::dice::Dice;
use crate::project::ProjectionTable;

use super::kind::{EffectInfoFormat, EffectKind, Subtype};
use super::registry::EffectTable;

// ============================================================================
// Nodes
// ============================================================================

/// One step of an effect chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectNode {
    pub kind: EffectKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dice: Option<Dice>,
    /// Explicit target row; zero means "not set".
    #[cfg_attr(feature = "serde", serde(default))]
    pub y: i32,
    /// Explicit target column; zero means "not set".
    #[cfg_attr(feature = "serde", serde(default))]
    pub x: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subtype: Subtype,
    #[cfg_attr(feature = "serde", serde(default))]
    pub radius: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub other: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub msg: Option<String>,
}

impl EffectNode {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_dice(mut self, dice: Dice) -> Self {
        self.dice = Some(dice);
        self
    }

    pub fn with_subtype(mut self, subtype: Subtype) -> Self {
        self.subtype = subtype;
        self
    }

    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_other(mut self, other: i32) -> Self {
        self.other = other;
        self
    }

    pub fn with_target(mut self, y: i32, x: i32) -> Self {
        self.y = y;
        self.x = x;
        self
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    /// Average of the node's dice at level zero; zero without dice.
    pub fn average(&self) -> i32 {
        self.dice.map_or(0, |dice| dice.average())
    }
}

// ============================================================================
// Tree
// ============================================================================

/// A control node and the alternatives it chooses between.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceBlock {
    pub node: EffectNode,
    pub children: Vec<Effect>,
}

impl ChoiceBlock {
    pub fn new(node: EffectNode, children: Vec<Effect>) -> Self {
        Self { node, children }
    }
}

/// One element of an effect chain.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    Simple(EffectNode),
    /// Picks one child at random.
    RandomChoice(ChoiceBlock),
    /// Lets the player pick one child, or picks at random for other sources.
    ExplicitChoice(ChoiceBlock),
}

impl Effect {
    /// Wraps a node, giving control kinds an empty block.
    pub fn leaf(node: EffectNode) -> Self {
        match node.kind {
            EffectKind::Random => Effect::RandomChoice(ChoiceBlock::new(node, Vec::new())),
            EffectKind::Select => Effect::ExplicitChoice(ChoiceBlock::new(node, Vec::new())),
            _ => Effect::Simple(node),
        }
    }

    /// Builds a block of the right flavour for `node`'s control kind.
    ///
    /// Non-control nodes ignore `children` and stay simple.
    pub fn block(node: EffectNode, children: Vec<Effect>) -> Self {
        match node.kind {
            EffectKind::Random => Effect::RandomChoice(ChoiceBlock::new(node, children)),
            EffectKind::Select => Effect::ExplicitChoice(ChoiceBlock::new(node, children)),
            _ => Effect::Simple(node),
        }
    }

    pub fn node(&self) -> &EffectNode {
        match self {
            Effect::Simple(node) => node,
            Effect::RandomChoice(block) | Effect::ExplicitChoice(block) => &block.node,
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.node().kind
    }

    pub fn choice(&self) -> Option<&ChoiceBlock> {
        match self {
            Effect::Simple(_) => None,
            Effect::RandomChoice(block) | Effect::ExplicitChoice(block) => Some(block),
        }
    }

    /// Number of flat nodes this effect occupies.
    pub fn flat_len(&self) -> usize {
        match self.choice() {
            None => 1,
            Some(block) => 1 + block.children.iter().map(Effect::flat_len).sum::<usize>(),
        }
    }

    fn flatten_into(&self, out: &mut Vec<EffectNode>) {
        out.push(self.node().clone());
        if let Some(block) = self.choice() {
            for child in &block.children {
                child.flatten_into(out);
            }
        }
    }

    /// True when the effect deals damage; a block does if any child does.
    pub fn damages(&self, effects: &EffectTable) -> bool {
        match self.choice() {
            Some(block) => block.children.iter().any(|child| child.damages(effects)),
            None => effects
                .get(self.kind())
                .is_some_and(|info| info.damages()),
        }
    }

    /// Average damage; a block averages over the choices it offers.
    pub fn avg_damage(&self, effects: &EffectTable) -> i32 {
        match self.choice() {
            Some(block) => {
                let n = block.node.average();
                if n <= 0 {
                    return 0;
                }
                let total: i32 = block
                    .children
                    .iter()
                    .take(n as usize)
                    .map(|child| child.avg_damage(effects))
                    .sum();
                total / n
            }
            None if self.damages(effects) => self.node().average(),
            None => 0,
        }
    }

    /// Player-facing description of what the effect projects.
    ///
    /// A block only answers when every child projects the same thing.
    pub fn projection<'t>(
        &self,
        effects: &EffectTable,
        projections: &'t ProjectionTable,
    ) -> &'t str {
        match self.choice() {
            Some(block) => {
                let mut shared: Option<&'t str> = None;
                for child in &block.children {
                    let desc = child.projection(effects, projections);
                    match shared {
                        Some(prev) if prev != desc => return "",
                        _ => shared = Some(desc),
                    }
                }
                shared.unwrap_or("")
            }
            None => {
                let node = self.node();
                let projects = matches!(
                    effects.format(node.kind),
                    EffectInfoFormat::Ball
                        | EffectInfoFormat::BoltDam
                        | EffectInfoFormat::Breath
                        | EffectInfoFormat::Spot
                );
                match node.subtype.projection() {
                    Some(kind) if projects => projections.player_desc(kind),
                    _ => "",
                }
            }
        }
    }
}

// ============================================================================
// Chain
// ============================================================================

/// An ordered list of effects executed as one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EffectChain {
    effects: Vec<Effect>,
}

impl EffectChain {
    pub fn new(effects: Vec<Effect>) -> Self {
        Self { effects }
    }

    /// A one-node chain.
    pub fn single(node: EffectNode) -> Self {
        Self::new(vec![Effect::leaf(node)])
    }

    /// Converts the flat data form into a tree.
    ///
    /// A top-level control node takes the next `average(dice)` nodes as its
    /// children, fewer if the list runs out. Control nodes met while filling a
    /// block become empty blocks.
    pub fn from_flat(nodes: Vec<EffectNode>) -> Self {
        let mut effects = Vec::new();
        let mut iter = nodes.into_iter();
        while let Some(node) = iter.next() {
            if !node.kind.is_control() {
                effects.push(Effect::Simple(node));
                continue;
            }
            let wanted = node.average().max(0) as usize;
            let mut children = Vec::with_capacity(wanted);
            while children.len() < wanted {
                match iter.next() {
                    Some(child) => children.push(Effect::leaf(child)),
                    None => break,
                }
            }
            effects.push(Effect::block(node, children));
        }
        Self { effects }
    }

    /// Inverse of [`EffectChain::from_flat`] for well-formed chains.
    pub fn flatten(&self) -> Vec<EffectNode> {
        let mut out = Vec::with_capacity(self.effects.iter().map(Effect::flat_len).sum());
        for effect in &self.effects {
            effect.flatten_into(&mut out);
        }
        out
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// True when any effect in the chain deals damage.
    pub fn damages(&self, effects: &EffectTable) -> bool {
        self.effects.iter().any(|effect| effect.damages(effects))
    }
}

impl From<Vec<Effect>> for EffectChain {
    fn from(effects: Vec<Effect>) -> Self {
        Self::new(effects)
    }
}

impl FromIterator<Effect> for EffectChain {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EffectChain {
    type Item = &'a Effect;
    type IntoIter = std::slice::Iter<'a, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.iter()
    }
}

/// Index of the node after `flat[index]` in a flat chain.
///
/// Control nodes skip the children they own. The result may run past the
/// end of the list; callers treat that as the end of the chain.
pub fn effect_next(flat: &[EffectNode], index: usize) -> usize {
    match flat.get(index) {
        Some(node) if node.kind.is_control() => index + node.average().max(0) as usize + 1,
        _ => index + 1,
    }
}
