//! Per-node execution context handed to effect handlers.

use crate::dice::RandomValue;
use crate::env::Env;
use crate::state::{Direction, GameState, ObjectId, Position, Source};

use super::chain::EffectNode;
use super::kind::{EffectKind, Subtype};

/// How a chain is being triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectRequest {
    pub source: Source,
    /// Object the effect comes from (wand, potion), if any.
    pub object: Option<ObjectId>,
    /// The player already knows what the effect does.
    pub aware: bool,
    pub dir: Direction,
    /// Percent chance that bolt-or-beam effects become beams.
    pub beam: i32,
    /// Device-skill percentage added to boosted damage.
    pub boost: i32,
}

impl EffectRequest {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            object: None,
            aware: true,
            dir: Direction::Target,
            beam: 0,
            boost: 0,
        }
    }

    pub fn with_object(mut self, object: ObjectId) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_aware(mut self, aware: bool) -> Self {
        self.aware = aware;
        self
    }

    pub fn with_dir(mut self, dir: Direction) -> Self {
        self.dir = dir;
        self
    }

    pub fn with_beam(mut self, beam: i32) -> Self {
        self.beam = beam;
        self
    }

    pub fn with_boost(mut self, boost: i32) -> Self {
        self.boost = boost;
        self
    }
}

impl Default for EffectRequest {
    fn default() -> Self {
        Self::new(Source::Player)
    }
}

/// Everything a handler may read or change while one node runs.
pub struct EffectContext<'a, 's> {
    pub env: Env<'a>,
    pub state: &'s mut GameState,

    pub kind: EffectKind,
    pub source: Source,
    pub object: Option<ObjectId>,
    pub aware: bool,
    pub dir: Direction,
    pub beam: i32,
    pub boost: i32,

    /// The node's dice, already collapsed into its components.
    pub value: RandomValue,
    pub subtype: Subtype,
    pub radius: i32,
    pub other: i32,
    pub y: i32,
    pub x: i32,
    pub msg: Option<String>,

    /// Set by handlers whose outcome the player noticed.
    pub ident: bool,
    /// Value fixed by `SET_VALUE` for the rest of the chain.
    pub forced: Option<i32>,
}

impl<'a, 's> EffectContext<'a, 's> {
    pub fn new(
        env: Env<'a>,
        state: &'s mut GameState,
        request: &EffectRequest,
        node: &EffectNode,
        value: RandomValue,
        forced: Option<i32>,
    ) -> Self {
        Self {
            env,
            state,
            kind: node.kind,
            source: request.source,
            object: request.object,
            aware: request.aware,
            dir: request.dir,
            beam: request.beam,
            boost: request.boost,
            value,
            subtype: node.subtype,
            radius: node.radius,
            other: node.other,
            y: node.y,
            x: node.x,
            msg: node.msg.clone(),
            ident: false,
            forced,
        }
    }

    /// Rolls the node's value, honouring a forced value and the device boost.
    pub fn calculate_value(&mut self, use_boost: bool) -> i32 {
        if let Some(forced) = self.forced {
            return forced;
        }
        let v = self.value;
        let mut final_value = if v.base > 0 || (v.dice > 0 && v.sides > 0) {
            v.base + self.state.rng.damroll(v.dice, v.sides)
        } else {
            0
        };
        if use_boost {
            final_value = final_value * (100 + self.boost) / 100;
        }
        final_value
    }

    /// Explicit target grid from the node, if one was given.
    pub fn explicit_grid(&self) -> Option<Position> {
        (self.y != 0 || self.x != 0).then(|| Position::new(self.x, self.y))
    }

    /// Grid the source acts from; sources without one act from the player.
    pub fn origin(&self) -> Position {
        self.state
            .source_grid(self.source)
            .unwrap_or(self.state.player.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::effect::EffectTable;
    use crate::project::ProjectionTable;
    use crate::state::Cave;

    fn with_ctx(value: RandomValue, forced: Option<i32>, boost: i32, f: impl FnOnce(&mut EffectContext)) {
        let effects = EffectTable::standard();
        let projections = ProjectionTable::standard();
        let config = EngineConfig::default();
        let env = Env::new(&effects, &projections, &config);
        let mut state = GameState::new(Cave::new(10, 10), Position::new(5, 5), 3);
        let request = EffectRequest::new(Source::Player).with_boost(boost);
        let node = EffectNode::new(EffectKind::Damage);
        let mut ctx = EffectContext::new(env, &mut state, &request, &node, value, forced);
        f(&mut ctx);
    }

    #[test]
    fn forced_value_wins() {
        with_ctx(RandomValue::constant(5), Some(42), 50, |ctx| {
            assert_eq!(ctx.calculate_value(true), 42);
        });
    }

    #[test]
    fn boost_scales_rolled_value() {
        with_ctx(RandomValue::constant(10), None, 50, |ctx| {
            assert_eq!(ctx.calculate_value(false), 10);
            assert_eq!(ctx.calculate_value(true), 15);
        });
    }

    #[test]
    fn bonus_only_values_are_zero() {
        with_ctx(RandomValue::new(0, 0, 0, 7), None, 0, |ctx| {
            assert_eq!(ctx.calculate_value(false), 0);
        });
        with_ctx(RandomValue::new(-3, 0, 0, 0), None, 0, |ctx| {
            assert_eq!(ctx.calculate_value(false), 0);
        });
    }
}
