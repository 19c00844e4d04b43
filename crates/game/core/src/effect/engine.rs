//! Chain execution.
//!
//! The engine walks an [`EffectChain`] in order. Simple nodes go to their
//! handler; choice blocks roll their own dice for the number of options,
//! pick one (randomly, or through an [`EffectSelector`] when the player
//! triggered a `SELECT`), run it and skip the rest.

use crate::dice::{Dice, RandomValue};
use crate::env::Env;
use crate::state::{GameState, Source};

use super::chain::{ChoiceBlock, Effect, EffectChain, EffectNode};
use super::context::{EffectContext, EffectRequest};
use super::error::ExecuteError;
use super::kind::{EffectKind, Subtype};
use super::selector::EffectSelector;

/// Player-facing narration for a chain that could not run.
pub const BAD_EFFECT_MESSAGE: &str = "Bad effect passed to execute. Please report this bug.";

/// Outcome of one step of the walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    /// Keep going; the flag says whether the step succeeded.
    Continue(bool),
    /// Stop the whole chain as not completed.
    Abort,
}

struct Runner<'a, 's, 'r, 'x> {
    env: Env<'a>,
    state: &'s mut GameState,
    request: &'r EffectRequest,
    selector: Option<&'x mut dyn EffectSelector>,
    ident: bool,
    forced: Option<i32>,
}

impl Runner<'_, '_, '_, '_> {
    fn run(&mut self, effect: &Effect) -> Flow {
        if !effect.kind().is_valid() {
            tracing::error!(kind = %effect.kind(), "bad effect passed to execute");
            self.state.messages.push(BAD_EFFECT_MESSAGE);
            return Flow::Abort;
        }
        match effect {
            Effect::Simple(node) => {
                let value = self.roll(node).1;
                Flow::Continue(self.dispatch(node, value))
            }
            Effect::RandomChoice(block) => self.choose(block, false),
            Effect::ExplicitChoice(block) => self.choose(block, true),
        }
    }

    fn roll(&mut self, node: &EffectNode) -> (i32, RandomValue) {
        match node.dice {
            Some(dice) => dice.roll(&mut self.state.rng),
            None => (0, RandomValue::ZERO),
        }
    }

    fn choose(&mut self, block: &ChoiceBlock, explicit: bool) -> Flow {
        let (count, value) = self.roll(&block.node);
        if count <= 0 {
            tracing::trace!(kind = %block.node.kind, count, "empty choice");
            return Flow::Continue(self.dispatch(&block.node, value));
        }

        let index = if explicit && self.request.source == Source::Player && count >= 2 {
            let Some(selector) = self.selector.as_deref_mut() else {
                tracing::debug!("explicit choice with no selector");
                return Flow::Abort;
            };
            match selector.select(count as usize) {
                Some(index) if index < count as usize => index,
                _ => {
                    tracing::debug!(count, "explicit choice declined");
                    return Flow::Abort;
                }
            }
        } else {
            self.state.rng.randint0(count) as usize
        };

        match block.children.get(index) {
            Some(child) => {
                tracing::trace!(kind = %block.node.kind, index, count, "choice made");
                self.run(child)
            }
            None => Flow::Continue(self.dispatch(&block.node, value)),
        }
    }

    fn dispatch(&mut self, node: &EffectNode, value: RandomValue) -> bool {
        let Some(handler) = node.kind.handler() else {
            tracing::trace!(kind = %node.kind, "no handler");
            return true;
        };
        let mut ctx = EffectContext::new(
            self.env,
            &mut *self.state,
            self.request,
            node,
            value,
            self.forced,
        );
        let done = handler(&mut ctx);
        self.ident |= ctx.ident;
        self.forced = ctx.forced;
        tracing::trace!(kind = %node.kind, done, ident = ctx.ident, "effect handled");
        done
    }
}

/// Runs `chain` on behalf of `request.source`.
///
/// Returns true when at least one step succeeded. A malformed node aborts the
/// chain, as does a declined explicit choice; in both cases the result is
/// false. `ident` is only ever raised.
pub fn execute(
    env: Env<'_>,
    state: &mut GameState,
    chain: &EffectChain,
    request: &EffectRequest,
    ident: &mut bool,
    selector: Option<&mut dyn EffectSelector>,
) -> bool {
    let mut runner = Runner {
        env,
        state,
        request,
        selector,
        ident: false,
        forced: None,
    };
    let mut completed = false;
    let mut aborted = false;
    for effect in chain {
        match runner.run(effect) {
            Flow::Continue(done) => completed |= done,
            Flow::Abort => {
                aborted = true;
                break;
            }
        }
    }
    *ident |= runner.ident;
    completed && !aborted
}

/// A one-node effect described with strings, as callers outside the data
/// files build them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimpleEffect<'a> {
    pub kind: EffectKind,
    /// Dice string; empty means no dice.
    pub dice: &'a str,
    /// Subtype name, resolved against `kind`.
    pub subtype: &'a str,
    pub radius: i32,
    pub other: i32,
    pub y: i32,
    pub x: i32,
}

impl<'a> SimpleEffect<'a> {
    pub fn new(kind: EffectKind, dice: &'a str) -> Self {
        Self {
            kind,
            dice,
            ..Self::default()
        }
    }

    pub fn with_subtype(mut self, subtype: &'a str) -> Self {
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

    /// Builds the node, parsing dice and subtype.
    pub fn to_node(&self) -> Result<EffectNode, ExecuteError> {
        let dice = if self.dice.trim().is_empty() {
            None
        } else {
            Some(Dice::parse(self.dice).map_err(|source| ExecuteError::Dice {
                dice: self.dice.to_string(),
                source,
            })?)
        };
        let subtype = Subtype::parse(self.kind, self.subtype)?;
        Ok(EffectNode {
            kind: self.kind,
            dice,
            y: self.y,
            x: self.x,
            subtype,
            radius: self.radius,
            other: self.other,
            msg: None,
        })
    }
}

/// Builds and runs a single effect as an aware, undirected use.
pub fn execute_simple(
    env: Env<'_>,
    state: &mut GameState,
    source: Source,
    effect: SimpleEffect<'_>,
    ident: &mut bool,
) -> Result<bool, ExecuteError> {
    let chain = EffectChain::single(effect.to_node()?);
    let request = EffectRequest::new(source);
    Ok(execute(env, state, &chain, &request, ident, None))
}
