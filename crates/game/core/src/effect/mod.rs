//! Effect chains and the engine that runs them.
//!
//! An effect chain is loaded from data, resolved one node at a time by
//! [`execute`], and described to the player by [`describe`].
//!
//! # Module Structure
//!
//! - `kind`: the closed set of effect kinds and their subtypes
//! - `registry`: descriptive data for every kind ([`EffectTable`])
//! - `chain`: the chain tree, plus damage and projection introspection
//! - `context`: what a handler sees while one node runs
//! - `engine`: chain execution, choice blocks and the forced value
//! - `handlers`: the code behind each kind
//! - `selector`: how the player picks from an explicit choice
//! - `describe`: player-facing descriptions

mod chain;
mod context;
mod describe;
mod engine;
mod error;
pub(crate) mod handlers;
mod kind;
mod registry;
mod selector;

pub use chain::{ChoiceBlock, Effect, EffectChain, EffectNode, effect_next};
pub use context::{EffectContext, EffectRequest};
pub use describe::describe;
pub use engine::{BAD_EFFECT_MESSAGE, SimpleEffect, execute, execute_simple};
pub use error::{ChainError, ExecuteError, RegistryError};
pub use handlers::EffectHandler;
pub use kind::{EffectInfoFormat, EffectKind, Subtype, SubtypeKind};
pub use registry::{EffectInfo, EffectTable};
pub use selector::{EffectSelector, PresetChoice};
