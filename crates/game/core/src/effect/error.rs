//! Errors raised while turning data into effect chains and registries.

use crate::dice::DiceError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};

use super::EffectKind;

/// Structural problems in an effect-chain definition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("unknown effect name {name:?}")]
    UnknownEffect { name: String },

    #[error("effect {effect} has no subtype named {name:?}")]
    UnknownSubtype { effect: EffectKind, name: String },

    #[error("invalid dice for node {index}: {source}")]
    InvalidDice {
        index: usize,
        #[source]
        source: DiceError,
        context: ErrorContext,
    },
}

impl ChainError {
    pub fn invalid_dice(index: usize, effect: EffectKind, source: DiceError) -> Self {
        Self::InvalidDice {
            index,
            source,
            context: ErrorContext::new().with_effect(effect).with_index(index),
        }
    }
}

impl GameError for ChainError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::InvalidDice { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEffect { .. } => "CHAIN_UNKNOWN_EFFECT",
            Self::UnknownSubtype { .. } => "CHAIN_UNKNOWN_SUBTYPE",
            Self::InvalidDice { .. } => "CHAIN_INVALID_DICE",
        }
    }
}

/// Problems with a loaded effect-kind or projection-type table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{table} table has no entry for {name}")]
    Missing { table: &'static str, name: String },

    #[error("{table} table lists {name} more than once")]
    Duplicate { table: &'static str, name: String },

    #[error("{table} table carries an entry for the invalid slot")]
    InvalidSlot { table: &'static str },
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "REGISTRY_MISSING",
            Self::Duplicate { .. } => "REGISTRY_DUPLICATE",
            Self::InvalidSlot { .. } => "REGISTRY_INVALID_SLOT",
        }
    }
}

/// Failures of [`execute_simple`](super::execute_simple) that happen before
/// anything runs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("bad dice string {dice:?}: {source}")]
    Dice {
        dice: String,
        #[source]
        source: DiceError,
    },

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Chain(err) => err.context(),
            Self::Dice { .. } => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Dice { .. } => "EXECUTE_BAD_DICE",
            Self::Chain(err) => err.error_code(),
        }
    }
}
