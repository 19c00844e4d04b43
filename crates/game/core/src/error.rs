//! Shared error vocabulary for effect-core.
//!
//! Domain errors (`DiceError`, `ChainError`, `RegistryError`) live next to
//! the code that raises them and implement [`GameError`] so callers can sort
//! them without matching on every enum.
//!
//! Executing an effect never fails: declined choices and resisted bolts fold
//! into the boolean returned by the engine. Errors only describe data that
//! could not be turned into chains or tables at all.

use crate::effect::EffectKind;

/// How a caller should treat an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The offending definition should be rejected; the rest of the data may
    /// still be usable.
    ///
    /// Examples: malformed dice string, unknown subtype name
    Validation,

    /// The engine cannot run with this data.
    ///
    /// Examples: a projection type missing from the loaded table
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Where in a chain definition an error was found.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Kind of the offending node.
    pub effect: Option<EffectKind>,

    /// Position of the offending node in the flat definition.
    pub index: Option<usize>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            effect: None,
            index: None,
        }
    }

    #[must_use]
    pub const fn with_effect(mut self, effect: EffectKind) -> Self {
        self.effect = Some(effect);
        self
    }

    #[must_use]
    pub const fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Common trait for all effect-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier of the error variant, e.g. `CHAIN_UNKNOWN_EFFECT`.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
