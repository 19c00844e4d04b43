//! Dice parsing errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors produced while parsing a dice string such as `"3+2d6M4"`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiceError {
    /// The string contained nothing to parse.
    #[error("empty dice string")]
    Empty,

    /// A character outside the dice alphabet.
    #[error("invalid character {found:?} at offset {offset}")]
    InvalidCharacter { found: char, offset: usize },

    /// A valid character in a position the grammar does not allow.
    #[error("unexpected {found:?} at offset {offset}")]
    UnexpectedInput { found: char, offset: usize },

    /// Unexpected end of string.
    #[error("dice string ends early")]
    UnexpectedEnd,

    /// A number that does not fit the value range.
    #[error("number {token} out of range")]
    NumberOutOfRange { token: String },

    /// `$NAME` variables need bound expressions, which this engine does not carry.
    #[error("dice variables are not supported (offset {offset})")]
    UnsupportedVariable { offset: usize },
}

impl GameError for DiceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use DiceError::*;
        match self {
            Empty => "DICE_EMPTY",
            InvalidCharacter { .. } => "DICE_INVALID_CHARACTER",
            UnexpectedInput { .. } => "DICE_UNEXPECTED_INPUT",
            UnexpectedEnd => "DICE_UNEXPECTED_END",
            NumberOutOfRange { .. } => "DICE_NUMBER_OUT_OF_RANGE",
            UnsupportedVariable { .. } => "DICE_UNSUPPORTED_VARIABLE",
        }
    }
}
