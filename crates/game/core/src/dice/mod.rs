//! Dice expressions and random values.
//!
//! A dice string has the shape `[base][+][NdS][M<bonus>]`: `"4"`, `"1d6"`,
//! `"-4+1d2"`, `"d8"` (one die), `"2d4M3"`, `"M10"`. Whitespace is ignored.
//! Parsing is driven by a small state table so that every accepted string
//! follows the same transitions.
mod error;
mod value;

use std::fmt;
use std::str::FromStr;

pub use error::DiceError;
pub use value::{Aspect, RandomValue};

use crate::env::GameRng;

/// Parsed dice expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Dice {
    value: RandomValue,
}

impl Dice {
    pub const fn new(value: RandomValue) -> Self {
        Self { value }
    }

    /// A constant expression.
    pub const fn constant(base: i32) -> Self {
        Self::new(RandomValue::constant(base))
    }

    pub fn parse(input: &str) -> Result<Self, DiceError> {
        Parser::default().run(input)
    }

    /// The components the expression resolves to.
    pub fn random_value(&self) -> RandomValue {
        self.value
    }

    /// `base + damroll(dice, sides)`; the bonus part is not rolled.
    pub fn roll(&self, rng: &mut GameRng) -> (i32, RandomValue) {
        let v = self.value;
        (v.base + rng.damroll(v.dice, v.sides), v)
    }

    /// Full evaluation of every component at `level`.
    pub fn evaluate(&self, level: i32, aspect: Aspect, rng: &mut GameRng) -> (i32, RandomValue) {
        let v = self.value;
        (v.randcalc(level, aspect, rng), v)
    }

    /// Deterministic average at level zero, used for sizing choice blocks.
    pub fn average(&self) -> i32 {
        let mut rng = GameRng::default();
        self.value.randcalc(0, Aspect::Average, &mut rng)
    }
}

impl FromStr for Dice {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Dice {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Dice> for String {
    fn from(dice: Dice) -> Self {
        dice.to_string()
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.value;
        let has_dice = v.dice > 0 && v.sides > 0;
        let mut wrote = false;
        if v.base != 0 || (!has_dice && v.m_bonus == 0) {
            write!(f, "{}", v.base)?;
            wrote = true;
        }
        if has_dice {
            if wrote {
                f.write_str("+")?;
            }
            write!(f, "{}d{}", v.dice, v.sides)?;
        }
        if v.m_bonus != 0 {
            write!(f, "M{}", v.m_bonus)?;
        }
        Ok(())
    }
}

// ============================================================================
// State table
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Start,
    BaseDigit,
    FlushBase,
    DiceDigit,
    FlushDice,
    SideDigit,
    FlushSide,
    Bonus,
    BonusDigit,
    FlushBonus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Input {
    Amp,
    Minus,
    Plus,
    Dice,
    Bonus,
    Var,
    Digit,
    Upper,
    End,
}

impl Input {
    fn classify(c: char) -> Option<Self> {
        Some(match c {
            '&' => Input::Amp,
            '-' => Input::Minus,
            '+' => Input::Plus,
            'd' => Input::Dice,
            'm' | 'M' => Input::Bonus,
            '$' => Input::Var,
            c if c.is_ascii_digit() => Input::Digit,
            c if c.is_ascii_uppercase() => Input::Upper,
            _ => return None,
        })
    }

    /// Characters kept in the number token.
    fn is_token(self) -> bool {
        matches!(self, Input::Minus | Input::Digit | Input::Upper)
    }
}

fn transition(state: State, input: Input) -> Option<State> {
    use Input as I;
    use State::*;
    match (state, input) {
        (Start, I::Minus | I::Digit) => Some(BaseDigit),
        (Start, I::Dice) => Some(FlushDice),
        (Start, I::Bonus) => Some(Bonus),

        (BaseDigit, I::Plus | I::End) => Some(FlushBase),
        (BaseDigit, I::Dice) => Some(FlushDice),
        (BaseDigit, I::Digit) => Some(BaseDigit),

        (FlushBase, I::Dice) => Some(FlushDice),
        (FlushBase, I::Bonus) => Some(Bonus),
        (FlushBase, I::Digit) => Some(DiceDigit),

        (DiceDigit, I::Dice) => Some(FlushDice),
        (DiceDigit, I::Digit) => Some(DiceDigit),

        (FlushDice, I::Digit) => Some(SideDigit),

        (SideDigit, I::Amp | I::End) => Some(FlushSide),
        (SideDigit, I::Bonus) => Some(Bonus),
        (SideDigit, I::Digit) => Some(SideDigit),

        (FlushSide, I::Bonus) => Some(Bonus),

        (Bonus, I::Digit) => Some(BonusDigit),

        (BonusDigit, I::Digit) => Some(BonusDigit),
        (BonusDigit, I::End) => Some(FlushBonus),

        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Seen {
    None,
    Base,
    Dice,
    Side,
    Bonus,
}

#[derive(Debug)]
struct Parser {
    state: State,
    seen: Seen,
    token: String,
    value: RandomValue,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            state: State::Start,
            seen: Seen::None,
            token: String::new(),
            value: RandomValue::ZERO,
        }
    }
}

impl Parser {
    fn run(mut self, input: &str) -> Result<Dice, DiceError> {
        if input.trim().is_empty() {
            return Err(DiceError::Empty);
        }
        for (offset, c) in input.char_indices() {
            if c.is_whitespace() {
                continue;
            }
            let kind =
                Input::classify(c).ok_or(DiceError::InvalidCharacter { found: c, offset })?;
            if kind == Input::Var {
                return Err(DiceError::UnsupportedVariable { offset });
            }
            self.step(kind, Some((c, offset)))?;
        }
        self.step(Input::End, None)?;
        Ok(Dice::new(self.value))
    }

    fn step(&mut self, input: Input, at: Option<(char, usize)>) -> Result<(), DiceError> {
        if let Some((c, _)) = at.filter(|_| input.is_token()) {
            self.token.push(c);
        }
        self.state = transition(self.state, input).ok_or(match at {
            Some((found, offset)) => DiceError::UnexpectedInput { found, offset },
            None => DiceError::UnexpectedEnd,
        })?;

        let flush = match self.state {
            State::FlushBase => {
                self.seen = Seen::Base;
                true
            }
            State::FlushDice => {
                self.seen = Seen::Dice;
                if self.token.is_empty() {
                    self.token.push('1');
                }
                true
            }
            State::FlushSide => {
                self.seen = Seen::Side;
                true
            }
            State::FlushBonus => {
                self.seen = Seen::Bonus;
                true
            }
            State::Bonus => {
                self.seen = if self.seen == Seen::Dice {
                    Seen::Side
                } else {
                    Seen::Bonus
                };
                true
            }
            _ => false,
        };

        if flush && !self.token.is_empty() {
            let token = std::mem::take(&mut self.token);
            let number: i32 = token
                .parse()
                .map_err(|_| DiceError::NumberOutOfRange { token })?;
            match self.seen {
                Seen::Base => self.value.base = number,
                Seen::Dice => self.value.dice = number,
                Seen::Side => self.value.sides = number,
                Seen::Bonus => self.value.m_bonus = number,
                Seen::None => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(s: &str) -> RandomValue {
        Dice::parse(s).unwrap().random_value()
    }

    #[test]
    fn parses_each_component() {
        assert_eq!(parsed("4"), RandomValue::new(4, 0, 0, 0));
        assert_eq!(parsed("1d6"), RandomValue::new(0, 1, 6, 0));
        assert_eq!(parsed("-4+1d2"), RandomValue::new(-4, 1, 2, 0));
        assert_eq!(parsed("3+2d6M4"), RandomValue::new(3, 2, 6, 4));
        assert_eq!(parsed("2d4m3"), RandomValue::new(0, 2, 4, 3));
        assert_eq!(parsed("M10"), RandomValue::new(0, 0, 0, 10));
        assert_eq!(parsed("5+M3"), RandomValue::new(5, 0, 0, 3));
    }

    #[test]
    fn bare_d_means_one_die() {
        assert_eq!(parsed("d8"), RandomValue::new(0, 1, 8, 0));
        assert_eq!(parsed("10+d4"), RandomValue::new(10, 1, 4, 0));
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(parsed(" 1 0 + 2 d 6 "), RandomValue::new(10, 2, 6, 0));
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!(Dice::parse(""), Err(DiceError::Empty));
        assert!(matches!(
            Dice::parse("2x3"),
            Err(DiceError::InvalidCharacter { found: 'x', .. })
        ));
        assert!(matches!(
            Dice::parse("1+2"),
            Err(DiceError::UnexpectedEnd)
        ));
        assert!(matches!(
            Dice::parse("1d"),
            Err(DiceError::UnexpectedEnd)
        ));
        assert!(matches!(
            Dice::parse("$LEVEL"),
            Err(DiceError::UnsupportedVariable { offset: 0 })
        ));
        assert!(matches!(
            Dice::parse("99999999999"),
            Err(DiceError::NumberOutOfRange { .. })
        ));
    }

    #[test]
    fn display_is_reparseable() {
        for s in ["4", "1d6", "-4+1d2", "3+2d6M4", "M10", "0"] {
            let dice = Dice::parse(s).unwrap();
            assert_eq!(Dice::parse(&dice.to_string()).unwrap(), dice, "{s}");
        }
        assert_eq!(Dice::parse("1d6").unwrap().to_string(), "1d6");
    }

    #[test]
    fn roll_ignores_bonus_and_stays_in_range() {
        let mut rng = GameRng::new(11);
        let dice = Dice::parse("2+1d4M50").unwrap();
        for _ in 0..100 {
            let (value, rv) = dice.roll(&mut rng);
            assert!((3..=6).contains(&value));
            assert_eq!(rv.m_bonus, 50);
        }
        assert_eq!(dice.average(), 2 + 2);
    }
}
