use crate::config::EngineConfig;
use crate::env::GameRng;

/// How a [`RandomValue`] is collapsed into a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aspect {
    Minimise,
    Average,
    Maximise,
    /// Whichever of the extremes has the larger magnitude.
    Extremify,
    #[default]
    Randomise,
}

impl Aspect {
    /// Swaps minimise and maximise; used where a value is a divisor.
    pub const fn inverted(self) -> Self {
        match self {
            Aspect::Minimise => Aspect::Maximise,
            Aspect::Maximise => Aspect::Minimise,
            other => other,
        }
    }
}

/// `base + dice d sides + m_bonus(level)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomValue {
    pub base: i32,
    pub dice: i32,
    pub sides: i32,
    pub m_bonus: i32,
}

impl RandomValue {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    pub const fn new(base: i32, dice: i32, sides: i32, m_bonus: i32) -> Self {
        Self {
            base,
            dice,
            sides,
            m_bonus,
        }
    }

    pub const fn constant(base: i32) -> Self {
        Self::new(base, 0, 0, 0)
    }

    /// Dice part only.
    pub fn damcalc(&self, aspect: Aspect, rng: &mut GameRng) -> i32 {
        let (num, sides) = (self.dice, self.sides);
        if num <= 0 || sides <= 0 {
            return 0;
        }
        match aspect {
            Aspect::Maximise | Aspect::Extremify => num * sides,
            Aspect::Randomise => rng.damroll(num, sides),
            Aspect::Minimise => num,
            Aspect::Average => num * (sides + 1) / 2,
        }
    }

    /// Level-scaled bonus part only.
    pub fn m_bonus_calc(&self, level: i32, aspect: Aspect, rng: &mut GameRng) -> i32 {
        let max = self.m_bonus;
        if max == 0 {
            return 0;
        }
        match aspect {
            Aspect::Maximise | Aspect::Extremify => max,
            Aspect::Randomise => rng.m_bonus(max, level),
            Aspect::Minimise => 0,
            Aspect::Average => max * level / EngineConfig::MAX_DEPTH,
        }
    }

    /// Collapses the value at `level` according to `aspect`.
    pub fn randcalc(&self, level: i32, aspect: Aspect, rng: &mut GameRng) -> i32 {
        if aspect == Aspect::Extremify {
            let min = self.randcalc(level, Aspect::Minimise, rng);
            let max = self.randcalc(level, Aspect::Maximise, rng);
            return if max.abs() >= min.abs() { max } else { min };
        }
        self.base + self.damcalc(aspect, rng) + self.m_bonus_calc(level, aspect, rng)
    }

    /// True when `test` lies between the minimum and maximum of the value.
    pub fn randcalc_valid(&self, test: i32) -> bool {
        let mut rng = GameRng::default();
        test >= self.randcalc(0, Aspect::Minimise, &mut rng)
            && test <= self.randcalc(0, Aspect::Maximise, &mut rng)
    }

    /// True when the value is not a constant.
    pub fn randcalc_varies(&self) -> bool {
        let mut rng = GameRng::default();
        self.randcalc(0, Aspect::Minimise, &mut rng) != self.randcalc(0, Aspect::Maximise, &mut rng)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}
