//! Prompting for explicit choices.

/// Answers "which of these?" when the player triggers a `SELECT` block.
pub trait EffectSelector {
    /// Returns the index of the chosen option in `0..count`, or `None` when
    /// the player declines.
    fn select(&mut self, count: usize) -> Option<usize>;
}

/// Always answers with the same index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresetChoice {
    index: Option<usize>,
    asked: u32,
}

impl PresetChoice {
    pub fn new(index: usize) -> Self {
        Self {
            index: Some(index),
            asked: 0,
        }
    }

    /// A selector that declines every prompt.
    pub fn declining() -> Self {
        Self {
            index: None,
            asked: 0,
        }
    }

    /// Number of prompts answered so far.
    pub fn asked(&self) -> u32 {
        self.asked
    }
}

impl EffectSelector for PresetChoice {
    fn select(&mut self, _count: usize) -> Option<usize> {
        self.asked += 1;
        self.index
    }
}

impl<F> EffectSelector for F
where
    F: FnMut(usize) -> Option<usize>,
{
    fn select(&mut self, count: usize) -> Option<usize> {
        self(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_counts_prompts() {
        let mut preset = PresetChoice::new(2);
        assert_eq!(preset.select(4), Some(2));
        assert_eq!(preset.asked(), 1);
        assert_eq!(PresetChoice::declining().select(3), None);
    }

    #[test]
    fn closures_are_selectors() {
        let mut last = |count: usize| count.checked_sub(1);
        assert_eq!(EffectSelector::select(&mut last, 3), Some(2));
    }
}
