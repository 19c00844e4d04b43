//! Resistance arithmetic shared by the player dispatcher and effect
//! descriptions.

use crate::dice::Aspect;
use crate::state::{Element, GameState};

use super::{ProjectionKind, ProjectionTable};

/// Whose resistance [`adjust_dam`] applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resistance {
    /// The player's own resistance level for the element.
    ///
    /// `learn` marks the element as known to the player; only pass it for
    /// damage that is actually being taken.
    Player { learn: bool },
    /// A fixed level: -1 vulnerable, 0 none, 1 and 2 resistant, 3 immune.
    Level(i32),
}

/// Scales `dam` by the resistance against `kind`.
///
/// Ice is resisted as cold. Acid first gets a chance to spend itself on
/// worn armour, halving the damage, but only for the real player. Holy
/// orbs are always halved. A vulnerable target takes a third more; otherwise each resistance level
/// multiplies by the table's numerator over its rolled denominator.
pub fn adjust_dam(
    state: &mut GameState,
    projections: &ProjectionTable,
    kind: ProjectionKind,
    dam: i32,
    aspect: Aspect,
    resistance: Resistance,
) -> i32 {
    let element = match kind {
        ProjectionKind::Ice => Some(Element::Cold),
        other => other.element(),
    };

    let (level, player) = match resistance {
        Resistance::Player { learn } => {
            let Some(element) = element else {
                return dam;
            };
            if learn {
                state.player.learn_element(element, &mut state.messages);
            }
            (state.player.resist_level(element), true)
        }
        Resistance::Level(level) => (level, false),
    };

    if level >= 3 {
        return 0;
    }

    let mut dam = dam;
    let soaked = player
        && kind == ProjectionKind::Acid
        && state.player.minus_ac(&mut state.rng, &mut state.messages);
    if soaked || kind == ProjectionKind::HolyOrb {
        dam = (dam + 1) / 2;
    }

    if level == -1 {
        return dam * 4 / 3;
    }

    let info = projections.get(kind);
    for _ in 0..level.max(0) {
        let denom = info.denominator.randcalc(0, aspect.inverted(), &mut state.rng);
        if denom != 0 {
            dam = dam * info.numerator / denom;
        }
    }
    dam
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Cave, ItemClass, Object, Position};

    fn state() -> GameState {
        GameState::new(Cave::new(6, 6), Position::new(2, 2), 11)
    }

    #[test]
    fn immunity_blocks_everything() {
        let table = ProjectionTable::standard();
        let mut state = state();
        for kind in [ProjectionKind::Fire, ProjectionKind::Chaos, ProjectionKind::Missile] {
            let dam = adjust_dam(&mut state, &table, kind, 250, Aspect::Randomise, Resistance::Level(3));
            assert_eq!(dam, 0, "{kind}");
        }
    }

    #[test]
    fn vulnerability_adds_a_third() {
        let table = ProjectionTable::standard();
        let mut state = state();
        for raw in [3, 30, 301] {
            let dam = adjust_dam(
                &mut state,
                &table,
                ProjectionKind::Cold,
                raw,
                Aspect::Randomise,
                Resistance::Level(-1),
            );
            assert_eq!(dam, raw * 4 / 3);
        }
    }

    #[test]
    fn each_level_divides_again() {
        let table = ProjectionTable::standard();
        let mut state = state();
        let once = adjust_dam(&mut state, &table, ProjectionKind::Fire, 90, Aspect::Average, Resistance::Level(1));
        let twice = adjust_dam(&mut state, &table, ProjectionKind::Fire, 90, Aspect::Average, Resistance::Level(2));
        assert_eq!(once, 30);
        assert_eq!(twice, 10);
        // Water has no denominator, so resisting it changes nothing.
        let water = adjust_dam(&mut state, &table, ProjectionKind::Water, 90, Aspect::Average, Resistance::Level(2));
        assert_eq!(water, 90);
    }

    #[test]
    fn player_ice_uses_cold_and_learns_it() {
        let table = ProjectionTable::standard();
        let mut state = state();
        state.player.resists[Element::Cold as usize] = 3;
        let dam = adjust_dam(
            &mut state,
            &table,
            ProjectionKind::Ice,
            80,
            Aspect::Randomise,
            Resistance::Player { learn: true },
        );
        assert_eq!(dam, 0);
        assert!(state.player.known_elements[Element::Cold as usize]);
        assert!(state.messages.contains("You have learned the rune of cold."));
    }

    #[test]
    fn holy_orbs_are_halved_before_resistance() {
        let table = ProjectionTable::standard();
        let mut state = state();
        let flat = adjust_dam(&mut state, &table, ProjectionKind::HolyOrb, 40, Aspect::Average, Resistance::Level(0));
        assert_eq!(flat, 20);
        let odd = adjust_dam(&mut state, &table, ProjectionKind::HolyOrb, 41, Aspect::Average, Resistance::Level(0));
        assert_eq!(odd, 21);
        let player = adjust_dam(
            &mut state,
            &table,
            ProjectionKind::HolyOrb,
            40,
            Aspect::Average,
            Resistance::Player { learn: false },
        );
        assert_eq!(player, 20);
        let vulnerable = adjust_dam(&mut state, &table, ProjectionKind::HolyOrb, 40, Aspect::Average, Resistance::Level(-1));
        assert_eq!(vulnerable, 20 * 4 / 3);
    }

    #[test]
    fn armour_soaks_half_of_the_acid() {
        let table = ProjectionTable::standard();
        let mut state = state();
        let mut shield = Object::new("Leather Shield", ItemClass::Armour);
        shield.to_a = 4;
        state.player.equipment.push(shield);
        let dam = adjust_dam(
            &mut state,
            &table,
            ProjectionKind::Acid,
            21,
            Aspect::Randomise,
            Resistance::Player { learn: false },
        );
        assert_eq!(dam, 11);
        assert_eq!(state.player.equipment[0].to_a, 3);
        assert!(state.messages.contains("Your Leather Shield is damaged!"));
    }
}
