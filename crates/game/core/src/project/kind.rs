//! Projection types and their descriptive table.
//!
//! One enumeration indexes the resistance data below and all four per-target
//! dispatchers, so a projection type is looked up with a single value.

use strum::{EnumCount, IntoEnumIterator};

use crate::dice::RandomValue;
use crate::effect::RegistryError;
use crate::state::Element;

/// Everything a projection can carry.
///
/// The first variants mirror [`Element`] one to one.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ProjectionKind {
    // ===== elements =====
    Acid,
    Elec,
    Fire,
    Cold,
    Pois,
    Light,
    Dark,
    Sound,
    Shard,
    Nexus,
    Nether,
    Chaos,
    Disen,
    Water,
    Ice,
    Gravity,
    Inertia,
    Force,
    Time,
    Plasma,
    Meteor,
    Missile,
    Mana,
    HolyOrb,
    Arrow,

    // ===== environment =====
    LightWeak,
    DarkWeak,
    KillWall,
    KillDoor,
    KillTrap,
    MakeDoor,
    MakeTrap,

    // ===== monsters only =====
    AwayUndead,
    AwayEvil,
    AwayAll,
    TurnUndead,
    TurnEvil,
    TurnAll,
    DispUndead,
    DispEvil,
    DispAll,
    SleepUndead,
    SleepEvil,
    SleepAll,
    MonClone,
    MonPoly,
    MonHeal,
    MonSpeed,
    MonSlow,
    MonConf,
    MonHold,
    MonStun,
    MonDrain,
}

impl ProjectionKind {
    /// The player-resistable element behind this type, if any.
    pub fn element(self) -> Option<Element> {
        if (self as usize) < Element::COUNT {
            Element::from_repr(self as u8)
        } else {
            None
        }
    }

    pub fn is_element(self) -> bool {
        self.element().is_some()
    }

    /// True for types that only ever touch monsters.
    pub fn is_monster_only(self) -> bool {
        self >= ProjectionKind::AwayUndead
    }
}

impl From<Element> for ProjectionKind {
    fn from(element: Element) -> Self {
        match ProjectionKind::from_repr(element as u8) {
            Some(kind) => kind,
            None => unreachable!("every element has a projection type"),
        }
    }
}

/// Constant data for one projection type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionInfo {
    pub kind: ProjectionKind,
    /// Resistance numerator; zero means resistance has no effect.
    #[cfg_attr(feature = "serde", serde(default))]
    pub numerator: i32,
    /// Resistance denominator, rolled each time it is applied.
    #[cfg_attr(feature = "serde", serde(default))]
    pub denominator: RandomValue,
    /// Seeing the target hit is enough to make the projection obvious.
    #[cfg_attr(feature = "serde", serde(default))]
    pub force_obvious: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub colour: String,
    /// Name used in effect descriptions ("fire", "frost").
    #[cfg_attr(feature = "serde", serde(default))]
    pub desc: String,
    /// What a player who cannot see is hit by.
    #[cfg_attr(feature = "serde", serde(default))]
    pub blind_desc: String,
    /// Name used when the player is the one projecting.
    #[cfg_attr(feature = "serde", serde(default))]
    pub player_desc: String,
    /// Name used for lash attacks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lash_desc: String,
    /// Breath damage is the breather's hp divided by this.
    #[cfg_attr(feature = "serde", serde(default))]
    pub divisor: i32,
    /// Breath damage never exceeds this.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_cap: i32,
}

impl ProjectionInfo {
    /// Breath damage for a breather with `hp` hit points.
    pub fn breath_damage(&self, hp: i32) -> i32 {
        if self.divisor <= 0 {
            return hp;
        }
        let dam = hp / self.divisor;
        if self.damage_cap > 0 { dam.min(self.damage_cap) } else { dam }
    }
}

/// Complete table of [`ProjectionInfo`], one row per [`ProjectionKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectionTable {
    entries: Vec<ProjectionInfo>,
}

impl ProjectionTable {
    const NAME: &'static str = "projection";

    /// Builds a table, insisting on exactly one row per kind.
    pub fn from_entries(rows: Vec<ProjectionInfo>) -> Result<Self, RegistryError> {
        let mut slots: Vec<Option<ProjectionInfo>> = vec![None; ProjectionKind::COUNT];
        for row in rows {
            let slot = &mut slots[row.kind as usize];
            if slot.is_some() {
                return Err(RegistryError::Duplicate {
                    table: Self::NAME,
                    name: row.kind.to_string(),
                });
            }
            *slot = Some(row);
        }
        let mut entries = Vec::with_capacity(ProjectionKind::COUNT);
        for (kind, slot) in ProjectionKind::iter().zip(slots) {
            match slot {
                Some(info) => entries.push(info),
                None => {
                    return Err(RegistryError::Missing {
                        table: Self::NAME,
                        name: kind.to_string(),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// Built-in copy of the shipped projection data.
    pub fn standard() -> Self {
        let rows = STANDARD
            .iter()
            .map(|row| ProjectionInfo {
                kind: row.0,
                numerator: row.1,
                denominator: row.2,
                force_obvious: row.3,
                colour: row.4.to_string(),
                desc: row.5.to_string(),
                blind_desc: row.6.to_string(),
                player_desc: row.7.to_string(),
                lash_desc: row.8.to_string(),
                divisor: row.9,
                damage_cap: row.10,
            })
            .collect();
        match Self::from_entries(rows) {
            Ok(table) => table,
            Err(err) => unreachable!("built-in projection table is incomplete: {err}"),
        }
    }

    pub fn get(&self, kind: ProjectionKind) -> &ProjectionInfo {
        &self.entries[kind as usize]
    }

    pub fn player_desc(&self, kind: ProjectionKind) -> &str {
        &self.get(kind).player_desc
    }

    pub fn blind_desc(&self, kind: ProjectionKind) -> &str {
        &self.get(kind).blind_desc
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectionInfo> {
        self.entries.iter()
    }
}

impl Default for ProjectionTable {
    fn default() -> Self {
        Self::standard()
    }
}

type Row = (
    ProjectionKind,
    i32,
    RandomValue,
    bool,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i32,
    i32,
);

const LOW: RandomValue = RandomValue::constant(3);
const HIGH: RandomValue = RandomValue::new(6, 1, 6, 0);
const NONE: RandomValue = RandomValue::ZERO;

#[rustfmt::skip]
const STANDARD: &[Row] = {
    use ProjectionKind as P;
    &[
        (P::Acid, 1, LOW, true, "slate", "acid", "acid", "acid", "acid", 3, 1600),
        (P::Elec, 1, LOW, true, "blue", "lightning", "lightning", "lightning", "lightning", 3, 1600),
        (P::Fire, 1, LOW, true, "red", "fire", "fire", "fire", "fire", 3, 1600),
        (P::Cold, 1, LOW, true, "white", "frost", "cold", "frost", "frost", 3, 1600),
        (P::Pois, 1, LOW, true, "green", "poison", "poison", "poison gas", "venom", 3, 800),
        (P::Light, 4, HIGH, true, "orange", "light", "something", "light", "brightness", 6, 400),
        (P::Dark, 4, HIGH, true, "dark", "darkness", "something", "darkness", "darkness", 6, 400),
        (P::Sound, 5, HIGH, true, "yellow", "sound", "noise", "sound", "noise", 6, 500),
        (P::Shard, 6, HIGH, true, "umber", "shards", "something sharp", "shards", "shrapnel", 6, 500),
        (P::Nexus, 6, HIGH, true, "light red", "nexus", "something strange", "nexus", "strangeness", 6, 400),
        (P::Nether, 6, HIGH, true, "light green", "nether", "something cold", "nether", "nether", 6, 550),
        (P::Chaos, 6, HIGH, true, "violet", "chaos", "something strange", "chaos", "chaos", 6, 500),
        (P::Disen, 6, HIGH, true, "violet", "disenchantment", "something strange", "disenchantment", "disenchantment", 6, 500),
        (P::Water, 0, NONE, true, "slate", "water", "water", "water", "water", 6, 250),
        (P::Ice, 1, LOW, true, "white", "ice", "something sharp", "ice", "ice", 6, 250),
        (P::Gravity, 0, NONE, true, "light white", "gravity", "something strange", "gravity", "gravity", 3, 200),
        (P::Inertia, 0, NONE, true, "light white", "inertia", "something strange", "inertia", "inertia", 6, 200),
        (P::Force, 0, NONE, true, "umber", "force", "something hard", "force", "force", 6, 200),
        (P::Time, 0, NONE, true, "light blue", "time", "something strange", "time", "time", 3, 150),
        (P::Plasma, 0, NONE, true, "red", "plasma", "something", "plasma", "plasma", 6, 150),
        (P::Meteor, 0, NONE, true, "red", "meteors", "something", "meteors", "meteors", 6, 250),
        (P::Missile, 0, NONE, true, "violet", "magic missiles", "something", "magical energy", "missiles", 6, 250),
        (P::Mana, 0, NONE, true, "dark", "mana", "something", "mana", "mana", 6, 250),
        (P::HolyOrb, 0, NONE, true, "dark", "holy power", "something", "holy power", "holy power", 6, 250),
        (P::Arrow, 0, NONE, true, "white", "arrows", "something sharp", "arrows", "arrows", 6, 250),
        (P::LightWeak, 0, NONE, true, "orange", "weak light", "", "light", "", 0, 0),
        (P::DarkWeak, 0, NONE, false, "dark", "weak darkness", "", "darkness", "", 0, 0),
        (P::KillWall, 0, NONE, false, "white", "turns rock to mud", "", "stone to mud", "", 0, 0),
        (P::KillDoor, 0, NONE, false, "white", "destroys doors", "", "door destruction", "", 0, 0),
        (P::KillTrap, 0, NONE, false, "white", "disarms traps", "", "trap disarming", "", 0, 0),
        (P::MakeDoor, 0, NONE, false, "white", "creates doors", "", "door creation", "", 0, 0),
        (P::MakeTrap, 0, NONE, false, "white", "creates traps", "", "trap creation", "", 0, 0),
        (P::AwayUndead, 0, NONE, false, "white", "teleports undead away", "", "", "", 0, 0),
        (P::AwayEvil, 0, NONE, false, "white", "teleports evil monsters away", "", "", "", 0, 0),
        (P::AwayAll, 0, NONE, true, "white", "teleports monsters away", "", "", "", 0, 0),
        (P::TurnUndead, 0, NONE, false, "white", "scares undead", "", "", "", 0, 0),
        (P::TurnEvil, 0, NONE, false, "white", "scares evil monsters", "", "", "", 0, 0),
        (P::TurnAll, 0, NONE, false, "white", "scares monsters", "", "", "", 0, 0),
        (P::DispUndead, 0, NONE, false, "white", "damages undead", "", "", "", 0, 0),
        (P::DispEvil, 0, NONE, false, "white", "damages evil monsters", "", "", "", 0, 0),
        (P::DispAll, 0, NONE, true, "white", "damages monsters", "", "", "", 0, 0),
        (P::SleepUndead, 0, NONE, false, "white", "puts undead to sleep", "", "", "", 0, 0),
        (P::SleepEvil, 0, NONE, false, "white", "puts evil monsters to sleep", "", "", "", 0, 0),
        (P::SleepAll, 0, NONE, false, "white", "puts monsters to sleep", "", "", "", 0, 0),
        (P::MonClone, 0, NONE, true, "white", "hastes, heals and clones a monster", "", "", "", 0, 0),
        (P::MonPoly, 0, NONE, false, "white", "polymorphs a monster", "", "", "", 0, 0),
        (P::MonHeal, 0, NONE, true, "white", "heals a monster", "", "", "", 0, 0),
        (P::MonSpeed, 0, NONE, true, "white", "hastes a monster", "", "", "", 0, 0),
        (P::MonSlow, 0, NONE, true, "white", "slows a monster", "", "", "", 0, 0),
        (P::MonConf, 0, NONE, false, "white", "confuses a monster", "", "", "", 0, 0),
        (P::MonHold, 0, NONE, false, "white", "holds a monster", "", "", "", 0, 0),
        (P::MonStun, 0, NONE, false, "white", "stuns a monster", "", "", "", 0, 0),
        (P::MonDrain, 0, NONE, true, "white", "drains life from a monster", "", "", "", 0, 0),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_line_up_with_projection_types() {
        for element in Element::iter() {
            let kind = ProjectionKind::from(element);
            assert_eq!(kind.element(), Some(element));
            assert_eq!(kind.as_ref(), element.as_ref());
        }
        assert_eq!(ProjectionKind::LightWeak.element(), None);
        assert!(ProjectionKind::MonDrain.is_monster_only());
        assert!(!ProjectionKind::MakeTrap.is_monster_only());
    }

    #[test]
    fn standard_table_has_one_row_per_kind() {
        let table = ProjectionTable::standard();
        assert_eq!(table.iter().count(), ProjectionKind::COUNT);
        for (kind, info) in ProjectionKind::iter().zip(table.iter()) {
            assert_eq!(info.kind, kind);
        }
        assert_eq!(table.blind_desc(ProjectionKind::Elec), "lightning");
        assert_eq!(table.get(ProjectionKind::Sound).numerator, 5);
    }

    #[test]
    fn incomplete_tables_are_rejected() {
        let mut rows: Vec<ProjectionInfo> = ProjectionTable::standard().iter().cloned().collect();
        let last = rows.pop().unwrap();
        assert_eq!(
            ProjectionTable::from_entries(rows.clone()),
            Err(RegistryError::Missing {
                table: "projection",
                name: "MON_DRAIN".into()
            })
        );
        rows.push(last.clone());
        rows.push(last);
        assert!(matches!(
            ProjectionTable::from_entries(rows),
            Err(RegistryError::Duplicate { .. })
        ));
    }

    #[test]
    fn breath_damage_is_capped() {
        let table = ProjectionTable::standard();
        let fire = table.get(ProjectionKind::Fire);
        assert_eq!(fire.breath_damage(300), 100);
        assert_eq!(fire.breath_damage(9000), 1600);
        assert_eq!(table.get(ProjectionKind::KillWall).breath_damage(40), 40);
    }
}
