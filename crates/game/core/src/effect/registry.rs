//! Descriptive data for every effect kind.
//!
//! Handlers live in code ([`EffectKind::handler`]); everything a player reads
//! about an effect lives here and is normally loaded from data.

use strum::{EnumCount, IntoEnumIterator};

use super::error::RegistryError;
use super::kind::{EffectInfoFormat, EffectKind};

/// One row of the effect table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectInfo {
    pub kind: EffectKind,
    /// The effect needs a direction or target.
    #[cfg_attr(feature = "serde", serde(default))]
    pub aim: bool,
    /// Short label for spell info ("dam", "heal", "dur", ...).
    #[cfg_attr(feature = "serde", serde(default))]
    pub info: Option<String>,
    /// Number of arguments the description template takes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub args: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub format: EffectInfoFormat,
    /// `printf`-style template; `%s` and `%d` are filled per `format`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub desc: String,
}

impl EffectInfo {
    pub fn damages(&self) -> bool {
        self.info.as_deref() == Some("dam")
    }
}

/// Complete table of [`EffectInfo`], one entry per valid [`EffectKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectTable {
    entries: Vec<Option<EffectInfo>>,
}

impl EffectTable {
    const NAME: &'static str = "effect";

    /// Builds a table, insisting on exactly one row per valid kind.
    pub fn from_entries(rows: Vec<EffectInfo>) -> Result<Self, RegistryError> {
        let mut entries: Vec<Option<EffectInfo>> = vec![None; EffectKind::COUNT];
        for row in rows {
            if !row.kind.is_valid() {
                return Err(RegistryError::InvalidSlot { table: Self::NAME });
            }
            let slot = &mut entries[row.kind as usize];
            if slot.is_some() {
                return Err(RegistryError::Duplicate {
                    table: Self::NAME,
                    name: row.kind.to_string(),
                });
            }
            *slot = Some(row);
        }
        if let Some(missing) = EffectKind::iter()
            .filter(|kind| kind.is_valid())
            .find(|kind| entries[*kind as usize].is_none())
        {
            return Err(RegistryError::Missing {
                table: Self::NAME,
                name: missing.to_string(),
            });
        }
        Ok(Self { entries })
    }

    /// Built-in copy of the shipped effect data.
    pub fn standard() -> Self {
        let entries = STANDARD
            .iter()
            .map(|&(kind, aim, info, args, format, desc)| EffectInfo {
                kind,
                aim,
                info: info.map(str::to_string),
                args,
                format,
                desc: desc.to_string(),
            })
            .collect();
        // The const table names every kind once; see `standard_table_is_complete`.
        match Self::from_entries(entries) {
            Ok(table) => table,
            Err(err) => unreachable!("built-in effect table is incomplete: {err}"),
        }
    }

    pub fn get(&self, kind: EffectKind) -> Option<&EffectInfo> {
        self.entries.get(kind as usize).and_then(Option::as_ref)
    }

    /// Description template, if the kind has a non-empty one.
    pub fn desc(&self, kind: EffectKind) -> Option<&str> {
        self.get(kind)
            .map(|info| info.desc.as_str())
            .filter(|desc| !desc.is_empty())
    }

    pub fn format(&self, kind: EffectKind) -> EffectInfoFormat {
        self.get(kind).map(|info| info.format).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInfo> {
        self.entries.iter().flatten()
    }
}

impl Default for EffectTable {
    fn default() -> Self {
        Self::standard()
    }
}

type Row = (
    EffectKind,
    bool,
    Option<&'static str>,
    u8,
    EffectInfoFormat,
    &'static str,
);

const STANDARD: &[Row] = {
    use EffectInfoFormat as F;
    use EffectKind as K;
    &[
        (K::Random, false, None, 0, F::None, "randomly "),
        (K::Select, false, None, 0, F::None, "either "),
        (K::SetValue, false, None, 0, F::None, ""),
        (K::ClearValue, false, None, 0, F::None, ""),
        (K::Damage, false, None, 0, F::None, "damages the player"),
        (K::HealHp, false, Some("heal"), 2, F::Heal, "heals %s hitpoints%s"),
        (K::MonHealHp, false, None, 0, F::None, "heals monster hitpoints"),
        (K::Nourish, false, None, 1, F::Const, "feeds you for %d turns"),
        (K::Cure, false, None, 1, F::Cure, "cures %s"),
        (K::TimedSet, false, None, 2, F::Timed, "administers %s for %s turns"),
        (K::TimedInc, false, Some("dur"), 2, F::Timed, "extends %s for %s turns"),
        (
            K::TimedIncNoRes,
            false,
            Some("dur"),
            2,
            F::Timed,
            "extends %s for %s turns (unresistable)",
        ),
        (K::MonTimedInc, false, None, 2, F::Timed, "increases monster %s by %s turns"),
        (K::TimedDec, false, None, 2, F::Timed, "reduces length of %s by %s turns"),
        (
            K::Recall,
            false,
            None,
            0,
            F::None,
            "returns you from the dungeon or takes you to the dungeon after a short delay",
        ),
        (
            K::DeepDescent,
            false,
            None,
            0,
            F::None,
            "teleports you up to five dungeon levels lower than the lowest point you have reached so far",
        ),
        (K::MapArea, false, None, 0, F::None, "maps the area around you"),
        (K::Summon, false, None, 1, F::Summ, "summons %s at the current dungeon level"),
        (K::Teleport, false, Some("range"), 2, F::Tele, "teleports %s randomly %s"),
        (K::ThrustAway, false, None, 0, F::None, "pushes a creature away"),
        (K::ProjectLos, false, Some("power"), 1, F::Seen, "%s which are in line of sight"),
        (K::ProjectLosAware, false, Some("power"), 1, F::Seen, "%s which are in line of sight"),
        (
            K::LightArea,
            false,
            None,
            2,
            F::Light,
            "lights up the surrounding area, causing %s damage to light-sensitive creatures within %d grids",
        ),
        (K::DarkenArea, false, None, 0, F::None, "darkens the surrounding area"),
        (
            K::Ball,
            true,
            Some("dam"),
            3,
            F::Ball,
            "fires a ball of %s with radius %d, dealing %s damage at the centre",
        ),
        (
            K::Breath,
            true,
            None,
            3,
            F::Breath,
            "breathes a cone of %s with width %d degrees, dealing %s damage at the source",
        ),
        (
            K::Arc,
            true,
            Some("dam"),
            3,
            F::Breath,
            "produces a cone of %s with width %d degrees, dealing %s damage at the source",
        ),
        (
            K::Swarm,
            true,
            Some("dam"),
            3,
            F::Ball,
            "fires a series of %s balls of radius %d, dealing %s damage at the centre of each",
        ),
        (
            K::Star,
            false,
            Some("dam"),
            2,
            F::BoltDam,
            "fires a line of %s in all directions, each dealing %s damage",
        ),
        (
            K::StarBall,
            false,
            Some("dam"),
            3,
            F::Ball,
            "fires balls of %s with radius %d in all directions, dealing %s damage at the centre of each",
        ),
        (K::Bolt, true, Some("dam"), 2, F::BoltDam, "casts a bolt of %s dealing %s damage"),
        (K::Beam, true, Some("dam"), 2, F::BoltDam, "casts a beam of %s dealing %s damage"),
        (
            K::BoltOrBeam,
            true,
            Some("dam"),
            2,
            F::BoltDam,
            "casts a bolt or beam of %s dealing %s damage",
        ),
        (K::Line, true, Some("dam"), 2, F::BoltDam, "creates a line of %s dealing %s damage"),
        (
            K::Alter,
            true,
            None,
            0,
            F::None,
            "creates a line which may affect terrain and/or items",
        ),
        (K::BoltStatus, true, None, 1, F::Bolt, "casts a bolt which %s"),
        (
            K::BoltStatusDam,
            true,
            Some("dam"),
            2,
            F::BoltDam,
            "casts a bolt which %s, dealing %s damage",
        ),
        (K::BoltAware, true, Some("dam"), 1, F::Bolt, "creates a bolt which %s"),
        (K::Touch, false, None, 1, F::Touch, "%s on all adjacent squares"),
        (K::TouchAware, false, None, 1, F::Touch, "%s on all adjacent squares"),
        (
            K::Spot,
            false,
            Some("dam"),
            4,
            F::Spot,
            "creates a ball of %s with radius %d, centred on and hitting you, with full intensity to radius %d, dealing %s damage at the centre",
        ),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_complete() {
        let rows: Vec<EffectInfo> = EffectTable::standard().iter().cloned().collect();
        assert_eq!(rows.len(), EffectKind::COUNT - 1);
        assert!(EffectTable::from_entries(rows).is_ok());
    }

    #[test]
    fn missing_and_duplicate_rows_are_rejected() {
        let mut rows: Vec<EffectInfo> = EffectTable::standard().iter().cloned().collect();
        let bolt = rows
            .iter()
            .position(|row| row.kind == EffectKind::Bolt)
            .unwrap();
        let removed = rows.remove(bolt);
        assert_eq!(
            EffectTable::from_entries(rows.clone()),
            Err(RegistryError::Missing {
                table: "effect",
                name: "BOLT".into()
            })
        );

        rows.push(removed.clone());
        rows.push(removed);
        assert!(matches!(
            EffectTable::from_entries(rows),
            Err(RegistryError::Duplicate { .. })
        ));
    }

    #[test]
    fn lookups() {
        let table = EffectTable::standard();
        assert!(table.get(EffectKind::None).is_none());
        assert!(table.get(EffectKind::Ball).unwrap().damages());
        assert!(table.get(EffectKind::Ball).unwrap().aim);
        assert_eq!(table.desc(EffectKind::SetValue), None);
        assert_eq!(table.format(EffectKind::Star), EffectInfoFormat::BoltDam);
    }
}
