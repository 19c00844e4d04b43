//! Monster races, live monsters and what the player has learned about them.

use std::collections::BTreeMap;

use bitflags::bitflags;
use strum::EnumCount;

use super::cave::{Cave, Occupant};
use super::common::{MonsterId, Position};

bitflags! {
    /// Intrinsic properties of a monster race.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RaceFlags: u64 {
        const UNIQUE      = 1 << 0;
        const EVIL        = 1 << 1;
        const UNDEAD      = 1 << 2;
        const ANIMAL      = 1 << 3;
        const NONLIVING   = 1 << 4;
        const IM_ACID     = 1 << 5;
        const IM_ELEC     = 1 << 6;
        const IM_FIRE     = 1 << 7;
        const IM_COLD     = 1 << 8;
        const IM_POIS     = 1 << 9;
        const IM_NETHER   = 1 << 10;
        const IM_WATER    = 1 << 11;
        const IM_PLASMA   = 1 << 12;
        const IM_NEXUS    = 1 << 13;
        const IM_DISEN    = 1 << 14;
        const HURT_LIGHT  = 1 << 15;
        const HURT_ROCK   = 1 << 16;
        const HURT_FIRE   = 1 << 17;
        const HURT_COLD   = 1 << 18;
        const FORCE_DEPTH = 1 << 19;
        const NO_FEAR     = 1 << 20;
        const NO_CONF     = 1 << 21;
        const NO_SLEEP    = 1 << 22;
        const NO_STUN     = 1 << 23;
        const NO_HOLD     = 1 << 24;
        const MULTIPLY    = 1 << 25;
    }
}

bitflags! {
    /// Innate spells and breaths of a monster race.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpellFlags: u32 {
        const BR_LIGHT = 1 << 0;
        const BR_DARK  = 1 << 1;
        const BR_SOUN  = 1 << 2;
        const BR_SHAR  = 1 << 3;
        const BR_CHAO  = 1 << 4;
        const BR_GRAV  = 1 << 5;
        const BR_INER  = 1 << 6;
        const BR_WALL  = 1 << 7;
        const BR_TIME  = 1 << 8;
        const BLINK    = 1 << 9;
        const TPORT    = 1 << 10;
        const HEAL     = 1 << 11;
        const BOLT     = 1 << 12;
        const BALL     = 1 << 13;
        const SUMMON   = 1 << 14;
    }
}

/// Timed monster statuses.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
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
pub enum MonTimed {
    Sleep,
    Stun,
    Conf,
    Fear,
    Slow,
    Fast,
    Hold,
    Disen,
}

impl MonTimed {
    /// Largest value any monster timer may hold.
    pub const MAX_DURATION: i32 = 10_000;

    pub const fn desc(self) -> &'static str {
        match self {
            MonTimed::Sleep => "sleep",
            MonTimed::Stun => "stunning",
            MonTimed::Conf => "confusion",
            MonTimed::Fear => "fear",
            MonTimed::Slow => "slowing",
            MonTimed::Fast => "haste",
            MonTimed::Hold => "holding",
            MonTimed::Disen => "disenchantment",
        }
    }

    /// Race flag that makes a monster immune to this status.
    pub const fn resisted_by(self) -> RaceFlags {
        match self {
            MonTimed::Sleep => RaceFlags::NO_SLEEP,
            MonTimed::Stun => RaceFlags::NO_STUN,
            MonTimed::Conf => RaceFlags::NO_CONF,
            MonTimed::Fear => RaceFlags::NO_FEAR,
            MonTimed::Hold => RaceFlags::NO_HOLD,
            MonTimed::Slow | MonTimed::Fast | MonTimed::Disen => RaceFlags::empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterRace {
    pub name: String,
    pub level: i32,
    /// Experience value; also ranks monsters when one shoves another.
    pub mexp: i32,
    pub flags: RaceFlags,
    pub spells: SpellFlags,
    /// Hit points a freshly placed monster gets.
    pub hp: i32,
}

impl MonsterRace {
    pub fn new(name: impl Into<String>, level: i32, hp: i32) -> Self {
        Self {
            name: name.into(),
            level,
            mexp: level.max(1),
            flags: RaceFlags::empty(),
            spells: SpellFlags::empty(),
            hp,
        }
    }

    pub fn with_flags(mut self, flags: RaceFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_spells(mut self, spells: SpellFlags) -> Self {
        self.spells |= spells;
        self
    }

    pub fn with_mexp(mut self, mexp: i32) -> Self {
        self.mexp = mexp;
        self
    }
}

/// Flags the player has observed for a race.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterLore {
    pub flags: RaceFlags,
    pub spells: SpellFlags,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monster {
    pub id: MonsterId,
    /// Index into [`MonsterRegistry::races`].
    pub race: usize,
    pub hp: i32,
    pub maxhp: i32,
    pub grid: Position,
    pub timed: [i32; MonTimed::COUNT],
    pub visible: bool,
    /// Disguised as an object until revealed.
    pub mimicking: bool,
}

impl Monster {
    pub fn timer(&self, kind: MonTimed) -> i32 {
        self.timed[kind as usize]
    }

    pub fn is_asleep(&self) -> bool {
        self.timer(MonTimed::Sleep) > 0
    }
}

/// Narration attached to a monster being affected by a projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonsterMessage {
    None,
    Die,
    Destroyed,
    MoriaDeath,
    Resist,
    ResistALot,
    ResistSomewhat,
    Immune,
    HitHard,
    CatchFire,
    Disintegrates,
    BadlyFrozen,
    FreezeShatter,
    CringeLight,
    ShrivelLight,
    LoseSkin,
    Dissolve,
    Shudder,
    Disappear,
    Unaffected,
    MaintainShape,
    Change,
    Spawn,
    Healthier,
    FallAsleep,
    WakesUp,
}

impl MonsterMessage {
    /// Verb phrase following the monster's name; empty for [`MonsterMessage::None`].
    pub const fn text(self) -> &'static str {
        match self {
            MonsterMessage::None => "",
            MonsterMessage::Die => "dies.",
            MonsterMessage::Destroyed => "is destroyed.",
            MonsterMessage::MoriaDeath => "You hear a scream of agony!",
            MonsterMessage::Resist => "resists.",
            MonsterMessage::ResistALot => "resists a lot.",
            MonsterMessage::ResistSomewhat => "resists somewhat.",
            MonsterMessage::Immune => "is immune.",
            MonsterMessage::HitHard => "is hit hard.",
            MonsterMessage::CatchFire => "catches fire!",
            MonsterMessage::Disintegrates => "disintegrates!",
            MonsterMessage::BadlyFrozen => "is badly frozen.",
            MonsterMessage::FreezeShatter => "freezes and shatters!",
            MonsterMessage::CringeLight => "cringes from the light!",
            MonsterMessage::ShrivelLight => "shrivels away in the light!",
            MonsterMessage::LoseSkin => "loses some skin!",
            MonsterMessage::Dissolve => "dissolves!",
            MonsterMessage::Shudder => "shudders.",
            MonsterMessage::Disappear => "disappears!",
            MonsterMessage::Unaffected => "is unaffected!",
            MonsterMessage::MaintainShape => "maintains the same shape.",
            MonsterMessage::Change => "changes!",
            MonsterMessage::Spawn => "spawns!",
            MonsterMessage::Healthier => "looks healthier.",
            MonsterMessage::FallAsleep => "falls asleep!",
            MonsterMessage::WakesUp => "wakes up.",
        }
    }

    /// Messages that stand on their own rather than following a name.
    pub const fn is_standalone(self) -> bool {
        matches!(self, MonsterMessage::MoriaDeath)
    }
}

/// Pain narration for a monster left with `hp` out of `maxhp` after `dam`.
pub fn pain_message(dam: i32, hp: i32) -> &'static str {
    let before = (hp + dam).max(1) as i64;
    let percentage = (100 * hp.max(0) as i64) / before;
    if dam == 0 {
        "is unharmed."
    } else if percentage > 95 {
        "shrugs off the attack."
    } else if percentage > 75 {
        "grunts with pain."
    } else if percentage > 50 {
        "cries out in pain."
    } else if percentage > 35 {
        "screams in pain."
    } else if percentage > 20 {
        "screams in agony."
    } else if percentage > 10 {
        "writhes in agony."
    } else {
        "cries out feebly."
    }
}

/// Monster races, live monsters and race lore.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterRegistry {
    races: Vec<MonsterRace>,
    lore: Vec<MonsterLore>,
    monsters: BTreeMap<MonsterId, Monster>,
    next_id: u32,
}

impl MonsterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a race and returns its index.
    pub fn add_race(&mut self, race: MonsterRace) -> usize {
        self.races.push(race);
        self.lore.push(MonsterLore::default());
        self.races.len() - 1
    }

    pub fn races(&self) -> &[MonsterRace] {
        &self.races
    }

    pub fn race(&self, index: usize) -> Option<&MonsterRace> {
        self.races.get(index)
    }

    pub fn lore(&self, race: usize) -> Option<&MonsterLore> {
        self.lore.get(race)
    }

    pub fn lore_mut(&mut self, race: usize) -> Option<&mut MonsterLore> {
        self.lore.get_mut(race)
    }

    /// Places a fresh monster of `race` on `grid` and marks the square occupied.
    ///
    /// Returns `None` when the race is unknown or the grid is already taken.
    pub fn spawn(&mut self, cave: &mut Cave, race: usize, grid: Position) -> Option<MonsterId> {
        let hp = self.races.get(race)?.hp;
        if cave.occupant(grid) != Occupant::None || !cave.feat(grid).is_passable() {
            return None;
        }
        self.next_id += 1;
        let id = MonsterId(self.next_id);
        self.monsters.insert(
            id,
            Monster {
                id,
                race,
                hp,
                maxhp: hp,
                grid,
                timed: [0; MonTimed::COUNT],
                visible: true,
                mimicking: false,
            },
        );
        cave.set_occupant(grid, Occupant::Monster(id));
        Some(id)
    }

    pub fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(&id)
    }

    /// Race of a live monster.
    pub fn race_of(&self, id: MonsterId) -> Option<&MonsterRace> {
        self.get(id).and_then(|mon| self.races.get(mon.race))
    }

    /// Identifiers of every live monster in ascending order.
    pub fn ids(&self) -> Vec<MonsterId> {
        self.monsters.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Removes a monster from the level.
    pub fn delete(&mut self, cave: &mut Cave, id: MonsterId) -> Option<Monster> {
        let mon = self.monsters.remove(&id)?;
        if cave.occupant(mon.grid) == Occupant::Monster(id) {
            cave.set_occupant(mon.grid, Occupant::None);
        }
        Some(mon)
    }

    /// Moves a monster to an unoccupied grid.
    pub fn relocate(&mut self, cave: &mut Cave, id: MonsterId, grid: Position) -> bool {
        let Some(mon) = self.monsters.get_mut(&id) else {
            return false;
        };
        if cave.occupant(grid) != Occupant::None {
            return false;
        }
        cave.set_occupant(mon.grid, Occupant::None);
        cave.set_occupant(grid, Occupant::Monster(id));
        mon.grid = grid;
        true
    }

    /// Display name: "the <race>" when visible, "it" otherwise.
    pub fn describe(&self, id: MonsterId) -> String {
        match (self.get(id), self.race_of(id)) {
            (Some(mon), Some(race)) if mon.visible => {
                if race.flags.contains(RaceFlags::UNIQUE) {
                    race.name.clone()
                } else {
                    format!("the {}", race.name)
                }
            }
            _ => "it".to_string(),
        }
    }

    /// Extends a monster timer. Returns false when the race resists the status.
    pub fn inc_timed(&mut self, id: MonsterId, kind: MonTimed, amount: i32) -> bool {
        let resist = kind.resisted_by();
        let Some(flags) = self.race_of(id).map(|race| race.flags) else {
            return false;
        };
        if amount <= 0 || (!resist.is_empty() && flags.intersects(resist)) {
            return false;
        }
        let Some(mon) = self.monsters.get_mut(&id) else {
            return false;
        };
        let slot = &mut mon.timed[kind as usize];
        *slot = (*slot + amount).min(MonTimed::MAX_DURATION);
        true
    }

    pub fn clear_timed(&mut self, id: MonsterId, kind: MonTimed) {
        if let Some(mon) = self.monsters.get_mut(&id) {
            mon.timed[kind as usize] = 0;
        }
    }

    pub fn wake(&mut self, id: MonsterId) {
        self.clear_timed(id, MonTimed::Sleep);
    }

    /// Records an observed race flag in the lore of a visible monster.
    pub fn learn_flag(&mut self, id: MonsterId, flag: RaceFlags) {
        let Some(mon) = self.monsters.get(&id) else {
            return;
        };
        if !mon.visible {
            return;
        }
        let race = mon.race;
        let Some(known) = self.races.get(race).map(|r| r.flags & flag) else {
            return;
        };
        if let Some(lore) = self.lore.get_mut(race) {
            lore.flags |= known;
        }
    }

    /// Records an observed spell flag in the lore of a visible monster.
    pub fn learn_spell(&mut self, id: MonsterId, spell: SpellFlags) {
        let Some(mon) = self.monsters.get(&id) else {
            return;
        };
        if !mon.visible {
            return;
        }
        let race = mon.race;
        let Some(known) = self.races.get(race).map(|r| r.spells & spell) else {
            return;
        };
        if let Some(lore) = self.lore.get_mut(race) {
            lore.spells |= known;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_orc(cave: &mut Cave) -> (MonsterRegistry, MonsterId) {
        let mut monsters = MonsterRegistry::new();
        let race = monsters.add_race(MonsterRace::new("cave orc", 7, 11).with_flags(RaceFlags::EVIL));
        let id = monsters.spawn(cave, race, Position::new(2, 2)).unwrap();
        (monsters, id)
    }

    #[test]
    fn spawn_marks_the_square() {
        let mut cave = Cave::new(6, 6);
        let (monsters, id) = registry_with_orc(&mut cave);
        assert_eq!(cave.monster_at(Position::new(2, 2)), Some(id));
        assert_eq!(monsters.get(id).unwrap().hp, 11);
        assert_eq!(monsters.describe(id), "the cave orc");
    }

    #[test]
    fn resisted_timers_are_refused() {
        let mut cave = Cave::new(6, 6);
        let mut monsters = MonsterRegistry::new();
        let race = monsters.add_race(
            MonsterRace::new("golem", 10, 30).with_flags(RaceFlags::NO_CONF | RaceFlags::NONLIVING),
        );
        let id = monsters.spawn(&mut cave, race, Position::new(1, 1)).unwrap();
        assert!(!monsters.inc_timed(id, MonTimed::Conf, 5));
        assert!(monsters.inc_timed(id, MonTimed::Slow, 5));
        assert_eq!(monsters.get(id).unwrap().timer(MonTimed::Slow), 5);
    }

    #[test]
    fn delete_frees_the_square() {
        let mut cave = Cave::new(6, 6);
        let (mut monsters, id) = registry_with_orc(&mut cave);
        assert!(monsters.delete(&mut cave, id).is_some());
        assert_eq!(cave.occupant(Position::new(2, 2)), Occupant::None);
        assert!(monsters.is_empty());
    }

    #[test]
    fn lore_only_learns_what_the_race_has() {
        let mut cave = Cave::new(6, 6);
        let (mut monsters, id) = registry_with_orc(&mut cave);
        monsters.learn_flag(id, RaceFlags::EVIL | RaceFlags::UNDEAD);
        assert_eq!(monsters.lore(0).unwrap().flags, RaceFlags::EVIL);
    }

    #[test]
    fn pain_scales_with_remaining_health() {
        assert_eq!(pain_message(1, 99), "shrugs off the attack.");
        assert_eq!(pain_message(85, 15), "writhes in agony.");
        assert_eq!(pain_message(90, 10), "cries out feebly.");
        assert_eq!(pain_message(0, 10), "is unharmed.");
    }
}
