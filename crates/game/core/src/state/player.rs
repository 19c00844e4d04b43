//! Player character: vitals, timed statuses, resistances and gear.

use bitflags::bitflags;
use strum::EnumCount;

use crate::env::GameRng;

use super::MessageLog;
use super::common::Position;
use super::object::{ElementFlags, Object};

/// Elements the player can resist; the first projection types share this order.
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
pub enum Element {
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
}

impl Element {
    /// Object vulnerability corresponding to this element, if any.
    pub const fn object_flag(self) -> ElementFlags {
        match self {
            Element::Acid => ElementFlags::ACID,
            Element::Elec => ElementFlags::ELEC,
            Element::Fire => ElementFlags::FIRE,
            Element::Cold => ElementFlags::COLD,
            Element::Sound => ElementFlags::SOUND,
            Element::Shard => ElementFlags::SHARD,
            Element::Ice => ElementFlags::ICE,
            Element::Force => ElementFlags::FORCE,
            _ => ElementFlags::empty(),
        }
    }
}

/// Timed player statuses.
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
pub enum PlayerTimed {
    Fast,
    Slow,
    Blind,
    Paralyzed,
    Confused,
    Afraid,
    Image,
    Poisoned,
    Cut,
    Stun,
    Amnesia,
    Scrambled,
    Food,
}

impl PlayerTimed {
    pub const fn max_duration(self) -> i32 {
        match self {
            PlayerTimed::Food => 17_500,
            _ => 10_000,
        }
    }

    /// Noun used in effect descriptions ("cures blindness").
    pub const fn desc(self) -> &'static str {
        match self {
            PlayerTimed::Fast => "haste",
            PlayerTimed::Slow => "slowness",
            PlayerTimed::Blind => "blindness",
            PlayerTimed::Paralyzed => "paralysis",
            PlayerTimed::Confused => "confusion",
            PlayerTimed::Afraid => "fear",
            PlayerTimed::Image => "hallucination",
            PlayerTimed::Poisoned => "poisoning",
            PlayerTimed::Cut => "cuts",
            PlayerTimed::Stun => "stunning",
            PlayerTimed::Amnesia => "amnesia",
            PlayerTimed::Scrambled => "scrambling",
            PlayerTimed::Food => "nourishment",
        }
    }

    pub const fn on_begin(self) -> &'static str {
        match self {
            PlayerTimed::Fast => "You feel yourself moving faster!",
            PlayerTimed::Slow => "You feel yourself moving slower!",
            PlayerTimed::Blind => "You are blind.",
            PlayerTimed::Paralyzed => "You are paralysed!",
            PlayerTimed::Confused => "You are confused!",
            PlayerTimed::Afraid => "You are terrified!",
            PlayerTimed::Image => "You feel drugged!",
            PlayerTimed::Poisoned => "You are poisoned!",
            PlayerTimed::Cut => "You have been given a graze.",
            PlayerTimed::Stun => "You have been stunned.",
            PlayerTimed::Amnesia => "You feel your memories fade.",
            PlayerTimed::Scrambled => "Your body starts to scramble...",
            PlayerTimed::Food => "",
        }
    }

    pub const fn on_end(self) -> &'static str {
        match self {
            PlayerTimed::Fast => "You feel yourself slow down.",
            PlayerTimed::Slow => "You feel yourself speed up.",
            PlayerTimed::Blind => "You blink and your eyes clear.",
            PlayerTimed::Paralyzed => "You can move again.",
            PlayerTimed::Confused => "You feel less confused now.",
            PlayerTimed::Afraid => "You feel bolder now.",
            PlayerTimed::Image => "You can see clearly again.",
            PlayerTimed::Poisoned => "You are no longer poisoned.",
            PlayerTimed::Cut => "You are no longer bleeding.",
            PlayerTimed::Stun => "You are no longer stunned.",
            PlayerTimed::Amnesia => "Your memories come flooding back.",
            PlayerTimed::Scrambled => "Your body reasserts its true nature.",
            PlayerTimed::Food => "",
        }
    }

    /// Protection that blocks this status when the increase is resistible.
    pub const fn protected_by(self) -> ProtectFlags {
        match self {
            PlayerTimed::Blind => ProtectFlags::PROT_BLIND,
            PlayerTimed::Confused => ProtectFlags::PROT_CONF,
            PlayerTimed::Afraid => ProtectFlags::PROT_FEAR,
            PlayerTimed::Stun => ProtectFlags::PROT_STUN,
            PlayerTimed::Paralyzed => ProtectFlags::FREE_ACT,
            _ => ProtectFlags::empty(),
        }
    }
}

bitflags! {
    /// Protections granted by equipment.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ProtectFlags: u8 {
        const PROT_STUN  = 1 << 0;
        const PROT_CONF  = 1 << 1;
        const PROT_BLIND = 1 << 2;
        const PROT_FEAR  = 1 << 3;
        const FREE_ACT   = 1 << 4;
        const HOLD_LIFE  = 1 << 5;
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumCount, strum::EnumIter, strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Stat {
    Str,
    Int,
    Wis,
    Dex,
    Con,
}

impl Stat {
    /// Adjective used when the stat is drained ("You're not as strong...").
    pub const fn adjective(self) -> &'static str {
        match self {
            Stat::Str => "strong",
            Stat::Int => "bright",
            Stat::Wis => "wise",
            Stat::Dex => "agile",
            Stat::Con => "hale",
        }
    }

    pub const MIN_VALUE: i32 = 3;
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub grid: Position,
    pub hp: i32,
    pub mhp: i32,
    pub csp: i32,
    pub msp: i32,
    pub exp: i32,
    pub max_exp: i32,
    pub lev: i32,
    pub energy: i32,
    /// Saving throw percentage.
    pub skill_save: i32,
    pub stats: [i32; Stat::COUNT],
    pub timed: [i32; PlayerTimed::COUNT],
    /// Resistance level per element: -1 vulnerable, 0 none, 1..=2 resist, 3 immune.
    pub resists: [i32; Element::COUNT],
    pub known_elements: [bool; Element::COUNT],
    pub protect: ProtectFlags,
    pub known_protect: ProtectFlags,
    pub pack: Vec<Object>,
    pub equipment: Vec<Object>,
    pub target: Option<Position>,
    pub is_dead: bool,
    pub died_from: String,
    /// Set when the player leaves the level (teleport level, deep descent).
    pub leaving: bool,
}

impl PlayerState {
    pub const DEFAULT_HP: i32 = 100;
    pub const DEFAULT_FOOD: i32 = 5_000;
    pub const LIFE_DRAIN_PERCENT: i32 = 2;

    pub fn new(grid: Position) -> Self {
        let mut timed = [0; PlayerTimed::COUNT];
        timed[PlayerTimed::Food as usize] = Self::DEFAULT_FOOD;
        Self {
            grid,
            hp: Self::DEFAULT_HP,
            mhp: Self::DEFAULT_HP,
            csp: 0,
            msp: 0,
            exp: 0,
            max_exp: 0,
            lev: 1,
            energy: 0,
            skill_save: 0,
            stats: [18; Stat::COUNT],
            timed,
            resists: [0; Element::COUNT],
            known_elements: [false; Element::COUNT],
            protect: ProtectFlags::empty(),
            known_protect: ProtectFlags::empty(),
            pack: Vec::new(),
            equipment: Vec::new(),
            target: None,
            is_dead: false,
            died_from: String::new(),
            leaving: false,
        }
    }

    pub fn timer(&self, kind: PlayerTimed) -> i32 {
        self.timed[kind as usize]
    }

    pub fn is_blind(&self) -> bool {
        self.timer(PlayerTimed::Blind) > 0
    }

    pub fn resist_level(&self, element: Element) -> i32 {
        self.resists[element as usize]
    }

    pub fn resists(&self, element: Element) -> bool {
        self.resist_level(element) > 0
    }

    pub fn is_immune(&self, element: Element) -> bool {
        self.resist_level(element) >= 3
    }

    pub fn has_protection(&self, flag: ProtectFlags) -> bool {
        self.protect.intersects(flag)
    }

    /// Notices the gear property that changed how an element affected the player.
    pub fn learn_element(&mut self, element: Element, log: &mut MessageLog) {
        let slot = element as usize;
        if self.known_elements[slot] {
            return;
        }
        self.known_elements[slot] = true;
        if self.resists[slot] != 0 {
            log.push(format!(
                "You have learned the rune of {}.",
                element.as_ref().to_lowercase()
            ));
        }
    }

    pub fn learn_protection(&mut self, flag: ProtectFlags) {
        self.known_protect |= flag & self.protect;
    }

    /// Reduces hit points; death records `killer`.
    pub fn take_hit(&mut self, dam: i32, killer: &str, log: &mut MessageLog) {
        if self.is_dead || dam <= 0 {
            return;
        }
        self.hp -= dam;
        if self.hp < 0 {
            self.is_dead = true;
            self.died_from = killer.to_string();
            log.push("You die.");
        }
    }

    /// Restores up to `amount` hit points and returns how many were restored.
    pub fn restore_hp(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.mhp);
        self.hp - before
    }

    /// Sets a timer, narrating the start or end of the status.
    pub fn set_timed(&mut self, kind: PlayerTimed, value: i32, notify: bool, log: &mut MessageLog) -> bool {
        let value = value.clamp(0, kind.max_duration());
        let slot = &mut self.timed[kind as usize];
        if *slot == value {
            return false;
        }
        let old = *slot;
        *slot = value;
        if notify {
            let text = match (old, value) {
                (0, v) if v > 0 => kind.on_begin(),
                (o, 0) if o > 0 => kind.on_end(),
                _ => "",
            };
            if !text.is_empty() {
                log.push(text);
            }
        }
        true
    }

    /// Extends a timer. With `check`, protections may refuse the increase.
    pub fn inc_timed(
        &mut self,
        kind: PlayerTimed,
        amount: i32,
        notify: bool,
        check: bool,
        log: &mut MessageLog,
    ) -> bool {
        if amount <= 0 {
            return false;
        }
        if check {
            let protect = kind.protected_by();
            if self.has_protection(protect) {
                self.learn_protection(protect);
                return false;
            }
            if kind == PlayerTimed::Poisoned && self.resists(Element::Pois) {
                self.learn_element(Element::Pois, log);
                return false;
            }
        }
        let current = self.timer(kind);
        self.set_timed(kind, current + amount, notify, log)
    }

    pub fn dec_timed(&mut self, kind: PlayerTimed, amount: i32, notify: bool, log: &mut MessageLog) -> bool {
        if amount <= 0 {
            return false;
        }
        let current = self.timer(kind);
        self.set_timed(kind, current - amount, notify, log)
    }

    pub fn clear_timed(&mut self, kind: PlayerTimed, notify: bool, log: &mut MessageLog) -> bool {
        self.set_timed(kind, 0, notify, log)
    }

    pub fn exp_gain(&mut self, amount: i32) {
        self.exp += amount.max(0);
        self.max_exp = self.max_exp.max(self.exp);
    }

    /// Loses experience; `permanent` also lowers the maximum.
    pub fn exp_lose(&mut self, amount: i32, permanent: bool) {
        let amount = amount.min(self.exp).max(0);
        self.exp -= amount;
        if permanent {
            self.max_exp -= amount.min(self.max_exp);
        }
    }

    /// Drains one point from a stat. Returns false when it is already minimal.
    pub fn stat_dec(&mut self, stat: Stat) -> bool {
        let value = &mut self.stats[stat as usize];
        if *value <= Stat::MIN_VALUE {
            return false;
        }
        *value -= 1;
        true
    }

    /// Acid damages a piece of worn armour. Returns true when the armour absorbed it.
    pub fn minus_ac(&mut self, rng: &mut GameRng, log: &mut MessageLog) -> bool {
        let armour: Vec<usize> = self
            .equipment
            .iter()
            .enumerate()
            .filter(|(_, obj)| obj.class.is_armour())
            .map(|(i, _)| i)
            .collect();
        if armour.is_empty() {
            return false;
        }
        let pick = armour[rng.randint0(armour.len() as i32) as usize];
        let obj = &mut self.equipment[pick];
        if obj.to_a <= 0 && obj.artifact {
            return false;
        }
        if obj.ignores.contains(ElementFlags::ACID) {
            log.push(format!("Your {} is unaffected!", obj.name));
            return true;
        }
        log.push(format!("Your {} is damaged!", obj.name));
        obj.to_a -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protection_blocks_checked_increase_only() {
        let mut log = MessageLog::default();
        let mut player = PlayerState::new(Position::new(1, 1));
        player.protect = ProtectFlags::PROT_CONF;
        assert!(!player.inc_timed(PlayerTimed::Confused, 5, true, true, &mut log));
        assert!(player.known_protect.contains(ProtectFlags::PROT_CONF));
        assert!(player.inc_timed(PlayerTimed::Confused, 5, true, false, &mut log));
        assert_eq!(player.timer(PlayerTimed::Confused), 5);
        assert_eq!(log.last(), Some("You are confused!"));
    }

    #[test]
    fn timers_narrate_begin_and_end() {
        let mut log = MessageLog::default();
        let mut player = PlayerState::new(Position::ORIGIN);
        player.inc_timed(PlayerTimed::Blind, 3, true, true, &mut log);
        player.dec_timed(PlayerTimed::Blind, 10, true, &mut log);
        assert_eq!(log.messages(), ["You are blind.", "You blink and your eyes clear."]);
        assert!(!player.is_blind());
    }

    #[test]
    fn fatal_hit_records_killer() {
        let mut log = MessageLog::default();
        let mut player = PlayerState::new(Position::ORIGIN);
        player.take_hit(150, "a fire trap", &mut log);
        assert!(player.is_dead);
        assert_eq!(player.died_from, "a fire trap");
    }

    #[test]
    fn stats_never_drop_below_minimum() {
        let mut player = PlayerState::new(Position::ORIGIN);
        player.stats[Stat::Con as usize] = 4;
        assert!(player.stat_dec(Stat::Con));
        assert!(!player.stat_dec(Stat::Con));
    }
}
