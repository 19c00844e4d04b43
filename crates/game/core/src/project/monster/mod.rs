//! Projection effects on monsters.
//!
//! Each type first runs its [`MonsterRule`], which adjusts the damage and
//! records what else should happen (a status, a teleport, a polymorph).
//! Damage is then dealt through the monster-attack or player-attack path,
//! depending on who cast the projection, and the recorded side effects are
//! applied to whatever survived.

mod rules;

use strum::{EnumCount, IntoEnumIterator};

use crate::effect::{EffectKind, SimpleEffect, execute_simple};
use crate::env::{Env, MapOracle};
use crate::state::{
    Direction, GameState, MonTimed, MonsterId, MonsterMessage as Msg, Position, RaceFlags,
    Source, SpellFlags, pain_message,
};

use self::rules::MonsterRule;
use super::thrust::capitalise;
use super::{Hit, ProjectFlags, ProjectionKind};

/// What a single grid of a projection did to the monster on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct MonsterOutcome {
    /// The player noticed something.
    pub obvious: bool,
    /// A monster was actually affected.
    pub hit: bool,
}

pub(crate) struct MonsterContext<'a, 's> {
    env: Env<'a>,
    state: &'s mut GameState,
    origin: Source,
    /// Distance from the centre of the blast.
    radius: i32,
    grid: Position,
    dam: i32,
    kind: ProjectionKind,
    id: MonsterId,
    seen: bool,
    flags: RaceFlags,
    spells: SpellFlags,
    level: i32,
    obvious: bool,
    skipped: bool,
    do_poly: i32,
    teleport: i32,
    hurt_msg: Msg,
    die_msg: Msg,
    timed: [i32; MonTimed::COUNT],
}

impl MonsterContext<'_, '_> {
    /// Scales a power down with distance from the centre.
    fn adjust_radius(&self, amount: i32) -> i32 {
        (amount + self.radius) / (self.radius + 1)
    }

    /// Notes race flags in the lore; only visible monsters teach anything.
    fn learn(&mut self, flags: RaceFlags) {
        if self.seen {
            self.state.monsters.learn_flag(self.id, flags);
        }
    }

    fn maybe_stun(&mut self) {
        if self.state.rng.one_in(3) {
            let amount = 5 + self.state.rng.randint1(10);
            self.timed[MonTimed::Stun as usize] = self.adjust_radius(amount);
        }
    }

    fn resist_element(&mut self, flag: RaceFlags, factor: i32) {
        self.learn(flag);
        if self.flags.contains(flag) {
            self.hurt_msg = Msg::ResistALot;
            self.dam /= factor;
        }
    }

    fn resist_other(&mut self, flag: RaceFlags, factor: i32, reduce: bool, msg: Msg) {
        self.learn(flag);
        if self.flags.contains(flag) {
            self.hurt_msg = msg;
            self.dam *= factor;
            if reduce {
                self.dam /= self.state.rng.randint1(6) + 6;
            }
        }
    }

    fn hurt_immune(
        &mut self,
        hurt: RaceFlags,
        immune: RaceFlags,
        hurt_factor: i32,
        immune_factor: i32,
        hurt_msg: Msg,
        die_msg: Msg,
    ) {
        self.learn(hurt | immune);
        if self.flags.contains(immune) {
            self.hurt_msg = Msg::ResistALot;
            self.dam /= immune_factor;
        } else if self.flags.contains(hurt) {
            self.hurt_msg = hurt_msg;
            self.die_msg = die_msg;
            self.dam *= hurt_factor;
        }
    }

    fn hurt_only(&mut self, flag: RaceFlags, hurt_msg: Msg, die_msg: Msg) {
        self.learn(flag);
        if self.flags.contains(flag) {
            self.hurt_msg = hurt_msg;
            self.die_msg = die_msg;
        } else {
            self.dam = 0;
        }
    }

    fn breath(&mut self, spell: SpellFlags, factor: i32) {
        if !self.spells.contains(spell) {
            return;
        }
        if self.seen {
            self.state.monsters.learn_spell(self.id, spell);
        }
        self.hurt_msg = Msg::Resist;
        self.dam *= factor;
        self.dam /= self.state.rng.randint1(6) + 6;
    }

    fn teleport_away(&mut self, flag: RaceFlags) {
        self.learn(flag);
        if self.flags.contains(flag) {
            self.teleport = self.dam;
            self.hurt_msg = Msg::Disappear;
        } else {
            self.skipped = true;
        }
        self.obvious = true;
        self.dam = 0;
    }

    fn scare(&mut self, flag: RaceFlags) {
        self.learn(flag);
        if self.flags.contains(flag) {
            self.timed[MonTimed::Fear as usize] = self.adjust_radius(self.dam);
        } else {
            self.skipped = true;
        }
        self.obvious = true;
        self.dam = 0;
    }

    fn dispel(&mut self, flag: RaceFlags) {
        self.learn(flag);
        if self.flags.contains(flag) {
            self.hurt_msg = Msg::Shudder;
            self.die_msg = Msg::Dissolve;
        } else {
            self.skipped = true;
            self.dam = 0;
        }
        self.obvious = true;
    }

    fn sleep(&mut self, flag: RaceFlags) {
        if !flag.is_empty() {
            self.learn(flag);
            if !self.flags.contains(flag) {
                self.skipped = true;
                self.dam = 0;
            }
        }
        self.timed[MonTimed::Sleep as usize] = self.dam;
        self.dam = 0;
        self.obvious = true;
    }

    /// Places a copy of the monster on a free adjacent grid.
    fn multiply(&mut self) -> bool {
        let Some(race) = self.state.monsters.get(self.id).map(|mon| mon.race) else {
            return false;
        };
        let first = self.state.rng.randint0(8) as usize;
        for d in first..first + 8 {
            let next = self.grid.step(Direction::DDD[d % 8]);
            if self.state.cave.is_empty(next)
                && self.state.monsters.spawn(&mut self.state.cave, race, next).is_some()
            {
                return true;
            }
        }
        false
    }

    fn say(&mut self, msg: Msg) {
        say(self.state, self.id, msg);
    }

    fn pain(&mut self, dam: i32) {
        let Some(hp) = self.state.monsters.get(self.id).map(|mon| mon.hp) else {
            return;
        };
        let name = self.state.monsters.describe(self.id);
        self.state
            .messages
            .push(capitalise(&format!("{name} {}", pain_message(dam, hp))));
    }

    /// Damage from another monster's projection. Returns true on death.
    fn monster_attack(&mut self) -> bool {
        let id = self.id;
        let mut dam = self.dam;
        let Some(mon) = self.state.monsters.get(id) else {
            return true;
        };
        // Only the player may finish off a unique.
        if self.flags.contains(RaceFlags::UNIQUE) {
            dam = dam.min(mon.hp);
        }
        let mimicking = mon.mimicking;

        self.state.monsters.wake(id);
        let hp = match self.state.monsters.get_mut(id) {
            Some(mon) => {
                mon.hp -= dam;
                mon.hp
            }
            None => return true,
        };

        if hp < 0 {
            let die_msg = if self.seen { self.die_msg } else { Msg::MoriaDeath };
            self.say(die_msg);
            self.state.monsters.delete(&mut self.state.cave, id);
            return true;
        }
        if !mimicking {
            if self.hurt_msg != Msg::None && self.seen {
                self.say(self.hurt_msg);
            } else if dam > 0 {
                self.pain(dam);
            }
        }
        false
    }

    /// Damage from the player or a trap. Returns true on death.
    fn player_attack(&mut self) -> bool {
        let id = self.id;
        let dam = self.dam;
        let Some(hp) = self.state.monsters.get(id).map(|mon| mon.hp) else {
            return true;
        };
        if dam > hp {
            let die_msg = if self.seen { self.die_msg } else { Msg::MoriaDeath };
            self.say(die_msg);
        }

        let died = dam != 0 && self.take_hit(dam);
        if !died {
            if self.seen && self.hurt_msg != Msg::None {
                self.say(self.hurt_msg);
            } else if dam > 0 {
                self.pain(dam);
            }
        }
        died
    }

    fn take_hit(&mut self, dam: i32) -> bool {
        let id = self.id;
        self.state.monsters.wake(id);
        let hp = match self.state.monsters.get_mut(id) {
            Some(mon) => {
                mon.hp -= dam;
                mon.hp
            }
            None => return true,
        };
        if hp >= 0 {
            return false;
        }
        let Some(dead) = self.state.monsters.delete(&mut self.state.cave, id) else {
            return true;
        };
        if let Some(race) = self.state.monsters.race(dead.race) {
            let lev = self.state.player.lev.max(1);
            let gain = race.mexp * race.level / lev;
            self.state.player.exp_gain(gain);
            tracing::debug!(race = %race.name, gain, "monster killed");
        }
        true
    }

    fn apply_side_effects(&mut self) {
        if self.do_poly != 0 {
            self.polymorph();
        } else if self.teleport > 0 {
            let dice = self.teleport.to_string();
            let effect = SimpleEffect::new(EffectKind::Teleport, &dice)
                .with_target(self.grid.y, self.grid.x);
            let mut ident = false;
            if let Err(err) = execute_simple(self.env, self.state, self.origin, effect, &mut ident) {
                tracing::warn!(%err, "monster teleport failed");
            }
            self.state.monsters.wake(self.id);
        } else {
            for kind in MonTimed::iter() {
                let amount = self.timed[kind as usize];
                if amount <= 0 {
                    continue;
                }
                let took = self.state.monsters.inc_timed(self.id, kind, amount);
                if took && kind == MonTimed::Sleep && self.seen {
                    self.say(Msg::FallAsleep);
                }
                self.obvious = true;
            }
        }
    }

    fn polymorph(&mut self) {
        if self.flags.contains(RaceFlags::UNIQUE) {
            self.say(Msg::Unaffected);
            return;
        }
        if self.seen {
            self.obvious = true;
        }

        let direct = self.kind == ProjectionKind::MonPoly;
        let savelvl = if direct {
            self.state.rng.randint1((self.do_poly - 10).max(1)) + 10
        } else {
            self.state.rng.randint1(90)
        };
        if self.level > savelvl {
            self.say(if direct { Msg::MaintainShape } else { Msg::Unaffected });
            return;
        }

        let Some(old) = self.state.monsters.get(self.id).map(|mon| mon.race) else {
            return;
        };
        match poly_race(self.state, old) {
            Some(new) => {
                self.say(Msg::Change);
                self.state.monsters.delete(&mut self.state.cave, self.id);
                match self.state.monsters.spawn(&mut self.state.cave, new, self.grid) {
                    Some(id) => self.id = id,
                    None => tracing::debug!(grid = %self.grid, "polymorph left no monster"),
                }
            }
            None => self.say(Msg::Unaffected),
        }
    }
}

/// Narrates `msg` about a monster.
fn say(state: &mut GameState, id: MonsterId, msg: Msg) {
    if msg == Msg::None {
        return;
    }
    if msg.is_standalone() {
        state.messages.push(msg.text());
        return;
    }
    let name = state.monsters.describe(id);
    state
        .messages
        .push(capitalise(&format!("{name} {}", msg.text())));
}

/// Picks a new race for a polymorphed monster of race `old`.
///
/// Candidates sit within roughly a quarter of the old race's level (and at
/// least ten levels) either side, are never unique and never the same race.
/// Races that only appear deeper than the current level are excluded.
fn poly_race(state: &mut GameState, old: usize) -> Option<usize> {
    let level = state.monsters.race(old)?.level;
    let min = (level - 10).min(level * 3 / 4);
    let max = (level + 10).max(level * 5 / 4);
    let depth = state.cave.depth;
    let candidates: Vec<usize> = state
        .monsters
        .races()
        .iter()
        .enumerate()
        .filter(|(index, race)| {
            *index != old
                && !race.flags.contains(RaceFlags::UNIQUE)
                && (min..=max).contains(&race.level)
                && !(race.flags.contains(RaceFlags::FORCE_DEPTH) && depth < race.level)
        })
        .map(|(index, _)| index)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let pick = state.rng.randint0(candidates.len() as i32) as usize;
    candidates.get(pick).copied()
}

/// Applies one grid of a projection to the monster standing on it.
pub(crate) fn project_monster(
    env: Env<'_>,
    state: &mut GameState,
    hit: Hit,
    flags: ProjectFlags,
) -> MonsterOutcome {
    let outcome = MonsterOutcome::default();

    // Walls protect monsters.
    if !state.cave.is_passable(hit.grid) {
        return outcome;
    }
    let Some(id) = state.cave.monster_at(hit.grid) else {
        return outcome;
    };
    if hit.origin == Source::Monster(id) {
        return outcome;
    }
    let Some((race_index, flags_of, spells, level)) = state
        .monsters
        .get(id)
        .and_then(|mon| state.monsters.race(mon.race).map(|r| (mon.race, r.flags, r.spells, r.level)))
    else {
        return outcome;
    };

    // Breathers may not blast their own kind.
    if flags.contains(ProjectFlags::SAFE)
        && let Source::Monster(caster) = hit.origin
        && state.monsters.get(caster).is_some_and(|c| c.race == race_index)
    {
        return outcome;
    }

    let seen = state.monster_is_visible(id);
    let mut ctx = MonsterContext {
        env,
        state,
        origin: hit.origin,
        radius: hit.distance,
        grid: hit.grid,
        dam: hit.dam,
        kind: hit.kind,
        id,
        seen,
        flags: flags_of,
        spells,
        level,
        obvious: flags.contains(ProjectFlags::AWARE),
        skipped: false,
        do_poly: 0,
        teleport: 0,
        hurt_msg: Msg::None,
        die_msg: Msg::Die,
        timed: [0; MonTimed::COUNT],
    };

    if flags_of.intersects(RaceFlags::NONLIVING | RaceFlags::UNDEAD) {
        ctx.die_msg = Msg::Destroyed;
    }
    if env.projections().get(hit.kind).force_obvious && seen {
        ctx.obvious = true;
    }

    MonsterRule::for_kind(hit.kind).apply(&mut ctx);

    if ctx.skipped {
        return outcome;
    }
    // A shove into lava may already have finished it off.
    if ctx.state.monsters.get(ctx.id).is_none() {
        return MonsterOutcome {
            obvious: ctx.obvious,
            hit: true,
        };
    }

    let died = match hit.origin {
        Source::Monster(_) => ctx.monster_attack(),
        _ => ctx.player_attack(),
    };
    if !died {
        ctx.apply_side_effects();
    }

    tracing::trace!(
        kind = %hit.kind,
        grid = %hit.grid,
        died,
        obvious = ctx.obvious,
        "monster hit"
    );
    MonsterOutcome {
        obvious: ctx.obvious,
        hit: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::effect::EffectTable;
    use crate::project::{ProjectionTable, distance};
    use crate::state::{Cave, MonsterRace};

    struct Fixture {
        effects: EffectTable,
        projections: ProjectionTable,
        config: EngineConfig,
        state: GameState,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                effects: EffectTable::standard(),
                projections: ProjectionTable::standard(),
                config: EngineConfig::default(),
                state: GameState::new(Cave::new(30, 30), Position::new(2, 2), 17),
            }
        }

        fn spawn(&mut self, race: MonsterRace, grid: Position) -> MonsterId {
            let race = self.state.monsters.add_race(race);
            self.state
                .monsters
                .spawn(&mut self.state.cave, race, grid)
                .expect("free grid")
        }

        fn hit(&mut self, origin: Source, grid: Position, kind: ProjectionKind, dam: i32) -> MonsterOutcome {
            self.hit_with(origin, grid, kind, dam, ProjectFlags::KILL)
        }

        fn hit_with(
            &mut self,
            origin: Source,
            grid: Position,
            kind: ProjectionKind,
            dam: i32,
            flags: ProjectFlags,
        ) -> MonsterOutcome {
            let env = Env::new(&self.effects, &self.projections, &self.config);
            let hit = Hit {
                origin,
                distance: 0,
                grid,
                dam,
                kind,
            };
            project_monster(env, &mut self.state, hit, flags)
        }

        fn hp(&self, id: MonsterId) -> i32 {
            self.state.monsters.get(id).map_or(-1, |mon| mon.hp)
        }
    }

    const AT: Position = Position::new(10, 10);

    #[test]
    fn killing_blow_narrates_and_rewards() {
        let mut fx = Fixture::new();
        let id = fx.spawn(MonsterRace::new("jackal", 3, 30).with_mexp(4), AT);
        let outcome = fx.hit(Source::Player, AT, ProjectionKind::Missile, 50);
        assert!(outcome.hit);
        assert!(fx.state.monsters.get(id).is_none());
        assert_eq!(fx.state.messages.last(), Some("The jackal dies."));
        assert_eq!(fx.state.player.exp, 12);
        assert!(fx.state.cave.monster_at(AT).is_none());
    }

    #[test]
    fn unseen_deaths_are_only_heard() {
        let mut fx = Fixture::new();
        let id = fx.spawn(MonsterRace::new("jackal", 1, 8), AT);
        fx.state.monsters.get_mut(id).unwrap().visible = false;
        fx.hit(Source::Player, AT, ProjectionKind::Missile, 20);
        assert_eq!(fx.state.messages.messages(), ["You hear a scream of agony!"]);
    }

    #[test]
    fn undead_are_destroyed_rather_than_killed() {
        let mut fx = Fixture::new();
        fx.spawn(MonsterRace::new("zombie", 5, 10).with_flags(RaceFlags::UNDEAD), AT);
        fx.hit(Source::Player, AT, ProjectionKind::Mana, 40);
        assert_eq!(fx.state.messages.last(), Some("The zombie is destroyed."));
    }

    #[test]
    fn light_wounds_get_pain_messages() {
        let mut fx = Fixture::new();
        let id = fx.spawn(MonsterRace::new("jackal", 1, 100), AT);
        fx.hit(Source::Player, AT, ProjectionKind::Missile, 1);
        assert_eq!(fx.hp(id), 99);
        assert_eq!(fx.state.messages.last(), Some("The jackal shrugs off the attack."));
    }

    #[test]
    fn fire_hurts_the_vulnerable_and_spares_the_immune() {
        let mut fx = Fixture::new();
        let tree = fx.spawn(
            MonsterRace::new("dead tree", 4, 100).with_flags(RaceFlags::HURT_FIRE),
            AT,
        );
        let salamander = fx.spawn(
            MonsterRace::new("salamander", 4, 100).with_flags(RaceFlags::IM_FIRE),
            Position::new(12, 10),
        );
        fx.hit(Source::Player, AT, ProjectionKind::Fire, 20);
        assert_eq!(fx.hp(tree), 60);
        assert_eq!(fx.state.messages.last(), Some("The dead tree catches fire!"));

        fx.hit(Source::Player, Position::new(12, 10), ProjectionKind::Fire, 20);
        assert_eq!(fx.hp(salamander), 98);
        assert_eq!(fx.state.messages.last(), Some("The salamander resists a lot."));
        let lore = fx.state.monsters.lore(1).unwrap();
        assert!(lore.flags.contains(RaceFlags::IM_FIRE));
    }

    #[test]
    fn water_immunity_zeroes_damage() {
        let mut fx = Fixture::new();
        let id = fx.spawn(
            MonsterRace::new("water spirit", 17, 40).with_flags(RaceFlags::IM_WATER),
            AT,
        );
        fx.hit(Source::Player, AT, ProjectionKind::Water, 35);
        assert_eq!(fx.hp(id), 40);
        assert_eq!(fx.state.messages.last(), Some("The water spirit is immune."));
    }

    #[test]
    fn casters_never_hit_themselves_and_safe_spares_kin() {
        let mut fx = Fixture::new();
        let race = fx.state.monsters.add_race(MonsterRace::new("hound", 10, 25));
        let caster = fx.state.monsters.spawn(&mut fx.state.cave, race, AT).unwrap();
        let kin_grid = Position::new(11, 10);
        let kin = fx.state.monsters.spawn(&mut fx.state.cave, race, kin_grid).unwrap();

        let own = fx.hit(Source::Monster(caster), AT, ProjectionKind::Fire, 10);
        assert!(!own.hit);
        assert_eq!(fx.hp(caster), 25);

        let safe = ProjectFlags::KILL | ProjectFlags::SAFE;
        let spared = fx.hit_with(Source::Monster(caster), kin_grid, ProjectionKind::Fire, 10, safe);
        assert!(!spared.hit);
        assert_eq!(fx.hp(kin), 25);

        fx.hit(Source::Monster(caster), kin_grid, ProjectionKind::Fire, 10);
        assert_eq!(fx.hp(kin), 15);
    }

    #[test]
    fn monsters_cannot_kill_uniques() {
        let mut fx = Fixture::new();
        let breather = fx.spawn(MonsterRace::new("fire hound", 20, 30), Position::new(5, 10));
        let boss = fx.spawn(
            MonsterRace::new("Grip, Farmer Maggot's Dog", 2, 15).with_flags(RaceFlags::UNIQUE),
            AT,
        );
        fx.hit(Source::Monster(breather), AT, ProjectionKind::Fire, 100);
        assert_eq!(fx.hp(boss), 0);

        fx.hit(Source::Player, AT, ProjectionKind::Fire, 1);
        assert!(fx.state.monsters.get(boss).is_none());
        assert_eq!(fx.state.messages.last(), Some("Grip, Farmer Maggot's Dog dies."));
    }

    #[test]
    fn walls_shelter_monsters() {
        let mut fx = Fixture::new();
        let id = fx.spawn(MonsterRace::new("umber hulk", 16, 75), AT);
        fx.state.cave.set_feat(AT, crate::env::TerrainKind::Magma);
        let outcome = fx.hit(Source::Player, AT, ProjectionKind::Missile, 30);
        assert_eq!(outcome, MonsterOutcome::default());
        assert_eq!(fx.hp(id), 75);
    }

    #[test]
    fn turn_undead_ignores_the_living() {
        let mut fx = Fixture::new();
        let orc = fx.spawn(MonsterRace::new("cave orc", 7, 11), AT);
        let outcome = fx.hit(Source::Player, AT, ProjectionKind::TurnUndead, 20);
        assert!(!outcome.hit);
        assert_eq!(fx.state.monsters.get(orc).unwrap().timer(MonTimed::Fear), 0);

        let ghost_grid = Position::new(14, 10);
        let ghost = fx.spawn(
            MonsterRace::new("poltergeist", 3, 8).with_flags(RaceFlags::UNDEAD),
            ghost_grid,
        );
        let outcome = fx.hit(Source::Player, ghost_grid, ProjectionKind::TurnUndead, 20);
        assert!(outcome.hit && outcome.obvious);
        assert_eq!(fx.state.monsters.get(ghost).unwrap().timer(MonTimed::Fear), 20);
        assert_eq!(fx.hp(ghost), 8);
    }

    #[test]
    fn sleep_all_puts_anything_to_sleep() {
        let mut fx = Fixture::new();
        let id = fx.spawn(MonsterRace::new("jackal", 1, 8), AT);
        let outcome = fx.hit(Source::Player, AT, ProjectionKind::SleepAll, 30);
        assert!(outcome.obvious);
        assert_eq!(fx.state.monsters.get(id).unwrap().timer(MonTimed::Sleep), 30);
        assert_eq!(fx.state.messages.last(), Some("The jackal falls asleep!"));
    }

    #[test]
    fn healing_is_capped_at_maximum() {
        let mut fx = Fixture::new();
        let id = fx.spawn(MonsterRace::new("jackal", 1, 20), AT);
        fx.state.monsters.get_mut(id).unwrap().hp = 5;
        fx.hit(Source::Player, AT, ProjectionKind::MonHeal, 10);
        assert_eq!(fx.hp(id), 15);
        fx.hit(Source::Player, AT, ProjectionKind::MonHeal, 10);
        assert_eq!(fx.hp(id), 20);
        assert_eq!(fx.state.messages.last(), Some("The jackal looks healthier."));
    }

    #[test]
    fn drain_life_passes_over_the_nonliving() {
        let mut fx = Fixture::new();
        let id = fx.spawn(
            MonsterRace::new("clay golem", 15, 50).with_flags(RaceFlags::NONLIVING),
            AT,
        );
        let outcome = fx.hit(Source::Player, AT, ProjectionKind::MonDrain, 30);
        assert!(!outcome.obvious);
        assert_eq!(fx.hp(id), 50);
        assert_eq!(fx.state.messages.last(), Some("The clay golem is unaffected!"));
    }

    #[test]
    fn polymorph_swaps_the_race() {
        let mut fx = Fixture::new();
        fx.spawn(MonsterRace::new("jackal", 1, 8), AT);
        fx.state.monsters.add_race(MonsterRace::new("kobold", 2, 12));
        fx.hit(Source::Player, AT, ProjectionKind::MonPoly, 100);
        assert!(fx.state.messages.contains("The jackal changes!"));
        let id = fx.state.cave.monster_at(AT).expect("replacement");
        assert_eq!(fx.state.monsters.race_of(id).unwrap().name, "kobold");
    }

    #[test]
    fn uniques_keep_their_shape() {
        let mut fx = Fixture::new();
        let id = fx.spawn(
            MonsterRace::new("Fang, Farmer Maggot's Dog", 5, 28).with_flags(RaceFlags::UNIQUE),
            AT,
        );
        fx.state.monsters.add_race(MonsterRace::new("kobold", 2, 12));
        fx.hit(Source::Player, AT, ProjectionKind::MonPoly, 100);
        assert_eq!(fx.state.cave.monster_at(AT), Some(id));
        assert_eq!(
            fx.state.messages.last(),
            Some("Fang, Farmer Maggot's Dog is unaffected!")
        );
    }

    #[test]
    fn cloning_heals_hastes_and_spawns() {
        let mut fx = Fixture::new();
        let id = fx.spawn(MonsterRace::new("jackal", 1, 20), AT);
        fx.state.monsters.get_mut(id).unwrap().hp = 3;
        fx.hit(Source::Player, AT, ProjectionKind::MonClone, 0);
        assert_eq!(fx.hp(id), 20);
        assert_eq!(fx.state.monsters.get(id).unwrap().timer(MonTimed::Fast), 50);
        assert_eq!(fx.state.monsters.len(), 2);
        assert_eq!(fx.state.messages.last(), Some("The jackal spawns!"));
    }

    #[test]
    fn status_projections_become_timers() {
        let mut fx = Fixture::new();
        let id = fx.spawn(MonsterRace::new("jackal", 1, 20), AT);
        fx.hit(Source::Player, AT, ProjectionKind::MonSlow, 12);
        fx.hit(Source::Player, AT, ProjectionKind::MonConf, 7);
        let mon = fx.state.monsters.get(id).unwrap();
        assert_eq!(mon.timer(MonTimed::Slow), 12);
        assert_eq!(mon.timer(MonTimed::Conf), 7);
        assert_eq!(mon.hp, 20);
    }

    #[test]
    fn teleport_other_moves_the_monster() {
        let mut fx = Fixture::new();
        let id = fx.spawn(MonsterRace::new("jackal", 1, 20), AT);
        let outcome = fx.hit(Source::Player, AT, ProjectionKind::AwayAll, 8);
        assert!(outcome.hit);
        let grid = fx.state.monsters.get(id).unwrap().grid;
        assert_ne!(grid, AT);
        assert!(distance(AT, grid) <= 8);
        assert!(fx.state.messages.contains("The jackal disappears!"));
    }

    #[test]
    fn nether_spares_undead_and_weakens_on_evil() {
        let mut fx = Fixture::new();
        let wight = fx.spawn(
            MonsterRace::new("grave wight", 30, 60).with_flags(RaceFlags::UNDEAD | RaceFlags::EVIL),
            AT,
        );
        let orc_grid = Position::new(14, 14);
        let orc = fx.spawn(MonsterRace::new("cave orc", 7, 60).with_flags(RaceFlags::EVIL), orc_grid);
        fx.hit(Source::Player, AT, ProjectionKind::Nether, 40);
        assert_eq!(fx.hp(wight), 60);
        assert_eq!(fx.state.messages.last(), Some("The grave wight is immune."));
        fx.hit(Source::Player, orc_grid, ProjectionKind::Nether, 40);
        assert_eq!(fx.hp(orc), 40);
    }

    #[test]
    fn radius_weakens_statuses() {
        let mut fx = Fixture::new();
        fx.spawn(MonsterRace::new("zombie", 5, 10).with_flags(RaceFlags::UNDEAD), AT);
        let env = Env::new(&fx.effects, &fx.projections, &fx.config);
        let hit = Hit {
            origin: Source::Player,
            distance: 2,
            grid: AT,
            dam: 30,
            kind: ProjectionKind::TurnUndead,
        };
        project_monster(env, &mut fx.state, hit, ProjectFlags::KILL);
        let id = fx.state.cave.monster_at(AT).unwrap();
        // (30 + 2) / 3
        assert_eq!(fx.state.monsters.get(id).unwrap().timer(MonTimed::Fear), 10);
    }
}
