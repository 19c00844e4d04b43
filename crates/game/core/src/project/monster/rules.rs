//! Per-type rules for how a projection treats the monster it hits.
//!
//! Most types are one of a handful of shapes (an elemental immunity, a
//! breath resistance, a flag-gated teleport or scare) and are written as
//! data. The rest get a small function of their own.

use crate::project::{ProjectionKind, thrust_away};
use crate::state::{MonTimed, MonsterMessage as Msg, RaceFlags, SpellFlags};

use super::MonsterContext;

type Custom = fn(&mut MonsterContext<'_, '_>);

#[derive(Clone, Copy)]
pub(super) enum MonsterRule {
    /// Damage goes through untouched.
    Plain,
    /// The projection does nothing to monsters.
    Skip,
    ResistElement {
        flag: RaceFlags,
        factor: i32,
    },
    ResistOther {
        flag: RaceFlags,
        factor: i32,
        reduce: bool,
        msg: Msg,
    },
    HurtImmune {
        hurt: RaceFlags,
        immune: RaceFlags,
        hurt_factor: i32,
        immune_factor: i32,
        hurt_msg: Msg,
        die_msg: Msg,
    },
    HurtOnly {
        flag: RaceFlags,
        hurt_msg: Msg,
        die_msg: Msg,
    },
    Breath {
        spell: SpellFlags,
        factor: i32,
    },
    TeleportAway(RaceFlags),
    Scare(RaceFlags),
    Dispel(RaceFlags),
    /// Empty flags put any monster to sleep.
    Sleep(RaceFlags),
    /// The damage becomes the duration of a status.
    Timer(MonTimed),
    Custom(Custom),
}

impl MonsterRule {
    pub(super) fn for_kind(kind: ProjectionKind) -> Self {
        use MonsterRule as R;
        use ProjectionKind as P;
        match kind {
            P::Acid => R::ResistElement {
                flag: RaceFlags::IM_ACID,
                factor: 9,
            },
            P::Elec => R::ResistElement {
                flag: RaceFlags::IM_ELEC,
                factor: 9,
            },
            P::Pois => R::ResistElement {
                flag: RaceFlags::IM_POIS,
                factor: 9,
            },
            P::Fire => R::HurtImmune {
                hurt: RaceFlags::HURT_FIRE,
                immune: RaceFlags::IM_FIRE,
                hurt_factor: 2,
                immune_factor: 9,
                hurt_msg: Msg::CatchFire,
                die_msg: Msg::Disintegrates,
            },
            P::Cold => R::HurtImmune {
                hurt: RaceFlags::HURT_COLD,
                immune: RaceFlags::IM_COLD,
                hurt_factor: 2,
                immune_factor: 9,
                hurt_msg: Msg::BadlyFrozen,
                die_msg: Msg::FreezeShatter,
            },
            P::Light => R::Custom(light),
            P::Dark => R::Breath {
                spell: SpellFlags::BR_DARK,
                factor: 2,
            },
            P::Sound => R::Custom(sound),
            P::Shard => R::Breath {
                spell: SpellFlags::BR_SHAR,
                factor: 3,
            },
            P::Nexus => R::Custom(nexus),
            P::Nether => R::Custom(nether),
            P::Chaos => R::Custom(chaos),
            P::Disen => R::Custom(disen),
            P::Water => R::ResistOther {
                flag: RaceFlags::IM_WATER,
                factor: 0,
                reduce: false,
                msg: Msg::Immune,
            },
            P::Ice => R::Custom(ice),
            P::Gravity => R::Custom(gravity),
            P::Inertia => R::Breath {
                spell: SpellFlags::BR_INER,
                factor: 3,
            },
            P::Force => R::Custom(force),
            P::Time => R::Breath {
                spell: SpellFlags::BR_TIME,
                factor: 3,
            },
            P::Plasma => R::ResistOther {
                flag: RaceFlags::IM_PLASMA,
                factor: 3,
                reduce: true,
                msg: Msg::Resist,
            },
            P::Meteor | P::Missile | P::Mana | P::Arrow => R::Plain,
            P::HolyOrb => R::ResistOther {
                flag: RaceFlags::EVIL,
                factor: 2,
                reduce: false,
                msg: Msg::HitHard,
            },

            P::LightWeak => R::HurtOnly {
                flag: RaceFlags::HURT_LIGHT,
                hurt_msg: Msg::CringeLight,
                die_msg: Msg::ShrivelLight,
            },
            P::KillWall => R::HurtOnly {
                flag: RaceFlags::HURT_ROCK,
                hurt_msg: Msg::LoseSkin,
                die_msg: Msg::Dissolve,
            },
            P::DarkWeak | P::KillDoor | P::KillTrap | P::MakeDoor | P::MakeTrap => R::Skip,

            P::AwayUndead => R::TeleportAway(RaceFlags::UNDEAD),
            P::AwayEvil => R::TeleportAway(RaceFlags::EVIL),
            P::AwayAll => R::Custom(away_all),
            P::TurnUndead => R::Scare(RaceFlags::UNDEAD),
            P::TurnEvil => R::Scare(RaceFlags::EVIL),
            P::TurnAll => R::Timer(MonTimed::Fear),
            P::DispUndead => R::Dispel(RaceFlags::UNDEAD),
            P::DispEvil => R::Dispel(RaceFlags::EVIL),
            P::DispAll => R::Custom(dispel_all),
            P::SleepUndead => R::Sleep(RaceFlags::UNDEAD),
            P::SleepEvil => R::Sleep(RaceFlags::EVIL),
            P::SleepAll => R::Sleep(RaceFlags::empty()),
            P::MonClone => R::Custom(clone),
            P::MonPoly => R::Custom(polymorph),
            P::MonHeal => R::Custom(heal),
            P::MonSpeed => R::Timer(MonTimed::Fast),
            P::MonSlow => R::Timer(MonTimed::Slow),
            P::MonConf => R::Timer(MonTimed::Conf),
            P::MonHold => R::Timer(MonTimed::Hold),
            P::MonStun => R::Timer(MonTimed::Stun),
            P::MonDrain => R::Custom(drain),
        }
    }

    pub(super) fn apply(self, ctx: &mut MonsterContext<'_, '_>) {
        match self {
            MonsterRule::Plain => {}
            MonsterRule::Skip => {
                ctx.skipped = true;
                ctx.dam = 0;
            }
            MonsterRule::ResistElement { flag, factor } => ctx.resist_element(flag, factor),
            MonsterRule::ResistOther {
                flag,
                factor,
                reduce,
                msg,
            } => ctx.resist_other(flag, factor, reduce, msg),
            MonsterRule::HurtImmune {
                hurt,
                immune,
                hurt_factor,
                immune_factor,
                hurt_msg,
                die_msg,
            } => ctx.hurt_immune(hurt, immune, hurt_factor, immune_factor, hurt_msg, die_msg),
            MonsterRule::HurtOnly {
                flag,
                hurt_msg,
                die_msg,
            } => ctx.hurt_only(flag, hurt_msg, die_msg),
            MonsterRule::Breath { spell, factor } => ctx.breath(spell, factor),
            MonsterRule::TeleportAway(flag) => ctx.teleport_away(flag),
            MonsterRule::Scare(flag) => ctx.scare(flag),
            MonsterRule::Dispel(flag) => ctx.dispel(flag),
            MonsterRule::Sleep(flag) => ctx.sleep(flag),
            MonsterRule::Timer(kind) => {
                ctx.timed[kind as usize] = ctx.dam;
                ctx.dam = 0;
            }
            MonsterRule::Custom(handler) => handler(ctx),
        }
    }
}

// ===== elements =====

fn light(ctx: &mut MonsterContext<'_, '_>) {
    ctx.learn(RaceFlags::HURT_LIGHT);
    if ctx.spells.contains(SpellFlags::BR_LIGHT) {
        ctx.breath(SpellFlags::BR_LIGHT, 2);
    } else if ctx.flags.contains(RaceFlags::HURT_LIGHT) {
        ctx.hurt_msg = Msg::CringeLight;
        ctx.die_msg = Msg::ShrivelLight;
        ctx.dam *= 2;
    }
}

fn sound(ctx: &mut MonsterContext<'_, '_>) {
    ctx.maybe_stun();
    ctx.breath(SpellFlags::BR_SOUN, 2);
}

fn nexus(ctx: &mut MonsterContext<'_, '_>) {
    ctx.resist_other(RaceFlags::IM_NEXUS, 3, true, Msg::Resist);
    if ctx.flags.contains(RaceFlags::IM_NEXUS) {
        return;
    }
    if ctx.state.rng.one_in(3) {
        ctx.teleport = 10;
    } else if ctx.state.rng.one_in(4) {
        ctx.teleport = 50;
    }
}

fn nether(ctx: &mut MonsterContext<'_, '_>) {
    ctx.learn(RaceFlags::UNDEAD | RaceFlags::IM_NETHER);
    if !ctx.flags.contains(RaceFlags::UNDEAD) {
        ctx.learn(RaceFlags::EVIL);
    }

    if ctx.flags.contains(RaceFlags::UNDEAD) {
        ctx.hurt_msg = Msg::Immune;
        ctx.dam = 0;
    } else if ctx.flags.contains(RaceFlags::IM_NETHER) {
        ctx.hurt_msg = Msg::Resist;
        ctx.dam *= 3;
        ctx.dam /= ctx.state.rng.randint1(6) + 6;
    } else if ctx.flags.contains(RaceFlags::EVIL) {
        ctx.dam /= 2;
        ctx.hurt_msg = Msg::ResistSomewhat;
    }
}

fn chaos(ctx: &mut MonsterContext<'_, '_>) {
    ctx.do_poly = i32::from(!ctx.spells.contains(SpellFlags::BR_CHAO));
    let amount = 10 + ctx.state.rng.randint1(10);
    ctx.timed[MonTimed::Conf as usize] = ctx.adjust_radius(amount);
    ctx.breath(SpellFlags::BR_CHAO, 3);
    // Breathers resist silently.
    ctx.hurt_msg = Msg::None;
}

fn disen(ctx: &mut MonsterContext<'_, '_>) {
    ctx.resist_other(RaceFlags::IM_DISEN, 3, true, Msg::Resist);
    let breaths = SpellFlags::BR_LIGHT
        | SpellFlags::BR_DARK
        | SpellFlags::BR_SOUN
        | SpellFlags::BR_SHAR
        | SpellFlags::BR_CHAO
        | SpellFlags::BR_GRAV
        | SpellFlags::BR_INER
        | SpellFlags::BR_WALL
        | SpellFlags::BR_TIME;
    if !ctx.flags.contains(RaceFlags::IM_DISEN) && !ctx.spells.difference(breaths).is_empty() {
        let amount = 5 + ctx.state.rng.randint1(10);
        ctx.timed[MonTimed::Disen as usize] = ctx.adjust_radius(amount);
    }
}

fn ice(ctx: &mut MonsterContext<'_, '_>) {
    ctx.maybe_stun();
    ctx.hurt_immune(
        RaceFlags::HURT_COLD,
        RaceFlags::IM_COLD,
        2,
        9,
        Msg::BadlyFrozen,
        Msg::FreezeShatter,
    );
}

fn gravity(ctx: &mut MonsterContext<'_, '_>) {
    // Higher level monsters shrug off the displacement more often.
    if ctx.state.rng.randint1(127) > ctx.level {
        ctx.teleport = 10;
    }
    if ctx.spells.contains(SpellFlags::BR_GRAV) {
        ctx.teleport = 0;
    }
    ctx.breath(SpellFlags::BR_GRAV, 3);
}

fn force(ctx: &mut MonsterContext<'_, '_>) {
    ctx.maybe_stun();
    ctx.breath(SpellFlags::BR_WALL, 3);
    if ctx.spells.contains(SpellFlags::BR_WALL) {
        return;
    }
    let centre = ctx.state.source_grid(ctx.origin).unwrap_or(ctx.state.player.grid);
    let grids = 3 + ctx.dam / 20;
    thrust_away(ctx.state, centre, ctx.grid, grids);
    if let Some(mon) = ctx.state.monsters.get(ctx.id) {
        ctx.grid = mon.grid;
    }
}

// ===== monster-only types =====

fn away_all(ctx: &mut MonsterContext<'_, '_>) {
    ctx.teleport = ctx.dam;
    ctx.dam = 0;
    ctx.hurt_msg = Msg::Disappear;
}

fn dispel_all(ctx: &mut MonsterContext<'_, '_>) {
    ctx.hurt_msg = Msg::Shudder;
    ctx.die_msg = Msg::Dissolve;
}

fn clone(ctx: &mut MonsterContext<'_, '_>) {
    let id = ctx.id;
    if let Some(mon) = ctx.state.monsters.get_mut(id) {
        mon.hp = mon.maxhp;
    }
    ctx.state.monsters.inc_timed(id, MonTimed::Fast, 50);
    if ctx.multiply() {
        ctx.hurt_msg = Msg::Spawn;
    }
    ctx.dam = 0;
}

fn polymorph(ctx: &mut MonsterContext<'_, '_>) {
    ctx.do_poly = ctx.dam;
    ctx.dam = 0;
}

fn heal(ctx: &mut MonsterContext<'_, '_>) {
    let id = ctx.id;
    ctx.state.monsters.wake(id);
    if let Some(mon) = ctx.state.monsters.get_mut(id) {
        mon.hp = (mon.hp + ctx.dam).min(mon.maxhp);
    }
    ctx.hurt_msg = Msg::Healthier;
    ctx.dam = 0;
}

fn drain(ctx: &mut MonsterContext<'_, '_>) {
    if ctx.seen {
        ctx.obvious = true;
    }
    ctx.learn(RaceFlags::UNDEAD);
    if ctx.flags.intersects(RaceFlags::NONLIVING | RaceFlags::UNDEAD) {
        ctx.hurt_msg = Msg::Unaffected;
        ctx.obvious = false;
        ctx.dam = 0;
    }
}
