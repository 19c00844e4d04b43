//! Projection effects on the player.

use crate::dice::Aspect;
use crate::effect::handlers::teleport_destination;
use crate::effect::{EffectKind, SimpleEffect, execute_simple};
use crate::env::Env;
use crate::state::{
    Direction, Element, GameState, Occupant, PlayerState, PlayerTimed, Position, ProtectFlags,
    RaceFlags, Source, Stat,
};

use super::object::inven_damage;
use super::resist::{Resistance, adjust_dam};
use super::thrust::thrust_away;
use super::{Hit, ProjectFlags, ProjectionKind};

const RESIST_MESSAGE: &str = "You resist the effect!";

struct PlayerContext<'a, 's> {
    env: Env<'a>,
    state: &'s mut GameState,
    origin: Source,
    grid: Position,
    /// Damage before resistance.
    dam: i32,
    power: i32,
    obvious: bool,
}

/// Side effects of a projection type; returns extra damage to deal.
type PlayerHandler = fn(&mut PlayerContext<'_, '_>) -> i32;

impl PlayerContext<'_, '_> {
    fn say(&mut self, msg: &str) {
        self.state.messages.push(msg);
    }

    /// Says the player resisted when they resist `element`.
    fn resisted(&mut self, element: Element) -> bool {
        if self.state.player.resists(element) {
            self.say(RESIST_MESSAGE);
            return true;
        }
        false
    }

    fn inc(&mut self, kind: PlayerTimed, amount: i32, check: bool) -> bool {
        let GameState {
            player, messages, ..
        } = &mut *self.state;
        player.inc_timed(kind, amount, true, check, messages)
    }

    fn stun(&mut self, amount: i32) {
        if self.state.player.has_protection(ProtectFlags::PROT_STUN) {
            self.state.player.learn_protection(ProtectFlags::PROT_STUN);
        } else {
            self.inc(PlayerTimed::Stun, amount, true);
        }
    }

    fn drain_life(&mut self, amount: i32, msg: &str) {
        if self.state.player.has_protection(ProtectFlags::HOLD_LIFE) {
            self.state.player.learn_protection(ProtectFlags::HOLD_LIFE);
        } else {
            self.say(msg);
            self.state.player.exp_lose(amount, false);
        }
    }

    fn drain_stat(&mut self, stat: Stat) {
        if self.state.player.stat_dec(stat) {
            self.say(&format!("You're not as {} as you used to be...", stat.adjective()));
            self.obvious = true;
        }
    }

    fn roll_over(&mut self, threshold: i32) -> bool {
        self.state.rng.randint0(self.dam) > threshold
    }

    fn inven(&mut self, kind: ProjectionKind) {
        inven_damage(self.state, kind, (self.dam * 5).min(300));
    }

    fn teleport_player(&mut self, range: i32) {
        let dice = range.to_string();
        let effect = SimpleEffect::new(EffectKind::Teleport, &dice).with_subtype("1");
        let mut ident = false;
        if let Err(err) = execute_simple(self.env, self.state, self.origin, effect, &mut ident) {
            tracing::warn!(%err, "player teleport failed");
        }
    }
}

fn life_drain(player: &PlayerState, base: i32) -> i32 {
    base + (player.exp / 100) * PlayerState::LIFE_DRAIN_PERCENT
}

fn handler(kind: ProjectionKind) -> Option<PlayerHandler> {
    use ProjectionKind as P;
    let handler: PlayerHandler = match kind {
        P::Acid => |c| element_only(c, Element::Acid, P::Acid),
        P::Elec => |c| element_only(c, Element::Elec, P::Elec),
        P::Fire => fire,
        P::Cold => cold,
        P::Pois => pois,
        P::Light => light,
        P::Dark => dark,
        P::Sound => sound,
        P::Shard => |c| {
            if !c.resisted(Element::Shard) {
                let amount = c.state.rng.randint1(c.dam);
                c.inc(PlayerTimed::Cut, amount, false);
            }
            0
        },
        P::Nexus => nexus,
        P::Nether => nether,
        P::Chaos => chaos,
        P::Disen => |c| {
            c.resisted(Element::Disen);
            0
        },
        P::Water => |c| {
            let conf = 5 + c.state.rng.randint1(5);
            c.inc(PlayerTimed::Confused, conf, true);
            let stun = c.state.rng.randint1(40);
            c.inc(PlayerTimed::Stun, stun, true);
            0
        },
        P::Ice => ice,
        P::Gravity => gravity,
        P::Inertia => |c| {
            let slow = 4 + c.state.rng.randint0(4);
            c.inc(PlayerTimed::Slow, slow, false);
            0
        },
        P::Force => force,
        P::Time => time,
        P::Plasma => |c| {
            let amount = (5 + c.state.rng.randint1(c.dam * 3 / 4)).min(35);
            c.stun(amount);
            0
        },
        P::DarkWeak => |c| {
            if !c.resisted(Element::Dark) {
                let amount = 3 + c.state.rng.randint1(5);
                c.inc(PlayerTimed::Blind, amount, true);
            }
            0
        },
        _ => return None,
    };
    Some(handler)
}

fn element_only(ctx: &mut PlayerContext<'_, '_>, element: Element, kind: ProjectionKind) -> i32 {
    if !ctx.state.player.is_immune(element) {
        ctx.inven(kind);
    }
    0
}

fn fire(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    if ctx.state.player.is_immune(Element::Fire) {
        return 0;
    }
    ctx.inven(ProjectionKind::Fire);
    if ctx.power < 80 {
        return 0;
    }
    if ctx.roll_over(500) {
        ctx.say("The intense heat saps you.");
        ctx.drain_stat(Stat::Str);
    }
    if ctx.roll_over(500) {
        let amount = ctx.state.rng.randint1(ctx.dam / 100);
        if ctx.inc(PlayerTimed::Blind, amount, true) {
            ctx.say("Your eyes fill with smoke!");
        }
    }
    if ctx.roll_over(500) {
        let amount = ctx.state.rng.randint1(ctx.dam / 10);
        if ctx.inc(PlayerTimed::Poisoned, amount, true) {
            ctx.say("You are assailed by poisonous fumes!");
        }
    }
    0
}

fn cold(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    if ctx.state.player.is_immune(Element::Cold) {
        return 0;
    }
    ctx.inven(ProjectionKind::Cold);
    if ctx.power < 80 {
        return 0;
    }
    if ctx.roll_over(500) {
        ctx.say("The cold seeps into your bones.");
        ctx.drain_stat(Stat::Dex);
    }
    if ctx.roll_over(500) {
        let drain = ctx.dam;
        ctx.drain_life(drain, "The cold withers your life force!");
    }
    0
}

fn pois(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    let amount = 10 + ctx.state.rng.randint1(ctx.dam);
    if !ctx.inc(PlayerTimed::Poisoned, amount, true) {
        ctx.say(RESIST_MESSAGE);
    }

    let mut xtra = 0;
    if ctx.power < 60 {
        return xtra;
    }
    if ctx.roll_over(200) && !ctx.state.player.is_immune(Element::Acid) {
        let dam = ctx.dam / 5;
        ctx.say("The venom stings your skin!");
        inven_damage(ctx.state, ProjectionKind::Acid, dam);
        xtra += adjust_dam(
            ctx.state,
            ctx.env.projections(),
            ProjectionKind::Acid,
            dam,
            Aspect::Randomise,
            Resistance::Player { learn: true },
        );
    }
    if ctx.roll_over(200) {
        ctx.say("The stench sickens you.");
        ctx.drain_stat(Stat::Con);
    }
    xtra
}

fn light(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    if ctx.resisted(Element::Light) {
        return 0;
    }
    let blind = 2 + ctx.state.rng.randint1(5);
    ctx.inc(PlayerTimed::Blind, blind, true);
    if ctx.dam > 300 {
        ctx.say("You are dazzled!");
        let conf = 2 + ctx.state.rng.randint1(ctx.dam / 100);
        ctx.inc(PlayerTimed::Confused, conf, true);
    }
    0
}

fn dark(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    if ctx.resisted(Element::Dark) {
        return 0;
    }
    let blind = 2 + ctx.state.rng.randint1(5);
    ctx.inc(PlayerTimed::Blind, blind, true);
    if ctx.power < 70 {
        return 0;
    }
    if ctx.roll_over(100) {
        let drain = ctx.dam;
        ctx.drain_life(drain, "The darkness steals your life force!");
    }
    if ctx.roll_over(200) {
        ctx.say("You feel unsure of yourself in the darkness.");
        let amount = ctx.dam / 100;
        ctx.inc(PlayerTimed::Slow, amount, false);
    }
    if ctx.roll_over(300) {
        ctx.say("Darkness penetrates your mind!");
        let amount = ctx.dam / 100;
        ctx.inc(PlayerTimed::Amnesia, amount, false);
    }
    0
}

fn sound(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    if ctx.resisted(Element::Sound) {
        return 0;
    }
    let amount = (5 + ctx.state.rng.randint1(ctx.dam / 3)).min(35);
    ctx.stun(amount);
    if ctx.dam > 300 {
        ctx.say("The noise disorients you.");
        let conf = 2 + ctx.state.rng.randint1(ctx.dam / 100);
        ctx.inc(PlayerTimed::Confused, conf, true);
    }
    0
}

fn nexus(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    if ctx.resisted(Element::Nexus) {
        return 0;
    }
    let save = ctx.state.player.skill_save;
    if ctx.state.rng.randint0(100) < save {
        ctx.say("You avoid the effect!");
    } else {
        let amount = ctx.state.rng.randint0(20) + 20;
        ctx.inc(PlayerTimed::Scrambled, amount, true);
    }

    let caster = match ctx.origin {
        Source::Monster(id) => ctx.state.monsters.get(id).map(|mon| mon.grid),
        _ => None,
    };
    if let Some(centre) = caster
        && ctx.state.rng.one_in(3)
    {
        // Pulled to the caster's side.
        if let Some(grid) = teleport_destination(ctx.state, centre, 2) {
            ctx.state.move_player(grid);
        }
    } else if ctx.state.rng.one_in(4) {
        if ctx.state.rng.randint0(100) < save {
            ctx.say("You avoid the effect!");
            return 0;
        }
        ctx.say("You sink through the floor.");
        ctx.state.player.leaving = true;
    } else {
        ctx.teleport_player(200);
    }
    0
}

fn nether(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    if ctx.state.player.resists(Element::Nether)
        || ctx.state.player.has_protection(ProtectFlags::HOLD_LIFE)
    {
        ctx.say(RESIST_MESSAGE);
        ctx.state.player.learn_protection(ProtectFlags::HOLD_LIFE);
        return 0;
    }
    let drain = life_drain(&ctx.state.player, 200);
    ctx.say("You feel your life force draining away!");
    ctx.state.player.exp_lose(drain, false);

    if ctx.power < 80 {
        return 0;
    }
    if ctx.roll_over(100) && ctx.state.player.msp > 0 {
        ctx.say("Your mind is dulled.");
        let loss = ctx.state.player.csp.min(ctx.dam / 10);
        ctx.state.player.csp -= loss;
    }
    if ctx.roll_over(200) {
        ctx.say("Your energy is sapped!");
        ctx.state.player.energy = 0;
    }
    0
}

fn chaos(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    if ctx.resisted(Element::Chaos) {
        return 0;
    }
    let image = ctx.state.rng.randint1(10);
    ctx.inc(PlayerTimed::Image, image, false);
    let conf = 10 + ctx.state.rng.randint0(20);
    ctx.inc(PlayerTimed::Confused, conf, true);
    let drain = life_drain(&ctx.state.player, 5000);
    ctx.drain_life(drain, "You feel your life force draining away!");
    0
}

fn ice(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    if !ctx.state.player.is_immune(Element::Cold) {
        ctx.inven(ProjectionKind::Cold);
    }
    if !ctx.resisted(Element::Shard) {
        let cut = ctx.state.rng.damroll(5, 8);
        ctx.inc(PlayerTimed::Cut, cut, false);
    }
    let stun = ctx.state.rng.randint1(15);
    ctx.inc(PlayerTimed::Stun, stun, true);
    0
}

fn gravity(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    ctx.say("Gravity warps around you.");
    if ctx.state.rng.randint1(127) > ctx.state.player.lev {
        ctx.teleport_player(5);
    }
    let slow = 4 + ctx.state.rng.randint0(4);
    ctx.inc(PlayerTimed::Slow, slow, false);
    let amount = (5 + ctx.state.rng.randint1(ctx.dam / 3)).min(35);
    ctx.stun(amount);
    0
}

fn force(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    let mut centre = ctx.state.source_grid(ctx.origin).unwrap_or(ctx.grid);
    // Standing on the trap itself: pushed in a random direction.
    if matches!(ctx.origin, Source::Trap(_)) && centre == ctx.state.player.grid {
        let d = ctx.state.rng.randint0(8) as usize;
        centre = centre.step(Direction::DDD[d]);
    }
    let stun = ctx.state.rng.randint1(20);
    ctx.inc(PlayerTimed::Stun, stun, true);
    let grids = 3 + ctx.dam / 20;
    thrust_away(ctx.state, centre, ctx.grid, grids);
    0
}

fn time(ctx: &mut PlayerContext<'_, '_>) -> i32 {
    if ctx.state.rng.one_in(2) {
        let drain = life_drain(&ctx.state.player, 100);
        ctx.say("You feel your life force draining away!");
        ctx.state.player.exp_lose(drain, false);
    } else if !ctx.state.rng.one_in(5) {
        for _ in 0..2 {
            let stat = match ctx.state.rng.randint0(5) {
                0 => Stat::Str,
                1 => Stat::Int,
                2 => Stat::Wis,
                3 => Stat::Dex,
                _ => Stat::Con,
            };
            ctx.say(&format!("You're not as {} as you used to be...", stat.adjective()));
            ctx.state.player.stat_dec(stat);
        }
    } else {
        ctx.say("You're not as powerful as you used to be...");
        for stat in [Stat::Str, Stat::Int, Stat::Wis, Stat::Dex, Stat::Con] {
            ctx.state.player.stat_dec(stat);
        }
    }
    0
}

/// Name the player's death is blamed on.
pub(crate) fn killer(state: &GameState, origin: Source) -> String {
    match origin {
        Source::Monster(id) => match state.monsters.race_of(id) {
            Some(race) if race.flags.contains(RaceFlags::UNIQUE) => race.name.clone(),
            Some(race) => format!("a {}", race.name),
            None => "a monster".to_string(),
        },
        Source::Trap(grid) => match state.cave.trap(grid) {
            Some(trap) => format!("a {}", trap.name),
            None => "a trap".to_string(),
        },
        Source::Object(id) | Source::ChestTrap(id) => state
            .objects
            .get(id)
            .map_or_else(|| "an object".to_string(), |obj| obj.prefixed_name()),
        Source::Player => "yourself".to_string(),
        Source::None => "something".to_string(),
    }
}

/// Applies one grid of a projection to the player standing on it.
///
/// A player-cast projection only touches the player with `SELF`. Returns
/// true when the player noticed the hit, which is always the case once it
/// lands.
pub(crate) fn project_player(
    env: Env<'_>,
    state: &mut GameState,
    hit: Hit,
    flags: ProjectFlags,
    power: i32,
) -> bool {
    if state.cave.occupant(hit.grid) != Occupant::Player {
        return false;
    }
    if hit.origin == Source::Player && !flags.contains(ProjectFlags::SELF) {
        return false;
    }

    let caster_hidden = match hit.origin {
        Source::Monster(id) => !state.monster_is_visible(id),
        _ => false,
    };
    let seen = !state.player.is_blind() && !caster_hidden;
    if !seen && !flags.contains(ProjectFlags::QUIET) {
        let desc = env.projections().blind_desc(hit.kind);
        state.messages.push(format!("You are hit by {desc}!"));
    }

    let killer = killer(state, hit.origin);
    let dam = adjust_dam(
        state,
        env.projections(),
        hit.kind,
        hit.dam,
        Aspect::Randomise,
        Resistance::Player { learn: true },
    );
    if dam > 0 {
        state.player.take_hit(dam, &killer, &mut state.messages);
    }
    tracing::debug!(kind = %hit.kind, raw = hit.dam, dam, "player hit");

    let mut obvious = true;
    if !state.player.is_dead
        && let Some(handler) = handler(hit.kind)
    {
        let mut ctx = PlayerContext {
            env,
            state: &mut *state,
            origin: hit.origin,
            grid: hit.grid,
            dam: hit.dam,
            power,
            obvious: true,
        };
        let xtra = handler(&mut ctx);
        obvious = ctx.obvious;
        if xtra > 0 {
            state.player.take_hit(xtra, &killer, &mut state.messages);
        }
    }
    obvious
}
