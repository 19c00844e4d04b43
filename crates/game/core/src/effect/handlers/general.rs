//! Handlers for chain control, the player's body, monster upkeep and movement.

use crate::config::EngineConfig;
use crate::env::MapOracle;
use crate::project::{ProjectFlags, capitalise, distance, killer, project_path, thrust_away};
use crate::state::{GameState, MonTimed, Occupant, PlayerTimed, Position, Source};

use super::EffectContext;

// ============================================================================
// Control
// ============================================================================

/// `RANDOM` and `SELECT` do nothing themselves; the engine makes the choice.
pub(super) fn choice(_ctx: &mut EffectContext<'_, '_>) -> bool {
    true
}

/// Fixes the value every later node in this chain rolls.
pub(super) fn set_value(ctx: &mut EffectContext<'_, '_>) -> bool {
    ctx.forced = None;
    let value = ctx.calculate_value(false);
    ctx.forced = Some(value);
    true
}

pub(super) fn clear_value(ctx: &mut EffectContext<'_, '_>) -> bool {
    ctx.forced = None;
    true
}

// ============================================================================
// Player
// ============================================================================

/// Hurts the player, blaming the source.
pub(super) fn damage(ctx: &mut EffectContext<'_, '_>) -> bool {
    let dam = ctx.calculate_value(false);
    ctx.ident = true;

    let blame = match (ctx.source, ctx.msg.as_deref()) {
        (Source::Player, Some(msg)) => msg.to_string(),
        (Source::None, _) => "a bug".to_string(),
        (source, _) => killer(ctx.state, source),
    };
    let GameState {
        player, messages, ..
    } = &mut *ctx.state;
    player.take_hit(dam, &blame, messages);
    true
}

/// Heals a percentage of the player's wounds, or a minimum, whichever is more.
///
/// The dice base is the minimum and the bonus the percentage.
pub(super) fn heal_hp(ctx: &mut EffectContext<'_, '_>) -> bool {
    let value = ctx.value;
    if value.m_bonus <= 0 && value.base <= 0 {
        return true;
    }
    ctx.ident = true;

    let player = &mut ctx.state.player;
    if player.hp >= player.mhp {
        return true;
    }
    let num = ((player.mhp - player.hp) * value.m_bonus / 100).max(value.base);
    player.restore_hp(num);

    let message = if num < 5 {
        "You feel a little better."
    } else if num < 15 {
        "You feel better."
    } else if num < 35 {
        "You feel much better."
    } else {
        "You feel very good."
    };
    ctx.state.messages.push(message);
    true
}

/// Feeds or starves the player according to the nourish mode.
pub(super) fn nourish(ctx: &mut EffectContext<'_, '_>) -> bool {
    let amount = ctx.calculate_value(false) * ctx.env.config().food_value;
    let GameState {
        player, messages, ..
    } = &mut *ctx.state;
    let food = player.timer(PlayerTimed::Food);

    match ctx.subtype.value() {
        // INC_BY
        0 => {
            player.inc_timed(PlayerTimed::Food, amount.max(0), false, false, messages);
        }
        // DEC_BY
        1 => {
            player.dec_timed(PlayerTimed::Food, amount.max(0), false, messages);
        }
        // SET_TO
        2 => {
            if food > amount {
                messages.push("You vomit!");
            }
            player.set_timed(PlayerTimed::Food, amount.max(0), false, messages);
        }
        // INC_TO
        3 => {
            if food < amount {
                player.set_timed(PlayerTimed::Food, (amount + 1).max(0), false, messages);
            }
        }
        mode => {
            tracing::warn!(mode, "unknown nourish mode");
            return false;
        }
    }
    ctx.ident = true;
    true
}

pub(super) fn cure(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.timed() else {
        return false;
    };
    let GameState {
        player, messages, ..
    } = &mut *ctx.state;
    player.clear_timed(kind, true, messages);
    ctx.ident = true;
    true
}

pub(super) fn timed_set(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.timed() else {
        return false;
    };
    let amount = ctx.calculate_value(false);
    let GameState {
        player, messages, ..
    } = &mut *ctx.state;
    player.set_timed(kind, amount.max(0), true, messages);
    ctx.ident = true;
    true
}

/// Extends a timer by the rolled amount, or by `other` when the player
/// already suffers from it and `other` is set.
fn extend_timed(ctx: &mut EffectContext<'_, '_>, check: bool) -> bool {
    let Some(kind) = ctx.subtype.timed() else {
        return false;
    };
    let amount = ctx.calculate_value(false);
    let other = ctx.other;
    let GameState {
        player, messages, ..
    } = &mut *ctx.state;
    let amount = if player.timer(kind) == 0 || other == 0 {
        amount.max(0)
    } else {
        other
    };
    player.inc_timed(kind, amount, true, check, messages);
    ctx.ident = true;
    true
}

pub(super) fn timed_inc(ctx: &mut EffectContext<'_, '_>) -> bool {
    extend_timed(ctx, true)
}

pub(super) fn timed_inc_no_res(ctx: &mut EffectContext<'_, '_>) -> bool {
    extend_timed(ctx, false)
}

/// Shortens a timer; with `other` set, by that fraction of what is left.
pub(super) fn timed_dec(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.timed() else {
        return false;
    };
    let mut amount = ctx.calculate_value(false);
    if ctx.other != 0 {
        amount = ctx.state.player.timer(kind) / ctx.other;
    }
    let GameState {
        player, messages, ..
    } = &mut *ctx.state;
    player.dec_timed(kind, amount.max(0), true, messages);
    ctx.ident = true;
    true
}

// ============================================================================
// Monsters
// ============================================================================

/// A monster heals itself and shakes off its fear.
pub(super) fn mon_heal_hp(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(id) = ctx.source.monster() else {
        return true;
    };
    let amount = ctx.calculate_value(false);
    let seen = !ctx.state.player.is_blind() && ctx.state.monster_is_visible(id);
    let name = capitalise(&ctx.state.monsters.describe(id));
    let Some(mon) = ctx.state.monsters.get_mut(id) else {
        return true;
    };

    mon.hp += amount;
    let verb = if seen { "looks" } else { "sounds" };
    let message = if mon.hp >= mon.maxhp {
        mon.hp = mon.maxhp;
        format!("{name} {verb} REALLY healthy!")
    } else {
        format!("{name} {verb} healthier.")
    };
    let afraid = mon.timer(MonTimed::Fear) > 0;

    ctx.state.messages.push(message);
    if afraid {
        ctx.state.monsters.clear_timed(id, MonTimed::Fear);
        ctx.state.messages.push(format!("{name} recovers its courage."));
    }
    ctx.ident = true;
    true
}

pub(super) fn mon_timed_inc(ctx: &mut EffectContext<'_, '_>) -> bool {
    let (Some(id), Some(kind)) = (ctx.source.monster(), ctx.subtype.mon_timed()) else {
        return true;
    };
    let amount = ctx.calculate_value(false);
    if ctx.state.monsters.get(id).is_some() {
        ctx.state.monsters.inc_timed(id, kind, amount.max(0));
        ctx.ident = true;
    }
    true
}

// ============================================================================
// Movement
// ============================================================================

/// Picks a random empty floor grid for a teleport of up to `dis` grids.
///
/// Grids in the outer half of the range are preferred; nearer ones are used
/// only when the outer band has no room.
pub(crate) fn teleport_destination(
    state: &mut GameState,
    from: Position,
    dis: i32,
) -> Option<Position> {
    let dis = dis.max(1);
    let (width, height) = (state.cave.width() as i32, state.cave.height() as i32);
    let mut far = Vec::new();
    let mut near = Vec::new();

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let grid = Position::new(x, y);
            let d = distance(from, grid);
            if d == 0 || d > dis || !state.cave.is_empty(grid) {
                continue;
            }
            if d * 2 >= dis {
                far.push(grid);
            } else {
                near.push(grid);
            }
        }
    }

    let spots = if far.is_empty() { near } else { far };
    if spots.is_empty() {
        return None;
    }
    let pick = state.rng.randint0(spots.len() as i32) as usize;
    spots.get(pick).copied()
}

/// Teleports whoever the effect is about.
///
/// An explicit grid names the creature to move. Otherwise a set subtype, or
/// any source other than a monster, moves the player; a monster source
/// moves itself. A dice bonus turns the range into a percentage of the
/// distance to the far edge of the level.
pub(super) fn teleport(ctx: &mut EffectContext<'_, '_>) -> bool {
    ctx.ident = true;
    let perc = ctx.value.m_bonus;
    let mut dis = ctx.calculate_value(false);

    let start = match (ctx.explicit_grid(), ctx.source.monster()) {
        (Some(grid), _) => grid,
        (None, Some(id)) if !ctx.subtype.is_set() => match ctx.state.monsters.get(id) {
            Some(mon) => mon.grid,
            None => return true,
        },
        _ => ctx.state.player.grid,
    };

    if perc != 0 {
        let (width, height) = (ctx.state.cave.width() as i32, ctx.state.cave.height() as i32);
        let vertical = start.y.max(height - start.y);
        let horizontal = start.x.max(width - start.x);
        dis = vertical.max(horizontal) * perc / 100;
    }

    let occupant = ctx.state.cave.occupant(start);
    if occupant == Occupant::None {
        tracing::debug!(%start, "nobody to teleport");
        return true;
    }

    let Some(dest) = teleport_destination(ctx.state, start, dis) else {
        if occupant == Occupant::Player {
            ctx.state.messages.push("Failed to find teleport destination!");
        } else {
            tracing::debug!(%start, dis, "no teleport destination for monster");
        }
        return true;
    };

    match occupant {
        Occupant::Player => {
            ctx.state.move_player(dest);
        }
        Occupant::Monster(id) => {
            let GameState { cave, monsters, .. } = &mut *ctx.state;
            monsters.relocate(cave, id, dest);
        }
        Occupant::None => {}
    }
    tracing::trace!(from = %start, to = %dest, dis, "teleport");
    true
}

/// Shoves the first creature in the aimed direction away from the caster.
pub(super) fn thrust(ctx: &mut EffectContext<'_, '_>) -> bool {
    let grids = ctx.calculate_value(false);
    let origin = ctx.origin();
    let target = match ctx.state.player.target {
        Some(target) if ctx.dir.delta() == (0, 0) => target,
        _ => {
            let (dx, dy) = ctx.dir.delta();
            origin.offset(dx * EngineConfig::MAX_RANGE as i32, dy * EngineConfig::MAX_RANGE as i32)
        }
    };

    let range = ctx.env.config().projection_range();
    let path = project_path(
        &ctx.state.cave,
        range,
        origin,
        target,
        ProjectFlags::STOP | ProjectFlags::THRU,
    );
    let Some(&victim) = path.iter().find(|grid| ctx.state.cave.is_occupied(**grid)) else {
        return true;
    };
    thrust_away(ctx.state, origin, victim, grids);
    ctx.ident = true;
    true
}
