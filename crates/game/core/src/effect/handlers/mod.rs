//! Code behind each effect kind.
//!
//! A handler receives the [`EffectContext`] of one node, works on the game
//! state and reports whether the effect ran. Raising `ctx.ident` tells the
//! caller the player noticed what happened.
//!
//! Handlers are split by what they touch:
//! - `general`: chain control, the player's body and timers, movement
//! - `attack`: everything that fires a projection
mod attack;
mod general;

pub(crate) use general::teleport_destination;

use super::context::EffectContext;
use super::kind::EffectKind;

/// Signature shared by all effect handlers.
pub type EffectHandler = fn(&mut EffectContext<'_, '_>) -> bool;

/// Finds the handler for `kind`.
///
/// `None` and the kinds owned by outer subsystems have no handler.
pub(crate) fn lookup(kind: EffectKind) -> Option<EffectHandler> {
    use EffectKind as K;
    let handler: EffectHandler = match kind {
        K::None | K::Recall | K::DeepDescent | K::MapArea | K::Summon => return None,

        // ===== control =====
        K::Random | K::Select => general::choice,
        K::SetValue => general::set_value,
        K::ClearValue => general::clear_value,

        // ===== player and monster upkeep =====
        K::Damage => general::damage,
        K::HealHp => general::heal_hp,
        K::MonHealHp => general::mon_heal_hp,
        K::Nourish => general::nourish,
        K::Cure => general::cure,
        K::TimedSet => general::timed_set,
        K::TimedInc => general::timed_inc,
        K::TimedIncNoRes => general::timed_inc_no_res,
        K::TimedDec => general::timed_dec,
        K::MonTimedInc => general::mon_timed_inc,

        // ===== movement =====
        K::Teleport => general::teleport,
        K::ThrustAway => general::thrust,

        // ===== projections =====
        K::ProjectLos => attack::project_los,
        K::ProjectLosAware => attack::project_los_aware,
        K::LightArea => attack::light_area,
        K::DarkenArea => attack::darken_area,
        K::Ball => attack::ball,
        K::Breath => attack::breath,
        K::Arc => attack::arc,
        K::Swarm => attack::swarm,
        K::Star => attack::star,
        K::StarBall => attack::star_ball,
        K::Bolt => attack::bolt,
        K::Beam => attack::beam,
        K::BoltOrBeam => attack::bolt_or_beam,
        K::Line => attack::line,
        K::Alter => attack::alter,
        K::BoltStatus | K::BoltStatusDam => attack::bolt_status,
        K::BoltAware => attack::bolt_aware,
        K::Touch => attack::touch,
        K::TouchAware => attack::touch_aware,
        K::Spot => attack::spot,
    };
    Some(handler)
}
