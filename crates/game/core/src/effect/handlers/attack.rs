//! Handlers that fire projections.
//!
//! Aimed effects follow one rule: a player shoots at the current target
//! when asked to aim at it and one exists, otherwise straight along the
//! chosen direction. Monsters and traps always aim at the player, and
//! their projections may hit the player.

use crate::project::{ProjectFlags, Projection, ProjectionKind, los, project};
use crate::state::{Direction, Element, GameState, PlayerTimed, Position, Source};

use super::EffectContext;

/// Breaths and arcs start one grid wide; full strength reaches this
/// diameter divided by ten.
const DIAMETER_OF_SOURCE: i32 = 4;
/// Narrowest cone a breath or arc may have.
const MIN_ARC_DEGREES: i32 = 20;
/// Cones narrower than this keep their strength for longer.
const WIDE_ARC_DEGREES: i32 = 60;
const MAX_DIAMETER: i32 = 25;
/// Directional aims travel this far; the tracer clamps them to range.
const AIM_REACH: i32 = 99;

const BOLT: ProjectFlags = ProjectFlags::STOP.union(ProjectFlags::KILL);
const BALL: ProjectFlags = ProjectFlags::THRU
    .union(ProjectFlags::STOP)
    .union(ProjectFlags::GRID)
    .union(ProjectFlags::ITEM)
    .union(ProjectFlags::KILL);
const CONE: ProjectFlags = ProjectFlags::ARC
    .union(ProjectFlags::GRID)
    .union(ProjectFlags::ITEM)
    .union(ProjectFlags::KILL);
const TOUCH: ProjectFlags = ProjectFlags::GRID
    .union(ProjectFlags::KILL)
    .union(ProjectFlags::HIDE)
    .union(ProjectFlags::ITEM)
    .union(ProjectFlags::THRU);

// ============================================================================
// Aiming
// ============================================================================

/// Target grid of an aimed effect, with the flags the aim adds.
///
/// `targeted` reports a player aim at an explicit target.
struct Aim {
    grid: Position,
    flags: ProjectFlags,
    targeted: bool,
}

fn aim(ctx: &EffectContext<'_, '_>) -> Aim {
    let player = ctx.state.player.grid;
    if !ctx.source.is_player() {
        return Aim {
            grid: player,
            flags: ProjectFlags::PLAY,
            targeted: false,
        };
    }
    match (ctx.dir, ctx.state.player.target) {
        (Direction::Target, Some(grid)) => Aim {
            grid,
            flags: ProjectFlags::empty(),
            targeted: true,
        },
        (dir, _) => {
            let (dx, dy) = dir.delta();
            Aim {
                grid: player.offset(dx * AIM_REACH, dy * AIM_REACH),
                flags: ProjectFlags::empty(),
                targeted: false,
            }
        }
    }
}

/// Level of the casting monster; other sources have no power.
fn power(state: &GameState, source: Source) -> i32 {
    source
        .monster()
        .and_then(|id| state.monsters.race_of(id))
        .map_or(0, |race| race.level)
}

/// Fires `projection` on behalf of the node's source.
fn fire(ctx: &mut EffectContext<'_, '_>, projection: Projection) -> bool {
    let mut projection = projection.with_power(power(ctx.state, ctx.source));
    if let Some(object) = ctx.object {
        projection = projection.with_object(object);
    }
    project(ctx.env, ctx.state, &projection)
}

/// Fires a non-exploding projection along the aim, through the target.
fn project_aimed(
    ctx: &mut EffectContext<'_, '_>,
    kind: ProjectionKind,
    dam: i32,
    flags: ProjectFlags,
) -> bool {
    let aim = aim(ctx);
    let projection = Projection::new(ctx.source, aim.grid, kind, dam)
        .with_flags(flags | aim.flags | ProjectFlags::THRU);
    fire(ctx, projection)
}

/// Widens the full-strength zone of narrow cones.
fn cone_diameter(degrees: i32, diameter: i32) -> i32 {
    let diameter = if degrees < WIDE_ARC_DEGREES {
        diameter * WIDE_ARC_DEGREES / degrees
    } else {
        diameter
    };
    diameter.min(MAX_DIAMETER)
}

// ============================================================================
// Bolts and beams
// ============================================================================

pub(super) fn bolt(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    project_aimed(ctx, kind, dam, BOLT);
    if !ctx.state.player.is_blind() {
        ctx.ident = true;
    }
    true
}

pub(super) fn beam(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    project_aimed(ctx, kind, dam, ProjectFlags::BEAM | ProjectFlags::KILL);
    if !ctx.state.player.is_blind() {
        ctx.ident = true;
    }
    true
}

/// A bolt, or a beam with the request's beam chance plus `other` percent.
pub(super) fn bolt_or_beam(ctx: &mut EffectContext<'_, '_>) -> bool {
    let chance = ctx.beam + ctx.other;
    if ctx.state.rng.randint0(100) < chance {
        beam(ctx)
    } else {
        bolt(ctx)
    }
}

/// A beam that also works on terrain.
pub(super) fn line(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    let flags = ProjectFlags::BEAM | ProjectFlags::GRID | ProjectFlags::KILL;
    if project_aimed(ctx, kind, dam, flags) {
        ctx.ident = true;
    }
    true
}

/// A harmless beam that only changes terrain and floor objects.
pub(super) fn alter(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let flags = ProjectFlags::BEAM | ProjectFlags::GRID | ProjectFlags::ITEM;
    if project_aimed(ctx, kind, 0, flags) {
        ctx.ident = true;
    }
    true
}

/// A bolt that only identifies when something visibly happens.
pub(super) fn bolt_status(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    if project_aimed(ctx, kind, dam, BOLT) {
        ctx.ident = true;
    }
    true
}

pub(super) fn bolt_aware(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    let mut flags = BOLT;
    if ctx.aware {
        flags |= ProjectFlags::AWARE;
    }
    if project_aimed(ctx, kind, dam, flags) {
        ctx.ident = true;
    }
    true
}

// ============================================================================
// Balls and cones
// ============================================================================

/// Explodes at the first thing in the way, or at the target itself.
///
/// Player casters gain a grid of radius per `other` levels.
pub(super) fn ball(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    let mut radius = if ctx.radius != 0 { ctx.radius } else { 2 };
    let mut flags = BALL;

    let target = match ctx.source {
        Source::Monster(_) => {
            flags |= ProjectFlags::PLAY;
            flags -= ProjectFlags::STOP | ProjectFlags::THRU;
            ctx.state.player.grid
        }
        Source::Trap(grid) => {
            flags |= ProjectFlags::PLAY;
            grid
        }
        Source::Player => {
            let aim = aim(ctx);
            if aim.targeted {
                flags -= ProjectFlags::STOP | ProjectFlags::THRU;
            }
            if ctx.other > 0 {
                radius += ctx.state.player.lev / ctx.other;
            }
            aim.grid
        }
        _ => {
            flags |= ProjectFlags::PLAY;
            ctx.state.player.grid
        }
    };

    let projection = Projection::new(ctx.source, target, kind, dam)
        .with_radius(radius)
        .with_flags(flags);
    if fire(ctx, projection) {
        ctx.ident = true;
    }
    true
}

/// Breathes a cone; a monster's breath is scaled from its hit points.
pub(super) fn breath(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let mut dam = ctx.calculate_value(false);
    let degrees = ctx.other.max(MIN_ARC_DEGREES);
    let radius = if ctx.radius != 0 {
        ctx.radius
    } else {
        ctx.env.config().max_range
    };
    let mut flags = CONE;

    let target = match ctx.source {
        Source::Monster(id) => {
            flags |= ProjectFlags::PLAY;
            if let Some(mon) = ctx.state.monsters.get(id) {
                dam = ctx.env.projections().get(kind).breath_damage(mon.hp);
            }
            ctx.state.player.grid
        }
        Source::Player => {
            let desc = &ctx.env.projections().get(kind).desc;
            ctx.state.messages.push(format!("You breathe {desc}."));
            aim(ctx).grid
        }
        _ => {
            flags |= ProjectFlags::PLAY;
            ctx.state.player.grid
        }
    };

    let projection = Projection::new(ctx.source, target, kind, dam)
        .with_radius(radius)
        .with_flags(flags)
        .with_arc(degrees, cone_diameter(degrees, DIAMETER_OF_SOURCE));
    if fire(ctx, projection) {
        ctx.ident = true;
    }
    true
}

/// A cone cast like a spell: boosted damage, radius from the node.
pub(super) fn arc(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    let degrees = ctx.other.max(MIN_ARC_DEGREES);
    let radius = if ctx.radius != 0 {
        ctx.radius
    } else {
        ctx.env.config().max_range
    };
    let aim = aim(ctx);

    let projection = Projection::new(ctx.source, aim.grid, kind, dam)
        .with_radius(radius)
        .with_flags(CONE | aim.flags)
        .with_arc(degrees, cone_diameter(degrees, DIAMETER_OF_SOURCE));
    if fire(ctx, projection) {
        ctx.ident = true;
    }
    true
}

/// Several balls at the same grid, one per point of dice bonus.
///
/// The grid is fixed before the first ball so a dying target does not
/// move the rest.
pub(super) fn swarm(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    let count = ctx.value.m_bonus.min(ctx.env.config().max_swarm);
    let aim = aim(ctx);

    for _ in 0..count {
        let projection = Projection::new(ctx.source, aim.grid, kind, dam)
            .with_radius(ctx.radius)
            .with_flags(BALL | aim.flags);
        if fire(ctx, projection) {
            ctx.ident = true;
        }
    }
    true
}

/// Beams in all eight directions from the caster.
pub(super) fn star(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    let origin = ctx.origin();
    if !ctx.state.player.is_blind() {
        ctx.state.messages.push("Light shoots in all directions!");
    }
    let flags = ProjectFlags::THRU | ProjectFlags::BEAM | ProjectFlags::GRID | ProjectFlags::KILL;

    for dir in Direction::DDD {
        let projection = Projection::new(ctx.source, origin.step(dir), kind, dam).with_flags(flags);
        if fire(ctx, projection) {
            ctx.ident = true;
        }
    }
    true
}

/// Balls in all eight directions from the caster.
pub(super) fn star_ball(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    let origin = ctx.origin();

    for dir in Direction::DDD {
        let projection = Projection::new(ctx.source, origin.step(dir), kind, dam)
            .with_radius(ctx.radius)
            .with_flags(BALL);
        if fire(ctx, projection) {
            ctx.ident = true;
        }
    }
    true
}

// ============================================================================
// Around the caster
// ============================================================================

fn project_touch(ctx: &mut EffectContext<'_, '_>, aware: bool) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(true);
    let radius = if ctx.radius != 0 { ctx.radius } else { 1 };
    let mut flags = TOUCH;
    if aware {
        flags |= ProjectFlags::AWARE;
    }
    let projection = Projection::new(ctx.source, ctx.origin(), kind, dam)
        .with_radius(radius)
        .with_flags(flags);
    if fire(ctx, projection) {
        ctx.ident = true;
    }
    true
}

/// Hits everything next to the caster.
pub(super) fn touch(ctx: &mut EffectContext<'_, '_>) -> bool {
    project_touch(ctx, false)
}

pub(super) fn touch_aware(ctx: &mut EffectContext<'_, '_>) -> bool {
    let aware = ctx.aware;
    project_touch(ctx, aware)
}

/// A ball centred on the caster that hits the caster too, at full
/// strength out to its radius.
pub(super) fn spot(ctx: &mut EffectContext<'_, '_>) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let dam = ctx.calculate_value(false);
    let mut radius = ctx.radius;
    if ctx.other > 0 && ctx.source.is_player() {
        radius += ctx.state.player.lev / ctx.other;
    }
    let flags = ProjectFlags::STOP
        | ProjectFlags::PLAY
        | ProjectFlags::GRID
        | ProjectFlags::ITEM
        | ProjectFlags::KILL
        | ProjectFlags::SELF;
    let projection = Projection::new(ctx.source, ctx.origin(), kind, dam)
        .with_radius(radius)
        .with_flags(flags)
        .with_diameter(radius);
    if fire(ctx, projection) {
        ctx.ident = true;
    }
    true
}

/// Jumps straight to every monster the caster has line of sight to.
///
/// `other` set means the device boost applies.
pub(super) fn project_los(ctx: &mut EffectContext<'_, '_>) -> bool {
    let origin = ctx.origin();
    let targets: Vec<Position> = monster_grids(ctx)
        .into_iter()
        .filter(|grid| los(&ctx.state.cave, origin, *grid))
        .collect();
    project_at_each(ctx, &targets, ProjectFlags::empty())
}

/// Like [`project_los`], limited to monsters in the player's view; an aware
/// user already knows the effect.
pub(super) fn project_los_aware(ctx: &mut EffectContext<'_, '_>) -> bool {
    let config = ctx.env.config();
    let targets: Vec<Position> = monster_grids(ctx)
        .into_iter()
        .filter(|grid| ctx.state.in_view(*grid, config))
        .collect();
    let flags = if ctx.aware {
        ProjectFlags::AWARE
    } else {
        ProjectFlags::empty()
    };
    project_at_each(ctx, &targets, flags)
}

/// Grids of every monster other than the caster.
fn monster_grids(ctx: &EffectContext<'_, '_>) -> Vec<Position> {
    let caster = ctx.source.monster();
    ctx.state
        .monsters
        .ids()
        .into_iter()
        .filter(|id| Some(*id) != caster)
        .filter_map(|id| ctx.state.monsters.get(id).map(|mon| mon.grid))
        .collect()
}

fn project_at_each(ctx: &mut EffectContext<'_, '_>, targets: &[Position], extra: ProjectFlags) -> bool {
    let Some(kind) = ctx.subtype.projection() else {
        return false;
    };
    let boosted = ctx.other != 0;
    let dam = ctx.calculate_value(boosted);
    let flags = ProjectFlags::JUMP | ProjectFlags::KILL | ProjectFlags::HIDE | extra;

    for grid in targets {
        let projection = Projection::new(Source::Player, *grid, kind, dam).with_flags(flags);
        fire(ctx, projection);
        ctx.ident = true;
    }
    true
}

/// Lights the caster's surroundings, searing light-sensitive monsters.
pub(super) fn light_area(ctx: &mut EffectContext<'_, '_>) -> bool {
    if !ctx.state.player.is_blind() {
        ctx.state.messages.push("You are surrounded by a white light.");
    }
    let dam = ctx.calculate_value(false);
    let projection = Projection::new(ctx.source, ctx.origin(), ProjectionKind::LightWeak, dam)
        .with_radius(ctx.radius)
        .with_flags(ProjectFlags::GRID | ProjectFlags::KILL);
    fire(ctx, projection);
    ctx.ident = true;
    true
}

/// Darkens the caster's surroundings; a player who does it to themselves
/// is blinded unless they resist darkness.
pub(super) fn darken_area(ctx: &mut EffectContext<'_, '_>) -> bool {
    if !ctx.state.player.is_blind() {
        ctx.state.messages.push("Darkness surrounds you.");
    }
    let dam = ctx.calculate_value(false);
    let projection = Projection::new(ctx.source, ctx.origin(), ProjectionKind::DarkWeak, dam)
        .with_radius(ctx.radius)
        .with_flags(ProjectFlags::GRID | ProjectFlags::KILL);
    fire(ctx, projection);

    if ctx.source.is_player() && !ctx.state.player.resists(Element::Dark) {
        let GameState {
            player,
            rng,
            messages,
            ..
        } = &mut *ctx.state;
        let turns = 3 + rng.randint1(5);
        player.inc_timed(PlayerTimed::Blind, turns, true, true, messages);
    }
    ctx.ident = true;
    true
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::effect::{
        EffectChain, EffectKind, EffectNode, EffectRequest, EffectTable, Subtype, execute,
    };
    use crate::env::Env;
    use crate::env::TerrainKind;
    use crate::project::{ProjectionKind, ProjectionTable, damage_at_distance};
    use crate::state::{
        Cave, Direction, GameState, MonsterId, MonsterRace, PlayerTimed, Position, SquareFlags,
        Source,
    };

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
                state: GameState::new(Cave::new(30, 15), Position::new(3, 7), 23),
            }
        }

        fn monster(&mut self, grid: Position, hp: i32) -> MonsterId {
            let race = self.state.monsters.add_race(MonsterRace::new("snaga", 3, hp));
            self.state
                .monsters
                .spawn(&mut self.state.cave, race, grid)
                .expect("grid is free")
        }

        fn hp(&self, id: MonsterId) -> Option<i32> {
            self.state.monsters.get(id).map(|mon| mon.hp)
        }

        fn run(&mut self, node: EffectNode, request: EffectRequest) -> (bool, bool) {
            let env = Env::new(&self.effects, &self.projections, &self.config);
            let chain = EffectChain::single(node);
            let mut ident = false;
            let done = execute(env, &mut self.state, &chain, &request, &mut ident, None);
            (done, ident)
        }
    }

    fn node(kind: EffectKind, dice: &str, projection: ProjectionKind) -> EffectNode {
        EffectNode::new(kind)
            .with_dice(dice.parse().unwrap())
            .with_subtype(Subtype::Projection(projection))
    }

    fn east() -> EffectRequest {
        EffectRequest::new(Source::Player).with_dir(Direction::East)
    }

    #[test]
    fn bolt_stops_at_the_first_monster_and_beam_does_not() {
        let mut f = Fixture::new();
        let near = f.monster(Position::new(6, 7), 100);
        let far = f.monster(Position::new(10, 7), 100);

        let (done, ident) = f.run(node(EffectKind::Bolt, "20", ProjectionKind::Missile), east());
        assert!(done && ident);
        assert_eq!(f.hp(near), Some(80));
        assert_eq!(f.hp(far), Some(100));

        f.run(node(EffectKind::Beam, "20", ProjectionKind::Missile), east());
        assert_eq!(f.hp(near), Some(60));
        assert_eq!(f.hp(far), Some(80));
    }

    #[test]
    fn bolt_or_beam_always_beams_at_full_chance() {
        let mut f = Fixture::new();
        let near = f.monster(Position::new(6, 7), 100);
        let far = f.monster(Position::new(10, 7), 100);
        f.run(
            node(EffectKind::BoltOrBeam, "10", ProjectionKind::Missile),
            east().with_beam(100),
        );
        assert_eq!(f.hp(near), Some(90));
        assert_eq!(f.hp(far), Some(90));
    }

    #[test]
    fn device_boost_scales_bolts() {
        let mut f = Fixture::new();
        let id = f.monster(Position::new(6, 7), 100);
        f.run(
            node(EffectKind::Bolt, "20", ProjectionKind::Missile),
            east().with_boost(50),
        );
        assert_eq!(f.hp(id), Some(70));
    }

    #[test]
    fn targeted_ball_explodes_at_the_target() {
        let mut f = Fixture::new();
        let centre = Position::new(12, 7);
        let blocker = f.monster(Position::new(7, 7), 100);
        let victim = f.monster(centre, 100);
        let beside = f.monster(Position::new(13, 7), 100);
        f.state.player.target = Some(centre);

        let ball = node(EffectKind::Ball, "30", ProjectionKind::Missile).with_radius(2);
        f.run(ball, EffectRequest::new(Source::Player));
        assert_eq!(f.hp(blocker), Some(100));
        assert_eq!(f.hp(victim), Some(70));
        // (30 + 1) / 2 one grid out
        assert_eq!(f.hp(beside), Some(85));
    }

    #[test]
    fn directional_ball_bursts_on_the_first_monster() {
        let mut f = Fixture::new();
        let blocker = f.monster(Position::new(7, 7), 100);
        let behind = f.monster(Position::new(12, 7), 100);
        f.run(node(EffectKind::Ball, "30", ProjectionKind::Missile), east());
        assert_eq!(f.hp(blocker), Some(70));
        assert_eq!(f.hp(behind), Some(100));
    }

    #[test]
    fn trap_ball_hits_the_player_from_the_trap() {
        let mut f = Fixture::new();
        let trap = Position::new(4, 7);
        let request = EffectRequest::new(Source::Trap(trap));
        let (_, ident) = f.run(
            node(EffectKind::Ball, "20", ProjectionKind::Missile).with_radius(1),
            request,
        );
        assert!(ident);
        assert_eq!(f.state.player.hp, f.state.player.mhp - 10);
    }

    #[test]
    fn monster_breath_scales_with_its_health() {
        let mut f = Fixture::new();
        let race = f
            .state
            .monsters
            .add_race(MonsterRace::new("baby red dragon", 9, 90));
        let id = f
            .state
            .monsters
            .spawn(&mut f.state.cave, race, Position::new(6, 7))
            .unwrap();
        let full = f.projections.get(ProjectionKind::Fire).breath_damage(90);
        // a 20 degree cone keeps full strength out to 12 / 10 grids
        let expected = damage_at_distance(full, 3, 12, 3);

        f.run(
            node(EffectKind::Breath, "1", ProjectionKind::Fire),
            EffectRequest::new(Source::Monster(id)),
        );
        assert_eq!(f.state.player.hp, f.state.player.mhp - expected);
    }

    #[test]
    fn player_breath_is_announced() {
        let mut f = Fixture::new();
        let id = f.monster(Position::new(8, 7), 100);
        f.run(node(EffectKind::Breath, "30", ProjectionKind::Fire), east());
        let desc = &f.projections.get(ProjectionKind::Fire).desc;
        assert_eq!(f.state.messages.messages()[0], format!("You breathe {desc}."));
        assert!(f.hp(id).unwrap() < 100);
        assert_eq!(f.state.player.hp, f.state.player.mhp);
    }

    #[test]
    fn swarm_fires_one_ball_per_bonus_point() {
        let mut f = Fixture::new();
        let id = f.monster(Position::new(8, 7), 100);
        f.run(node(EffectKind::Swarm, "10+M3", ProjectionKind::Missile), east());
        assert_eq!(f.hp(id), Some(70));
    }

    #[test]
    fn star_reaches_every_direction() {
        let mut f = Fixture::new();
        f.state.move_player(Position::new(10, 7));
        let north = f.monster(Position::new(10, 4), 100);
        let south_west = f.monster(Position::new(7, 10), 100);
        f.run(
            node(EffectKind::Star, "15", ProjectionKind::Light),
            EffectRequest::new(Source::Player),
        );
        assert_eq!(f.hp(north), Some(85));
        assert_eq!(f.hp(south_west), Some(85));
        assert_eq!(f.state.messages.messages()[0], "Light shoots in all directions!");
    }

    #[test]
    fn touch_spares_the_caster_and_spot_does_not() {
        let mut f = Fixture::new();
        let next = f.monster(Position::new(4, 7), 100);
        f.run(
            node(EffectKind::Touch, "10", ProjectionKind::Missile),
            EffectRequest::new(Source::Player),
        );
        assert_eq!(f.hp(next), Some(95));
        assert_eq!(f.state.player.hp, f.state.player.mhp);

        f.run(
            node(EffectKind::Spot, "10", ProjectionKind::Missile),
            EffectRequest::new(Source::Player),
        );
        assert_eq!(f.state.player.hp, f.state.player.mhp - 10);
    }

    #[test]
    fn project_los_needs_line_of_sight() {
        let mut f = Fixture::new();
        let open = f.monster(Position::new(9, 7), 40);
        let hidden = f.monster(Position::new(9, 3), 40);
        for x in 1..29 {
            f.state
                .cave
                .set_feat(Position::new(x, 5), TerrainKind::Granite);
        }
        let (_, ident) = f.run(
            node(EffectKind::ProjectLos, "12", ProjectionKind::Missile),
            EffectRequest::new(Source::Player),
        );
        assert!(ident);
        assert_eq!(f.hp(open), Some(28));
        assert_eq!(f.hp(hidden), Some(40));
    }

    #[test]
    fn light_area_lights_the_floor_around_the_caster() {
        let mut f = Fixture::new();
        let grid = Position::new(4, 8);
        assert!(!f.state.cave.has_flag(grid, SquareFlags::GLOW));
        f.run(
            EffectNode::new(EffectKind::LightArea).with_radius(2),
            EffectRequest::new(Source::Player),
        );
        assert!(f.state.cave.has_flag(grid, SquareFlags::GLOW));
        assert_eq!(
            f.state.messages.messages()[0],
            "You are surrounded by a white light."
        );
    }

    #[test]
    fn darkness_blinds_a_careless_caster() {
        let mut f = Fixture::new();
        f.run(
            EffectNode::new(EffectKind::DarkenArea).with_radius(1),
            EffectRequest::new(Source::Player),
        );
        assert!(f.state.player.timer(PlayerTimed::Blind) >= 4);
        assert_eq!(f.state.messages.messages()[0], "Darkness surrounds you.");
    }
}
