//! Projection effects on terrain.

use crate::env::{Env, TerrainKind};
use crate::state::{GameState, ItemClass, Object, Occupant, Position, SquareFlags, Trap};

use super::{Hit, ProjectionKind};

struct FeatureContext<'a, 'e> {
    env: Env<'e>,
    state: &'a mut GameState,
    grid: Position,
    dam: i32,
    obvious: bool,
}

impl FeatureContext<'_, '_> {
    fn in_view(&self) -> bool {
        self.state.in_view(self.grid, self.env.config())
    }

    fn seen(&self) -> bool {
        self.state.player_sees(self.grid, self.env.config())
    }

    /// The player forgets what the grid used to look like.
    fn forget(&mut self) {
        self.state.cave.set_flag(self.grid, SquareFlags::MARK, false);
    }

    fn narrate(&mut self, message: &str) {
        self.state.messages.push(message);
        self.obvious = true;
    }
}

type FeatureHandler = fn(&mut FeatureContext<'_, '_>);

/// Applies a projection to the terrain of one grid.
///
/// Returns true when the player noticed anything.
pub(crate) fn project_feature(env: Env<'_>, state: &mut GameState, hit: Hit) -> bool {
    let Some(handler) = handler(hit.kind) else {
        return false;
    };
    let mut context = FeatureContext {
        env,
        state,
        grid: hit.grid,
        dam: hit.dam,
        obvious: false,
    };
    handler(&mut context);
    context.obvious
}

fn handler(kind: ProjectionKind) -> Option<FeatureHandler> {
    use ProjectionKind as P;
    let handler: FeatureHandler = match kind {
        P::LightWeak | P::Light => light,
        P::DarkWeak | P::Dark => darken,
        P::KillWall => kill_wall,
        P::KillDoor => kill_door,
        P::KillTrap => kill_trap,
        P::MakeDoor => make_door,
        P::MakeTrap => make_trap,
        P::Fire | P::Plasma => melt_floor,
        P::Cold | P::Ice => freeze_lava,
        kind if kind.is_element() => observe,
        _ => return None,
    };
    Some(handler)
}

fn observe(context: &mut FeatureContext<'_, '_>) {
    if context.in_view() && !context.state.player.is_blind() {
        context.obvious = true;
    }
}

fn light(context: &mut FeatureContext<'_, '_>) {
    context.state.cave.set_flag(context.grid, SquareFlags::GLOW, true);
    observe(context);
}

fn darken(context: &mut FeatureContext<'_, '_>) {
    let cave = &mut context.state.cave;
    let daylight = cave.depth == 0 && cave.daytime;
    if !daylight && !cave.feat(context.grid).is_bright() {
        cave.set_flag(context.grid, SquareFlags::GLOW, false);
    }
    if context.in_view() {
        context.obvious = true;
    }
}

fn kill_wall(context: &mut FeatureContext<'_, '_>) {
    let feat = context.state.cave.feat(context.grid);
    if feat.is_passable() && !feat.is_rock() {
        return;
    }
    if feat.is_permanent() {
        return;
    }
    let seen = context.seen();

    let message = if feat.is_rubble() {
        "The rubble turns into mud!"
    } else if feat.is_door() {
        "The door turns into mud!"
    } else if feat.is_magma() || feat.is_quartz() {
        "The vein turns into mud!"
    } else if feat.is_wall() {
        "The wall turns into mud!"
    } else {
        return;
    };
    if seen {
        context.narrate(message);
        if feat.has_treasure() {
            context.narrate("You have found something!");
        }
        context.forget();
    }
    context.state.cave.set_feat(context.grid, TerrainKind::Floor);

    if feat.has_treasure() {
        context
            .state
            .objects
            .drop_at(Object::new("Gold", ItemClass::Gold), context.grid);
    } else if feat.is_rubble() && context.state.rng.randint0(100) < 10 {
        if seen {
            context.narrate("There was something buried in the rubble!");
        }
        context
            .state
            .objects
            .drop_at(Object::new("Buried item", ItemClass::Other), context.grid);
    }
}

fn kill_door(context: &mut FeatureContext<'_, '_>) {
    if !context.state.cave.feat(context.grid).is_door() {
        return;
    }
    if context.in_view() {
        context.narrate("There is a bright flash of light!");
        context.forget();
    }
    context.state.cave.set_feat(context.grid, TerrainKind::Floor);
}

fn kill_trap(context: &mut FeatureContext<'_, '_>) {
    let grid = context.grid;
    if context.state.cave.feat(grid).is_secret_door() {
        context.state.cave.set_feat(grid, TerrainKind::ClosedDoor);
        if context.seen() {
            context.obvious = true;
        }
    }

    let armed = context.state.cave.trap(grid).is_some_and(|trap| !trap.disabled);
    if armed {
        if context.in_view() {
            context.narrate("The trap seizes up.");
        }
        if let Some(trap) = context.state.cave.trap_mut(grid) {
            trap.disabled = true;
        }
    } else if context.state.cave.feat(grid).is_locked_door() {
        context.state.cave.set_feat(grid, TerrainKind::ClosedDoor);
        if context.in_view() {
            context.narrate("Click!");
        }
    }
}

fn make_door(context: &mut FeatureContext<'_, '_>) {
    let grid = context.grid;
    let cave = &context.state.cave;
    if cave.occupant(grid) != Occupant::None || !cave.feat(grid).is_floor() {
        return;
    }
    if context.state.objects.has_pile(grid) {
        context.state.objects.push_objects(&context.state.cave, grid);
    }
    context.state.cave.set_feat(grid, TerrainKind::ClosedDoor);
    if context.state.cave.has_flag(grid, SquareFlags::MARK) {
        context.obvious = true;
    }
}

fn make_trap(context: &mut FeatureContext<'_, '_>) {
    let grid = context.grid;
    let cave = &context.state.cave;
    if !cave.is_empty(grid) || cave.has_flag(grid, SquareFlags::WARD) {
        return;
    }
    if context.state.rng.one_in(4) {
        let mut trap = Trap::new("rune of teleportation");
        trap.visible = context.seen();
        context.state.cave.place_trap(grid, trap);
    }
    context.obvious = true;
}

/// Extremely hot projections melt floor into lava.
fn melt_floor(context: &mut FeatureContext<'_, '_>) {
    observe(context);
    let threshold = context.state.rng.randint1(1800) + 600;
    if context.dam > threshold && context.state.cave.feat(context.grid).is_floor() {
        context.forget();
        context.state.cave.set_feat(context.grid, TerrainKind::Lava);
        context.state.objects.push_objects(&context.state.cave, context.grid);
    }
}

/// Sufficiently intense cold solidifies lava.
fn freeze_lava(context: &mut FeatureContext<'_, '_>) {
    observe(context);
    let threshold = context.state.rng.randint1(900) + 300;
    if context.dam <= threshold || !context.state.cave.feat(context.grid).is_fiery() {
        return;
    }
    let occupied = context.state.cave.occupant(context.grid) != Occupant::None;
    context.forget();
    let rng = &mut context.state.rng;
    let feat = if rng.one_in(2) {
        TerrainKind::Floor
    } else if rng.one_in(2) && !occupied {
        TerrainKind::Rubble
    } else {
        TerrainKind::PassableRubble
    };
    context.state.cave.set_feat(context.grid, feat);
}
