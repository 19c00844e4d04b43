//! Projection effects on floor objects, and elemental damage to the pack.

use crate::state::{Element, ElementFlags, GameState, ItemClass, MessageLog, Object, ObjectId};

use super::{Hit, ProjectionKind};

struct ObjectContext<'a> {
    object: &'a mut Object,
    messages: &'a mut MessageLog,
    obvious: bool,
    kill: bool,
    ignore: bool,
    note: Option<&'static str>,
}

type ObjectHandler = fn(&mut ObjectContext<'_>);

fn agree(number: i32, singular: &'static str, plural: &'static str) -> &'static str {
    if number == 1 { singular } else { plural }
}

impl ObjectContext<'_> {
    fn elemental(&mut self, flag: ElementFlags, singular: &'static str, plural: &'static str) {
        if self.object.hates.intersects(flag) {
            self.kill = true;
            self.note = Some(agree(self.object.number, singular, plural));
            self.ignore = self.object.ignores.intersects(flag);
        }
    }

    fn destroy(&mut self) {
        self.kill = true;
        self.note = Some(agree(self.object.number, "is destroyed", "are destroyed"));
    }

    fn is_known(&self) -> bool {
        self.object.marked && !self.object.ignored
    }
}

fn handler(kind: ProjectionKind) -> Option<ObjectHandler> {
    use ProjectionKind as P;
    let handler: ObjectHandler = match kind {
        P::Acid => |c| c.elemental(ElementFlags::ACID, "melts", "melt"),
        P::Elec => |c| c.elemental(ElementFlags::ELEC, "is destroyed", "are destroyed"),
        P::Fire => |c| c.elemental(ElementFlags::FIRE, "burns up", "burn up"),
        P::Cold => |c| c.elemental(ElementFlags::COLD, "shatters", "shatter"),
        P::Sound => |c| c.elemental(ElementFlags::SOUND, "shatters", "shatter"),
        P::Shard => |c| c.elemental(ElementFlags::SHARD, "shatters", "shatter"),
        P::Ice => |c| c.elemental(ElementFlags::ICE, "shatters", "shatter"),
        P::Force => |c| c.elemental(ElementFlags::FORCE, "shatters", "shatter"),
        P::Plasma => |c| {
            c.elemental(ElementFlags::FIRE, "burns up", "burn up");
            c.elemental(ElementFlags::ELEC, "is destroyed", "are destroyed");
        },
        P::Meteor => |c| {
            c.elemental(ElementFlags::FIRE, "burns up", "burn up");
            c.elemental(ElementFlags::COLD, "shatters", "shatter");
        },
        P::Mana => |c| c.destroy(),
        P::HolyOrb => |c| {
            if c.object.cursed {
                c.destroy();
            }
        },
        P::KillDoor | P::KillTrap => unlock_chest,
        _ => return None,
    };
    Some(handler)
}

fn unlock_chest(context: &mut ObjectContext<'_>) {
    if context.object.class != ItemClass::Chest || !context.object.locked {
        return;
    }
    context.object.locked = false;
    if context.is_known() {
        context.messages.push("Click!");
        context.obvious = true;
    }
}

/// Applies a projection to every object lying on the grid.
///
/// Returns true when the player noticed anything.
pub(crate) fn project_object(state: &mut GameState, hit: Hit) -> bool {
    let Some(handler) = handler(hit.kind) else {
        return false;
    };
    let mut obvious = false;
    for id in state.objects.pile(hit.grid) {
        let Some(object) = state.objects.get_mut(id) else {
            continue;
        };
        let mut context = ObjectContext {
            object,
            messages: &mut state.messages,
            obvious: false,
            kill: false,
            ignore: false,
            note: None,
        };
        handler(&mut context);
        obvious |= context.obvious;
        if context.kill {
            let known = context.is_known();
            let (ignore, note) = (context.ignore, context.note);
            obvious |= known;
            destroy_object(state, id, known, ignore, note);
        }
    }
    obvious
}

fn destroy_object(
    state: &mut GameState,
    id: ObjectId,
    known: bool,
    ignore: bool,
    note: Option<&'static str>,
) {
    let Some(object) = state.objects.get(id) else {
        return;
    };
    let name = object.base_name();
    if object.artifact || ignore {
        if known {
            let verb = agree(object.number, "is", "are");
            state.messages.push(format!("The {name} {verb} unaffected!"));
        }
    } else if let Some(mimic) = object.mimic {
        if let Some(mon) = state.monsters.get_mut(mimic) {
            mon.mimicking = false;
            mon.visible = true;
        }
    } else {
        if known && let Some(note) = note {
            state.messages.push(format!("The {name} {note}!"));
        }
        state.objects.delete(id);
    }
}

/// Gives every vulnerable item in the pack a chance to be destroyed.
///
/// `cperc` is the chance in hundredths of a percent, rolled per item in a
/// stack. Weapons and armour lose a point of enchantment instead and rods
/// are four times harder to break. Returns the number of items destroyed.
pub fn inven_damage(state: &mut GameState, kind: ProjectionKind, cperc: i32) -> i32 {
    let flag = kind.element().map_or(ElementFlags::empty(), Element::object_flag);
    if cperc <= 0 || flag.is_empty() {
        return 0;
    }

    let GameState {
        player,
        rng,
        messages,
        ..
    } = state;
    let mut destroyed = 0;

    for obj in player.pack.iter_mut() {
        if obj.artifact || !obj.is_damaged_by(flag) {
            continue;
        }
        let mut chance = cperc;
        let damaged = match obj.class {
            ItemClass::Weapon | ItemClass::Armour => {
                if rng.randint0(10_000) >= cperc {
                    continue;
                }
                if obj.class.is_weapon() {
                    obj.to_h -= 1;
                    obj.to_d -= 1;
                } else {
                    obj.to_a -= 1;
                }
                true
            }
            ItemClass::Rod => {
                chance /= 4;
                false
            }
            _ => false,
        };

        let amount = if damaged {
            obj.number
        } else {
            (0..obj.number)
                .filter(|_| rng.randint0(10_000) < chance)
                .count() as i32
        };
        if amount == 0 {
            continue;
        }

        let whose = match (obj.number > 1, amount) {
            (false, _) => "Your",
            (true, a) if a == obj.number => "All of your",
            (true, a) if a > 1 => "Some of your",
            (true, _) => "One of your",
        };
        let verb = if amount > 1 { "were" } else { "was" };
        let what = if damaged { "damaged" } else { "destroyed" };
        messages.push(format!("{whose} {} {verb} {what}!", obj.base_name()));

        if !damaged {
            obj.number -= amount;
            destroyed += amount;
        }
    }

    player.pack.retain(|obj| obj.number > 0);
    destroyed
}
