//! Objects lying on the floor and carried by the player.

use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::env::MapOracle;

use super::cave::Cave;
use super::common::{Direction, MonsterId, ObjectId, Position};

bitflags! {
    /// Elements an object can be vulnerable or immune to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ElementFlags: u8 {
        const ACID = 1 << 0;
        const ELEC = 1 << 1;
        const FIRE = 1 << 2;
        const COLD = 1 << 3;
        const SOUND = 1 << 4;
        const SHARD = 1 << 5;
        const ICE = 1 << 6;
        const FORCE = 1 << 7;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemClass {
    Weapon,
    Ammo,
    Armour,
    Rod,
    Wand,
    Potion,
    Scroll,
    Food,
    Chest,
    Gold,
    #[default]
    Other,
}

impl ItemClass {
    pub const fn is_weapon(self) -> bool {
        matches!(self, ItemClass::Weapon)
    }

    pub const fn is_armour(self) -> bool {
        matches!(self, ItemClass::Armour)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Object {
    pub name: String,
    pub class: ItemClass,
    /// Stack size.
    pub number: i32,
    pub hates: ElementFlags,
    pub ignores: ElementFlags,
    pub artifact: bool,
    pub cursed: bool,
    /// The player has seen this object where it lies.
    pub marked: bool,
    /// The player chose to ignore objects like this one.
    pub ignored: bool,
    /// A monster disguised as this object.
    pub mimic: Option<MonsterId>,
    /// Locked chest.
    pub locked: bool,
    pub to_h: i32,
    pub to_d: i32,
    pub to_a: i32,
}

impl Object {
    pub fn new(name: impl Into<String>, class: ItemClass) -> Self {
        Self {
            name: name.into(),
            class,
            number: 1,
            ..Self::default()
        }
    }

    pub fn with_number(mut self, number: i32) -> Self {
        self.number = number;
        self
    }

    pub fn hating(mut self, hates: ElementFlags) -> Self {
        self.hates |= hates;
        self
    }

    pub fn ignoring(mut self, ignores: ElementFlags) -> Self {
        self.ignores |= ignores;
        self
    }

    /// Base name, pluralised for stacks.
    pub fn base_name(&self) -> String {
        if self.number > 1 {
            format!("{}s", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Name with an article or count, e.g. "a Flask of oil", "3 Arrows".
    pub fn prefixed_name(&self) -> String {
        if self.number > 1 {
            format!("{} {}", self.number, self.base_name())
        } else {
            let article = match self.name.chars().next() {
                Some(c) if "aeiouAEIOU".contains(c) => "an",
                _ => "a",
            };
            format!("{article} {}", self.name)
        }
    }

    /// True when the element damages this object and nothing protects it.
    pub fn is_damaged_by(&self, element: ElementFlags) -> bool {
        self.hates.intersects(element) && !self.ignores.intersects(element)
    }
}

/// Every object on the level plus the floor piles they sit in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRegistry {
    objects: BTreeMap<ObjectId, Object>,
    piles: BTreeMap<Position, Vec<ObjectId>>,
    next_id: u32,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object without placing it anywhere.
    pub fn insert(&mut self, object: Object) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        self.objects.insert(id, object);
        id
    }

    /// Registers an object and drops it on `grid`.
    pub fn drop_at(&mut self, object: Object, grid: Position) -> ObjectId {
        let id = self.insert(object);
        self.piles.entry(grid).or_default().push(id);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(&id)
    }

    /// Objects lying on `grid`, top of the pile first.
    pub fn pile(&self, grid: Position) -> Vec<ObjectId> {
        self.piles.get(&grid).cloned().unwrap_or_default()
    }

    pub fn has_pile(&self, grid: Position) -> bool {
        self.piles.get(&grid).is_some_and(|pile| !pile.is_empty())
    }

    /// Removes an object from the level entirely.
    pub fn delete(&mut self, id: ObjectId) -> Option<Object> {
        for pile in self.piles.values_mut() {
            pile.retain(|other| *other != id);
        }
        self.piles.retain(|_, pile| !pile.is_empty());
        self.objects.remove(&id)
    }

    /// Moves the pile on `grid` to the first adjacent floor grid.
    ///
    /// Objects with nowhere to go are destroyed.
    pub fn push_objects(&mut self, cave: &Cave, grid: Position) {
        let Some(pile) = self.piles.remove(&grid) else {
            return;
        };
        let target = Direction::DDD
            .iter()
            .map(|dir| grid.step(*dir))
            .find(|next| cave.is_projectable(*next) && cave.feat(*next).is_floor());
        match target {
            Some(next) => self.piles.entry(next).or_default().extend(pile),
            None => {
                for id in pile {
                    self.objects.remove(&id);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TerrainKind;

    #[test]
    fn names_follow_stack_size() {
        let flask = Object::new("Flask of oil", ItemClass::Other);
        assert_eq!(flask.prefixed_name(), "a Flask of oil");
        let arrows = Object::new("Arrow", ItemClass::Ammo).with_number(3);
        assert_eq!(arrows.prefixed_name(), "3 Arrows");
        assert_eq!(Object::new("Amulet", ItemClass::Other).prefixed_name(), "an Amulet");
    }

    #[test]
    fn ignoring_overrides_hating() {
        let scroll = Object::new("Scroll", ItemClass::Scroll)
            .hating(ElementFlags::FIRE | ElementFlags::ACID)
            .ignoring(ElementFlags::FIRE);
        assert!(!scroll.is_damaged_by(ElementFlags::FIRE));
        assert!(scroll.is_damaged_by(ElementFlags::ACID));
    }

    #[test]
    fn pushing_moves_pile_to_neighbouring_floor() {
        let mut cave = Cave::new(5, 5);
        let grid = Position::new(2, 2);
        cave.set_feat(grid.step(Direction::South), TerrainKind::Granite);
        let mut objects = ObjectRegistry::new();
        let id = objects.drop_at(Object::new("Dagger", ItemClass::Weapon), grid);
        objects.push_objects(&cave, grid);
        assert!(!objects.has_pile(grid));
        assert_eq!(objects.pile(grid.step(Direction::North)), vec![id]);
    }

    #[test]
    fn delete_removes_from_pile() {
        let mut objects = ObjectRegistry::new();
        let grid = Position::new(1, 1);
        let id = objects.drop_at(Object::new("Dagger", ItemClass::Weapon), grid);
        assert!(objects.delete(id).is_some());
        assert!(objects.pile(grid).is_empty());
        assert!(objects.is_empty());
    }
}
