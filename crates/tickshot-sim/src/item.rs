//! Equipped-item seam of the attack pipeline.
//!
//! Weapon stat tables and equip timing belong to the item layer outside this
//! crate. The simulation only needs what [`Item`] exposes: the item class,
//! its ammo, whether it is ready on a given tick and what a shot looks like.
//! [`Firearm`], [`Knife`] and [`Gear`] are small reference implementations.

use serde::{Deserialize, Serialize};
use tickshot_common::ItemId;

/// Broad item class, driving speed multipliers and recoil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemClass {
    /// Rifles, SMGs, shotguns
    Primary,
    /// Pistols
    Secondary,
    /// Melee
    Knife,
    /// Throwables
    Grenade,
    /// Objective bomb
    Bomb,
    /// Defuse kits and other non-attacking gear
    Utility,
}

impl ItemClass {
    /// Returns true for classes whose attack builds a bullet.
    #[must_use]
    pub const fn is_attack_enabled(self) -> bool {
        matches!(self, Self::Primary | Self::Secondary | Self::Knife)
    }

    /// Returns true for classes that never jitter.
    #[must_use]
    pub const fn ignores_recoil(self) -> bool {
        matches!(self, Self::Knife | Self::Bomb | Self::Grenade | Self::Utility)
    }
}

/// What a single attack fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shot {
    /// Body damage before multipliers
    pub damage: i32,
    /// Maximum travel distance
    pub range: u32,
}

/// An equipped item as seen by the attack pipeline.
pub trait Item: std::fmt::Debug {
    /// Item model.
    fn id(&self) -> ItemId;

    /// Item class.
    fn class(&self) -> ItemClass;

    /// Loaded ammo, `None` for items without ammo.
    fn ammo(&self) -> Option<u32> {
        None
    }

    /// Whether the item may attack on `tick`.
    fn can_attack(&self, tick: u64) -> bool;

    /// Performs the primary attack.
    fn fire(&mut self, tick: u64) -> Option<Shot>;

    /// Performs the secondary attack.
    fn fire_secondary(&mut self, _tick: u64) -> Option<Shot> {
        None
    }

    /// Starts a reload. Returns true if one started.
    fn reload(&mut self) -> bool {
        false
    }
}

/// Magazine-fed gun.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firearm {
    /// Model
    pub id: ItemId,
    /// Primary or secondary
    pub class: ItemClass,
    /// Damage per bullet
    pub damage: i32,
    /// Bullet range
    pub range: u32,
    /// Magazine size
    pub magazine: u32,
    /// Loaded rounds
    pub ammo: u32,
    /// Spare rounds
    pub reserve: u32,
    /// Ticks between shots
    pub fire_interval_ticks: u64,
    /// First tick the next shot may happen
    pub next_ready_tick: u64,
}

impl Firearm {
    /// Creates a loaded gun ready to fire.
    #[must_use]
    pub fn new(id: ItemId, class: ItemClass, damage: i32, range: u32, magazine: u32) -> Self {
        Self {
            id,
            class,
            damage,
            range,
            magazine,
            ammo: magazine,
            reserve: magazine * 3,
            fire_interval_ticks: 1,
            next_ready_tick: 0,
        }
    }

    /// A rifle with middle-of-the-road stats.
    #[must_use]
    pub fn rifle() -> Self {
        Self::new(ItemId::new(1), ItemClass::Primary, 36, 4000, 30)
    }

    /// A sidearm.
    #[must_use]
    pub fn pistol() -> Self {
        let mut pistol = Self::new(ItemId::new(2), ItemClass::Secondary, 25, 2500, 12);
        pistol.fire_interval_ticks = 3;
        pistol
    }
}

impl Item for Firearm {
    fn id(&self) -> ItemId {
        self.id
    }

    fn class(&self) -> ItemClass {
        self.class
    }

    fn ammo(&self) -> Option<u32> {
        Some(self.ammo)
    }

    fn can_attack(&self, tick: u64) -> bool {
        tick >= self.next_ready_tick
    }

    fn fire(&mut self, tick: u64) -> Option<Shot> {
        if self.ammo == 0 || !self.can_attack(tick) {
            return None;
        }
        self.ammo -= 1;
        self.next_ready_tick = tick + self.fire_interval_ticks;
        Some(Shot {
            damage: self.damage,
            range: self.range,
        })
    }

    fn reload(&mut self) -> bool {
        if self.ammo >= self.magazine || self.reserve == 0 {
            return false;
        }
        let loaded = (self.magazine - self.ammo).min(self.reserve);
        self.ammo += loaded;
        self.reserve -= loaded;
        true
    }
}

/// Melee knife with a light and a heavy stab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knife {
    /// Model
    pub id: ItemId,
    /// Light stab damage
    pub damage: i32,
    /// Heavy stab damage
    pub secondary_damage: i32,
    /// Reach
    pub range: u32,
    /// Ticks between stabs
    pub interval_ticks: u64,
    /// First tick the next stab may happen
    pub next_ready_tick: u64,
}

impl Default for Knife {
    fn default() -> Self {
        Self {
            id: ItemId::new(3),
            damage: 40,
            secondary_damage: 65,
            range: 60,
            interval_ticks: 6,
            next_ready_tick: 0,
        }
    }
}

impl Knife {
    fn stab(&mut self, tick: u64, damage: i32) -> Option<Shot> {
        if !self.can_attack(tick) {
            return None;
        }
        self.next_ready_tick = tick + self.interval_ticks;
        Some(Shot {
            damage,
            range: self.range,
        })
    }
}

impl Item for Knife {
    fn id(&self) -> ItemId {
        self.id
    }

    fn class(&self) -> ItemClass {
        ItemClass::Knife
    }

    fn can_attack(&self, tick: u64) -> bool {
        tick >= self.next_ready_tick
    }

    fn fire(&mut self, tick: u64) -> Option<Shot> {
        self.stab(tick, self.damage)
    }

    fn fire_secondary(&mut self, tick: u64) -> Option<Shot> {
        self.stab(tick, self.secondary_damage)
    }
}

/// Non-attacking equipment (bomb, grenades, kits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gear {
    /// Model
    pub id: ItemId,
    /// Class
    pub class: ItemClass,
}

impl Item for Gear {
    fn id(&self) -> ItemId {
        self.id
    }

    fn class(&self) -> ItemClass {
        self.class
    }

    fn can_attack(&self, _tick: u64) -> bool {
        false
    }

    fn fire(&mut self, _tick: u64) -> Option<Shot> {
        None
    }
}
