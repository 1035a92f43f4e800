//! Tunable simulation parameters.
//!
//! Distances are in world units, speeds in units per tick.

use serde::{Deserialize, Serialize};
use tickshot_common::{ItemId, SimError, SimResult};

use crate::item::ItemClass;
use crate::movement::Gait;

/// Movement speed multiplier for one weapon model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpeed {
    /// Weapon model
    pub item: ItemId,
    /// Multiplier applied to the base movement distance
    pub multiplier: f32,
}

/// Simulation settings shared by every player of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    // === Movement ===
    /// Distance per tick while crouching
    pub move_distance_crouch_per_tick: f32,
    /// Distance per tick while walking
    pub move_distance_walk_per_tick: f32,
    /// Distance per tick while running
    pub move_distance_run_per_tick: f32,
    /// Multiplier while jumping
    pub jump_movement_speed_multiplier: f32,
    /// Multiplier while airborne (not jumping)
    pub flying_movement_speed_multiplier: f32,
    /// Multiplier for primary weapons without an explicit entry
    pub default_primary_speed_multiplier: f32,
    /// Multiplier for secondary weapons without an explicit entry
    pub default_secondary_speed_multiplier: f32,
    /// Per-model multipliers
    pub weapon_speed_multipliers: Vec<WeaponSpeed>,
    /// Highest obstacle (above the feet) a player steps onto automatically
    pub obstacle_overcome_height: i32,

    // === Gravity ===
    /// Fall distance per tick
    pub gravity_per_tick: i32,
    /// Landing after falling more than this kills
    pub lethal_fall_height: i32,

    // === Combat ===
    /// Health at round start
    pub player_health: i32,
    /// Damage multiplier for head hits
    pub headshot_multiplier: f32,
    /// Damage multiplier on an armored zone
    pub armor_damage_factor: f32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            move_distance_crouch_per_tick: 7.0,
            move_distance_walk_per_tick: 11.0,
            move_distance_run_per_tick: 16.0,
            jump_movement_speed_multiplier: 1.0,
            flying_movement_speed_multiplier: 0.8,
            default_primary_speed_multiplier: 0.85,
            default_secondary_speed_multiplier: 0.95,
            weapon_speed_multipliers: Vec::new(),
            obstacle_overcome_height: 20,

            gravity_per_tick: 12,
            lethal_fall_height: 420,

            player_health: 100,
            headshot_multiplier: 4.0,
            armor_damage_factor: 0.5,
        }
    }
}

impl SimSettings {
    /// Base distance per tick for a gait.
    ///
    /// A speed that is not a positive finite number is a configuration error.
    pub fn move_distance(&self, gait: Gait) -> SimResult<f32> {
        let distance = match gait {
            Gait::Crouch => self.move_distance_crouch_per_tick,
            Gait::Walk => self.move_distance_walk_per_tick,
            Gait::Run => self.move_distance_run_per_tick,
        };
        if distance.is_finite() && distance > 0.0 {
            Ok(distance)
        } else {
            Err(SimError::NoMovementSpeed { gait: gait.name() })
        }
    }

    /// Movement multiplier for the equipped item.
    #[must_use]
    pub fn weapon_speed_multiplier(&self, class: ItemClass, item: ItemId) -> f32 {
        let default = match class {
            ItemClass::Primary => self.default_primary_speed_multiplier,
            ItemClass::Secondary => self.default_secondary_speed_multiplier,
            _ => return 1.0,
        };
        self.weapon_speed_multipliers
            .iter()
            .find(|entry| entry.item == item)
            .map_or(default, |entry| entry.multiplier)
    }

    /// Clamp values to sensible ranges.
    ///
    /// Movement distances are left alone: an unusable one is reported when
    /// a player first tries to move with it.
    pub fn validate(&mut self) {
        self.jump_movement_speed_multiplier = self.jump_movement_speed_multiplier.clamp(0.0, 4.0);
        self.flying_movement_speed_multiplier =
            self.flying_movement_speed_multiplier.clamp(0.0, 4.0);
        self.default_primary_speed_multiplier =
            self.default_primary_speed_multiplier.clamp(0.0, 4.0);
        self.default_secondary_speed_multiplier =
            self.default_secondary_speed_multiplier.clamp(0.0, 4.0);
        for entry in &mut self.weapon_speed_multipliers {
            entry.multiplier = entry.multiplier.clamp(0.0, 4.0);
        }
        self.obstacle_overcome_height = self.obstacle_overcome_height.max(0);
        self.gravity_per_tick = self.gravity_per_tick.max(1);
        self.lethal_fall_height = self.lethal_fall_height.max(0);
        self.player_health = self.player_health.max(1);
        self.headshot_multiplier = self.headshot_multiplier.max(1.0);
        self.armor_damage_factor = self.armor_damage_factor.clamp(0.0, 1.0);
    }
}
