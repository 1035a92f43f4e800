//! Aim state, recoil and shot tracing.

use serde::{Deserialize, Serialize};
use tickshot_common::{Point, SimResult};

use crate::bullet::Bullet;
use crate::hit::HitTarget;
use crate::item::ItemClass;
use crate::movement::{normalize_angle, Stance};
use crate::rng::RandomSource;
use crate::world::World;

/// Where a player is looking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AimState {
    /// Heading in degrees, `[0, 360)`, 0 is +Z
    pub rotation_horizontal: f32,
    /// Pitch in degrees, `[-90, 90]`, positive is up
    pub rotation_vertical: f32,
    /// Set once an attack was attempted this tick
    pub is_attacking: bool,
}

impl AimState {
    /// Points the view, normalizing heading and clamping pitch.
    pub fn look_at(&mut self, horizontal: f32, vertical: f32) {
        self.rotation_horizontal = normalize_angle(horizontal);
        self.rotation_vertical = vertical.clamp(-90.0, 90.0);
    }
}

/// Angular offset added to the view when firing, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Recoil {
    /// Heading offset
    pub horizontal: f32,
    /// Pitch offset
    pub vertical: f32,
}

fn signed<R: RandomSource + ?Sized>(rng: &mut R, value: f32) -> f32 {
    if rng.coin() {
        -value
    } else {
        value
    }
}

fn tenths<R: RandomSource + ?Sized>(rng: &mut R, min: i32, max: i32) -> f32 {
    rng.int_in(min, max) as f32 / 10.0
}

/// Recoil caused by the shooter's stance and motion.
///
/// Airborne shots spread widest, running shots more than walking ones;
/// crouched or standing shots and melee or utility items never spread.
pub fn movement_recoil<R: RandomSource + ?Sized>(
    class: ItemClass,
    stance: &Stance,
    moving: bool,
    rng: &mut R,
) -> Recoil {
    if class.ignores_recoil() {
        return Recoil::default();
    }
    let primary = class == ItemClass::Primary;

    let (horizontal, vertical) = if stance.flying {
        if primary {
            (rng.int_in(15, 25) as f32, rng.int_in(8, 16) as f32)
        } else {
            (rng.int_in(10, 11) as f32, rng.int_in(6, 12) as f32)
        }
    } else if stance.crouching || !moving {
        return Recoil::default();
    } else if stance.walking {
        if primary {
            (rng.int_in(2, 4) as f32, rng.int_in(2, 3) as f32)
        } else {
            let horizontal = if rng.coin() {
                tenths(rng, 10, 19)
            } else {
                tenths(rng, 4, 12)
            };
            let vertical = if rng.coin() {
                tenths(rng, 8, 14)
            } else {
                tenths(rng, 7, 9)
            };
            (horizontal, vertical)
        }
    } else if primary {
        (rng.int_in(3, 9) as f32, rng.int_in(5, 15) as f32)
    } else {
        (rng.int_in(3, 7) as f32, rng.int_in(4, 6) as f32)
    };

    Recoil {
        horizontal: signed(rng, horizontal),
        vertical: signed(rng, vertical),
    }
}

/// Everything a single attack produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackResult {
    /// Muzzle point
    pub origin: Point,
    /// Applied recoil
    pub recoil: Recoil,
    /// Ordered hits: players first, then at most one terrain hit
    pub hits: Vec<HitTarget>,
}

/// Moves a bullet one unit at a time until it hits terrain, leaves the
/// ground or runs out of range.
pub fn trace_bullet(world: &mut World, bullet: &mut Bullet, range: u32) -> SimResult<Vec<HitTarget>> {
    let mut hits = Vec::new();
    for _ in 0..range {
        bullet.advance();
        if bullet.position().y < 0 {
            break;
        }
        for hit in world.calculate_hits(bullet)? {
            let terrain = hit.is_terrain();
            hits.push(hit);
            if terrain {
                return Ok(hits);
            }
        }
    }
    Ok(hits)
}
