//! Thrown weapons in flight.

use bevy::prelude::*;

use crate::boss::WeaponKind;
use crate::combat::overlaps;
use crate::components::{Motion, PlayerSnapshot};

/// A throw decided during a boss tick, spawned as an entity afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowRequest {
    pub weapon: WeaponKind,
    pub origin: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub lifetime_ms: f32,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Motion)]
pub struct Projectile {
    pub owner: Entity,
    pub weapon: WeaponKind,
    pub damage: f32,
    pub remaining_ms: f32,
    pub half_size: Vec2,
}

impl Projectile {
    pub fn weapon_half_size(weapon: WeaponKind) -> Vec2 {
        match weapon {
            WeaponKind::Bottle => Vec2::new(8.0, 12.0),
            WeaponKind::Brick => Vec2::new(12.0, 8.0),
            WeaponKind::Pipe => Vec2::new(24.0, 6.0),
        }
    }

    pub fn hitbox(&self, motion: &Motion) -> Rect {
        Rect::from_center_half_size(motion.position, self.half_size)
    }
}

pub fn projectile_bundle(owner: Entity, request: &ThrowRequest) -> impl Bundle {
    (
        Projectile {
            owner,
            weapon: request.weapon,
            damage: request.damage,
            remaining_ms: request.lifetime_ms,
            half_size: Projectile::weapon_half_size(request.weapon),
        },
        Motion {
            position: request.origin,
            velocity: request.velocity,
        },
        Name::new(format!("{:?}", request.weapon)),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileStep {
    Flying,
    HitPlayer(f32),
    Expired,
}

/// Moves a projectile one tick and checks it against the player.
pub fn step_projectile(
    projectile: &mut Projectile,
    motion: &mut Motion,
    delta: f32,
    player: Option<&PlayerSnapshot>,
) -> ProjectileStep {
    motion.integrate(delta);
    projectile.remaining_ms -= delta;

    if let Some(player) = player.filter(|player| player.present) {
        if overlaps(projectile.hitbox(motion), player.hurtbox()) {
            return ProjectileStep::HitPlayer(projectile.damage);
        }
    }
    if projectile.remaining_ms <= 0.0 {
        return ProjectileStep::Expired;
    }
    ProjectileStep::Flying
}

/// Health pickup dropped by a dead enemy.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Motion)]
pub struct Pickup {
    pub heal: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bottle(origin: Vec2, velocity: Vec2) -> (Projectile, Motion) {
        let request = ThrowRequest {
            weapon: WeaponKind::Bottle,
            origin,
            velocity,
            damage: 8.0,
            lifetime_ms: 1000.0,
        };
        (
            Projectile {
                owner: Entity::PLACEHOLDER,
                weapon: request.weapon,
                damage: request.damage,
                remaining_ms: request.lifetime_ms,
                half_size: Projectile::weapon_half_size(request.weapon),
            },
            Motion {
                position: origin,
                velocity,
            },
        )
    }

    #[test]
    fn test_projectile_hits_player_in_path() {
        let player = PlayerSnapshot {
            position: Vec2::new(300.0, 500.0),
            ..Default::default()
        };
        let (mut projectile, mut motion) = bottle(Vec2::new(500.0, 500.0), Vec2::new(-400.0, 0.0));

        let mut hit = None;
        for _ in 0..60 {
            match step_projectile(&mut projectile, &mut motion, 16.0, Some(&player)) {
                ProjectileStep::Flying => continue,
                other => {
                    hit = Some(other);
                    break;
                }
            }
        }
        assert_eq!(hit, Some(ProjectileStep::HitPlayer(8.0)));
    }

    #[test]
    fn test_projectile_expires() {
        let (mut projectile, mut motion) = bottle(Vec2::ZERO, Vec2::new(100.0, 0.0));
        assert_eq!(
            step_projectile(&mut projectile, &mut motion, 999.0, None),
            ProjectileStep::Flying
        );
        assert_eq!(
            step_projectile(&mut projectile, &mut motion, 1.0, None),
            ProjectileStep::Expired
        );
    }
}
