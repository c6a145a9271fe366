//! Hit resolution against the player: melee swings and projectiles.

use bevy::prelude::*;

use crate::ai::{ArchetypeConfig, CombatProfile, Combatant};
use crate::clock::CombatClock;
use crate::combat::damage::PlayerHit;
use crate::combat::hitbox::overlaps;
use crate::combat::projectile::{step_projectile, Projectile, ProjectileStep};
use crate::components::{Motion, PlayerSnapshot};

/// One connect per swing: returns the damage the first time the live hitbox
/// overlaps the player's hurtbox. Scripted swings resolve themselves.
pub fn check_swing_hit(
    combatant: &mut Combatant,
    motion: &Motion,
    profile: &ArchetypeConfig,
    hurtbox: Rect,
) -> Option<f32> {
    if combatant.scripted_attack || combatant.swing_connected {
        return None;
    }
    let hitbox = combatant.attack_hitbox(profile, motion)?;
    if !overlaps(hitbox, hurtbox) {
        return None;
    }
    combatant.swing_connected = true;
    Some(profile.stats.player_damage)
}

/// System: poll every live attack hitbox against the player.
pub fn resolve_player_hits(
    player: Res<PlayerSnapshot>,
    mut attackers: Query<(Entity, &mut Combatant, &Motion, &CombatProfile)>,
    mut hit_events: EventWriter<PlayerHit>,
) {
    if !player.present {
        return;
    }
    let hurtbox = player.hurtbox();

    for (entity, mut combatant, motion, profile) in attackers.iter_mut() {
        if let Some(damage) = check_swing_hit(&mut combatant, motion, profile.config(), hurtbox) {
            hit_events.write(PlayerHit {
                attacker: entity,
                damage,
                source: motion.position,
            });
        }
    }
}

/// System: fly projectiles, hit the player once, despawn on hit or expiry.
pub fn update_projectiles(
    clock: Res<CombatClock>,
    player: Res<PlayerSnapshot>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Motion)>,
    mut hit_events: EventWriter<PlayerHit>,
    mut commands: Commands,
) {
    for (entity, mut projectile, mut motion) in projectiles.iter_mut() {
        match step_projectile(&mut projectile, &mut motion, clock.delta, Some(&player)) {
            ProjectileStep::Flying => {}
            ProjectileStep::HitPlayer(damage) => {
                hit_events.write(PlayerHit {
                    attacker: projectile.owner,
                    damage,
                    source: motion.position,
                });
                commands.entity(entity).despawn();
            }
            ProjectileStep::Expired => {
                commands.entity(entity).despawn();
            }
        }
    }
}
