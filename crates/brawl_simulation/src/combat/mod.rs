//! Combat resolution: hitboxes, damage, knockback, projectiles, cues.
//!
//! The AI decides when to swing; this module decides what a swing or a blow
//! does. Everything the host must show or play goes out as `CombatCue`.
//!
//! Order inside `SimulationSet::Resolve`:
//! 1. resolve_player_hits: live hitboxes vs the player hurtbox
//! 2. apply_damage_requests: inbound blows, knockback, deaths, boss jumps
//! 3. update_projectiles: thrown weapons fly, hit or expire

use bevy::prelude::*;

pub mod cues;
pub mod damage;
pub mod hitbox;
pub mod projectile;
pub mod systems;

pub use cues::{Alert, CombatCue, CueKind, TickReport};
pub use damage::{
    apply_knockback, take_damage, CombatantDied, DamageIgnored, DamageOutcome, DamageRequest,
    DamageTarget, PlayerHit, ProtectionFlags,
};
pub use hitbox::{attack_rect, body_radius, hurtbox, overlaps, HitboxSpec};
pub use projectile::{projectile_bundle, Pickup, Projectile, ProjectileStep, ThrowRequest};
pub use systems::*;

use crate::SimulationSet;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatCue>()
            .add_event::<DamageRequest>()
            .add_event::<PlayerHit>()
            .add_event::<CombatantDied>();

        app.add_systems(
            FixedUpdate,
            (
                resolve_player_hits,
                apply_damage_requests,
                update_projectiles,
            )
                .chain()
                .in_set(SimulationSet::Resolve),
        );
    }
}
