//! Combatant tick system.

use bevy::prelude::*;

use crate::ai::brain::{update_combatant, Fighter, TickContext};
use crate::ai::{CombatProfile, Combatant};
use crate::boss::BossKit;
use crate::clock::CombatClock;
use crate::combat::{projectile_bundle, Alert, CombatCue, PlayerHit, TickReport};
use crate::components::{CameraView, EventGate, Health, Motion, PlayerSnapshot, StreetLayout};
use crate::DeterministicRng;

/// System: run every combatant's state machine for this tick.
///
/// Cues, player hits and throws collected during the tick are flushed as
/// events/entities afterwards; call-for-help alerts are delivered in a second
/// pass so iteration order never decides who hears them.
#[allow(clippy::too_many_arguments)]
pub fn tick_combatants(
    clock: Res<CombatClock>,
    player: Res<PlayerSnapshot>,
    layout: Res<StreetLayout>,
    camera: Res<CameraView>,
    gate: Res<EventGate>,
    mut rng: ResMut<DeterministicRng>,
    mut combatants: Query<(
        Entity,
        &mut Combatant,
        &Health,
        &mut Motion,
        &CombatProfile,
        Option<&mut BossKit>,
    )>,
    mut cue_events: EventWriter<CombatCue>,
    mut hit_events: EventWriter<PlayerHit>,
    mut commands: Commands,
) {
    let ctx = TickContext {
        time: clock.time,
        delta: clock.delta,
        player: Some(player.as_ref()),
        layout: layout.as_ref(),
        camera: camera.as_ref(),
        ai_paused: gate.pauses_ai(),
    };

    let mut alerts: Vec<(Entity, Alert)> = Vec::new();
    let mut report = TickReport::default();

    for (entity, mut combatant, health, mut motion, profile, boss) in combatants.iter_mut() {
        report.clear();
        let mut fighter = Fighter {
            combatant: &mut *combatant,
            health,
            motion: &mut *motion,
            profile: profile.config(),
        };
        update_combatant(
            &mut fighter,
            boss.map(|kit| kit.into_inner()),
            &ctx,
            &mut rng.rng,
            &mut report,
        );

        for kind in report.cues.drain(..) {
            cue_events.write(CombatCue { entity, kind });
        }
        for damage in report.player_hits.drain(..) {
            hit_events.write(PlayerHit {
                attacker: entity,
                damage,
                source: motion.position,
            });
        }
        for throw in report.throws.drain(..) {
            commands.spawn(projectile_bundle(entity, &throw));
        }
        alerts.extend(report.alerts.drain(..).map(|alert| (entity, alert)));
    }

    if alerts.is_empty() {
        return;
    }
    for (entity, mut combatant, _, motion, _, _) in combatants.iter_mut() {
        if combatant.state.is_terminal() {
            continue;
        }
        for (caller, alert) in &alerts {
            if *caller != entity && motion.position.distance(alert.origin) <= alert.radius {
                let until = clock.time + alert.duration_ms;
                let current = combatant.flavor.alerted_until.unwrap_or(until);
                combatant.flavor.alerted_until = Some(current.max(until));
            }
        }
    }
}
