//! Spawn and lifecycle systems.

use std::sync::Arc;

use bevy::prelude::*;
use rand::Rng;

use crate::ai::behaviors::seed_flavor_timers;
use crate::ai::{Archetype, ArchetypeConfig, ArchetypeTable, CombatProfile, CombatState, Combatant};
use crate::boss::{BossKit, EdgeSide};
use crate::clock::CombatClock;
use crate::combat::{CombatCue, CueKind, Pickup, Projectile};
use crate::components::{
    CameraView, EventGate, Facing, Health, Motion, PlayerSnapshot, StreetLayout, WorldBounds,
};
use crate::error::ConfigError;
use crate::logger;
use crate::protection::Protection;
use crate::spawn::cleanup::{cleanup_verdict, VisualDestroyed};
use crate::spawn::config::LevelConfigPatch;
use crate::spawn::director::SpawnDirector;
use crate::spawn::placement::{plan_spawn, RosterEntry, SpawnSide};
use crate::DeterministicRng;

/// Inbound: remove every combatant, projectile and pickup (level reset).
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ClearAllRequested;

/// Inbound: merge a partial level config.
#[derive(Event, Debug, Clone)]
pub struct LevelConfigUpdate(pub LevelConfigPatch);

/// Inbound: scripted boss entrance (event systems own boss fights).
#[derive(Event, Debug, Clone, Copy)]
pub struct SpawnBossRequest {
    pub archetype: Archetype,
}

/// Heal granted by a dropped pickup.
pub const PICKUP_HEAL: f32 = 20.0;

/// Components every combatant spawns with.
pub type CombatantBundle = (Combatant, Health, Motion, Name, CombatProfile);

pub fn combatant_bundle(
    profile: Arc<ArchetypeConfig>,
    position: Vec2,
    facing: Facing,
    layout: &StreetLayout,
    time: f32,
) -> CombatantBundle {
    let mut combatant = Combatant::new(profile.archetype, time);
    combatant.facing = facing;
    combatant.apply_perspective(layout, position.y);
    seed_flavor_timers(&mut combatant.flavor, &profile.flavor, time);

    (
        combatant,
        Health::new(profile.stats.max_health),
        Motion::at(position),
        Name::new(profile.archetype.name()),
        CombatProfile(profile),
    )
}

/// Boss entering at the camera edge farther from the player.
pub fn boss_bundle(
    profile: Arc<ArchetypeConfig>,
    player_x: f32,
    camera: &CameraView,
    layout: &StreetLayout,
    time: f32,
) -> Result<(CombatantBundle, BossKit), ConfigError> {
    let config = profile
        .boss
        .ok_or(ConfigError::NotABoss(profile.archetype.name()))?;
    let edge = EdgeSide::away_from(player_x, camera);
    let kit = BossKit::new(config, edge);
    let position = Vec2::new(edge.x_on(camera, kit.edge_margin()), layout.middle());

    Ok((
        combatant_bundle(profile, position, edge.facing(), layout, time),
        kit,
    ))
}

/// System: apply queued level config patches.
pub fn apply_level_updates(
    mut updates: EventReader<LevelConfigUpdate>,
    mut director: ResMut<SpawnDirector>,
) {
    for LevelConfigUpdate(patch) in updates.read() {
        if let Err(err) = director.apply_patch(patch) {
            logger::log_error(&format!("Level config patch rejected: {}", err));
        }
    }
}

/// System: spawn requested bosses at the camera edge away from the player.
#[allow(clippy::too_many_arguments)]
pub fn handle_boss_requests(
    mut requests: EventReader<SpawnBossRequest>,
    clock: Res<CombatClock>,
    player: Res<PlayerSnapshot>,
    camera: Res<CameraView>,
    layout: Res<StreetLayout>,
    table: Res<ArchetypeTable>,
    mut director: ResMut<SpawnDirector>,
    mut commands: Commands,
) {
    for request in requests.read() {
        let profile = table.get(request.archetype);
        match boss_bundle(profile, player.position.x, &camera, &layout, clock.time) {
            Ok(bundle) => {
                let edge = bundle.1.edge;
                commands.spawn(bundle);
                director.stats.spawned += 1;
                logger::log_info(&format!(
                    "Boss {} enters on the {:?} edge",
                    request.archetype.name(),
                    edge
                ));
            }
            Err(err) => logger::log_error(&format!("Boss spawn refused: {}", err)),
        }
    }
}

/// System: clear the level on request.
pub fn handle_clear_all(
    mut requests: EventReader<ClearAllRequested>,
    mut director: ResMut<SpawnDirector>,
    entities: Query<Entity, Or<(With<Combatant>, With<Projectile>, With<Pickup>)>>,
    mut commands: Commands,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let mut removed = 0;
    for entity in entities.iter() {
        commands.entity(entity).despawn();
        removed += 1;
    }
    director.reset_timer();
    logger::log_info(&format!("Clear all: removed {} entities", removed));
}

/// System: cleanup sweep, then the spawn timer.
///
/// Removals go through `Commands`, so nothing leaves the roster while it is
/// being walked.
#[allow(clippy::too_many_arguments)]
pub fn run_director(
    clock: Res<CombatClock>,
    player: Res<PlayerSnapshot>,
    camera: Res<CameraView>,
    bounds: Res<WorldBounds>,
    layout: Res<StreetLayout>,
    gate: Res<EventGate>,
    table: Res<ArchetypeTable>,
    protection: Res<Protection>,
    mut director: ResMut<SpawnDirector>,
    mut rng: ResMut<DeterministicRng>,
    roster: Query<(Entity, &Combatant, &Motion, Has<BossKit>, Has<VisualDestroyed>)>,
    mut cue_events: EventWriter<CombatCue>,
    mut commands: Commands,
) {
    let mut live = Vec::new();
    for (entity, combatant, motion, is_boss, visual_destroyed) in roster.iter() {
        let entry = RosterEntry {
            entity,
            position: motion.position,
            state: combatant.state,
            is_boss,
            spawned_at: combatant.spawned_at,
            visual_destroyed,
        };
        let protected = protection.is_protected_from_cleanup(entity, combatant);
        match cleanup_verdict(&entry, &player, &camera, &director.config, clock.time, protected) {
            Some(reason) => {
                commands.entity(entity).despawn();
                director.stats.cleaned += 1;
                logger::log(&format!(
                    "Cleanup: {} {:?} ({:?})",
                    combatant.archetype.name(),
                    entity,
                    reason
                ));
            }
            None => live.push(entry),
        }
    }

    let blocked = gate.blocks_spawning() || !player.present;
    if !director.tick(clock.delta, player.health_fraction, blocked, &mut rng.rng) {
        return;
    }

    let plan = plan_spawn(
        &director.config,
        &live,
        &player,
        &camera,
        &bounds,
        &layout,
        &table,
        &mut rng.rng,
    );
    let plan = match plan {
        Ok(plan) => plan,
        Err(reason) => {
            director.stats.rejected += 1;
            logger::log(&format!("Spawn rejected: {:?}", reason));
            return;
        }
    };

    let facing = match plan.side {
        SpawnSide::Right => Facing::Left,
        SpawnSide::Left => Facing::Right,
    };
    let mut bundle = combatant_bundle(
        table.get(plan.archetype),
        plan.position,
        facing,
        &layout,
        clock.time,
    );
    if plan.outside_world {
        bundle.0.world_collision = false;
        bundle.0.reenable_world_bounds_on_entry = true;
    }
    let entity = commands.spawn(bundle).id();
    if plan.outside_world {
        cue_events.write(CombatCue {
            entity,
            kind: CueKind::WorldCollision { enabled: false },
        });
    }

    director.stats.spawned += 1;
    logger::log_info(&format!(
        "Spawned {} at ({:.0}, {:.0}) from the {:?}",
        plan.archetype.name(),
        plan.position.x,
        plan.position.y,
        plan.side
    ));
}

/// System: give world collision back once an off-world spawn walks in.
pub fn reenable_world_bounds(
    bounds: Res<WorldBounds>,
    mut combatants: Query<(Entity, &mut Combatant, &Motion, &CombatProfile)>,
    mut cue_events: EventWriter<CombatCue>,
) {
    for (entity, mut combatant, motion, profile) in combatants.iter_mut() {
        if !combatant.reenable_world_bounds_on_entry {
            continue;
        }
        let radius = combatant.body_radius(profile.config());
        if combatant.check_world_reentry(motion.position.x, radius, &bounds) {
            cue_events.write(CombatCue {
                entity,
                kind: CueKind::WorldCollision { enabled: true },
            });
        }
    }
}

/// System: fade out corpses, despawn after the linger, maybe drop a pickup.
pub fn expire_dead_combatants(
    clock: Res<CombatClock>,
    mut director: ResMut<SpawnDirector>,
    mut rng: ResMut<DeterministicRng>,
    mut corpses: Query<(Entity, &mut Combatant, &Motion, &CombatProfile)>,
    mut commands: Commands,
) {
    for (entity, mut combatant, motion, profile) in &mut corpses {
        if combatant.state != CombatState::Dead || !combatant.tick_linger(clock.delta) {
            continue;
        }
        commands.entity(entity).despawn();
        director.stats.died += 1;

        let chance = profile.config().drop_chance.clamp(0.0, 1.0);
        if chance > 0.0 && rng.rng.gen_bool(chance) {
            commands.spawn((
                Pickup { heal: PICKUP_HEAL },
                Motion::at(motion.position),
                Name::new("pickup"),
            ));
        }
    }
}
