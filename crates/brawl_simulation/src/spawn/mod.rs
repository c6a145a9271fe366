//! Spawn director and entity lifecycle.
//!
//! Order inside `SimulationSet::Director`:
//! 1. apply_level_updates: merge queued config patches
//! 2. handle_clear_all: level reset
//! 3. handle_boss_requests: scripted boss entrances
//! 4. run_director: cleanup sweep, spawn timer, placement
//! 5. reenable_world_bounds: off-world spawns walking in
//!
//! Corpses expire in `SimulationSet::Lifecycle`, after damage resolution.

use bevy::prelude::*;

pub mod cleanup;
pub mod config;
pub mod director;
pub mod placement;
pub mod systems;

pub use cleanup::{cleanup_verdict, CleanupReason, VisualDestroyed};
pub use config::{LevelConfig, LevelConfigPatch};
pub use director::{SpawnDirector, SpawnStats};
pub use placement::{plan_spawn, RosterEntry, SpawnPlan, SpawnRejection, SpawnSide};
pub use systems::*;

use crate::SimulationSet;

pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnDirector>()
            .add_event::<ClearAllRequested>()
            .add_event::<LevelConfigUpdate>()
            .add_event::<SpawnBossRequest>();

        app.add_systems(
            FixedUpdate,
            (
                apply_level_updates,
                handle_clear_all,
                handle_boss_requests,
                run_director,
                reenable_world_bounds,
            )
                .chain()
                .in_set(SimulationSet::Director),
        )
        .add_systems(
            FixedUpdate,
            expire_dead_combatants.in_set(SimulationSet::Lifecycle),
        );
    }
}
