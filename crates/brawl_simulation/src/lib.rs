//! Brawl Simulation Core
//!
//! Headless Bevy 0.16 ECS core of a side-scrolling beat-'em-up: enemy AI,
//! bosses, hit resolution and the spawn director.
//!
//! The host (renderer, audio, input, camera) stays outside:
//! - it writes `PlayerSnapshot`, `CameraView`, `WorldBounds`, `EventGate`
//! - it sends `DamageRequest`, `LevelConfigUpdate`, `ClearAllRequested`,
//!   `SpawnBossRequest`
//! - it reads `CombatCue` and `PlayerHit` events and the ECS positions

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod boss;
pub mod clock;
pub mod combat;
pub mod components;
pub mod error;
pub mod logger;
pub mod protection;
pub mod spawn;

pub use ai::{
    AIPlugin, Archetype, ArchetypeConfig, ArchetypeTable, CombatProfile, CombatState, Combatant,
};
pub use boss::{BossConfig, BossKit, EdgeSide, JumpStyle, WeaponKind};
pub use clock::{advance_combat_clock, CombatClock};
pub use combat::{
    CombatCue, CombatPlugin, CombatantDied, CueKind, DamageRequest, Pickup, PlayerHit, Projectile,
};
pub use components::*;
pub use error::ConfigError;
pub use logger::*;
pub use protection::{NoProtection, ProtectedSet, Protection, ProtectionPolicy};
pub use spawn::{
    ClearAllRequested, LevelConfig, LevelConfigPatch, LevelConfigUpdate, SpawnBossRequest,
    SpawnDirector, SpawnPlugin, SpawnStats, VisualDestroyed,
};

/// Tick phases, chained in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Mirror the fixed step into `CombatClock`
    Clock,
    /// Config merges, clear-all, cleanup sweep, spawning
    Director,
    /// Combatant state machines
    Agents,
    /// Hits, inbound damage, projectiles
    Resolve,
    /// Corpse linger and drops
    Lifecycle,
}

/// Main simulation plugin (all subsystems)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Keep a seed chosen by `create_headless_app`
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // 60Hz fixed tick; combat timers run in ms off this step
            .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
            .init_resource::<CombatClock>()
            .init_resource::<PlayerSnapshot>()
            .init_resource::<StreetLayout>()
            .init_resource::<WorldBounds>()
            .init_resource::<CameraView>()
            .init_resource::<EventGate>()
            .init_resource::<Protection>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Clock,
                    SimulationSet::Director,
                    SimulationSet::Agents,
                    SimulationSet::Resolve,
                    SimulationSet::Lifecycle,
                )
                    .chain(),
            )
            .add_systems(FixedUpdate, advance_combat_clock.in_set(SimulationSet::Clock))
            .add_plugins((CombatPlugin, AIPlugin, SpawnPlugin));
    }
}

pub const FIXED_HZ: f64 = 60.0;

/// Seeded RNG resource; every random roll in the simulation draws from it.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal headless Bevy app.
///
/// Time advances by exactly one fixed step per `app.update()`, so runs do not
/// depend on wall-clock timing.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    let step = std::time::Duration::from_secs_f64(1.0 / FIXED_HZ);
    app.add_plugins(MinimalPlugins)
        .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(step))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ));

    app
}

/// Byte snapshot of every `T` in the world, ordered by entity index.
pub fn world_snapshot<T>(world: &mut World) -> Vec<u8>
where
    T: Component + std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
