//! Determinism tests
//!
//! Same seed, same host inputs: identical spawn positions, states and stats.

use bevy::prelude::*;
use brawl_simulation::*;

/// Player walks right down the street; camera follows.
fn drive_player(app: &mut App) {
    let world = app.world_mut();
    let mut player = world.resource_mut::<PlayerSnapshot>();
    player.velocity.x = 120.0;
    player.position.x += 2.0;
    let player_x = player.position.x;

    let mut camera = world.resource_mut::<CameraView>();
    camera.left = (player_x - camera.width * 0.5).max(0.0);
}

fn run_simulation(seed: u64, ticks: usize) -> (Vec<u8>, Vec<u8>, SpawnStats) {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    let patch = LevelConfigPatch::from_json(r#"{ "base_spawn_interval_ms": 400 }"#)
        .expect("valid patch");
    app.world_mut().send_event(LevelConfigUpdate(patch));

    for _ in 0..ticks {
        drive_player(&mut app);
        app.update();
    }

    let motions = world_snapshot::<Motion>(app.world_mut());
    let combatants = world_snapshot::<Combatant>(app.world_mut());
    let stats = app.world().resource::<SpawnDirector>().stats;
    (motions, combatants, stats)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let first = run_simulation(SEED, 900);
    let second = run_simulation(SEED, 900);

    assert!(first.2.spawned > 0);
    assert_eq!(first.2, second.2);
    assert_eq!(first.0, second.0, "motion diverged for seed {}", SEED);
    assert_eq!(first.1, second.1, "combatant state diverged for seed {}", SEED);
}

#[test]
fn test_determinism_multiple_runs() {
    let runs: Vec<_> = (0..3).map(|_| run_simulation(42, 600)).collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(runs[0], *run, "run {} differs from run 0", i);
    }
}
