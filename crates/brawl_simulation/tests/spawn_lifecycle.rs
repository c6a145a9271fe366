//! Spawn director and lifecycle integration tests
//!
//! - population cap under a fast spawn timer
//! - clear_all
//! - world collision re-enabled once for off-world spawns
//! - cleanup sweep vs protection

use bevy::prelude::*;
use brawl_simulation::spawn::combatant_bundle;
use brawl_simulation::*;

#[derive(Resource, Default)]
struct SeenCues(Vec<(Entity, CueKind)>);

fn collect(mut seen: ResMut<SeenCues>, mut cues: EventReader<CombatCue>) {
    for cue in cues.read() {
        seen.0.push((cue.entity, cue.kind.clone()));
    }
}

fn create_spawn_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .init_resource::<SeenCues>()
        .add_systems(FixedUpdate, collect.after(SimulationSet::Lifecycle));
    app
}

fn disable_spawning(app: &mut App) {
    app.world_mut()
        .resource_mut::<SpawnDirector>()
        .config
        .test_mode = true;
}

fn spawn_enemy(app: &mut App, archetype: Archetype, position: Vec2) -> Entity {
    let bundle = combatant_bundle(
        ArchetypeTable::standard().get(archetype),
        position,
        Facing::Right,
        &StreetLayout::default(),
        0.0,
    );
    app.world_mut().spawn(bundle).id()
}

fn living(app: &mut App) -> usize {
    let world = app.world_mut();
    world
        .query::<&Combatant>()
        .iter(world)
        .filter(|combatant| !combatant.state.is_terminal())
        .count()
}

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

#[test]
fn test_population_never_exceeds_cap() {
    let mut app = create_spawn_app(7);
    let patch = LevelConfigPatch::from_json(r#"{ "base_spawn_interval_ms": 50, "max_enemies": 5 }"#)
        .expect("valid patch");
    app.world_mut().send_event(LevelConfigUpdate(patch));

    for _ in 0..600 {
        app.update();
        assert!(living(&mut app) <= 5);
    }

    assert_eq!(living(&mut app), 5);
    let stats = app.world().resource::<SpawnDirector>().stats;
    assert_eq!(stats.spawned, 5);
    assert!(stats.rejected > 0);
}

#[test]
fn test_first_segment_spawns_from_the_right_offscreen() {
    let mut app = create_spawn_app(3);
    let patch = LevelConfigPatch::from_json(r#"{ "base_spawn_interval_ms": 100 }"#)
        .expect("valid patch");
    app.world_mut().send_event(LevelConfigUpdate(patch));
    run(&mut app, 20);

    let world = app.world_mut();
    let xs: Vec<f32> = world
        .query_filtered::<&Motion, With<Combatant>>()
        .iter(world)
        .map(|motion| motion.position.x)
        .collect();
    assert!(!xs.is_empty());
    // Camera spans 0..1280; spawns land past the margin
    assert!(xs.iter().all(|x| *x > 1280.0));
}

#[test]
fn test_bad_patch_keeps_config() {
    let mut app = create_spawn_app(3);
    let patch = LevelConfigPatch::from_json(r#"{ "allowed_archetypes": ["critic"] }"#)
        .expect("parses");
    app.world_mut().send_event(LevelConfigUpdate(patch));
    run(&mut app, 2);

    let config = &app.world().resource::<SpawnDirector>().config;
    assert!(config.allowed_archetypes.is_empty());
}

#[test]
fn test_clear_all_removes_everything() {
    let mut app = create_spawn_app(1);
    disable_spawning(&mut app);
    for i in 0..3 {
        spawn_enemy(&mut app, Archetype::Crackhead, Vec2::new(900.0 + i as f32 * 80.0, 520.0));
    }
    app.world_mut()
        .spawn((Pickup { heal: 20.0 }, Motion::at(Vec2::new(500.0, 520.0))));
    run(&mut app, 2);

    app.world_mut().send_event(ClearAllRequested);
    run(&mut app, 2);

    let world = app.world_mut();
    assert_eq!(world.query::<&Combatant>().iter(world).count(), 0);
    assert_eq!(world.query::<&Pickup>().iter(world).count(), 0);
    assert_eq!(world.resource::<SpawnDirector>().timer, 0.0);
}

#[test]
fn test_offworld_spawn_gets_collision_back_once() {
    let mut app = create_spawn_app(5);
    disable_spawning(&mut app);
    let crackhead = spawn_enemy(&mut app, Archetype::Crackhead, Vec2::new(-60.0, 520.0));
    {
        let mut combatant = app
            .world_mut()
            .get_mut::<Combatant>(crackhead)
            .expect("spawned");
        combatant.world_collision = false;
        combatant.reenable_world_bounds_on_entry = true;
    }

    run(&mut app, 240);

    let combatant = app.world().get::<Combatant>(crackhead).expect("alive");
    assert!(combatant.world_collision);
    assert!(!combatant.reenable_world_bounds_on_entry);
    let toggles = app
        .world()
        .resource::<SeenCues>()
        .0
        .iter()
        .filter(|(entity, cue)| {
            *entity == crackhead && *cue == CueKind::WorldCollision { enabled: true }
        })
        .count();
    assert_eq!(toggles, 1);
}

#[test]
fn test_straggler_behind_player_is_cleaned_after_grace() {
    let mut app = create_spawn_app(9);
    disable_spawning(&mut app);
    {
        let mut player = app.world_mut().resource_mut::<PlayerSnapshot>();
        player.position = Vec2::new(2000.0, 520.0);
        player.velocity.x = 100.0;
    }
    let straggler = spawn_enemy(&mut app, Archetype::BlackThug, Vec2::new(100.0, 560.0));

    // Grace period still running
    run(&mut app, 60);
    assert!(app.world().get_entity(straggler).is_ok());

    run(&mut app, 180);
    assert!(app.world().get_entity(straggler).is_err());
    assert_eq!(app.world().resource::<SpawnDirector>().stats.cleaned, 1);
}

#[test]
fn test_cleanup_protection_and_bosses_survive_the_sweep() {
    let mut app = create_spawn_app(9);
    disable_spawning(&mut app);
    {
        let mut player = app.world_mut().resource_mut::<PlayerSnapshot>();
        player.position = Vec2::new(4000.0, 520.0);
    }
    let kept = spawn_enemy(&mut app, Archetype::GreenThug, Vec2::new(100.0, 520.0));
    let mut protected = ProtectedSet::default();
    protected.cleanup.insert(kept);
    app.insert_resource(Protection::new(protected));

    app.world_mut().send_event(SpawnBossRequest {
        archetype: Archetype::Critic,
    });

    run(&mut app, 240);

    assert!(app.world().get_entity(kept).is_ok());
    let world = app.world_mut();
    assert_eq!(world.query::<&BossKit>().iter(world).count(), 1);
    assert_eq!(world.resource::<SpawnDirector>().stats.cleaned, 0);
}

#[test]
fn test_visual_destroyed_is_pruned_immediately() {
    let mut app = create_spawn_app(9);
    disable_spawning(&mut app);
    let ghost = spawn_enemy(&mut app, Archetype::Crackhead, Vec2::new(900.0, 520.0));
    run(&mut app, 2);

    app.world_mut().entity_mut(ghost).insert(VisualDestroyed);
    run(&mut app, 2);

    assert!(app.world().get_entity(ghost).is_err());
}
