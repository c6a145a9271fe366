//! Headless brawl simulation
//!
//! Runs the director and the AI against a player walking right down the
//! street, then prints the spawn statistics.

use brawl_simulation::{
    create_headless_app, log_info, CameraView, Combatant, PlayerSnapshot, SimulationPlugin,
    SpawnDirector,
};

fn main() {
    let seed = 42;
    println!("Starting brawl headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    for tick in 0..3600 {
        {
            let world = app.world_mut();
            let mut player = world.resource_mut::<PlayerSnapshot>();
            player.velocity.x = 120.0;
            player.position.x += 2.0;
            let player_x = player.position.x;

            let mut camera = world.resource_mut::<CameraView>();
            camera.left = (player_x - camera.width * 0.5).max(0.0);
        }

        app.update();

        if tick % 600 == 0 {
            let world = app.world_mut();
            let combatants = world.query::<&Combatant>().iter(world).count();
            log_info(&format!("Tick {}: {} combatants", tick, combatants));
        }
    }

    let stats = app.world().resource::<SpawnDirector>().stats;
    match serde_json::to_string_pretty(&stats) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Failed to serialize spawn stats: {}", err),
    }
    println!("Simulation complete!");
}
