//! Walking: horizontal chase with a dead zone plus throttled vertical tracking.

use bevy::prelude::*;

use crate::ai::archetypes::ArchetypeConfig;
use crate::ai::components::Combatant;
use crate::components::{Facing, Motion, PlayerSnapshot};

/// Chases the player: x with a dead zone, y through the vertical tracker.
pub fn move_toward_player(
    combatant: &mut Combatant,
    motion: &mut Motion,
    profile: &ArchetypeConfig,
    player: &PlayerSnapshot,
    delta: f32,
) {
    let dx = player.position.x - motion.position.x;
    chase_x(combatant, motion, dx, profile.stats.speed, profile.movement.dead_zone_x);
    track_player_vertically(combatant, motion, profile, player, delta);
}

/// Walks along `dx` at `speed`, stopping inside the dead zone.
pub fn chase_x(combatant: &mut Combatant, motion: &mut Motion, dx: f32, speed: f32, dead_zone: f32) {
    if dx.abs() > dead_zone {
        motion.velocity.x = dx.signum() * speed;
        if let Some(facing) = Facing::toward(dx) {
            combatant.facing = facing;
        }
    } else {
        motion.velocity.x = 0.0;
    }
}

/// Re-samples the player's y at most once per response window, ignores
/// small changes and (optionally) jumps, then steers toward the sample.
pub fn track_player_vertically(
    combatant: &mut Combatant,
    motion: &mut Motion,
    profile: &ArchetypeConfig,
    player: &PlayerSnapshot,
    delta: f32,
) {
    let tuning = &profile.movement;
    let tracker = &mut combatant.tracker;

    tracker.response_timer -= delta;
    if tracker.response_timer <= 0.0 {
        tracker.response_timer = tuning.vertical_response_ms.max(0.0);

        let ignored = tuning.ignore_player_jumps && player.jumping;
        let moved = tracker
            .last_sample
            .map_or(true, |last| (player.position.y - last).abs() > tuning.vertical_noise);
        if !ignored && moved {
            tracker.last_sample = Some(player.position.y);
            tracker.target_y = Some(player.position.y);
        }
    }

    let speed = profile.stats.speed * tuning.vertical_speed_factor;
    steer_vertical(motion, tracker.target_y, speed, tuning.dead_zone_y);
}

pub fn steer_vertical(motion: &mut Motion, target_y: Option<f32>, speed: f32, dead_zone: f32) {
    motion.velocity.y = match target_y {
        Some(target) => {
            let dy = target - motion.position.y;
            if dy.abs() > dead_zone {
                dy.signum() * speed
            } else {
                0.0
            }
        }
        None => 0.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::archetypes::Archetype;

    fn setup() -> (Combatant, Motion, ArchetypeConfig, PlayerSnapshot) {
        let combatant = Combatant::new(Archetype::Crackhead, 0.0);
        let motion = Motion::at(Vec2::new(500.0, 500.0));
        let profile = ArchetypeConfig::generic(Archetype::Crackhead);
        let player = PlayerSnapshot {
            position: Vec2::new(200.0, 560.0),
            ..Default::default()
        };
        (combatant, motion, profile, player)
    }

    #[test]
    fn test_chase_faces_and_walks_toward_player() {
        let (mut combatant, mut motion, profile, player) = setup();
        move_toward_player(&mut combatant, &mut motion, &profile, &player, 16.0);

        assert_eq!(combatant.facing, Facing::Left);
        assert_eq!(motion.velocity.x, -profile.stats.speed);
        assert!(motion.velocity.y > 0.0);
    }

    #[test]
    fn test_dead_zone_stops_horizontal_motion() {
        let (mut combatant, mut motion, profile, mut player) = setup();
        player.position.x = motion.position.x + profile.movement.dead_zone_x * 0.5;
        move_toward_player(&mut combatant, &mut motion, &profile, &player, 16.0);
        assert_eq!(motion.velocity.x, 0.0);
    }

    #[test]
    fn test_vertical_sample_is_throttled() {
        let (mut combatant, mut motion, profile, mut player) = setup();
        track_player_vertically(&mut combatant, &mut motion, &profile, &player, 16.0);
        assert_eq!(combatant.tracker.target_y, Some(560.0));

        // Inside the response window the new y is not picked up
        player.position.y = 440.0;
        track_player_vertically(&mut combatant, &mut motion, &profile, &player, 16.0);
        assert_eq!(combatant.tracker.target_y, Some(560.0));

        track_player_vertically(
            &mut combatant,
            &mut motion,
            &profile,
            &player,
            profile.movement.vertical_response_ms,
        );
        assert_eq!(combatant.tracker.target_y, Some(440.0));
    }

    #[test]
    fn test_player_jumps_are_ignored() {
        let (mut combatant, mut motion, profile, mut player) = setup();
        player.jumping = true;
        track_player_vertically(&mut combatant, &mut motion, &profile, &player, 16.0);
        assert_eq!(combatant.tracker.target_y, None);
        assert_eq!(motion.velocity.y, 0.0);
    }

    #[test]
    fn test_small_vertical_noise_is_ignored() {
        let (mut combatant, mut motion, profile, mut player) = setup();
        track_player_vertically(&mut combatant, &mut motion, &profile, &player, 16.0);

        player.position.y += profile.movement.vertical_noise * 0.5;
        track_player_vertically(
            &mut combatant,
            &mut motion,
            &profile,
            &player,
            profile.movement.vertical_response_ms,
        );
        assert_eq!(combatant.tracker.target_y, Some(560.0));
    }
}
