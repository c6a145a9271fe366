//! Cleanup sweep verdicts.

use bevy::prelude::*;

use crate::ai::CombatState;
use crate::components::{CameraView, PlayerSnapshot};
use crate::spawn::config::LevelConfig;
use crate::spawn::placement::RosterEntry;

/// Host marker: the combatant's visual was destroyed outside the simulation.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct VisualDestroyed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupReason {
    VisualDestroyed,
    TooFar,
    /// Left behind an advancing player
    BehindPlayer,
    Offscreen,
}

/// Decides whether the sweep removes `entry`. Checks run in a fixed order:
/// bosses, corpses, destroyed visuals, protection, grace period, distance,
/// far-left off-screen. Corpses leave through their own linger.
pub fn cleanup_verdict(
    entry: &RosterEntry,
    player: &PlayerSnapshot,
    camera: &CameraView,
    config: &LevelConfig,
    time: f32,
    protected: bool,
) -> Option<CleanupReason> {
    if entry.is_boss || entry.state == CombatState::Dead {
        return None;
    }
    if entry.visual_destroyed {
        return Some(CleanupReason::VisualDestroyed);
    }
    if protected {
        return None;
    }
    if time - entry.spawned_at < config.grace_period_ms {
        return None;
    }

    let behind = entry.position.x < player.position.x && player.advancing();
    let threshold = if behind {
        config.behind_cleanup_distance
    } else {
        config.cleanup_distance
    };
    if entry.position.distance(player.position) > threshold {
        return Some(if behind {
            CleanupReason::BehindPlayer
        } else {
            CleanupReason::TooFar
        });
    }

    if entry.position.x < camera.left - config.offscreen_cleanup_margin {
        return Some(CleanupReason::Offscreen);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(x: f32) -> RosterEntry {
        RosterEntry {
            entity: Entity::PLACEHOLDER,
            position: Vec2::new(x, 520.0),
            state: CombatState::Walking,
            is_boss: false,
            spawned_at: 0.0,
            visual_destroyed: false,
        }
    }

    fn player_at(x: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            position: Vec2::new(x, 520.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_bosses_and_protected_are_never_cleaned() {
        let config = LevelConfig::default();
        let camera = CameraView::default();
        let mut boss = entry(-5000.0);
        boss.is_boss = true;
        boss.visual_destroyed = true;

        assert_eq!(cleanup_verdict(&boss, &player_at(3000.0), &camera, &config, 1e6, false), None);
        assert_eq!(cleanup_verdict(&entry(-5000.0), &player_at(3000.0), &camera, &config, 1e6, true), None);
    }

    #[test]
    fn test_grace_period_shields_fresh_spawns() {
        let config = LevelConfig::default();
        let camera = CameraView::default();
        let far = entry(9000.0);

        assert_eq!(cleanup_verdict(&far, &player_at(0.0), &camera, &config, 100.0, false), None);
        assert_eq!(
            cleanup_verdict(&far, &player_at(0.0), &camera, &config, config.grace_period_ms, false),
            Some(CleanupReason::TooFar)
        );
    }

    #[test]
    fn test_tighter_threshold_behind_advancing_player() {
        let config = LevelConfig::default();
        let camera = CameraView {
            left: 1500.0,
            ..Default::default()
        };
        let straggler = entry(1000.0);
        let mut player = player_at(2000.0);

        // 1000px behind: past the behind threshold, inside the general one
        assert_eq!(
            cleanup_verdict(&straggler, &player, &camera, &config, 10_000.0, false),
            Some(CleanupReason::BehindPlayer)
        );

        player.velocity.x = -100.0;
        player.facing = crate::components::Facing::Left;
        assert_eq!(
            cleanup_verdict(&straggler, &player, &camera, &config, 10_000.0, false),
            Some(CleanupReason::Offscreen)
        );
    }

    #[test]
    fn test_destroyed_visual_pruned_even_in_grace() {
        let config = LevelConfig::default();
        let mut ghost = entry(500.0);
        ghost.visual_destroyed = true;
        assert_eq!(
            cleanup_verdict(&ghost, &player_at(400.0), &CameraView::default(), &config, 0.0, false),
            Some(CleanupReason::VisualDestroyed)
        );
    }

    #[test]
    fn test_corpses_left_to_linger() {
        let config = LevelConfig::default();
        let mut corpse = entry(-9000.0);
        corpse.state = CombatState::Dead;
        assert_eq!(
            cleanup_verdict(&corpse, &player_at(0.0), &CameraView::default(), &config, 1e6, false),
            None
        );
    }

    #[test]
    fn test_corpse_with_destroyed_visual_still_lingers() {
        let config = LevelConfig::default();
        let mut corpse = entry(500.0);
        corpse.state = CombatState::Dead;
        corpse.visual_destroyed = true;
        assert_eq!(
            cleanup_verdict(&corpse, &player_at(400.0), &CameraView::default(), &config, 1e6, false),
            None
        );
    }
}
