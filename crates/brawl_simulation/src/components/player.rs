//! Read-only view of the active player character.

use bevy::prelude::*;

use crate::components::Facing;

/// Player state as seen by the AI, written by the host before each tick.
///
/// Combatants never own or mutate the player; `present == false` means there
/// is no target this frame (character swap, cutscene) and AI idles.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PlayerSnapshot {
    pub present: bool,
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub jumping: bool,
    pub attacking: bool,
    /// Player health as a fraction of max, in [0, 1]
    pub health_fraction: f32,
    /// Half extents of the player's hurtbox at scale 1.0
    pub hurtbox_half: Vec2,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            present: true,
            position: Vec2::new(200.0, 520.0),
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            jumping: false,
            attacking: false,
            health_fraction: 1.0,
            hurtbox_half: Vec2::new(22.0, 40.0),
        }
    }
}

impl PlayerSnapshot {
    pub fn hurtbox(&self) -> Rect {
        crate::combat::hurtbox(self.position, self.hurtbox_half, 1.0)
    }

    /// Player walking or facing toward increasing x (the level direction).
    pub fn advancing(&self) -> bool {
        self.velocity.x > 0.0 || (self.velocity.x == 0.0 && self.facing == Facing::Right)
    }
}
