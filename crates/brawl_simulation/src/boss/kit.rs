//! Boss capabilities, composed onto a combatant as an optional component.

use bevy::prelude::*;

use crate::components::{CameraView, Facing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum JumpStyle {
    /// Vanish and reappear at the target edge
    Teleport,
    /// Two straight legs through an apex point
    Flip,
    /// Parabolic arc
    Arc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum WeaponKind {
    Bottle,
    Brick,
    Pipe,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpConfig {
    /// Fraction of max health that must be lost since the last jump
    pub threshold: f32,
    pub cooldown_ms: f32,
    pub style: JumpStyle,
    pub duration_ms: f32,
    pub apex_height: f32,
    /// Chance that the forced punch actually hurts the player
    pub punch_hit_chance: f64,
    pub punch_damage: f32,
    pub telegraph_ms: f32,
    /// Player input lock as a multiple of the jump duration
    pub input_lock_factor: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowConfig {
    pub range: f32,
    pub cooldown_ms: f32,
    /// How long the boss stays in `Throwing`
    pub throw_delay_ms: f32,
    pub weapon: WeaponKind,
    pub projectile_speed: f32,
    pub damage: f32,
    pub lifetime_ms: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeConfig {
    /// Distance kept from the camera edge
    pub margin: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossConfig {
    pub jump: Option<JumpConfig>,
    pub throw: Option<ThrowConfig>,
    /// Steer straight toward the player's y instead of the throttled tracker
    pub vertical_movement: bool,
    pub vertical_dead_zone: f32,
    /// Stand at a camera edge instead of chasing
    pub edge: Option<EdgeConfig>,
}

/// Default edge margin for bosses that jump but don't edge-stand.
pub const DEFAULT_EDGE_MARGIN: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum EdgeSide {
    Left,
    Right,
}

impl EdgeSide {
    pub fn opposite(self) -> Self {
        match self {
            EdgeSide::Left => EdgeSide::Right,
            EdgeSide::Right => EdgeSide::Left,
        }
    }

    pub fn nearest(x: f32, camera: &CameraView) -> Self {
        if x < camera.center() {
            EdgeSide::Left
        } else {
            EdgeSide::Right
        }
    }

    /// The edge farther from `player_x`, where a boss enters the fight.
    pub fn away_from(player_x: f32, camera: &CameraView) -> Self {
        Self::nearest(player_x, camera).opposite()
    }

    pub fn x_on(self, camera: &CameraView, margin: f32) -> f32 {
        match self {
            EdgeSide::Left => camera.left + margin,
            EdgeSide::Right => camera.right() - margin,
        }
    }

    /// A boss standing on an edge faces into the screen.
    pub fn facing(self) -> Facing {
        match self {
            EdgeSide::Left => Facing::Right,
            EdgeSide::Right => Facing::Left,
        }
    }
}

/// Phase of the scripted jump sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum JumpPhase {
    #[default]
    Idle,
    /// Forced punch; `started` once the swing is under way
    Punch { started: bool },
    Telegraph { remaining: f32 },
    Airborne {
        elapsed: f32,
        from: Vec2,
        to: Vec2,
        landing: EdgeSide,
    },
}

impl JumpPhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, JumpPhase::Idle)
    }
}

#[derive(Component, Debug, Clone)]
pub struct BossKit {
    pub config: BossConfig,
    pub edge: EdgeSide,
    /// Fraction of max health lost since the last jump
    pub damage_since_jump: f32,
    pub last_jump_time: Option<f32>,
    pub last_throw_time: Option<f32>,
    pub throw_timer: f32,
    pub sequence: JumpPhase,
    pub jumps: u32,
    defeat_fired: bool,
}

/// Slack for float accumulation when comparing against the jump threshold.
const THRESHOLD_EPSILON: f32 = 1e-6;

impl BossKit {
    pub fn new(config: BossConfig, edge: EdgeSide) -> Self {
        Self {
            config,
            edge,
            damage_since_jump: 0.0,
            last_jump_time: None,
            last_throw_time: None,
            throw_timer: 0.0,
            sequence: JumpPhase::Idle,
            jumps: 0,
            defeat_fired: false,
        }
    }

    pub fn edge_margin(&self) -> f32 {
        self.config
            .edge
            .map_or(DEFAULT_EDGE_MARGIN, |edge| edge.margin)
    }

    /// Accumulates a hit and decides whether the jump fires.
    ///
    /// On firing the accumulator resets to exactly zero and the jump time is
    /// recorded; the sequence itself runs in the tick.
    pub fn register_damage(&mut self, applied: f32, max_health: f32, time: f32) -> bool {
        let Some(jump) = self.config.jump else {
            return false;
        };
        if max_health <= 0.0 {
            return false;
        }
        self.damage_since_jump += applied.max(0.0) / max_health;

        if self.sequence.is_active() {
            return false;
        }
        let cooled = self
            .last_jump_time
            .map_or(true, |last| time - last >= jump.cooldown_ms);
        if !cooled || self.damage_since_jump + THRESHOLD_EPSILON < jump.threshold {
            return false;
        }

        self.damage_since_jump = 0.0;
        self.last_jump_time = Some(time);
        self.sequence = JumpPhase::Punch { started: false };
        self.jumps += 1;
        true
    }

    pub fn throw_ready(&self, time: f32) -> bool {
        let Some(throw) = self.config.throw else {
            return false;
        };
        self.last_throw_time
            .map_or(true, |last| time - last >= throw.cooldown_ms)
    }

    /// Latches the defeat. True only the first time.
    pub fn mark_defeated(&mut self) -> bool {
        self.sequence = JumpPhase::Idle;
        if self.defeat_fired {
            return false;
        }
        self.defeat_fired = true;
        true
    }

    /// Facing for a melee swing, a throw or the forced punch. Edge-standing
    /// bosses face by their edge, never by where the player is this tick.
    pub fn action_facing(&self, dx_to_player: f32, current: Facing) -> Facing {
        if self.config.edge.is_some() {
            return self.edge.facing();
        }
        Facing::toward(dx_to_player).unwrap_or(current)
    }

    /// Re-picks the standing edge once the player has walked past the boss
    /// toward its edge. Returns true when the edge changed.
    pub fn retarget_edge(&mut self, boss_x: f32, player_x: f32, camera: &CameraView) -> bool {
        if self.config.edge.is_none() || self.sequence.is_active() {
            return false;
        }
        let passed = match self.edge {
            EdgeSide::Right => player_x > boss_x,
            EdgeSide::Left => player_x < boss_x,
        };
        if !passed {
            return false;
        }
        let farther = EdgeSide::away_from(player_x, camera);
        if farther == self.edge {
            return false;
        }
        self.edge = farther;
        true
    }
}
