//! Combatant state machine component.
//!
//! One `Combatant` per enemy (street thugs and bosses alike). State changes go
//! through `set_state`, timers through `tick_timers`; both are plain methods so
//! the whole lifecycle is testable without an `App`.

use bevy::prelude::*;

use crate::ai::archetypes::{
    Archetype, ArchetypeConfig, AttackKind, FALLBACK_ATTACK_MS, WINDUP_LOCK_BUFFER_MS,
};
use crate::combat::{attack_rect, body_radius, CueKind};
use crate::components::{Facing, Health, Motion, StreetLayout, WorldBounds};
use crate::logger;

/// Combat state. `Dead` and `Dying` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum CombatState {
    /// Just created, not yet engaged
    #[default]
    Spawning,
    Walking,
    Attacking,
    /// Knocked back, no decisions until the impulse ends
    Stunned,
    Dead,
    /// Boss only: scripted jump in flight
    Jumping,
    /// Boss only: weapon throw in progress
    Throwing,
    /// Boss only: defeated, waiting for the host's defeat sequence
    Dying,
}

impl CombatState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CombatState::Dead | CombatState::Dying)
    }
}

/// Throttled sample of the player's y, so grid-stepped enemies don't jitter
/// chasing every bob of a physics-driven player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct VerticalTracker {
    pub response_timer: f32,
    pub last_sample: Option<f32>,
    pub target_y: Option<f32>,
}

/// Timestamps for the periodic flavor behaviors (absolute combat ms).
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct FlavorState {
    pub next_call_for_help: f32,
    pub next_dodge_check: f32,
    /// Alerted by a neighbour: chase even beyond detection range
    pub alerted_until: Option<f32>,
    pub retreat_until: Option<f32>,
    pub retreat_ready_at: f32,
}

impl FlavorState {
    pub fn is_alerted(&self, time: f32) -> bool {
        self.alerted_until.is_some_and(|until| time < until)
    }

    pub fn is_retreating(&self, time: f32) -> bool {
        self.retreat_until.is_some_and(|until| time < until)
    }
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Health, Motion)]
pub struct Combatant {
    pub archetype: Archetype,
    pub state: CombatState,
    pub facing: Facing,
    /// Perspective scale from the current y
    pub scale: f32,
    /// Draw depth from the current y
    pub depth: f32,

    /// Combat time of the last attack start
    pub last_attack_time: Option<f32>,
    pub animation_lock_timer: f32,
    pub animation_locked: bool,
    pub windup_timer: f32,
    pub is_winding_up: bool,
    /// Attack hitbox is live
    pub can_deal_damage: bool,
    pub current_attack: Option<AttackKind>,
    /// Swing resolved by a scripted sequence rather than the hit resolver
    pub scripted_attack: bool,
    /// Current swing already connected with the player
    pub swing_connected: bool,

    pub knockback_timer: f32,
    pub is_knocked_back: bool,

    /// Frozen by a scripted event (per-entity, on top of the global gate)
    pub event_paused: bool,
    pub world_collision: bool,
    /// Re-enable world collision once fully inside the bounds
    pub reenable_world_bounds_on_entry: bool,

    pub spawned_at: f32,
    /// Corpse linger countdown, set on death
    pub linger_timer: Option<f32>,

    pub tracker: VerticalTracker,
    pub flavor: FlavorState,
}

impl Combatant {
    pub fn new(archetype: Archetype, spawned_at: f32) -> Self {
        Self {
            archetype,
            state: CombatState::Spawning,
            facing: Facing::Left,
            scale: 1.0,
            depth: 0.0,
            last_attack_time: None,
            animation_lock_timer: 0.0,
            animation_locked: false,
            windup_timer: 0.0,
            is_winding_up: false,
            can_deal_damage: false,
            current_attack: None,
            scripted_attack: false,
            swing_connected: false,
            knockback_timer: 0.0,
            is_knocked_back: false,
            event_paused: false,
            world_collision: true,
            reenable_world_bounds_on_entry: false,
            spawned_at,
            linger_timer: None,
            tracker: VerticalTracker::default(),
            flavor: FlavorState::default(),
        }
    }

    /// Switches state and emits the animation cue.
    ///
    /// Re-entering the current state is a no-op, and terminal states are never
    /// left. Returns whether the state actually changed.
    pub fn set_state(&mut self, next: CombatState, cues: &mut Vec<CueKind>) -> bool {
        if self.state == next || self.state.is_terminal() {
            return false;
        }
        self.state = next;
        if next != CombatState::Attacking {
            self.clear_attack();
        }
        cues.push(CueKind::StateEntered(next));
        true
    }

    pub fn clear_attack(&mut self) {
        self.animation_lock_timer = 0.0;
        self.animation_locked = false;
        self.windup_timer = 0.0;
        self.is_winding_up = false;
        self.can_deal_damage = false;
        self.current_attack = None;
        self.scripted_attack = false;
    }

    /// Counts down knockback, animation lock and windup, in that order.
    pub fn tick_timers(&mut self, delta: f32, motion: &mut Motion, cues: &mut Vec<CueKind>) {
        if self.is_knocked_back {
            self.knockback_timer -= delta;
            if self.knockback_timer <= 0.0 {
                self.knockback_timer = 0.0;
                self.is_knocked_back = false;
                if self.state != CombatState::Attacking {
                    motion.velocity.x = 0.0;
                }
                if self.state == CombatState::Stunned {
                    self.set_state(CombatState::Walking, cues);
                }
            }
        }

        if self.animation_locked {
            self.animation_lock_timer -= delta;
            if self.animation_lock_timer <= 0.0 {
                self.clear_attack();
                if self.state == CombatState::Attacking {
                    self.set_state(CombatState::Walking, cues);
                }
            }
        }

        if self.is_winding_up {
            self.windup_timer -= delta;
            if self.windup_timer <= 0.0 {
                self.windup_timer = 0.0;
                self.is_winding_up = false;
                self.can_deal_damage =
                    self.state == CombatState::Attacking && self.animation_locked;
            }
        }
    }

    pub fn attack_ready(&self, time: f32, cooldown: f32) -> bool {
        self.last_attack_time
            .map_or(true, |last| time - last > cooldown)
    }

    /// Starts an attack picked by the archetype's selection rule.
    pub fn start_attack(
        &mut self,
        profile: &ArchetypeConfig,
        distance: f32,
        time: f32,
        motion: &mut Motion,
        rng: &mut impl rand::Rng,
        cues: &mut Vec<CueKind>,
    ) -> bool {
        let kind = profile.select_attack(distance, rng);
        self.start_attack_with(profile, kind, time, motion, cues)
    }

    /// Starts `kind`. Refused while locked or down.
    ///
    /// The lock always outlasts the windup, so the hitbox gets at least
    /// `WINDUP_LOCK_BUFFER_MS` of live time.
    pub fn start_attack_with(
        &mut self,
        profile: &ArchetypeConfig,
        kind: AttackKind,
        time: f32,
        motion: &mut Motion,
        cues: &mut Vec<CueKind>,
    ) -> bool {
        if self.animation_locked || self.state.is_terminal() {
            return false;
        }

        let duration = match profile.attack_duration(kind) {
            Some(ms) => ms,
            None => {
                logger::log_warning(&format!(
                    "{} has no animation for {:?}, using {}ms",
                    self.archetype.name(),
                    kind,
                    FALLBACK_ATTACK_MS
                ));
                FALLBACK_ATTACK_MS
            }
        };
        let windup = profile.windup_ms.max(0.0);

        self.set_state(CombatState::Attacking, cues);
        self.animation_lock_timer = duration.max(windup + WINDUP_LOCK_BUFFER_MS);
        self.animation_locked = true;
        self.windup_timer = windup;
        self.is_winding_up = true;
        self.can_deal_damage = false;
        self.current_attack = Some(kind);
        self.scripted_attack = false;
        self.swing_connected = false;
        self.last_attack_time = Some(time);
        motion.velocity.x = 0.0;

        cues.push(CueKind::AttackSound {
            archetype: self.archetype,
            attack: kind,
        });
        true
    }

    /// Live attack rectangle, only while attacking past the windup.
    pub fn attack_hitbox(&self, profile: &ArchetypeConfig, motion: &Motion) -> Option<Rect> {
        if self.state != CombatState::Attacking || !self.animation_locked || !self.can_deal_damage
        {
            return None;
        }
        Some(attack_rect(
            motion.position,
            self.facing,
            self.scale,
            &profile.hitbox,
        ))
    }

    pub fn body_radius(&self, profile: &ArchetypeConfig) -> f32 {
        body_radius(profile.body_radius, self.scale)
    }

    pub fn apply_perspective(&mut self, layout: &StreetLayout, y: f32) {
        self.scale = layout.scale_at(y);
        self.depth = layout.depth_at(y);
    }

    /// Re-enables world collision once the body is fully inside the bounds.
    /// Fires at most once per spawn.
    pub fn check_world_reentry(&mut self, x: f32, radius: f32, bounds: &WorldBounds) -> bool {
        if !self.reenable_world_bounds_on_entry || !bounds.contains_fully(x, radius) {
            return false;
        }
        self.reenable_world_bounds_on_entry = false;
        self.world_collision = true;
        true
    }

    /// Counts down the corpse linger; true once it has run out.
    pub fn tick_linger(&mut self, delta: f32) -> bool {
        match self.linger_timer.as_mut() {
            Some(remaining) => {
                *remaining -= delta;
                *remaining <= 0.0
            }
            None => false,
        }
    }
}
