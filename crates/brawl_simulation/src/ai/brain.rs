//! Per-tick combatant update.
//!
//! Order: early return (no player, terminal state), timers, perspective,
//! state handler, motion integration, street clamp.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::archetypes::ArchetypeConfig;
use crate::ai::behaviors::run_behaviors;
use crate::ai::components::{CombatState, Combatant};
use crate::ai::movement::{move_toward_player, track_player_vertically};
use crate::boss::{update_boss, BossKit};
use crate::combat::TickReport;
use crate::components::{CameraView, Facing, Health, Motion, PlayerSnapshot, StreetLayout};

/// Shared, read-only inputs of one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub time: f32,
    pub delta: f32,
    /// `None` when there is no player to fight this frame
    pub player: Option<&'a PlayerSnapshot>,
    pub layout: &'a StreetLayout,
    pub camera: &'a CameraView,
    /// Global enemy pause from the event gate
    pub ai_paused: bool,
}

/// Mutable view of one combatant for the duration of a tick.
pub struct Fighter<'a> {
    pub combatant: &'a mut Combatant,
    pub health: &'a Health,
    pub motion: &'a mut Motion,
    pub profile: &'a ArchetypeConfig,
}

pub fn update_combatant(
    fighter: &mut Fighter,
    boss: Option<&mut BossKit>,
    ctx: &TickContext,
    rng: &mut impl Rng,
    report: &mut TickReport,
) {
    let Some(player) = ctx.player.filter(|player| player.present) else {
        return;
    };
    if fighter.combatant.state.is_terminal() {
        return;
    }
    if fighter.combatant.state == CombatState::Spawning {
        fighter.combatant.set_state(CombatState::Walking, &mut report.cues);
    }

    fighter
        .combatant
        .tick_timers(ctx.delta, fighter.motion, &mut report.cues);
    fighter
        .combatant
        .apply_perspective(ctx.layout, fighter.motion.position.y);

    let paused = ctx.ai_paused || fighter.combatant.event_paused;

    match boss {
        Some(kit) => update_boss(fighter, kit, player, ctx, paused, rng, report),
        None => match fighter.combatant.state {
            CombatState::Walking => fighter.walking(player, ctx, paused, rng, report),
            CombatState::Attacking => fighter.attacking(player, ctx.delta, paused),
            // Stunned waits for the knockback timer
            _ => {}
        },
    }

    fighter.finish_motion(ctx.layout, ctx.delta);
}

impl Fighter<'_> {
    pub fn distance_to(&self, player: &PlayerSnapshot) -> f32 {
        self.motion.position.distance(player.position)
    }

    pub fn face_player(&mut self, player: &PlayerSnapshot) {
        if let Some(facing) = Facing::toward(player.position.x - self.motion.position.x) {
            self.combatant.facing = facing;
        }
    }

    /// Stops in place unless a knockback impulse is still carrying us.
    pub fn hold(&mut self) {
        if !self.combatant.is_knocked_back {
            self.motion.velocity = Vec2::ZERO;
        }
    }

    pub fn walking(
        &mut self,
        player: &PlayerSnapshot,
        ctx: &TickContext,
        paused: bool,
        rng: &mut impl Rng,
        report: &mut TickReport,
    ) {
        if paused {
            self.hold();
            return;
        }
        if self.combatant.animation_lock_timer > 0.0 || self.combatant.is_knocked_back {
            return;
        }

        let stats = self.profile.stats;
        let distance = self.distance_to(player);
        if distance > stats.detection_range && !self.combatant.flavor.is_alerted(ctx.time) {
            self.motion.velocity = Vec2::ZERO;
            return;
        }

        if run_behaviors(
            self.combatant,
            self.motion,
            self.health,
            self.profile,
            player,
            ctx.layout,
            ctx.time,
            rng,
            report,
        ) {
            return;
        }

        if distance <= stats.attack_range
            && self.combatant.attack_ready(ctx.time, stats.attack_cooldown)
        {
            self.face_player(player);
            self.combatant.start_attack(
                self.profile,
                distance,
                ctx.time,
                self.motion,
                rng,
                &mut report.cues,
            );
            self.motion.velocity.y = 0.0;
            return;
        }

        move_toward_player(self.combatant, self.motion, self.profile, player, ctx.delta);
    }

    pub fn attacking(&mut self, player: &PlayerSnapshot, delta: f32, paused: bool) {
        if !self.combatant.is_knocked_back {
            self.motion.velocity.x = 0.0;
        }
        if self.profile.movement.track_vertical_while_attacking && !paused {
            track_player_vertically(self.combatant, self.motion, self.profile, player, delta);
        } else {
            self.motion.velocity.y = 0.0;
        }
    }

    /// Integrates velocity and keeps the body inside the street band.
    /// Scripted jumps position the body themselves.
    pub fn finish_motion(&mut self, layout: &StreetLayout, delta: f32) {
        if self.combatant.state == CombatState::Jumping {
            return;
        }
        self.motion.integrate(delta);

        let clamped = layout.clamp_y(self.motion.position.y);
        if clamped != self.motion.position.y {
            self.motion.position.y = clamped;
            self.motion.velocity.y = 0.0;
        }
    }
}
