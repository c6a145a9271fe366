//! Scripted jump: forced punch, telegraph, relocation to the opposite edge.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::brain::{Fighter, TickContext};
use crate::ai::{AttackKind, CombatState};
use crate::boss::kit::{BossKit, EdgeSide, JumpConfig, JumpPhase, JumpStyle};
use crate::combat::{overlaps, CueKind, TickReport};
use crate::components::PlayerSnapshot;
use crate::logger;

pub fn run_sequence(
    fighter: &mut Fighter,
    kit: &mut BossKit,
    player: &PlayerSnapshot,
    ctx: &TickContext,
    rng: &mut impl Rng,
    report: &mut TickReport,
) {
    let Some(jump) = kit.config.jump else {
        kit.sequence = JumpPhase::Idle;
        return;
    };

    match kit.sequence {
        JumpPhase::Idle => {}
        JumpPhase::Punch { started: false } => {
            fighter.motion.velocity = Vec2::ZERO;
            // Let a swing already in progress play out first
            if fighter.combatant.animation_locked {
                return;
            }
            fighter.combatant.facing = kit.action_facing(
                player.position.x - fighter.motion.position.x,
                fighter.combatant.facing,
            );
            if fighter.combatant.start_attack_with(
                fighter.profile,
                AttackKind::Punch,
                ctx.time,
                fighter.motion,
                &mut report.cues,
            ) {
                fighter.combatant.scripted_attack = true;
            }
            kit.sequence = JumpPhase::Punch { started: true };
        }
        JumpPhase::Punch { started: true } => {
            fighter.motion.velocity = Vec2::ZERO;
            let connected = fighter
                .combatant
                .attack_hitbox(fighter.profile, fighter.motion)
                .is_some_and(|hitbox| overlaps(hitbox, player.hurtbox()));

            if connected {
                if rng.gen_bool(jump.punch_hit_chance.clamp(0.0, 1.0)) {
                    report.player_hits.push(jump.punch_damage);
                }
                begin_telegraph(kit, &jump, report);
            } else if fighter.combatant.state != CombatState::Attacking {
                // Whiffed: no telegraph, no input lock
                take_off(fighter, kit, &jump, ctx, report);
            }
        }
        JumpPhase::Telegraph { remaining } => {
            fighter.motion.velocity = Vec2::ZERO;
            let remaining = remaining - ctx.delta;
            if remaining <= 0.0 {
                report.cues.push(CueKind::TelegraphHide);
                take_off(fighter, kit, &jump, ctx, report);
            } else {
                kit.sequence = JumpPhase::Telegraph { remaining };
            }
        }
        JumpPhase::Airborne {
            elapsed,
            from,
            to,
            landing,
        } => {
            let elapsed = elapsed + ctx.delta;
            let t = if jump.duration_ms > 0.0 {
                (elapsed / jump.duration_ms).min(1.0)
            } else {
                1.0
            };
            fighter.motion.velocity = Vec2::ZERO;
            fighter.motion.position = jump_position(jump.style, from, to, jump.apex_height, t);

            if t >= 1.0 {
                land(fighter, kit, landing, report);
            } else {
                kit.sequence = JumpPhase::Airborne {
                    elapsed,
                    from,
                    to,
                    landing,
                };
            }
        }
    }
}

fn begin_telegraph(kit: &mut BossKit, jump: &JumpConfig, report: &mut TickReport) {
    report.cues.push(CueKind::TelegraphShow);
    report.cues.push(CueKind::PlayerInputLock {
        duration_ms: jump.duration_ms * jump.input_lock_factor,
    });
    kit.sequence = JumpPhase::Telegraph {
        remaining: jump.telegraph_ms,
    };
}

fn take_off(
    fighter: &mut Fighter,
    kit: &mut BossKit,
    jump: &JumpConfig,
    ctx: &TickContext,
    report: &mut TickReport,
) {
    let from_side = if kit.config.edge.is_some() {
        kit.edge
    } else {
        EdgeSide::nearest(fighter.motion.position.x, ctx.camera)
    };
    let landing = from_side.opposite();
    let from = fighter.motion.position;
    let to = Vec2::new(landing.x_on(ctx.camera, kit.edge_margin()), from.y);

    fighter
        .combatant
        .set_state(CombatState::Jumping, &mut report.cues);
    report.cues.push(CueKind::JumpSound);
    logger::log_info(&format!(
        "{} jumps {:?} → {:?} ({:?})",
        fighter.combatant.archetype.name(),
        from_side,
        landing,
        jump.style
    ));

    if jump.style == JumpStyle::Teleport {
        fighter.motion.position = to;
        land(fighter, kit, landing, report);
        return;
    }
    kit.sequence = JumpPhase::Airborne {
        elapsed: 0.0,
        from,
        to,
        landing,
    };
}

fn land(fighter: &mut Fighter, kit: &mut BossKit, landing: EdgeSide, report: &mut TickReport) {
    kit.edge = landing;
    kit.sequence = JumpPhase::Idle;
    fighter.combatant.facing = landing.facing();
    fighter
        .combatant
        .set_state(CombatState::Walking, &mut report.cues);
    report.cues.push(CueKind::LandSound);
}

/// Position along the jump at progress `t` in [0, 1].
pub fn jump_position(style: JumpStyle, from: Vec2, to: Vec2, apex_height: f32, t: f32) -> Vec2 {
    let t = t.clamp(0.0, 1.0);
    match style {
        JumpStyle::Teleport => to,
        JumpStyle::Flip => {
            let apex = (from + to) * 0.5 - Vec2::new(0.0, apex_height);
            if t < 0.5 {
                from.lerp(apex, t * 2.0)
            } else {
                apex.lerp(to, (t - 0.5) * 2.0)
            }
        }
        JumpStyle::Arc => {
            let ground = from.lerp(to, t);
            ground - Vec2::new(0.0, 4.0 * apex_height * t * (1.0 - t))
        }
    }
}
