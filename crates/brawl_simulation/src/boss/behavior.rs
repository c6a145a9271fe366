//! Boss tick: scripted jump first, then melee, throw, edge-standing walk.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::brain::{Fighter, TickContext};
use crate::ai::movement::{chase_x, steer_vertical, track_player_vertically};
use crate::ai::CombatState;
use crate::boss::jump::run_sequence;
use crate::boss::kit::{BossKit, JumpPhase, ThrowConfig};
use crate::combat::{CueKind, ThrowRequest, TickReport};
use crate::components::PlayerSnapshot;
use crate::logger;

/// Hand offset (at scale 1.0) a thrown weapon leaves from.
const THROW_HAND_OFFSET: Vec2 = Vec2::new(24.0, -30.0);

pub fn update_boss(
    fighter: &mut Fighter,
    kit: &mut BossKit,
    player: &PlayerSnapshot,
    ctx: &TickContext,
    paused: bool,
    rng: &mut impl Rng,
    report: &mut TickReport,
) {
    if kit.sequence.is_active() {
        // Paused: hold the sequence, but let a jump already in the air land
        if paused && !matches!(kit.sequence, JumpPhase::Airborne { .. }) {
            fighter.hold();
            return;
        }
        run_sequence(fighter, kit, player, ctx, rng, report);
        return;
    }

    match fighter.combatant.state {
        CombatState::Walking => boss_walking(fighter, kit, player, ctx, paused, rng, report),
        CombatState::Attacking => fighter.attacking(player, ctx.delta, paused),
        CombatState::Throwing => {
            fighter.motion.velocity = Vec2::ZERO;
            kit.throw_timer -= ctx.delta;
            if kit.throw_timer <= 0.0 {
                kit.throw_timer = 0.0;
                fighter
                    .combatant
                    .set_state(CombatState::Walking, &mut report.cues);
            }
        }
        _ => {}
    }
}

fn boss_walking(
    fighter: &mut Fighter,
    kit: &mut BossKit,
    player: &PlayerSnapshot,
    ctx: &TickContext,
    paused: bool,
    rng: &mut impl Rng,
    report: &mut TickReport,
) {
    if paused {
        fighter.hold();
        return;
    }
    if fighter.combatant.animation_lock_timer > 0.0 || fighter.combatant.is_knocked_back {
        return;
    }

    if kit.retarget_edge(fighter.motion.position.x, player.position.x, ctx.camera) {
        fighter.combatant.facing = kit.edge.facing();
        logger::log(&format!(
            "{} retargets the {:?} edge",
            fighter.combatant.archetype.name(),
            kit.edge
        ));
    }

    let stats = fighter.profile.stats;
    let distance = fighter.distance_to(player);

    // Melee has priority over the throw
    if distance <= stats.attack_range
        && fighter.combatant.attack_ready(ctx.time, stats.attack_cooldown)
    {
        fighter.combatant.facing = kit.action_facing(
            player.position.x - fighter.motion.position.x,
            fighter.combatant.facing,
        );
        fighter.combatant.start_attack(
            fighter.profile,
            distance,
            ctx.time,
            fighter.motion,
            rng,
            &mut report.cues,
        );
        fighter.motion.velocity.y = 0.0;
        return;
    }

    if let Some(throw) = kit.config.throw {
        if distance > stats.attack_range && distance <= throw.range && kit.throw_ready(ctx.time) {
            start_throw(fighter, kit, &throw, player, ctx.time, report);
            return;
        }
    }

    let dead_zone = fighter.profile.movement.dead_zone_x;
    match kit.config.edge {
        Some(edge) => {
            let dx = kit.edge.x_on(ctx.camera, edge.margin) - fighter.motion.position.x;
            chase_x(fighter.combatant, fighter.motion, dx, stats.speed, dead_zone);
            // Facing comes from the occupied edge, never from the walk
            fighter.combatant.facing = kit.edge.facing();
        }
        None => {
            let dx = player.position.x - fighter.motion.position.x;
            chase_x(fighter.combatant, fighter.motion, dx, stats.speed, dead_zone);
        }
    }

    if kit.config.vertical_movement {
        let speed = stats.speed * fighter.profile.movement.vertical_speed_factor;
        steer_vertical(
            fighter.motion,
            Some(player.position.y),
            speed,
            kit.config.vertical_dead_zone,
        );
    } else {
        track_player_vertically(
            fighter.combatant,
            fighter.motion,
            fighter.profile,
            player,
            ctx.delta,
        );
    }
}

fn start_throw(
    fighter: &mut Fighter,
    kit: &mut BossKit,
    throw: &ThrowConfig,
    player: &PlayerSnapshot,
    time: f32,
    report: &mut TickReport,
) {
    let facing = kit.action_facing(
        player.position.x - fighter.motion.position.x,
        fighter.combatant.facing,
    );
    fighter.combatant.facing = facing;
    fighter
        .combatant
        .set_state(CombatState::Throwing, &mut report.cues);
    fighter.motion.velocity = Vec2::ZERO;
    kit.throw_timer = throw.throw_delay_ms;
    kit.last_throw_time = Some(time);

    let hand = Vec2::new(THROW_HAND_OFFSET.x * facing.sign(), THROW_HAND_OFFSET.y);
    let origin = fighter.motion.position + hand * fighter.combatant.scale;
    let aim = (player.position - origin).normalize_or_zero();
    let direction = if aim == Vec2::ZERO {
        Vec2::new(facing.sign(), 0.0)
    } else {
        aim
    };

    report.throws.push(ThrowRequest {
        weapon: throw.weapon,
        origin,
        velocity: direction * throw.projectile_speed,
        damage: throw.damage,
        lifetime_ms: throw.lifetime_ms,
    });
    report.cues.push(CueKind::ThrowSound {
        weapon: throw.weapon,
    });
}
