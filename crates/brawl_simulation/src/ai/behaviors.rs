//! Flavor behaviors driven by archetype tags.
//!
//! Each tag is a small periodic check layered on top of the walking state.
//! None of them can start an attack; they only steer, alert or back off.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::archetypes::{ArchetypeConfig, BehaviorTag, FlavorTuning};
use crate::ai::components::{Combatant, FlavorState};
use crate::combat::{Alert, CueKind, TickReport};
use crate::components::{Facing, Health, Motion, PlayerSnapshot, StreetLayout};

/// Seeds the periodic timers so a fresh spawn doesn't fire everything at once.
pub fn seed_flavor_timers(flavor: &mut FlavorState, tuning: &FlavorTuning, time: f32) {
    flavor.next_call_for_help = time + tuning.call_for_help_interval_ms;
    flavor.next_dodge_check = time + tuning.dodge_interval_ms;
    flavor.retreat_ready_at = time;
}

/// Runs the archetype's tagged behaviors. Returns true when one of them took
/// over movement for this tick (the regular chase/attack is skipped).
#[allow(clippy::too_many_arguments)]
pub fn run_behaviors(
    combatant: &mut Combatant,
    motion: &mut Motion,
    health: &Health,
    profile: &ArchetypeConfig,
    player: &PlayerSnapshot,
    layout: &StreetLayout,
    time: f32,
    rng: &mut impl Rng,
    report: &mut TickReport,
) -> bool {
    for tag in &profile.behaviors {
        match tag {
            BehaviorTag::CallForHelp => call_for_help(combatant, motion, &profile.flavor, time, report),
            BehaviorTag::DodgeCheck => {
                dodge_check(combatant, motion, &profile.flavor, player, layout, time, rng, report)
            }
            BehaviorTag::Retreat => {}
        }
    }

    profile.has_behavior(BehaviorTag::Retreat)
        && retreat(combatant, motion, health, profile, player, time, report)
}

fn call_for_help(
    combatant: &mut Combatant,
    motion: &Motion,
    tuning: &FlavorTuning,
    time: f32,
    report: &mut TickReport,
) {
    if time < combatant.flavor.next_call_for_help {
        return;
    }
    combatant.flavor.next_call_for_help = time + tuning.call_for_help_interval_ms;
    report.alerts.push(Alert {
        origin: motion.position,
        radius: tuning.call_for_help_radius,
        duration_ms: tuning.alert_duration_ms,
    });
    report.cues.push(CueKind::CallForHelp);
}

#[allow(clippy::too_many_arguments)]
fn dodge_check(
    combatant: &mut Combatant,
    motion: &Motion,
    tuning: &FlavorTuning,
    player: &PlayerSnapshot,
    layout: &StreetLayout,
    time: f32,
    rng: &mut impl Rng,
    report: &mut TickReport,
) {
    if time < combatant.flavor.next_dodge_check {
        return;
    }
    combatant.flavor.next_dodge_check = time + tuning.dodge_interval_ms;

    if !player.attacking || motion.position.distance(player.position) > tuning.dodge_range {
        return;
    }
    if !rng.gen_bool(tuning.dodge_chance.clamp(0.0, 1.0)) {
        return;
    }

    // Sidestep toward whichever side of the street has more room
    let room_up = motion.position.y - layout.top;
    let room_down = layout.bottom - motion.position.y;
    let step = if room_up > room_down {
        -tuning.dodge_step
    } else {
        tuning.dodge_step
    };
    combatant.tracker.target_y = Some(layout.clamp_y(motion.position.y + step));
    combatant.tracker.response_timer = tuning.dodge_hold_ms;
    report.cues.push(CueKind::Dodge);
}

/// Low-health retreat: back away while still facing the player, then wait
/// out a cooldown before it can trigger again.
fn retreat(
    combatant: &mut Combatant,
    motion: &mut Motion,
    health: &Health,
    profile: &ArchetypeConfig,
    player: &PlayerSnapshot,
    time: f32,
    report: &mut TickReport,
) -> bool {
    let tuning = &profile.flavor;
    let flavor = &mut combatant.flavor;

    if !flavor.is_retreating(time) {
        let wounded = health.fraction() < tuning.retreat_health_fraction;
        if !wounded || time < flavor.retreat_ready_at {
            return false;
        }
        flavor.retreat_until = Some(time + tuning.retreat_duration_ms);
        flavor.retreat_ready_at = time + tuning.retreat_duration_ms + tuning.retreat_cooldown_ms;
        report.cues.push(CueKind::Retreat);
    }

    let dx = player.position.x - motion.position.x;
    let away = if dx >= 0.0 { -1.0 } else { 1.0 };
    motion.velocity = Vec2::new(away * profile.stats.speed, 0.0);
    if let Some(facing) = Facing::toward(dx) {
        combatant.facing = facing;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::archetypes::Archetype;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Scene {
        combatant: Combatant,
        motion: Motion,
        health: Health,
        profile: ArchetypeConfig,
        player: PlayerSnapshot,
        layout: StreetLayout,
        rng: ChaCha8Rng,
        report: TickReport,
    }

    impl Scene {
        fn new(behaviors: Vec<BehaviorTag>) -> Self {
            let profile = ArchetypeConfig {
                behaviors,
                ..ArchetypeConfig::generic(Archetype::GreenThug)
            };
            let mut combatant = Combatant::new(Archetype::GreenThug, 0.0);
            seed_flavor_timers(&mut combatant.flavor, &profile.flavor, 0.0);
            Self {
                health: Health::new(profile.stats.max_health),
                combatant,
                motion: Motion::at(Vec2::new(400.0, 520.0)),
                profile,
                player: PlayerSnapshot {
                    position: Vec2::new(300.0, 520.0),
                    ..Default::default()
                },
                layout: StreetLayout::default(),
                rng: ChaCha8Rng::seed_from_u64(7),
                report: TickReport::default(),
            }
        }

        fn run(&mut self, time: f32) -> bool {
            run_behaviors(
                &mut self.combatant,
                &mut self.motion,
                &self.health,
                &self.profile,
                &self.player,
                &self.layout,
                time,
                &mut self.rng,
                &mut self.report,
            )
        }
    }

    #[test]
    fn test_call_for_help_respects_interval() {
        let mut scene = Scene::new(vec![BehaviorTag::CallForHelp]);
        let interval = scene.profile.flavor.call_for_help_interval_ms;

        assert!(!scene.run(interval - 1.0));
        assert!(scene.report.alerts.is_empty());

        scene.run(interval);
        scene.run(interval + 16.0);
        assert_eq!(scene.report.alerts.len(), 1);
        assert_eq!(scene.report.count(|cue| *cue == CueKind::CallForHelp), 1);
    }

    #[test]
    fn test_dodge_only_when_player_attacks_nearby() {
        let mut scene = Scene::new(vec![BehaviorTag::DodgeCheck]);
        scene.profile.flavor.dodge_chance = 1.0;
        let interval = scene.profile.flavor.dodge_interval_ms;

        scene.run(interval);
        assert_eq!(scene.combatant.tracker.target_y, None);

        scene.player.attacking = true;
        scene.run(interval * 2.0);
        let target = scene.combatant.tracker.target_y;
        assert!(target.is_some());
        assert_ne!(target, Some(520.0));
        assert_eq!(scene.report.count(|cue| *cue == CueKind::Dodge), 1);
    }

    #[test]
    fn test_retreat_backs_away_when_wounded() {
        let mut scene = Scene::new(vec![BehaviorTag::Retreat]);
        assert!(!scene.run(100.0));

        scene.health.set_current(scene.health.max * 0.1);
        assert!(scene.run(200.0));
        // Player is to the left, so back off to the right while facing left
        assert!(scene.motion.velocity.x > 0.0);
        assert_eq!(scene.combatant.facing, Facing::Left);

        let duration = scene.profile.flavor.retreat_duration_ms;
        assert!(!scene.run(200.0 + duration));
        // Cooldown: still wounded but no new retreat yet
        assert!(!scene.run(200.0 + duration + 10.0));
    }
}
