//! Damage request handling.

use bevy::prelude::*;

use crate::ai::{CombatProfile, Combatant};
use crate::boss::BossKit;
use crate::clock::CombatClock;
use crate::combat::damage::{take_damage, CombatantDied, DamageRequest, DamageTarget};
use crate::combat::CombatCue;
use crate::components::{Health, Motion};
use crate::logger;
use crate::protection::Protection;

/// System: apply `DamageRequest` events to their targets.
///
/// Requests for entities that are gone or aren't combatants are dropped.
pub fn apply_damage_requests(
    clock: Res<CombatClock>,
    protection: Res<Protection>,
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<(
        &mut Combatant,
        &mut Health,
        &mut Motion,
        &CombatProfile,
        Option<&mut BossKit>,
    )>,
    mut cue_events: EventWriter<CombatCue>,
    mut died_events: EventWriter<CombatantDied>,
) {
    for request in requests.read() {
        let Ok((mut combatant, mut health, mut motion, profile, boss)) =
            targets.get_mut(request.target)
        else {
            logger::log(&format!(
                "DamageRequest: {:?} is not a combatant, dropped",
                request.target
            ));
            continue;
        };

        let flags = protection.flags(request.target, &combatant);
        let mut cues = Vec::new();
        let outcome = take_damage(
            DamageTarget {
                combatant: &mut *combatant,
                health: &mut *health,
                motion: &mut *motion,
                profile: profile.config(),
                boss: boss.map(|kit| kit.into_inner()),
            },
            request.amount,
            request.source,
            clock.time,
            flags,
            &mut cues,
        );

        for kind in cues {
            cue_events.write(CombatCue {
                entity: request.target,
                kind,
            });
        }

        if outcome.killed() && combatant.linger_timer.is_some() {
            died_events.write(CombatantDied {
                entity: request.target,
                archetype: combatant.archetype,
                position: motion.position,
            });
        }
    }
}
