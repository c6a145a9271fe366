//! Damage and knockback resolution.
//!
//! `take_damage` is the only way health goes down. It never fails: a target
//! that can't be hurt right now is reported as `DamageOutcome::Ignored`.

use bevy::prelude::*;

use crate::ai::{Archetype, ArchetypeConfig, CombatState, Combatant};
use crate::boss::BossKit;
use crate::combat::CueKind;
use crate::components::{Health, Motion};
use crate::logger;

/// Inbound: hurt a combatant (player attacks, hazards, scripts).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
    /// Where the blow came from; `None` means no knockback
    pub source: Option<Vec2>,
}

/// Outbound: a combatant's swing or projectile hit the player.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerHit {
    pub attacker: Entity,
    pub damage: f32,
    pub source: Vec2,
}

/// Outbound: a street enemy died (bosses report `BossDefeated` instead).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CombatantDied {
    pub entity: Entity,
    pub archetype: Archetype,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageIgnored {
    /// Dead or dying
    AlreadyDown,
    /// Damage protection from an event script
    Protected,
    /// Boss mid-jump
    Airborne,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    Ignored(DamageIgnored),
    Applied {
        amount: f32,
        killed: bool,
        /// Lethal blow absorbed by cleanup protection
        spared: bool,
        /// Boss jump fired by this hit
        jumped: bool,
    },
}

impl DamageOutcome {
    pub fn killed(&self) -> bool {
        matches!(self, DamageOutcome::Applied { killed: true, .. })
    }
}

/// Protection answers for one target, resolved before damage is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtectionFlags {
    pub damage: bool,
    pub cleanup: bool,
}

pub struct DamageTarget<'a> {
    pub combatant: &'a mut Combatant,
    pub health: &'a mut Health,
    pub motion: &'a mut Motion,
    pub profile: &'a ArchetypeConfig,
    pub boss: Option<&'a mut BossKit>,
}

pub fn take_damage(
    target: DamageTarget,
    amount: f32,
    source: Option<Vec2>,
    time: f32,
    protection: ProtectionFlags,
    cues: &mut Vec<CueKind>,
) -> DamageOutcome {
    let DamageTarget {
        combatant,
        health,
        motion,
        profile,
        mut boss,
    } = target;

    if combatant.state.is_terminal() {
        return DamageOutcome::Ignored(DamageIgnored::AlreadyDown);
    }
    if protection.damage {
        return DamageOutcome::Ignored(DamageIgnored::Protected);
    }
    if boss.is_some() && combatant.state == CombatState::Jumping {
        return DamageOutcome::Ignored(DamageIgnored::Airborne);
    }

    if !amount.is_finite() || amount < 0.0 {
        logger::log_warning(&format!(
            "{}: bad damage amount {}, treating as 0",
            combatant.archetype.name(),
            amount
        ));
    }
    let applied = health.take_damage(amount);
    cues.push(CueKind::DamageFlash);
    if boss.is_some() {
        cues.push(CueKind::BossHealth {
            fraction: health.fraction(),
        });
    }

    if !health.is_alive() {
        if protection.cleanup {
            // Scripted fights keep this one standing
            health.set_current(1.0);
            return DamageOutcome::Applied {
                amount: applied,
                killed: false,
                spared: true,
                jumped: false,
            };
        }
        die(combatant, motion, profile, boss.as_deref_mut(), cues);
        return DamageOutcome::Applied {
            amount: applied,
            killed: true,
            spared: false,
            jumped: false,
        };
    }

    if let Some(source) = source {
        apply_knockback(combatant, motion, profile, source, cues);
    }

    let jumped = boss
        .as_deref_mut()
        .is_some_and(|kit| kit.register_damage(applied, health.max, time));
    if jumped {
        cues.push(CueKind::JumpTriggered);
        logger::log_info(&format!(
            "{} jump triggered at {:.0}% health",
            combatant.archetype.name(),
            health.fraction() * 100.0
        ));
    }

    DamageOutcome::Applied {
        amount: applied,
        killed: false,
        spared: false,
        jumped,
    }
}

fn die(
    combatant: &mut Combatant,
    motion: &mut Motion,
    profile: &ArchetypeConfig,
    boss: Option<&mut BossKit>,
    cues: &mut Vec<CueKind>,
) {
    motion.velocity = Vec2::ZERO;
    combatant.is_knocked_back = false;
    combatant.knockback_timer = 0.0;

    match boss {
        Some(kit) => {
            combatant.set_state(CombatState::Dying, cues);
            if kit.mark_defeated() {
                cues.push(CueKind::BossDefeated);
                logger::log_info(&format!("{} defeated", combatant.archetype.name()));
            }
        }
        None => {
            combatant.set_state(CombatState::Dead, cues);
            combatant.linger_timer = Some(profile.linger_ms.max(0.0));
            cues.push(CueKind::DeathSound {
                archetype: combatant.archetype,
            });
            cues.push(CueKind::DeathTint);
            cues.push(CueKind::FadeOut {
                duration_ms: profile.linger_ms.max(0.0),
            });
            logger::log(&format!("{} died", combatant.archetype.name()));
        }
    }
}

/// Horizontal-only shove away from `source`, scaled down by resistance.
pub fn apply_knockback(
    combatant: &mut Combatant,
    motion: &mut Motion,
    profile: &ArchetypeConfig,
    source: Vec2,
    cues: &mut Vec<CueKind>,
) {
    let speed = profile.knockback_speed * (1.0 - profile.knockback_resist.clamp(0.0, 1.0));
    if speed <= 0.0 || profile.knockback_ms <= 0.0 {
        return;
    }

    let dx = motion.position.x - source.x;
    let direction = if dx != 0.0 {
        dx.signum()
    } else {
        -combatant.facing.sign()
    };
    motion.velocity = Vec2::new(direction * speed, 0.0);
    combatant.is_knocked_back = true;
    combatant.knockback_timer = profile.knockback_ms;

    if combatant.state == CombatState::Walking {
        combatant.set_state(CombatState::Stunned, cues);
    }
}
