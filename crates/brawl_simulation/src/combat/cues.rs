//! Presentation cues emitted by the simulation.
//!
//! The core never touches sprites, sounds or tweens; it reports what should
//! be shown or heard and the host decides how.

use bevy::prelude::*;

use crate::ai::{Archetype, AttackKind, CombatState};
use crate::boss::WeaponKind;
use crate::combat::ThrowRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum CueKind {
    /// Entered a new state (animation change)
    StateEntered(CombatState),
    AttackSound {
        archetype: Archetype,
        attack: AttackKind,
    },
    DamageFlash,
    DeathSound {
        archetype: Archetype,
    },
    DeathTint,
    FadeOut {
        duration_ms: f32,
    },
    CallForHelp,
    Dodge,
    Retreat,
    JumpTriggered,
    JumpSound,
    LandSound,
    TelegraphShow,
    TelegraphHide,
    /// Freeze player input for the given duration
    PlayerInputLock {
        duration_ms: f32,
    },
    BossHealth {
        fraction: f32,
    },
    BossDefeated,
    ThrowSound {
        weapon: WeaponKind,
    },
    WorldCollision {
        enabled: bool,
    },
}

/// Cue attributed to the entity that produced it.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CombatCue {
    pub entity: Entity,
    pub kind: CueKind,
}

/// Call-for-help broadcast from one combatant to its neighbours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alert {
    pub origin: Vec2,
    pub radius: f32,
    pub duration_ms: f32,
}

/// Everything one combatant produced during a tick.
#[derive(Debug, Default)]
pub struct TickReport {
    pub cues: Vec<CueKind>,
    /// Damage dealt to the player this tick
    pub player_hits: Vec<f32>,
    pub throws: Vec<ThrowRequest>,
    pub alerts: Vec<Alert>,
}

impl TickReport {
    pub fn count(&self, predicate: impl Fn(&CueKind) -> bool) -> usize {
        self.cues.iter().filter(|cue| predicate(cue)).count()
    }

    pub fn clear(&mut self) {
        self.cues.clear();
        self.player_hits.clear();
        self.throws.clear();
        self.alerts.clear();
    }
}
