//! Archetype table: immutable per-type tuning, looked up once at spawn.
//!
//! Every behavioural difference between street enemies lives in this data
//! (attack sets, windups, behavior tags, spawn bias). The state machine only
//! ever reads the `ArchetypeConfig` it was constructed with.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use bevy::prelude::*;
use serde::Deserialize;

use crate::boss::{BossConfig, EdgeConfig, JumpConfig, JumpStyle, ThrowConfig, WeaponKind};
use crate::combat::HitboxSpec;
use crate::error::ConfigError;

/// Attack animations longer than this are never cut; shorter ones are
/// stretched so the lock always outlives the windup by this buffer.
pub const WINDUP_LOCK_BUFFER_MS: f32 = 100.0;

/// Duration used when an archetype lists an attack without an animation.
pub const FALLBACK_ATTACK_MS: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Crackhead,
    GreenThug,
    BlackThug,
    /// Art critic boss
    Critic,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Crackhead,
        Archetype::GreenThug,
        Archetype::BlackThug,
        Archetype::Critic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Crackhead => "crackhead",
            Archetype::GreenThug => "green_thug",
            Archetype::BlackThug => "black_thug",
            Archetype::Critic => "critic",
        }
    }
}

impl FromStr for Archetype {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Archetype::ALL
            .into_iter()
            .find(|archetype| archetype.name() == s)
            .ok_or_else(|| ConfigError::UnknownArchetype(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AttackKind {
    Jab,
    Punch,
    Kick,
    Shove,
    Slam,
}

/// One attack an archetype can perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    pub kind: AttackKind,
    /// Animation length in ms; `None` when the sprite sheet has no clip
    pub animation_ms: Option<f32>,
}

impl AttackProfile {
    pub const fn new(kind: AttackKind, animation_ms: f32) -> Self {
        Self {
            kind,
            animation_ms: Some(animation_ms),
        }
    }
}

/// How an archetype picks among its attacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackSelection {
    /// Always the first listed attack
    First,
    /// Uniform pick over the attack set
    Random,
    /// `close` when the player is nearer than `split`, `far` otherwise
    ByDistance {
        split: f32,
        close: AttackKind,
        far: AttackKind,
    },
}

/// Periodic flavor behaviors layered onto the walking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorTag {
    CallForHelp,
    DodgeCheck,
    Retreat,
}

/// Where in the street band an archetype prefers to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalBias {
    #[default]
    Anywhere,
    Upper,
    Lower,
}

/// Combat stats with generic fallback defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatStats {
    pub max_health: f32,
    /// Horizontal walk speed (px/s)
    pub speed: f32,
    pub attack_range: f32,
    /// Minimum ms between attack starts
    pub attack_cooldown: f32,
    pub detection_range: f32,
    /// Damage dealt to the player per connecting swing
    pub player_damage: f32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            max_health: 30.0,
            speed: 70.0,
            attack_range: 75.0,
            attack_cooldown: 1500.0,
            detection_range: 650.0,
            player_damage: 8.0,
        }
    }
}

/// Walk/track tuning. The vertical throttle damps jitter between a physics
/// driven player and grid-stepped enemies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementTuning {
    pub dead_zone_x: f32,
    pub dead_zone_y: f32,
    /// Minimum ms between samples of the player's y
    pub vertical_response_ms: f32,
    /// Player y changes smaller than this are ignored
    pub vertical_noise: f32,
    pub ignore_player_jumps: bool,
    /// Vertical speed as a fraction of `CombatStats::speed`
    pub vertical_speed_factor: f32,
    pub track_vertical_while_attacking: bool,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            dead_zone_x: 30.0,
            dead_zone_y: 4.0,
            vertical_response_ms: 250.0,
            vertical_noise: 8.0,
            ignore_player_jumps: true,
            vertical_speed_factor: 0.6,
            track_vertical_while_attacking: false,
        }
    }
}

/// Timing knobs for the flavor behaviors and the low-health retreat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlavorTuning {
    pub call_for_help_interval_ms: f32,
    pub call_for_help_radius: f32,
    pub alert_duration_ms: f32,
    pub dodge_interval_ms: f32,
    pub dodge_chance: f64,
    pub dodge_range: f32,
    pub dodge_step: f32,
    pub dodge_hold_ms: f32,
    pub retreat_health_fraction: f32,
    pub retreat_duration_ms: f32,
    pub retreat_cooldown_ms: f32,
}

impl Default for FlavorTuning {
    fn default() -> Self {
        Self {
            call_for_help_interval_ms: 6000.0,
            call_for_help_radius: 500.0,
            alert_duration_ms: 4000.0,
            dodge_interval_ms: 900.0,
            dodge_chance: 0.35,
            dodge_range: 140.0,
            dodge_step: 60.0,
            dodge_hold_ms: 400.0,
            retreat_health_fraction: 0.25,
            retreat_duration_ms: 1200.0,
            retreat_cooldown_ms: 5000.0,
        }
    }
}

/// Everything that makes one archetype different from another.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypeConfig {
    pub archetype: Archetype,
    pub stats: CombatStats,
    pub windup_ms: f32,
    pub attacks: Vec<AttackProfile>,
    pub selection: AttackSelection,
    pub hitbox: HitboxSpec,
    /// Body radius at scale 1.0
    pub body_radius: f32,
    pub behaviors: Vec<BehaviorTag>,
    pub movement: MovementTuning,
    pub flavor: FlavorTuning,
    /// Relative weight for unrestricted spawning; 0 never spawns randomly
    pub spawn_weight: u32,
    pub vertical_bias: VerticalBias,
    pub knockback_speed: f32,
    pub knockback_ms: f32,
    /// 0.0 takes the full impulse, 1.0 ignores knockback
    pub knockback_resist: f32,
    /// How long a corpse lingers (fading) before removal
    pub linger_ms: f32,
    pub drop_chance: f64,
    pub boss: Option<BossConfig>,
}

impl ArchetypeConfig {
    /// Generic fallback config, used when a table has no entry for a type.
    pub fn generic(archetype: Archetype) -> Self {
        Self {
            archetype,
            stats: CombatStats::default(),
            windup_ms: 300.0,
            attacks: vec![AttackProfile::new(AttackKind::Punch, FALLBACK_ATTACK_MS)],
            selection: AttackSelection::First,
            hitbox: HitboxSpec::default(),
            body_radius: 20.0,
            behaviors: Vec::new(),
            movement: MovementTuning::default(),
            flavor: FlavorTuning::default(),
            spawn_weight: 1,
            vertical_bias: VerticalBias::Anywhere,
            knockback_speed: 220.0,
            knockback_ms: 250.0,
            knockback_resist: 0.0,
            linger_ms: 1500.0,
            drop_chance: 0.0,
            boss: None,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn has_behavior(&self, tag: BehaviorTag) -> bool {
        self.behaviors.contains(&tag)
    }

    /// Picks the attack to throw at a player `distance` away.
    pub fn select_attack(&self, distance: f32, rng: &mut impl rand::Rng) -> AttackKind {
        let first = self
            .attacks
            .first()
            .map(|attack| attack.kind)
            .unwrap_or(AttackKind::Punch);

        match self.selection {
            AttackSelection::First => first,
            AttackSelection::Random => {
                if self.attacks.is_empty() {
                    first
                } else {
                    self.attacks[rng.gen_range(0..self.attacks.len())].kind
                }
            }
            AttackSelection::ByDistance { split, close, far } => {
                if distance < split {
                    close
                } else {
                    far
                }
            }
        }
    }

    /// Animation length of `kind`, `None` when the clip is missing.
    pub fn attack_duration(&self, kind: AttackKind) -> Option<f32> {
        self.attacks
            .iter()
            .find(|attack| attack.kind == kind)
            .and_then(|attack| attack.animation_ms)
    }
}

/// Archetype config handed to a combatant at spawn. Shared, never mutated.
#[derive(Component, Debug, Clone, Deref)]
pub struct CombatProfile(pub Arc<ArchetypeConfig>);

impl CombatProfile {
    pub fn config(&self) -> &ArchetypeConfig {
        &self.0
    }
}

/// Level-independent lookup from archetype to its config.
#[derive(Resource, Debug, Clone)]
pub struct ArchetypeTable {
    configs: HashMap<Archetype, Arc<ArchetypeConfig>>,
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ArchetypeTable {
    pub fn empty() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    pub fn with(mut self, config: ArchetypeConfig) -> Self {
        self.configs.insert(config.archetype, Arc::new(config));
        self
    }

    /// Config for `archetype`; falls back to generic defaults if missing.
    pub fn get(&self, archetype: Archetype) -> Arc<ArchetypeConfig> {
        match self.configs.get(&archetype) {
            Some(config) => Arc::clone(config),
            None => {
                crate::logger::log_warning(&format!(
                    "Archetype table has no entry for {}, using generic defaults",
                    archetype.name()
                ));
                Arc::new(ArchetypeConfig::generic(archetype))
            }
        }
    }

    /// Non-boss archetypes with a positive spawn weight, in stable order.
    pub fn spawn_weights(&self) -> Vec<(Archetype, u32)> {
        Archetype::ALL
            .into_iter()
            .filter_map(|archetype| {
                let config = self.configs.get(&archetype)?;
                (!config.is_boss() && config.spawn_weight > 0)
                    .then_some((archetype, config.spawn_weight))
            })
            .collect()
    }

    pub fn standard() -> Self {
        Self::empty()
            .with(crackhead())
            .with(green_thug())
            .with(black_thug())
            .with(critic())
    }
}

fn crackhead() -> ArchetypeConfig {
    ArchetypeConfig {
        stats: CombatStats {
            max_health: 30.0,
            speed: 95.0,
            attack_range: 70.0,
            attack_cooldown: 1200.0,
            detection_range: 600.0,
            player_damage: 6.0,
        },
        windup_ms: 250.0,
        attacks: vec![
            AttackProfile::new(AttackKind::Jab, 400.0),
            AttackProfile::new(AttackKind::Kick, 550.0),
        ],
        selection: AttackSelection::ByDistance {
            split: 50.0,
            close: AttackKind::Jab,
            far: AttackKind::Kick,
        },
        behaviors: vec![BehaviorTag::DodgeCheck, BehaviorTag::Retreat],
        spawn_weight: 5,
        drop_chance: 0.1,
        ..ArchetypeConfig::generic(Archetype::Crackhead)
    }
}

fn green_thug() -> ArchetypeConfig {
    ArchetypeConfig {
        stats: CombatStats {
            max_health: 45.0,
            speed: 70.0,
            attack_range: 80.0,
            attack_cooldown: 1500.0,
            detection_range: 700.0,
            player_damage: 9.0,
        },
        windup_ms: 350.0,
        attacks: vec![
            AttackProfile::new(AttackKind::Punch, 500.0),
            AttackProfile::new(AttackKind::Kick, 600.0),
        ],
        selection: AttackSelection::Random,
        behaviors: vec![BehaviorTag::CallForHelp],
        spawn_weight: 3,
        vertical_bias: VerticalBias::Upper,
        drop_chance: 0.15,
        ..ArchetypeConfig::generic(Archetype::GreenThug)
    }
}

fn black_thug() -> ArchetypeConfig {
    ArchetypeConfig {
        stats: CombatStats {
            max_health: 60.0,
            speed: 60.0,
            attack_range: 85.0,
            attack_cooldown: 1800.0,
            detection_range: 700.0,
            player_damage: 12.0,
        },
        windup_ms: 450.0,
        attacks: vec![
            AttackProfile::new(AttackKind::Punch, 550.0),
            AttackProfile::new(AttackKind::Shove, 650.0),
        ],
        selection: AttackSelection::Random,
        hitbox: HitboxSpec {
            offset_x: 44.0,
            offset_y: -10.0,
            width: 60.0,
            height: 44.0,
        },
        body_radius: 24.0,
        behaviors: vec![BehaviorTag::CallForHelp, BehaviorTag::Retreat],
        spawn_weight: 2,
        vertical_bias: VerticalBias::Lower,
        knockback_resist: 0.4,
        drop_chance: 0.25,
        ..ArchetypeConfig::generic(Archetype::BlackThug)
    }
}

fn critic() -> ArchetypeConfig {
    ArchetypeConfig {
        stats: CombatStats {
            max_health: 400.0,
            speed: 80.0,
            attack_range: 90.0,
            attack_cooldown: 1400.0,
            detection_range: 2000.0,
            player_damage: 14.0,
        },
        windup_ms: 300.0,
        attacks: vec![
            AttackProfile::new(AttackKind::Punch, 500.0),
            AttackProfile::new(AttackKind::Slam, 800.0),
        ],
        selection: AttackSelection::ByDistance {
            split: 60.0,
            close: AttackKind::Punch,
            far: AttackKind::Slam,
        },
        hitbox: HitboxSpec {
            offset_x: 50.0,
            offset_y: -12.0,
            width: 70.0,
            height: 50.0,
        },
        body_radius: 30.0,
        spawn_weight: 0,
        knockback_resist: 1.0,
        linger_ms: 3000.0,
        boss: Some(BossConfig {
            jump: Some(JumpConfig {
                threshold: 0.15,
                cooldown_ms: 4000.0,
                style: JumpStyle::Flip,
                duration_ms: 900.0,
                apex_height: 160.0,
                punch_hit_chance: 0.5,
                punch_damage: 10.0,
                telegraph_ms: 600.0,
                input_lock_factor: 1.0,
            }),
            throw: Some(ThrowConfig {
                range: 500.0,
                cooldown_ms: 3000.0,
                throw_delay_ms: 500.0,
                weapon: WeaponKind::Bottle,
                projectile_speed: 420.0,
                damage: 8.0,
                lifetime_ms: 2500.0,
            }),
            vertical_movement: true,
            vertical_dead_zone: 6.0,
            edge: Some(EdgeConfig { margin: 90.0 }),
        }),
        ..ArchetypeConfig::generic(Archetype::Critic)
    }
}
