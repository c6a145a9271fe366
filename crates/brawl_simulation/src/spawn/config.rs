//! Level spawn configuration and JSON patches.

use serde::Deserialize;

use crate::ai::Archetype;
use crate::error::ConfigError;
use crate::logger;

/// Per-level spawn rules.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelConfig {
    /// Archetypes allowed to spawn; empty means the weighted table decides
    pub allowed_archetypes: Vec<Archetype>,
    pub base_spawn_interval_ms: f32,
    /// Cap on live (non-dead) combatants; 0 disables spawning
    pub max_enemies: usize,
    /// Tutorial/test levels: reconcile only, never spawn
    pub test_mode: bool,
    /// Interval jitter as a fraction of the base interval
    pub interval_jitter: f32,

    /// Distance past the camera edge a spawn appears at
    pub spawn_margin: f32,
    /// Extra random distance on top of the margin
    pub spawn_spread: f32,
    pub min_distance_from_player: f32,
    pub min_distance_from_enemies: f32,

    pub right_bias: f32,
    /// Right bias while the player is still in the first screen-width
    pub first_segment_right_bias: f32,
    pub first_segment_end_x: f32,
    pub locked_camera_right_bias: f32,

    pub cleanup_distance: f32,
    /// Tighter threshold for enemies left behind an advancing player
    pub behind_cleanup_distance: f32,
    pub offscreen_cleanup_margin: f32,
    pub grace_period_ms: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            allowed_archetypes: Vec::new(),
            base_spawn_interval_ms: 3000.0,
            max_enemies: 5,
            test_mode: false,
            interval_jitter: 0.2,
            spawn_margin: 100.0,
            spawn_spread: 120.0,
            min_distance_from_player: 250.0,
            min_distance_from_enemies: 60.0,
            right_bias: 0.7,
            first_segment_right_bias: 1.0,
            first_segment_end_x: 1280.0,
            locked_camera_right_bias: 0.5,
            cleanup_distance: 1600.0,
            behind_cleanup_distance: 900.0,
            offscreen_cleanup_margin: 300.0,
            grace_period_ms: 3000.0,
        }
    }
}

/// Partial level config. Omitted keys keep their current values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelConfigPatch {
    pub allowed_archetypes: Option<Vec<Archetype>>,
    pub base_spawn_interval_ms: Option<f32>,
    pub max_enemies: Option<usize>,
    pub test_mode: Option<bool>,
    pub interval_jitter: Option<f32>,
    pub spawn_margin: Option<f32>,
    pub spawn_spread: Option<f32>,
    pub min_distance_from_player: Option<f32>,
    pub min_distance_from_enemies: Option<f32>,
    pub right_bias: Option<f32>,
    pub first_segment_right_bias: Option<f32>,
    pub first_segment_end_x: Option<f32>,
    pub locked_camera_right_bias: Option<f32>,
    pub cleanup_distance: Option<f32>,
    pub behind_cleanup_distance: Option<f32>,
    pub offscreen_cleanup_margin: Option<f32>,
    pub grace_period_ms: Option<f32>,
}

impl LevelConfigPatch {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

macro_rules! merge {
    ($target:expr, $patch:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field.clone() {
                $target.$field = value;
            }
        )+
    };
}

impl LevelConfig {
    /// Merges `patch` and validates the result. On error nothing changes.
    pub fn apply_patch(&mut self, patch: &LevelConfigPatch) -> Result<(), ConfigError> {
        let mut merged = self.clone();
        merge!(
            merged,
            patch,
            allowed_archetypes,
            base_spawn_interval_ms,
            max_enemies,
            test_mode,
            interval_jitter,
            spawn_margin,
            spawn_spread,
            min_distance_from_player,
            min_distance_from_enemies,
            right_bias,
            first_segment_right_bias,
            first_segment_end_x,
            locked_camera_right_bias,
            cleanup_distance,
            behind_cleanup_distance,
            offscreen_cleanup_margin,
            grace_period_ms,
        );
        merged.validate()?;
        *self = merged;
        logger::log_info(&format!(
            "Level config merged: interval {}ms, cap {}, whitelist {:?}",
            self.base_spawn_interval_ms, self.max_enemies, self.allowed_archetypes
        ));
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_spawn_interval_ms.is_finite() && self.base_spawn_interval_ms > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "base_spawn_interval_ms",
                value: self.base_spawn_interval_ms,
            });
        }

        let non_negative = [
            ("spawn_margin", self.spawn_margin),
            ("spawn_spread", self.spawn_spread),
            ("min_distance_from_player", self.min_distance_from_player),
            ("min_distance_from_enemies", self.min_distance_from_enemies),
            ("cleanup_distance", self.cleanup_distance),
            ("behind_cleanup_distance", self.behind_cleanup_distance),
            ("offscreen_cleanup_margin", self.offscreen_cleanup_margin),
            ("grace_period_ms", self.grace_period_ms),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        let fractions = [
            ("interval_jitter", self.interval_jitter),
            ("right_bias", self.right_bias),
            ("first_segment_right_bias", self.first_segment_right_bias),
            ("locked_camera_right_bias", self.locked_camera_right_bias),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        if let Some(boss) = self.allowed_archetypes.iter().find(|a| **a == Archetype::Critic) {
            return Err(ConfigError::NotSpawnable(boss.name()));
        }
        Ok(())
    }

    /// Spawning can happen at all on this level.
    pub fn spawning_enabled(&self) -> bool {
        self.max_enemies > 0 && !self.test_mode
    }
}
