//! Spawn pacing: interval timer, rubber-band scaling, jitter, counters.

use bevy::prelude::*;
use rand::Rng;
use serde::Serialize;

use crate::error::ConfigError;
use crate::spawn::config::{LevelConfig, LevelConfigPatch};

/// Player health above this speeds spawning up.
pub const RUBBER_BAND_HIGH: f32 = 0.7;
/// Player health below this slows spawning down.
pub const RUBBER_BAND_LOW: f32 = 0.3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpawnStats {
    pub spawned: u32,
    pub rejected: u32,
    pub cleaned: u32,
    pub died: u32,
}

#[derive(Resource, Debug, Clone)]
pub struct SpawnDirector {
    pub config: LevelConfig,
    /// Accumulated (rubber-banded) ms toward the next spawn
    pub timer: f32,
    /// Current jittered interval
    pub interval: f32,
    pub stats: SpawnStats,
}

impl Default for SpawnDirector {
    fn default() -> Self {
        Self::new(LevelConfig::default())
    }
}

impl SpawnDirector {
    pub fn new(config: LevelConfig) -> Self {
        Self {
            interval: config.base_spawn_interval_ms,
            config,
            timer: 0.0,
            stats: SpawnStats::default(),
        }
    }

    /// Timer speed from player health: winning players get more enemies.
    pub fn rubber_band(player_health: f32) -> f32 {
        if player_health > RUBBER_BAND_HIGH {
            1.25
        } else if player_health < RUBBER_BAND_LOW {
            0.75
        } else {
            1.0
        }
    }

    /// Advances the timer. True when a spawn attempt is due; the next
    /// interval is then re-rolled around the base, never around the last roll.
    pub fn tick(&mut self, delta: f32, player_health: f32, blocked: bool, rng: &mut impl Rng) -> bool {
        if blocked || !self.config.spawning_enabled() {
            return false;
        }
        self.timer += delta * Self::rubber_band(player_health);
        if self.timer < self.interval {
            return false;
        }
        self.timer = 0.0;
        self.interval = self.jittered_interval(rng);
        true
    }

    pub fn jittered_interval(&self, rng: &mut impl Rng) -> f32 {
        let base = self.config.base_spawn_interval_ms;
        let jitter = self.config.interval_jitter.clamp(0.0, 1.0);
        if jitter == 0.0 {
            return base;
        }
        base * rng.gen_range((1.0 - jitter)..=(1.0 + jitter))
    }

    pub fn reset_timer(&mut self) {
        self.timer = 0.0;
        self.interval = self.config.base_spawn_interval_ms;
    }

    pub fn apply_patch(&mut self, patch: &LevelConfigPatch) -> Result<(), ConfigError> {
        let previous_base = self.config.base_spawn_interval_ms;
        self.config.apply_patch(patch)?;
        if self.config.base_spawn_interval_ms != previous_base {
            self.interval = self.config.base_spawn_interval_ms;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rubber_band_thresholds() {
        assert_eq!(SpawnDirector::rubber_band(0.9), 1.25);
        assert_eq!(SpawnDirector::rubber_band(0.7), 1.0);
        assert_eq!(SpawnDirector::rubber_band(0.5), 1.0);
        assert_eq!(SpawnDirector::rubber_band(0.3), 1.0);
        assert_eq!(SpawnDirector::rubber_band(0.1), 0.75);
    }

    #[test]
    fn test_healthy_player_spawns_sooner() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut healthy = SpawnDirector::default();
        let mut hurt = SpawnDirector::default();

        // 2500ms of ticks: 2500 * 1.25 crosses 3000, 2500 * 0.75 doesn't
        let mut healthy_fired = false;
        let mut hurt_fired = false;
        for _ in 0..125 {
            healthy_fired |= healthy.tick(20.0, 1.0, false, &mut rng);
            hurt_fired |= hurt.tick(20.0, 0.1, false, &mut rng);
        }
        assert!(healthy_fired);
        assert!(!hurt_fired);
    }

    #[test]
    fn test_jitter_stays_around_base() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let director = SpawnDirector::default();
        for _ in 0..200 {
            let interval = director.jittered_interval(&mut rng);
            assert!((2400.0..=3600.0).contains(&interval), "interval = {}", interval);
        }
    }

    #[test]
    fn test_blocked_or_disabled_never_fires() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut director = SpawnDirector::default();
        assert!(!director.tick(10_000.0, 0.5, true, &mut rng));
        assert_eq!(director.timer, 0.0);

        director.config.test_mode = true;
        assert!(!director.tick(10_000.0, 0.5, false, &mut rng));
    }

    #[test]
    fn test_patch_resets_interval_on_base_change() {
        let mut director = SpawnDirector::default();
        director.interval = 3300.0;
        let patch = LevelConfigPatch {
            base_spawn_interval_ms: Some(1000.0),
            ..Default::default()
        };
        director.apply_patch(&patch).unwrap();
        assert_eq!(director.interval, 1000.0);
    }
}
