//! Combat clock: the `(time, delta)` pair every core timer runs on.
//!
//! Units are milliseconds. Countdown timers subtract `delta`; cooldowns compare
//! absolute `time` against a recorded timestamp.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CombatClock {
    /// Absolute simulation time (ms)
    pub time: f32,
    /// Length of the current tick (ms)
    pub delta: f32,
}

impl CombatClock {
    /// Moves the clock forward by one tick. Bad deltas become an empty tick.
    pub fn advance(&mut self, delta_ms: f32) {
        self.delta = if delta_ms.is_finite() && delta_ms > 0.0 {
            delta_ms
        } else {
            0.0
        };
        self.time += self.delta;
    }
}

/// System: mirror the fixed timestep into the combat clock.
pub fn advance_combat_clock(mut clock: ResMut<CombatClock>, time: Res<Time<Fixed>>) {
    clock.advance(time.delta_secs() * 1000.0);
}
