//! Base combatant components: Health, Facing, Motion

use bevy::prelude::*;

/// Hit points of a combatant.
///
/// Invariant: 0 ≤ current ≤ max. Every write goes through a clamp, so NaN or
/// negative inputs never reach dependent logic (jump thresholds, health bars).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(30.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Current health as a fraction of max, in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }

    /// Subtracts `amount` and returns how much health was actually removed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.set_current(self.current - sanitize_amount(amount));
        before - self.current
    }

    pub fn set_current(&mut self, value: f32) {
        self.current = if value.is_finite() {
            value.clamp(0.0, self.max)
        } else {
            0.0
        };
    }
}

/// Damage amounts that are NaN, infinite or negative count as zero.
pub fn sanitize_amount(amount: f32) -> f32 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Horizontal facing. Sprites flip on this, hitboxes offset on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Facing that points along `dx`; `None` when `dx` is zero.
    pub fn toward(dx: f32) -> Option<Self> {
        if dx > 0.0 {
            Some(Facing::Right)
        } else if dx < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Authoritative street-space position and velocity (pixels, pixels/sec).
///
/// The renderer reads this; the simulation never reads sprite transforms.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Motion {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Motion {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }

    /// Advances position by velocity over `delta_ms`.
    pub fn integrate(&mut self, delta_ms: f32) {
        self.position += self.velocity * (delta_ms / 1000.0);
    }
}
