//! Hitbox resolver: attack rectangles, body radii, overlap tests.
//!
//! All shapes are axis-aligned rectangles in street space. Offsets are given
//! at scale 1.0 and mirrored on facing, so a left-facing swing lands to the
//! left of the body.

use bevy::prelude::*;

use crate::components::Facing;

/// Attack hitbox geometry relative to the attacker, at scale 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct HitboxSpec {
    /// Forward offset of the box centre (mirrored by facing)
    pub offset_x: f32,
    /// Vertical offset of the box centre (negative is up)
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for HitboxSpec {
    fn default() -> Self {
        Self {
            offset_x: 40.0,
            offset_y: -10.0,
            width: 50.0,
            height: 40.0,
        }
    }
}

/// World-space attack rectangle for a swing from `origin`.
pub fn attack_rect(origin: Vec2, facing: Facing, scale: f32, spec: &HitboxSpec) -> Rect {
    let scale = sane_scale(scale);
    let center = origin + Vec2::new(spec.offset_x * facing.sign(), spec.offset_y) * scale;
    Rect::from_center_size(center, Vec2::new(spec.width, spec.height) * scale)
}

/// Body radius after perspective scaling.
pub fn body_radius(base_radius: f32, scale: f32) -> f32 {
    base_radius.max(0.0) * sane_scale(scale)
}

/// Hurtbox of `half_extents` (at scale 1.0) centred on `center`.
pub fn hurtbox(center: Vec2, half_extents: Vec2, scale: f32) -> Rect {
    Rect::from_center_half_size(center, half_extents.max(Vec2::ZERO) * sane_scale(scale))
}

/// Inclusive overlap: touching edges count as a hit.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.min.x <= b.max.x && b.min.x <= a.max.x && a.min.y <= b.max.y && b.min.y <= a.max.y
}

fn sane_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
