//! Street geometry owned by the host: walkable band, world bounds, camera view.
//!
//! Screen convention: y grows downward, so `top < bottom` and actors lower on
//! screen are closer to the camera (drawn bigger and in front).

use bevy::prelude::*;

/// The walkable street band plus the perspective scale ramp across it.
#[derive(Resource, Debug, Clone, Copy)]
pub struct StreetLayout {
    /// Highest walkable y (far side of the street)
    pub top: f32,
    /// Lowest walkable y (near side of the street)
    pub bottom: f32,
    /// Sprite scale at `top`
    pub min_scale: f32,
    /// Sprite scale at `bottom`
    pub max_scale: f32,
}

impl Default for StreetLayout {
    fn default() -> Self {
        Self {
            top: 420.0,
            bottom: 620.0,
            min_scale: 0.8,
            max_scale: 1.2,
        }
    }
}

impl StreetLayout {
    pub fn clamp_y(&self, y: f32) -> f32 {
        y.clamp(self.top, self.bottom)
    }

    /// Perspective scale at `y`, linear between the band edges.
    pub fn scale_at(&self, y: f32) -> f32 {
        let span = self.bottom - self.top;
        if span <= 0.0 {
            return self.max_scale;
        }
        let t = ((y - self.top) / span).clamp(0.0, 1.0);
        self.min_scale + (self.max_scale - self.min_scale) * t
    }

    /// Draw order: lower on screen draws on top.
    pub fn depth_at(&self, y: f32) -> f32 {
        y
    }

    pub fn middle(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }
}

/// Horizontal world-collision bounds of the current level.
#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            max_x: 6400.0,
        }
    }
}

impl WorldBounds {
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }

    /// True when a body of `radius` centred on `x` is entirely inside.
    pub fn contains_fully(&self, x: f32, radius: f32) -> bool {
        x - radius >= self.min_x && x + radius <= self.max_x
    }
}

/// Visible camera window, written by the host camera every frame.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraView {
    pub left: f32,
    pub width: f32,
    /// Camera locked for a scripted fight (no scrolling)
    pub locked: bool,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            left: 0.0,
            width: 1280.0,
            locked: false,
        }
    }
}

impl CameraView {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn center(&self) -> f32 {
        self.left + self.width * 0.5
    }
}

/// Global pause switches owned by the event/cutscene system.
///
/// While `enemies_paused` or `player_paused` is set the director stops
/// spawning so a scripted sequence owns the population, and combatant AI
/// makes no decisions.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct EventGate {
    pub loading: bool,
    pub enemies_paused: bool,
    pub player_paused: bool,
}

impl EventGate {
    pub fn blocks_spawning(&self) -> bool {
        self.loading || self.enemies_paused || self.player_paused
    }

    pub fn pauses_ai(&self) -> bool {
        self.enemies_paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_ramp() {
        let layout = StreetLayout::default();
        assert_eq!(layout.scale_at(layout.top), 0.8);
        assert_eq!(layout.scale_at(layout.bottom), 1.2);
        assert!((layout.scale_at(layout.middle()) - 1.0).abs() < 1e-5);
        // Out of band clamps to the ramp ends
        assert_eq!(layout.scale_at(0.0), 0.8);
        assert_eq!(layout.scale_at(9000.0), 1.2);
    }

    #[test]
    fn test_world_bounds_contains_fully() {
        let bounds = WorldBounds { min_x: 0.0, max_x: 1000.0 };
        assert!(bounds.contains_fully(100.0, 20.0));
        assert!(!bounds.contains_fully(10.0, 20.0));
        assert!(bounds.contains(10.0));
        assert!(!bounds.contains(-1.0));
    }

    #[test]
    fn test_event_gate() {
        let gate = EventGate { loading: true, ..Default::default() };
        assert!(gate.blocks_spawning());
        assert!(!gate.pauses_ai());
    }
}
