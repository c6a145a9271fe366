//! ECS components and host-owned resources shared by every subsystem
//!
//! - actor: per-combatant basics (Health, Facing, Motion)
//! - world: street band, world bounds, camera view, event gate
//! - player: read-only player snapshot

pub mod actor;
pub mod player;
pub mod world;

pub use actor::*;
pub use player::*;
pub use world::*;
