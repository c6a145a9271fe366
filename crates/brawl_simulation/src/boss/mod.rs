//! Boss extension: jump-on-damage, weapon throws, edge standing.
//!
//! A boss is a regular combatant with a `BossKit` component. The per-tick
//! update hands control to `update_boss` when the kit is present, and the
//! damage resolver consults the kit for the jump trigger and the one-shot
//! defeat.

pub mod behavior;
pub mod jump;
pub mod kit;


pub use behavior::update_boss;
pub use jump::jump_position;
pub use kit::{
    BossConfig, BossKit, EdgeConfig, EdgeSide, JumpConfig, JumpPhase, JumpStyle, ThrowConfig,
    WeaponKind, DEFAULT_EDGE_MARGIN,
};
