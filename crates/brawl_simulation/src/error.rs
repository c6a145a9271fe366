//! Configuration errors.
//!
//! The simulation tick itself never fails; only loading level/archetype
//! configuration can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid level config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown archetype `{0}`")]
    UnknownArchetype(String),

    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: f32 },

    #[error("`{0}` is a boss and can't be spawned by the director")]
    NotSpawnable(&'static str),

    #[error("`{0}` has no boss kit")]
    NotABoss(&'static str),
}
