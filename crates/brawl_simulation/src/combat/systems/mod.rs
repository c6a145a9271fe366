//! Combat systems

pub mod damage;
pub mod hits;


pub use damage::*;
pub use hits::*;
