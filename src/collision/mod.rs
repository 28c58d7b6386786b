//! Kind-based collision rules
//!
//! Rules are registered once during setup and looked up per collision by
//! the runtime kinds of the two entities involved.

pub mod handler;
pub mod map;

pub use handler::{CollisionHandler, Inverse, Unit};
pub use map::CollisionMap;
