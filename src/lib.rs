//! grid-collide - collision rules for tile/grid arcade games
//!
//! Core modules:
//! - `kind`: Entity kind hierarchy and most-specific kind resolution
//! - `collision`: Rule registry keyed by kind pairs, symmetric rules, dispatch
//! - `board`: Tile occupancy, the source of collider/collidee pairs
//! - `settings`: Registry configuration

pub mod board;
pub mod collision;
pub mod error;
pub mod kind;
pub mod settings;

pub use collision::{CollisionHandler, CollisionMap, Unit};
pub use error::Error;
pub use kind::{KindGraph, KindId};
pub use settings::CollisionSettings;
