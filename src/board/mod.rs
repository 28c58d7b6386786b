//! Board-side collaborators consumed by the collision core

pub mod tile;

pub use tile::Tile;
