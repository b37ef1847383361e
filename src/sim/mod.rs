//! Gameplay simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Time only advances through `update(dt)`
//! - Randomness only comes from a caller-supplied RNG
//! - Images are opaque handles from an `AssetProvider`
//! - Single-threaded; engines are driven by exactly one caller

pub mod classic;
pub mod endless;
pub mod events;
pub mod generator;
pub mod geometry;
pub mod spawner;
pub mod tile;

pub use classic::{ClassicEngine, ClassicPhase};
pub use endless::EndlessEngine;
pub use events::{FailReason, GameEvent, Playfield};
pub use generator::RowGenerator;
pub use geometry::{
    LaneRect, Layout, intersects_hit_line, lane_rects, pick_hit_candidate, tile_size,
};
pub use spawner::RowSpawner;
pub use tile::{Row, Tile, TileRect, TileState};
