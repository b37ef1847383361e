//! Tile Tap - A lane-based falling-tile image tapping game
//!
//! Core modules:
//! - `sim`: Gameplay simulation (tiles, row generation, endless and classic engines)
//! - `config`: JSON game configuration and validation
//! - `assets`: Image catalog the simulation draws tile handles from
//! - `input`: Key-name to lane mapping
//! - `session`: Per-process driver that owns an engine and feeds it frames
//! - `hud`: Render-ready HUD data

pub mod assets;
pub mod config;
pub mod error;
pub mod hud;
pub mod input;
pub mod session;
pub mod sim;

pub use config::{GameConfig, GameMode};
pub use error::{AssetError, ConfigError, StartupError};
pub use session::Session;

/// Game configuration constants
pub mod consts {
    /// Number of lanes the game is built around
    pub const LANES: usize = 4;

    /// Default window dimensions
    pub const BASE_WIDTH: u32 = 480;
    pub const BASE_HEIGHT: u32 = 800;

    /// Tile rows visible on screen at once (tile height = window height / rows)
    pub const ROWS_VISIBLE: u32 = 4;

    /// Hit line position as a fraction of window height
    pub const HIT_LINE_FRACTION: f32 = 0.8;

    /// Pixels a target tile may travel past the hit line before it counts as missed
    pub const MISS_TOLERANCE_PX: f32 = 10.0;

    /// Elapsed seconds at which the HUD timer bar is full
    pub const TIMER_FULL_SCALE_SECS: f32 = 60.0;

    /// HUD target thumbnail edge length
    pub const THUMBNAIL_SIZE: u32 = 40;

    /// Supported image extensions
    pub const ALLOWED_FORMATS: [&str; 2] = ["png", "jpg"];
}

/// Floor of `window_height * fraction`, the way the hit line is placed on whole pixels
#[inline]
pub fn hit_line_y(window_height: u32, fraction: f32) -> f32 {
    (window_height as f32 * fraction).floor()
}

/// Vertical center of a span starting at `top`
#[inline]
pub fn center_y(top: f32, height: u32) -> f32 {
    top + height as f32 / 2.0
}
