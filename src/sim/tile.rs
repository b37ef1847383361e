//! Tiles and rows

use crate::assets::ImageHandle;

/// Lifecycle of a tile. Transitions only leave `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileState {
    #[default]
    Active,
    Hit,
    Missed,
}

/// Screen rectangle of a tile, whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One falling image cell
#[derive(Debug, Clone)]
pub struct Tile {
    pub lane_index: usize,
    pub type_name: String,
    pub image: ImageHandle,
    /// Left edge, fixed at creation
    pub x: u32,
    /// Top edge in window pixels, grows downward
    pub y: f32,
    pub width: u32,
    pub height: u32,
    pub state: TileState,
}

impl Tile {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == TileState::Active
    }

    /// Vertical center, with the board shifted by `offset_y`
    #[inline]
    pub fn center_y(&self, offset_y: f32) -> f32 {
        crate::center_y(self.y + offset_y, self.height)
    }

    /// Mark a live tile as tapped. No-op otherwise.
    pub fn mark_hit(&mut self) {
        if self.is_active() {
            self.state = TileState::Hit;
        }
    }

    /// Mark a live tile as missed. No-op otherwise.
    pub fn mark_missed(&mut self) {
        if self.is_active() {
            self.state = TileState::Missed;
        }
    }

    /// Draw rectangle for renderers, with the board shifted by `offset_y`
    pub fn rect(&self, offset_y: f32) -> TileRect {
        TileRect {
            x: self.x as i32,
            y: (self.y + offset_y) as i32,
            width: self.width,
            height: self.height,
        }
    }
}

/// Tiles generated together at one height, at most one per lane
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub tiles: Vec<Tile>,
}

impl Row {
    pub fn tile_in_lane(&self, lane: usize) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.lane_index == lane)
    }

    /// Lane holding a tile of `type_name`, if any
    pub fn lane_of(&self, type_name: &str) -> Option<usize> {
        self.tiles
            .iter()
            .find(|t| t.type_name == type_name)
            .map(|t| t.lane_index)
    }

    /// Shift every tile down by `dy`
    pub fn shift(&mut self, dy: f32) {
        for tile in &mut self.tiles {
            tile.y += dy;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }
}
