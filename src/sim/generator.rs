//! Row generation
//!
//! Each row hides the target in one uniformly random lane and fills the rest
//! with random other types. There is no anti-repetition rule: the same lane
//! can host the target many rows in a row.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::geometry::LaneRect;
use super::tile::{Row, Tile, TileState};
use crate::assets::AssetProvider;
use crate::error::AssetError;

/// Builds rows for one lane layout and type set
#[derive(Debug, Clone)]
pub struct RowGenerator {
    target_type: String,
    other_types: Vec<String>,
    lanes: Vec<LaneRect>,
    tile_height: u32,
}

impl RowGenerator {
    pub fn new(
        target_type: impl Into<String>,
        other_types: &[String],
        lanes: &[LaneRect],
        tile_height: u32,
    ) -> Self {
        Self {
            target_type: target_type.into(),
            other_types: other_types.to_vec(),
            lanes: lanes.to_vec(),
            tile_height,
        }
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Generate one row with its top edge at `y_top`.
    ///
    /// Lanes other than the target's stay empty when there are no other types.
    /// Lane and type choices come from `rng` only; image choice is up to `assets`.
    pub fn generate_row<R: Rng + ?Sized>(
        &self,
        assets: &mut dyn AssetProvider,
        rng: &mut R,
        y_top: f32,
    ) -> Result<Row, AssetError> {
        let mut tiles = Vec::with_capacity(self.lanes.len());
        if self.lanes.is_empty() {
            return Ok(Row { tiles });
        }

        let target_lane = rng.random_range(0..self.lanes.len());
        for (lane_index, lane) in self.lanes.iter().enumerate() {
            let type_name = if lane_index == target_lane {
                &self.target_type
            } else {
                match self.other_types.choose(rng) {
                    Some(other) => other,
                    None => continue,
                }
            };
            let image = assets.get_random_image(type_name)?;
            tiles.push(Tile {
                lane_index,
                type_name: type_name.clone(),
                image,
                x: lane.x,
                y: y_top,
                width: lane.width,
                height: self.tile_height,
                state: TileState::Active,
            });
        }

        log::trace!("Generated row at y={:.1}, target lane {}", y_top, target_lane);
        Ok(Row { tiles })
    }
}
