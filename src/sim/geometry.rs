//! Playfield geometry
//!
//! Pure functions of window size and config: lane rectangles, tile size, the
//! hit line, and the hit-candidate search both engines share.

use glam::UVec2;

use super::tile::Tile;
use crate::config::DisplayConfig;

/// One vertical lane, full window height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Split the window into `lanes` columns of `width / lanes` pixels each.
///
/// Integer division can leave `width % lanes` pixels over; the last lane
/// absorbs them so the lanes cover the window with no gap.
pub fn lane_rects(window: UVec2, lanes: usize) -> Vec<LaneRect> {
    if lanes == 0 {
        return Vec::new();
    }
    let lane_width = window.x / lanes as u32;
    (0..lanes as u32)
        .map(|i| {
            let x = i * lane_width;
            let width = if i + 1 == lanes as u32 {
                window.x - x
            } else {
                lane_width
            };
            LaneRect {
                x,
                y: 0,
                width,
                height: window.y,
            }
        })
        .collect()
}

/// Tile size: one lane wide (floor), `1 / rows_visible` of the window tall (floor)
pub fn tile_size(window: UVec2, lanes: usize, rows_visible: u32) -> UVec2 {
    UVec2::new(
        window.x / lanes.max(1) as u32,
        window.y / rows_visible.max(1),
    )
}

/// The hit line crosses the span `[top, top + height]`, both ends inclusive
#[inline]
pub fn intersects_hit_line(top: f32, height: u32, hit_line_y: f32) -> bool {
    top <= hit_line_y && hit_line_y <= top + height as f32
}

/// Index of the active tile in `lane` the hit line crosses, with every tile
/// shifted down by `offset_y`.
///
/// With several candidates the one whose center is nearest the line wins.
/// On equal distance the earliest tile in `tiles` wins.
pub fn pick_hit_candidate(
    tiles: &[Tile],
    lane: usize,
    hit_line_y: f32,
    offset_y: f32,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, tile) in tiles.iter().enumerate() {
        if !tile.is_active() || tile.lane_index != lane {
            continue;
        }
        if !intersects_hit_line(tile.y + offset_y, tile.height, hit_line_y) {
            continue;
        }
        let dist = (tile.center_y(offset_y) - hit_line_y).abs();
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((i, dist)),
        }
    }
    best.map(|(i, _)| i)
}

/// Geometry of one play session, derived once from the display settings
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub window: UVec2,
    pub lanes: Vec<LaneRect>,
    pub tile_size: UVec2,
    pub hit_line_y: f32,
    pub miss_tolerance_px: f32,
    pub rows_visible: u32,
}

impl Layout {
    pub fn new(display: &DisplayConfig, lanes: usize) -> Self {
        let window = display.window_size;
        let lane_rects = lane_rects(window, lanes);
        let residual = window.x % lanes.max(1) as u32;
        if residual != 0 {
            log::debug!("Last lane absorbs {} residual pixel(s)", residual);
        }
        Self {
            window,
            lanes: lane_rects,
            tile_size: tile_size(window, lanes, display.rows_visible),
            hit_line_y: crate::hit_line_y(window.y, display.hit_line_fraction),
            miss_tolerance_px: display.miss_tolerance_px,
            rows_visible: display.rows_visible,
        }
    }

    #[inline]
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    #[inline]
    pub fn tile_height(&self) -> u32 {
        self.tile_size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ImageHandle, Placeholder};
    use crate::sim::tile::TileState;

    fn tile(lane: usize, y: f32, height: u32) -> Tile {
        Tile {
            lane_index: lane,
            type_name: "cat".into(),
            image: ImageHandle::new(Placeholder {
                type_name: "cat".into(),
                size: UVec2::new(100, height),
            }),
            x: 0,
            y,
            width: 100,
            height,
            state: TileState::Active,
        }
    }

    #[test]
    fn test_lane_rects_partition_exact() {
        let lanes = lane_rects(UVec2::new(480, 800), 4);
        assert_eq!(lanes.len(), 4);
        for (i, lane) in lanes.iter().enumerate() {
            assert_eq!(lane.x, i as u32 * 120);
            assert_eq!(lane.width, 120);
            assert_eq!(lane.height, 800);
        }
    }

    #[test]
    fn test_lane_rects_last_lane_absorbs_residual() {
        let lanes = lane_rects(UVec2::new(403, 600), 4);
        assert_eq!(lanes[0].width, 100);
        assert_eq!(lanes[2].x, 200);
        assert_eq!(lanes[3].x, 300);
        assert_eq!(lanes[3].width, 103);
        let covered: u32 = lanes.iter().map(|l| l.width).sum();
        assert_eq!(covered, 403);
    }

    #[test]
    fn test_tile_size_and_hit_line() {
        assert_eq!(tile_size(UVec2::new(403, 601), 4, 4), UVec2::new(100, 150));
        assert_eq!(crate::hit_line_y(600, 0.8), 480.0);
        assert_eq!(crate::hit_line_y(601, 0.8), 480.0);
    }

    #[test]
    fn test_intersection_is_inclusive() {
        assert!(intersects_hit_line(480.0, 100, 480.0));
        assert!(intersects_hit_line(380.0, 100, 480.0));
        assert!(!intersects_hit_line(379.0, 100, 480.0));
        assert!(!intersects_hit_line(480.5, 100, 480.0));
    }

    #[test]
    fn test_pick_closest_center() {
        // Overlapping tiles in one lane: centers at 450 and 490
        let tiles = vec![tile(0, 400.0, 100), tile(0, 440.0, 100), tile(1, 430.0, 100)];
        assert_eq!(pick_hit_candidate(&tiles, 0, 480.0, 0.0), Some(1));
        assert_eq!(pick_hit_candidate(&tiles, 1, 480.0, 0.0), Some(2));
        assert_eq!(pick_hit_candidate(&tiles, 2, 480.0, 0.0), None);
    }

    #[test]
    fn test_pick_tie_prefers_first() {
        // Centers at 470 and 490, both 10px from the line
        let tiles = vec![tile(0, 420.0, 100), tile(0, 440.0, 100)];
        assert_eq!(pick_hit_candidate(&tiles, 0, 480.0, 0.0), Some(0));
        let swapped = vec![tiles[1].clone(), tiles[0].clone()];
        assert_eq!(pick_hit_candidate(&swapped, 0, 480.0, 0.0), Some(0));
    }

    #[test]
    fn test_pick_skips_inactive_and_uses_offset() {
        let mut tiles = vec![tile(0, 300.0, 100)];
        assert_eq!(pick_hit_candidate(&tiles, 0, 480.0, 0.0), None);
        assert_eq!(pick_hit_candidate(&tiles, 0, 480.0, 100.0), Some(0));
        tiles[0].state = TileState::Hit;
        assert_eq!(pick_hit_candidate(&tiles, 0, 480.0, 100.0), None);
    }

    #[test]
    fn test_layout_from_display() {
        let display = DisplayConfig {
            window_size: UVec2::new(400, 600),
            ..DisplayConfig::default()
        };
        let layout = Layout::new(&display, 4);
        assert_eq!(layout.lane_count(), 4);
        assert_eq!(layout.tile_size, UVec2::new(100, 150));
        assert_eq!(layout.hit_line_y, 480.0);
    }
}
