//! Endless mode
//!
//! Tiles scroll down continuously at a speed that ramps linearly up to a cap.
//! The run ends on the first wrong tap or the first target tile that slips past
//! the hit line. Spawning new rows is the driver's job, see `sim::spawner`.

use super::events::{FailReason, GameEvent, Playfield};
use super::geometry::pick_hit_candidate;
use super::tile::{Row, Tile, TileState};
use crate::config::SpeedConfig;

/// Continuous scrolling simulation
#[derive(Debug, Clone)]
pub struct EndlessEngine {
    target_type: String,
    speed: SpeedConfig,
    lanes: usize,
    hit_line_y: f32,
    miss_tolerance_px: f32,

    /// Every tile on the board, in spawn order
    pub tiles: Vec<Tile>,
    score: u64,
    elapsed_time: f32,
    current_speed: f32,
    game_over: bool,
    last_fail_reason: Option<FailReason>,
    last_missed_type: Option<String>,
    events: Vec<GameEvent>,
}

impl EndlessEngine {
    pub fn new(
        target_type: impl Into<String>,
        speed: SpeedConfig,
        lanes: usize,
        hit_line_y: f32,
        miss_tolerance_px: f32,
    ) -> Self {
        Self {
            target_type: target_type.into(),
            speed,
            lanes,
            hit_line_y,
            miss_tolerance_px,
            tiles: Vec::new(),
            score: 0,
            elapsed_time: 0.0,
            current_speed: speed.start_px_per_sec,
            game_over: false,
            last_fail_reason: None,
            last_missed_type: None,
            events: Vec::new(),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    pub fn hit_line_y(&self) -> f32 {
        self.hit_line_y
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn lane_count(&self) -> usize {
        self.lanes
    }

    /// Append a freshly generated row
    pub fn push_row(&mut self, row: Row) {
        self.tiles.extend(row.tiles);
    }

    /// Top edge of the highest active tile
    pub fn topmost_active_y(&self) -> Option<f32> {
        self.tiles
            .iter()
            .filter(|t| t.is_active())
            .map(|t| t.y)
            .reduce(f32::min)
    }

    /// Drop tapped tiles and tiles whose top edge is below `bottom_y`.
    /// Returns how many went.
    ///
    /// A live target never gets that far without ending the run first.
    pub fn prune_below(&mut self, bottom_y: f32) -> usize {
        let before = self.tiles.len();
        self.tiles.retain(|t| t.state != TileState::Hit && t.y <= bottom_y);
        before - self.tiles.len()
    }

    fn update_speed(&mut self, dt: f32) {
        let inc = (self.speed.accel_px_per_min / 60.0) * dt;
        self.current_speed = (self.current_speed + inc).min(self.speed.max_px_per_sec);
    }

    /// First overdue target in tile order ends the run
    fn check_misses(&mut self) {
        let limit = self.hit_line_y + self.miss_tolerance_px;
        let Some(tile) = self
            .tiles
            .iter_mut()
            .find(|t| t.is_active() && t.type_name == self.target_type && t.y > limit)
        else {
            return;
        };

        tile.mark_missed();
        log::debug!(
            "Missed target at y={:.1} past line={} tol={}",
            tile.y,
            self.hit_line_y,
            self.miss_tolerance_px
        );
        let lane = tile.lane_index;
        self.end_run(FailReason::MissedTarget, self.target_type.clone(), lane);
    }

    fn end_run(&mut self, reason: FailReason, type_name: String, lane: usize) {
        self.game_over = true;
        self.last_fail_reason = Some(reason);
        self.last_missed_type = Some(type_name.clone());
        self.events.push(match reason {
            FailReason::MissedTarget => GameEvent::MissedTarget { lane, type_name },
            FailReason::WrongTap => GameEvent::WrongTap { lane, type_name },
        });
        log::info!(
            "Endless run over ({}) after {:.2}s, score {}",
            reason,
            self.elapsed_time,
            self.score
        );
    }
}

impl Playfield for EndlessEngine {
    fn update(&mut self, dt: f32) {
        if self.game_over {
            return;
        }
        let dt = dt.max(0.0);
        self.elapsed_time += dt;
        self.update_speed(dt);
        let dy = self.current_speed * dt;
        for tile in self.tiles.iter_mut().filter(|t| t.is_active()) {
            tile.y += dy;
        }
        self.check_misses();
    }

    fn handle_keydown(&mut self, lane: usize) {
        debug_assert!(lane < self.lanes, "lane {} out of range", lane);
        if self.game_over {
            return;
        }
        let Some(index) = pick_hit_candidate(&self.tiles, lane, self.hit_line_y, 0.0) else {
            log::debug!("No tile at the hit line in lane {}; ignoring tap", lane);
            return;
        };

        let tile = &mut self.tiles[index];
        log::debug!(
            "Hit candidate type={} y={:.1} h={} hit_line={}",
            tile.type_name,
            tile.y,
            tile.height,
            self.hit_line_y
        );
        if tile.type_name == self.target_type {
            tile.mark_hit();
            self.score += 1;
            self.events.push(GameEvent::Hit {
                lane,
                score: self.score,
            });
            log::debug!("Hit, score={}", self.score);
        } else {
            let type_name = tile.type_name.clone();
            self.end_run(FailReason::WrongTap, type_name, lane);
        }
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    fn last_fail_reason(&self) -> Option<FailReason> {
        self.last_fail_reason
    }

    fn last_missed_type(&self) -> Option<&str> {
        self.last_missed_type.as_deref()
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
