//! Classic mode
//!
//! A finite stack of rows is generated up front. The front row rests centered
//! on the hit line; tapping its target slides the whole board down one tile
//! height (optionally animated) and the next row takes its place.
//!
//! ```text
//! Idle --first tap--> Playing --target--> Advancing --done--> Playing ... --> Finished
//!                        \
//!                         +--wrong tap--> GameOver
//! ```

use std::collections::VecDeque;

use rand::Rng;

use super::events::{FailReason, GameEvent, Playfield};
use super::generator::RowGenerator;
use super::geometry::pick_hit_candidate;
use super::tile::Row;
use crate::assets::AssetProvider;
use crate::config::ClassicConfig;
use crate::error::AssetError;

/// Where a classic run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassicPhase {
    /// Waiting for the first input; timer not started
    Idle,
    Playing,
    /// Board sliding down after a correct tap; input ignored
    Advancing,
    Finished,
    GameOver,
}

/// Discrete row-by-row simulation
#[derive(Debug, Clone)]
pub struct ClassicEngine {
    target_type: String,
    lanes: usize,
    hit_line_y: f32,
    tile_height: f32,
    rows_total: u32,
    advance_duration_ms: u64,

    /// Remaining rows, front first
    rows: VecDeque<Row>,
    cleared_rows: u32,
    advancing: bool,
    advance_elapsed_ms: f32,
    board_offset_y: f32,
    finished: bool,
    game_over: bool,
    timer_running: bool,
    elapsed_time: f32,
    last_fail_reason: Option<FailReason>,
    last_missed_type: Option<String>,
    events: Vec<GameEvent>,
}

impl ClassicEngine {
    /// Generate all `rows_total` rows, the front one centered on `hit_line_y`
    pub fn new<R: Rng + ?Sized>(
        config: &ClassicConfig,
        generator: &RowGenerator,
        assets: &mut dyn AssetProvider,
        rng: &mut R,
        hit_line_y: f32,
    ) -> Result<Self, AssetError> {
        let tile_height = generator.tile_height() as f32;
        let base_row_y = hit_line_y - tile_height / 2.0;
        let rows = (0..config.rows_total)
            .map(|i| generator.generate_row(assets, rng, base_row_y - i as f32 * tile_height))
            .collect::<Result<VecDeque<_>, _>>()?;
        log::info!(
            "Classic board ready: {} rows, advance {}ms",
            config.rows_total,
            config.advance_animation_ms
        );

        Ok(Self {
            target_type: generator.target_type().to_string(),
            lanes: generator.lane_count(),
            hit_line_y,
            tile_height,
            rows_total: config.rows_total,
            advance_duration_ms: config.advance_animation_ms,
            rows,
            cleared_rows: 0,
            advancing: false,
            advance_elapsed_ms: 0.0,
            board_offset_y: 0.0,
            finished: false,
            game_over: false,
            timer_running: false,
            elapsed_time: 0.0,
            last_fail_reason: None,
            last_missed_type: None,
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> ClassicPhase {
        if self.game_over {
            ClassicPhase::GameOver
        } else if self.finished {
            ClassicPhase::Finished
        } else if self.advancing {
            ClassicPhase::Advancing
        } else if self.timer_running {
            ClassicPhase::Playing
        } else {
            ClassicPhase::Idle
        }
    }

    pub fn rows(&self) -> &VecDeque<Row> {
        &self.rows
    }

    pub fn front_row(&self) -> Option<&Row> {
        self.rows.front()
    }

    pub fn cleared_rows(&self) -> u32 {
        self.cleared_rows
    }

    pub fn rows_total(&self) -> u32 {
        self.rows_total
    }

    /// Transient downward shift applied to every row while advancing
    pub fn board_offset_y(&self) -> f32 {
        self.board_offset_y
    }

    pub fn is_advancing(&self) -> bool {
        self.advancing
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn hit_line_y(&self) -> f32 {
        self.hit_line_y
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    fn begin_advance(&mut self) {
        if self.advance_duration_ms == 0 {
            self.board_offset_y = self.tile_height;
            self.finalize_advance();
            return;
        }
        self.advancing = true;
        self.advance_elapsed_ms = 0.0;
        self.board_offset_y = 0.0;
    }

    fn step_advance(&mut self, dt: f32) {
        self.advance_elapsed_ms += dt * 1000.0;
        let progress = (self.advance_elapsed_ms / self.advance_duration_ms as f32).min(1.0);
        self.board_offset_y = progress * self.tile_height;
        if progress >= 1.0 {
            self.finalize_advance();
        }
    }

    /// Bake the offset into every remaining tile and drop the cleared row
    fn finalize_advance(&mut self) {
        let offset = self.board_offset_y;
        for row in &mut self.rows {
            row.shift(offset);
        }
        self.board_offset_y = 0.0;
        self.advance_elapsed_ms = 0.0;
        self.advancing = false;

        self.rows.pop_front();
        self.cleared_rows += 1;
        self.events.push(GameEvent::RowCleared {
            cleared: self.cleared_rows,
        });
        log::debug!("Row cleared ({}/{})", self.cleared_rows, self.rows_total);

        if self.cleared_rows == self.rows_total {
            self.finished = true;
            self.timer_running = false;
            self.events.push(GameEvent::Finished {
                elapsed: self.elapsed_time,
            });
            log::info!(
                "Classic run finished: {} rows in {:.2}s",
                self.rows_total,
                self.elapsed_time
            );
        }
    }
}

impl Playfield for ClassicEngine {
    fn update(&mut self, dt: f32) {
        if self.game_over || self.finished {
            return;
        }
        let dt = dt.max(0.0);
        if self.timer_running {
            self.elapsed_time += dt;
        }
        if self.advancing {
            self.step_advance(dt);
        }
    }

    fn handle_keydown(&mut self, lane: usize) {
        debug_assert!(lane < self.lanes, "lane {} out of range", lane);
        if self.game_over || self.finished || self.advancing {
            return;
        }
        if !self.timer_running {
            self.timer_running = true;
            self.events.push(GameEvent::TimerStarted);
        }

        let offset = self.board_offset_y;
        let hit_line_y = self.hit_line_y;
        let Some(row) = self.rows.front_mut() else {
            return;
        };
        let Some(index) = pick_hit_candidate(&row.tiles, lane, hit_line_y, offset) else {
            log::debug!("No tile at the hit line in lane {}; ignoring tap", lane);
            return;
        };

        let tile = &mut row.tiles[index];
        if tile.type_name == self.target_type {
            tile.mark_hit();
            self.events.push(GameEvent::Hit {
                lane,
                score: u64::from(self.cleared_rows) + 1,
            });
            self.begin_advance();
        } else {
            let type_name = tile.type_name.clone();
            self.game_over = true;
            self.timer_running = false;
            self.last_fail_reason = Some(FailReason::WrongTap);
            self.last_missed_type = Some(type_name.clone());
            self.events.push(GameEvent::WrongTap { lane, type_name });
            log::info!(
                "Classic run over (wrong tap) at row {}/{}",
                self.cleared_rows + 1,
                self.rows_total
            );
        }
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn is_finished(&self) -> bool {
        self.finished
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
