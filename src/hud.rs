//! HUD model
//!
//! Everything the HUD shows, as plain data. Fonts, layout and drawing are the
//! renderer's business.

use crate::assets::ImageHandle;
use crate::session::Engine;
use crate::sim::Playfield;

/// Text shown over the board once a run is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub title: String,
    pub score_line: String,
    /// "Missed: <type>" or the fail reason; empty when there is neither
    pub detail: String,
    pub hint: String,
}

/// One frame's HUD contents
#[derive(Debug, Clone)]
pub struct HudModel {
    pub target_thumbnail: ImageHandle,
    /// "Score: n" or "Rows: c/total"
    pub score_label: String,
    pub time_label: String,
    /// Timer bar fill, 0..=1
    pub timer_fill: f32,
    pub overlay: Option<Overlay>,
}

impl HudModel {
    pub fn new(engine: &Engine, target_thumbnail: ImageHandle, full_scale_secs: f32) -> Self {
        let field = engine.playfield();
        let elapsed = field.elapsed_time();

        let score_label = match engine {
            Engine::Endless { engine, .. } => format!("Score: {}", engine.score()),
            Engine::Classic(engine) => {
                format!("Rows: {}/{}", engine.cleared_rows(), engine.rows_total())
            }
        };

        Self {
            target_thumbnail,
            score_label: score_label.clone(),
            time_label: format!("{:.2}s", elapsed),
            timer_fill: timer_fill(elapsed, full_scale_secs),
            overlay: field.is_over().then(|| overlay(field, &score_label)),
        }
    }
}

/// Fraction of the timer bar to fill
pub fn timer_fill(elapsed: f32, full_scale_secs: f32) -> f32 {
    (elapsed / full_scale_secs.max(0.001)).clamp(0.0, 1.0)
}

fn overlay(field: &dyn Playfield, score_label: &str) -> Overlay {
    let title = if field.is_finished() {
        "Finished!"
    } else {
        "Game Over"
    };
    let detail = match (field.last_missed_type(), field.last_fail_reason()) {
        (Some(missed), _) => format!("Missed: {}", missed),
        (None, Some(reason)) => reason.to_string(),
        (None, None) => String::new(),
    };
    Overlay {
        title: title.to_string(),
        score_line: score_label.to_string(),
        detail,
        hint: "Press R to restart, ESC/Q to quit".to_string(),
    }
}
