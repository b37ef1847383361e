//! Engine contract and the events engines report

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a run ended in failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    /// A target tile scrolled past the hit line untapped
    MissedTarget,
    /// A non-target tile was tapped at the hit line
    WrongTap,
}

impl FailReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailReason::MissedTarget => "missed_target",
            FailReason::WrongTap => "wrong_tap",
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened during a step, for the driver to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// First input of a classic run
    TimerStarted,
    /// Target tapped
    Hit { lane: usize, score: u64 },
    /// Non-target tapped; the run is over
    WrongTap { lane: usize, type_name: String },
    /// Target scrolled past the line; the run is over
    MissedTarget { lane: usize, type_name: String },
    /// Classic board advanced by one row
    RowCleared { cleared: u32 },
    /// Classic run completed
    Finished { elapsed: f32 },
}

/// What a driver needs from either engine
pub trait Playfield {
    /// Advance the simulation by `dt` seconds
    fn update(&mut self, dt: f32);

    /// Player pressed the key for `lane`
    fn handle_keydown(&mut self, lane: usize);

    /// Run ended by a failure
    fn is_game_over(&self) -> bool;

    /// Run ended by completion (classic only)
    fn is_finished(&self) -> bool {
        false
    }

    /// No further input or time has any effect
    fn is_over(&self) -> bool {
        self.is_game_over() || self.is_finished()
    }

    fn elapsed_time(&self) -> f32;

    fn last_fail_reason(&self) -> Option<FailReason>;

    fn last_missed_type(&self) -> Option<&str>;

    /// Take the events recorded since the last drain. Events pile up until
    /// this is called, so drivers drain once per frame.
    fn drain_events(&mut self) -> Vec<GameEvent>;
}
