//! Tile Tap entry point
//!
//! Loads and validates the config, preloads assets, then runs a headless
//! autoplay session. Windowing and drawing live in a separate front end.

use std::process::ExitCode;

use tile_tap::assets::{AssetCatalog, validate_expected_type_dirs};
use tile_tap::session::Engine;
use tile_tap::sim::{Layout, Playfield, pick_hit_candidate};
use tile_tap::{GameConfig, Session, StartupError};

/// Simulated frame length
const FRAME_DT: f32 = 1.0 / 60.0;
/// Longest autoplay run, in simulated seconds
const MAX_DEMO_SECS: f32 = 120.0;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Tile Tap (native) starting...");

    let path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> Result<(), StartupError> {
    let config = GameConfig::load_validated(path)?;
    let types = config.all_types();
    validate_expected_type_dirs(&config.assets_root, &types)?;

    let layout = Layout::new(&config.display, config.lanes);
    let mut catalog = AssetCatalog::new(
        &config.assets_root,
        &config.supported_formats,
        layout.tile_size,
        rand::random(),
    );
    catalog.preload(&types)?;

    let mut session = Session::with_random_seed(config, catalog)?;
    let mut frames = 0u32;
    while !session.is_over() && frames as f32 * FRAME_DT < MAX_DEMO_SECS {
        if let Some(lane) = autoplay_lane(session.engine()) {
            let key = session.config().controls.keys[lane].clone();
            session.key_down(&key);
        }
        session.frame(FRAME_DT)?;
        for event in session.drain_events() {
            log::debug!("{:?}", event);
        }
        frames += 1;
    }

    let hud = session.hud();
    let field = session.engine().playfield();
    log::info!(
        "Demo ended after {} frames: {} in {}",
        frames,
        hud.score_label,
        hud.time_label
    );
    if let Some(reason) = field.last_fail_reason() {
        log::info!(
            "Run failed: {} ({})",
            reason,
            field.last_missed_type().unwrap_or("-")
        );
    }
    Ok(())
}

/// Lane a perfect player would tap this frame, if any
fn autoplay_lane(engine: &Engine) -> Option<usize> {
    match engine {
        Engine::Endless { engine, .. } => {
            let line = engine.hit_line_y();
            (0..engine.lane_count()).find(|&lane| {
                pick_hit_candidate(&engine.tiles, lane, line, 0.0).is_some_and(|i| {
                    let tile = &engine.tiles[i];
                    tile.type_name == engine.target_type() && tile.center_y(0.0) >= line
                })
            })
        }
        Engine::Classic(engine) => {
            if engine.is_advancing() || engine.is_over() {
                return None;
            }
            engine.front_row()?.lane_of(engine.target_type())
        }
    }
}
