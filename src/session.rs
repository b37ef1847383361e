//! Play session driver
//!
//! Owns one engine plus everything it needs between frames (layout, RNG,
//! assets, key map). The outer event loop calls `frame(dt)` once per tick and
//! `key_down(name)` per key press, then reads state back for rendering.

use glam::UVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::assets::{AssetProvider, ImageHandle};
use crate::config::{GameConfig, GameMode};
use crate::consts::{THUMBNAIL_SIZE, TIMER_FULL_SCALE_SECS};
use crate::error::{AssetError, ConfigError, StartupError};
use crate::hud::HudModel;
use crate::input::{KeyAction, KeyMap};
use crate::sim::{
    ClassicEngine, EndlessEngine, GameEvent, Layout, Playfield, RowGenerator, RowSpawner,
};

/// The engine for the configured mode
#[derive(Debug, Clone)]
pub enum Engine {
    Endless {
        engine: EndlessEngine,
        spawner: RowSpawner,
    },
    Classic(ClassicEngine),
}

impl Engine {
    pub fn playfield(&self) -> &dyn Playfield {
        match self {
            Engine::Endless { engine, .. } => engine,
            Engine::Classic(engine) => engine,
        }
    }

    pub fn playfield_mut(&mut self) -> &mut dyn Playfield {
        match self {
            Engine::Endless { engine, .. } => engine,
            Engine::Classic(engine) => engine,
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            Engine::Endless { .. } => GameMode::Endless,
            Engine::Classic(_) => GameMode::Classic,
        }
    }
}

/// One play session
pub struct Session<A: AssetProvider> {
    config: GameConfig,
    layout: Layout,
    keymap: KeyMap,
    assets: A,
    rng: Pcg32,
    engine: Engine,
    thumbnail: ImageHandle,
    runs: u32,
}

impl<A: AssetProvider> Session<A> {
    /// Start a session with a per-process random seed
    pub fn with_random_seed(config: GameConfig, assets: A) -> Result<Self, StartupError> {
        Self::new(config, assets, rand::random())
    }

    /// Start a session. `config` must already be validated.
    pub fn new(config: GameConfig, mut assets: A, seed: u64) -> Result<Self, StartupError> {
        let layout = Layout::new(&config.display, config.lanes);
        let keymap = KeyMap::new(&config.controls.keys)?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let engine = build_engine(&config, &layout, &mut assets, &mut rng)?;
        let thumbnail =
            assets.get_thumbnail(&config.target_type, UVec2::splat(THUMBNAIL_SIZE))?;
        log::info!("Session started: mode={}, seed={}", config.mode, seed);

        Ok(Self {
            config,
            layout,
            keymap,
            assets,
            rng,
            engine,
            thumbnail,
            runs: 1,
        })
    }

    /// Throw the current run away and start a fresh one
    pub fn restart(&mut self) -> Result<(), StartupError> {
        self.engine = build_engine(&self.config, &self.layout, &mut self.assets, &mut self.rng)?;
        self.runs += 1;
        log::info!("Restarted (run #{})", self.runs);
        Ok(())
    }

    /// Advance one frame of `dt` seconds
    pub fn frame(&mut self, dt: f32) -> Result<(), AssetError> {
        let dt = dt.max(0.0);
        match &mut self.engine {
            Engine::Endless { engine, spawner } => {
                if engine.is_game_over() {
                    return Ok(());
                }
                engine.update(dt);
                if !engine.is_game_over() {
                    spawner.spawn_if_needed(engine, &mut self.assets, &mut self.rng)?;
                    spawner.prune(engine);
                }
            }
            Engine::Classic(engine) => engine.update(dt),
        }
        Ok(())
    }

    /// Route a key press. Lane taps are applied here; restart and quit are
    /// returned for the caller to act on.
    pub fn key_down(&mut self, key: &str) -> KeyAction {
        let action = self.keymap.action(key, self.is_over());
        if let KeyAction::Lane(lane) = action {
            self.engine.playfield_mut().handle_keydown(lane);
        }
        action
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.engine.playfield_mut().drain_events()
    }

    pub fn is_over(&self) -> bool {
        self.engine.playfield().is_over()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn thumbnail(&self) -> &ImageHandle {
        &self.thumbnail
    }

    /// HUD contents for the current frame
    pub fn hud(&self) -> HudModel {
        HudModel::new(&self.engine, self.thumbnail.clone(), TIMER_FULL_SCALE_SECS)
    }

    /// Runs started in this session, including the current one
    pub fn runs(&self) -> u32 {
        self.runs
    }
}

fn build_engine(
    config: &GameConfig,
    layout: &Layout,
    assets: &mut dyn AssetProvider,
    rng: &mut Pcg32,
) -> Result<Engine, StartupError> {
    let generator = RowGenerator::new(
        config.target_type.as_str(),
        &config.other_types,
        &layout.lanes,
        layout.tile_height(),
    );

    let engine = match config.mode {
        GameMode::Endless => {
            let speed = config
                .speed
                .ok_or(ConfigError::MissingModeSection(GameMode::Endless))?;
            let mut engine = EndlessEngine::new(
                config.target_type.as_str(),
                speed,
                layout.lane_count(),
                layout.hit_line_y,
                layout.miss_tolerance_px,
            );
            let spawner = RowSpawner::new(generator, layout.window.y);
            spawner.seed(&mut engine, assets, rng, layout.rows_visible + 1)?;
            Engine::Endless { engine, spawner }
        }
        GameMode::Classic => {
            let classic = config
                .classic
                .ok_or(ConfigError::MissingModeSection(GameMode::Classic))?;
            Engine::Classic(ClassicEngine::new(
                &classic,
                &generator,
                assets,
                rng,
                layout.hit_line_y,
            )?)
        }
    };
    Ok(engine)
}
