//! Endless-mode row scheduling
//!
//! Kept out of `EndlessEngine` so the engine stays a pure step function.
//! Rows are spaced exactly one tile height apart: a new row enters at
//! `y = -tile_height` as soon as the topmost live tile has scrolled to `y >= 0`.

use rand::Rng;

use super::endless::EndlessEngine;
use super::generator::RowGenerator;
use crate::assets::AssetProvider;
use crate::error::AssetError;

/// Feeds rows into an endless engine
#[derive(Debug, Clone)]
pub struct RowSpawner {
    generator: RowGenerator,
    window_height: f32,
}

impl RowSpawner {
    pub fn new(generator: RowGenerator, window_height: u32) -> Self {
        Self {
            generator,
            window_height: window_height as f32,
        }
    }

    pub fn generator(&self) -> &RowGenerator {
        &self.generator
    }

    fn spacing(&self) -> f32 {
        self.generator.tile_height() as f32
    }

    /// Stack `count` rows upward from just above the window
    pub fn seed<R: Rng + ?Sized>(
        &self,
        engine: &mut EndlessEngine,
        assets: &mut dyn AssetProvider,
        rng: &mut R,
        count: u32,
    ) -> Result<(), AssetError> {
        let start_y = -self.spacing();
        for i in 0..count {
            let row_y = start_y - i as f32 * self.spacing();
            engine.push_row(self.generator.generate_row(assets, rng, row_y)?);
        }
        Ok(())
    }

    /// True once the topmost active tile has reached the top of the window.
    /// A board with no active tiles always wants a row.
    pub fn needs_row(&self, engine: &EndlessEngine) -> bool {
        engine.topmost_active_y().is_none_or(|top| top >= 0.0)
    }

    /// Spawn at most one row this frame. Returns whether one was spawned.
    pub fn spawn_if_needed<R: Rng + ?Sized>(
        &self,
        engine: &mut EndlessEngine,
        assets: &mut dyn AssetProvider,
        rng: &mut R,
    ) -> Result<bool, AssetError> {
        if !self.needs_row(engine) {
            return Ok(false);
        }
        let row = self.generator.generate_row(assets, rng, -self.spacing())?;
        engine.push_row(row);
        Ok(true)
    }

    /// Forget tapped tiles and tiles that have scrolled off the bottom of the window
    pub fn prune(&self, engine: &mut EndlessEngine) -> usize {
        engine.prune_below(self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::config::SpeedConfig;
    use crate::sim::Playfield;
    use crate::sim::geometry::lane_rects;
    use glam::UVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Fixture {
        spawner: RowSpawner,
        engine: EndlessEngine,
        assets: MemoryAssets,
        rng: Pcg32,
    }

    fn fixture(speed_px: f32) -> Fixture {
        let lanes = lane_rects(UVec2::new(400, 600), 4);
        let others = vec!["dog".to_string()];
        let generator = RowGenerator::new("cat", &others, &lanes, 150);
        let speed = SpeedConfig {
            start_px_per_sec: speed_px,
            accel_px_per_min: 0.0,
            max_px_per_sec: speed_px,
        };
        Fixture {
            spawner: RowSpawner::new(generator, 600),
            engine: EndlessEngine::new("cat", speed, 4, 480.0, 10.0),
            assets: MemoryAssets::new(&["cat".into(), "dog".into()], UVec2::new(100, 150)),
            rng: Pcg32::seed_from_u64(9),
        }
    }

    #[test]
    fn test_seed_stacks_rows_above_window() {
        let mut f = fixture(100.0);
        f.spawner
            .seed(&mut f.engine, &mut f.assets, &mut f.rng, 5)
            .unwrap();
        assert_eq!(f.engine.tiles.len(), 20);
        let mut tops: Vec<f32> = f.engine.tiles.iter().map(|t| t.y).collect();
        tops.dedup();
        assert_eq!(tops, vec![-150.0, -300.0, -450.0, -600.0, -750.0]);
        assert!(!f.spawner.needs_row(&f.engine));
    }

    #[test]
    fn test_empty_board_wants_a_row() {
        let mut f = fixture(100.0);
        assert!(f.spawner.needs_row(&f.engine));
        assert!(
            f.spawner
                .spawn_if_needed(&mut f.engine, &mut f.assets, &mut f.rng)
                .unwrap()
        );
        assert_eq!(f.engine.topmost_active_y(), Some(-150.0));
    }

    #[test]
    fn test_spawns_when_top_row_reaches_zero() {
        let mut f = fixture(150.0);
        f.spawner
            .seed(&mut f.engine, &mut f.assets, &mut f.rng, 1)
            .unwrap();

        f.engine.update(0.5);
        assert!(
            !f.spawner
                .spawn_if_needed(&mut f.engine, &mut f.assets, &mut f.rng)
                .unwrap()
        );

        f.engine.update(0.5);
        assert_eq!(f.engine.topmost_active_y(), Some(0.0));
        assert!(
            f.spawner
                .spawn_if_needed(&mut f.engine, &mut f.assets, &mut f.rng)
                .unwrap()
        );
        assert_eq!(f.engine.tiles.len(), 8);
        assert_eq!(f.engine.topmost_active_y(), Some(-150.0));
    }

    #[test]
    fn test_prune_drops_offscreen_tiles() {
        let mut f = fixture(100.0);
        f.spawner
            .seed(&mut f.engine, &mut f.assets, &mut f.rng, 1)
            .unwrap();
        for tile in &mut f.engine.tiles {
            if tile.type_name != "cat" {
                tile.y = 601.0;
            }
        }
        assert_eq!(f.spawner.prune(&mut f.engine), 3);
        assert_eq!(f.engine.tiles.len(), 1);
    }
}
