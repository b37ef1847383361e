//! Game configuration
//!
//! Loaded once at startup from a JSON file. Everything is validated before an
//! engine is built, so the simulation never sees an inconsistent config.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Play mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Continuous scrolling with a speed ramp, runs until a failure
    Endless,
    /// A finite stack of rows advanced one at a time
    Classic,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Endless => "endless",
            GameMode::Classic => "classic",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Endless-mode scroll speed ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedConfig {
    pub start_px_per_sec: f32,
    pub accel_px_per_min: f32,
    pub max_px_per_sec: f32,
}

/// Classic-mode board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicConfig {
    /// Rows to clear to finish the run
    pub rows_total: u32,
    /// Duration of the snap animation between rows (0 = instant)
    pub advance_animation_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// One key name per lane, left to right
    pub keys: Vec<String>,
}

/// Window and playfield proportions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window size in pixels
    pub window_size: UVec2,
    /// Tile rows visible at once
    pub rows_visible: u32,
    /// Hit line height as a fraction of the window
    pub hit_line_fraction: f32,
    /// Slack past the hit line before a target counts as missed
    pub miss_tolerance_px: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_size: UVec2::new(BASE_WIDTH, BASE_HEIGHT),
            rows_visible: ROWS_VISIBLE,
            hit_line_fraction: HIT_LINE_FRACTION,
            miss_tolerance_px: MISS_TOLERANCE_PX,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub lanes: usize,
    pub mode: GameMode,
    /// Image type the player must tap
    pub target_type: String,
    /// Image types that fill the remaining lanes (may be empty)
    #[serde(default)]
    pub other_types: Vec<String>,
    /// Endless mode only
    #[serde(default)]
    pub speed: Option<SpeedConfig>,
    /// Classic mode only
    #[serde(default)]
    pub classic: Option<ClassicConfig>,
    pub assets_root: PathBuf,
    pub supported_formats: Vec<String>,
    pub controls: ControlsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl GameConfig {
    /// Read and parse a config file. Does not validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a config from JSON text. Formats are lowercased; unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: GameConfig = serde_json::from_str(json)?;
        for format in &mut config.supported_formats {
            *format = format.to_lowercase();
        }
        Ok(config)
    }

    /// Load then validate
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject anything the engines cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes != LANES {
            return Err(ConfigError::LaneCount {
                expected: LANES,
                found: self.lanes,
            });
        }

        if self.target_type.trim().is_empty() {
            return Err(ConfigError::MissingTargetType);
        }
        let mut seen = HashSet::new();
        for other in &self.other_types {
            if *other == self.target_type {
                return Err(ConfigError::TargetInOtherTypes(other.clone()));
            }
            if !seen.insert(other.as_str()) {
                return Err(ConfigError::DuplicateOtherType(other.clone()));
            }
        }

        if self.supported_formats.is_empty() {
            return Err(ConfigError::NoFormats);
        }
        if let Some(bad) = self
            .supported_formats
            .iter()
            .find(|f| !ALLOWED_FORMATS.contains(&f.as_str()))
        {
            return Err(ConfigError::UnsupportedFormat(bad.clone()));
        }

        self.validate_controls()?;

        match self.mode {
            GameMode::Endless => {
                let speed = self
                    .speed
                    .as_ref()
                    .ok_or(ConfigError::MissingModeSection(self.mode))?;
                validate_speed(speed)?;
                if self.classic.is_some() {
                    log::warn!("Ignoring 'classic' section in endless mode");
                }
            }
            GameMode::Classic => {
                let classic = self
                    .classic
                    .as_ref()
                    .ok_or(ConfigError::MissingModeSection(self.mode))?;
                if classic.rows_total == 0 {
                    return Err(ConfigError::NonPositiveRowsTotal);
                }
                if self.speed.is_some() {
                    log::warn!("Ignoring 'speed' section in classic mode");
                }
            }
        }

        self.validate_display()
    }

    fn validate_controls(&self) -> Result<(), ConfigError> {
        let keys = &self.controls.keys;
        if keys.len() != self.lanes {
            return Err(ConfigError::ControlKeyCount {
                expected: self.lanes,
                found: keys.len(),
            });
        }
        let mut seen = HashSet::new();
        for key in keys {
            let name = key.trim().to_lowercase();
            if name.is_empty() {
                return Err(ConfigError::EmptyControlKey);
            }
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateControlKey(key.clone()));
            }
        }
        Ok(())
    }

    fn validate_display(&self) -> Result<(), ConfigError> {
        let d = &self.display;
        if (d.window_size.x as usize) < self.lanes || d.window_size.y == 0 {
            return Err(ConfigError::InvalidDisplay(
                "window must be at least one pixel per lane wide and non-empty",
            ));
        }
        if d.rows_visible == 0 || d.rows_visible > d.window_size.y {
            return Err(ConfigError::InvalidDisplay(
                "rows_visible must be between 1 and the window height",
            ));
        }
        if !(d.hit_line_fraction > 0.0 && d.hit_line_fraction < 1.0) {
            return Err(ConfigError::InvalidDisplay(
                "hit_line_fraction must be strictly between 0 and 1",
            ));
        }
        if !(d.miss_tolerance_px >= 0.0) {
            return Err(ConfigError::InvalidDisplay(
                "miss_tolerance_px must not be negative",
            ));
        }
        Ok(())
    }

    /// Every image type the game draws from, target first
    pub fn all_types(&self) -> Vec<String> {
        std::iter::once(self.target_type.clone())
            .chain(self.other_types.iter().cloned())
            .collect()
    }
}

fn validate_speed(speed: &SpeedConfig) -> Result<(), ConfigError> {
    if !(speed.start_px_per_sec > 0.0) {
        return Err(ConfigError::NonPositiveSpeed("start_px_per_sec"));
    }
    if !(speed.max_px_per_sec > 0.0) {
        return Err(ConfigError::NonPositiveSpeed("max_px_per_sec"));
    }
    if !(speed.accel_px_per_min >= 0.0) {
        return Err(ConfigError::NegativeAcceleration);
    }
    if speed.max_px_per_sec < speed.start_px_per_sec {
        return Err(ConfigError::MaxBelowStart {
            start: speed.start_px_per_sec,
            max: speed.max_px_per_sec,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDLESS: &str = r#"{
        "lanes": 4,
        "mode": "endless",
        "target_type": "cat",
        "other_types": ["dog", "bird"],
        "speed": { "start_px_per_sec": 200, "accel_px_per_min": 60, "max_px_per_sec": 600 },
        "hit_window_ms": { "good": 120 },
        "assets_root": "assets",
        "supported_formats": ["PNG", "jpg"],
        "controls": { "keys": ["d", "f", "j", "k"] }
    }"#;

    const CLASSIC: &str = r#"{
        "lanes": 4,
        "mode": "classic",
        "target_type": "cat",
        "other_types": [],
        "classic": { "rows_total": 25, "advance_animation_ms": 90 },
        "assets_root": "assets",
        "supported_formats": ["png"],
        "controls": { "keys": ["a", "s", "d", "f"] },
        "display": { "window_size": [400, 600] }
    }"#;

    fn endless() -> GameConfig {
        GameConfig::from_json(ENDLESS).unwrap()
    }

    #[test]
    fn test_parse_endless_and_lowercase_formats() {
        let config = endless();
        assert_eq!(config.mode, GameMode::Endless);
        assert_eq!(config.supported_formats, vec!["png", "jpg"]);
        assert_eq!(config.display, DisplayConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_classic_with_partial_display() {
        let config = GameConfig::from_json(CLASSIC).unwrap();
        assert_eq!(config.mode, GameMode::Classic);
        assert_eq!(config.display.window_size, UVec2::new(400, 600));
        assert_eq!(config.display.rows_visible, ROWS_VISIBLE);
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_wrong_lane_count() {
        let mut config = endless();
        config.lanes = 5;
        config.controls.keys.push("l".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LaneCount { expected: 4, found: 5 })
        ));
    }

    #[test]
    fn test_rejects_bad_controls() {
        let mut config = endless();
        config.controls.keys.pop();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ControlKeyCount { .. })
        ));

        let mut config = endless();
        config.controls.keys[3] = "D".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateControlKey(_))
        ));

        let mut config = endless();
        config.controls.keys[0] = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyControlKey)));
    }

    #[test]
    fn test_rejects_bad_speeds() {
        let mut config = endless();
        config.speed.as_mut().unwrap().start_px_per_sec = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveSpeed("start_px_per_sec"))
        ));

        let mut config = endless();
        config.speed.as_mut().unwrap().max_px_per_sec = 100.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MaxBelowStart { .. })
        ));

        let mut config = endless();
        config.speed.as_mut().unwrap().accel_px_per_min = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeAcceleration)
        ));
    }

    #[test]
    fn test_rejects_mismatched_mode_section() {
        let mut config = endless();
        config.mode = GameMode::Classic;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingModeSection(GameMode::Classic))
        ));
    }

    #[test]
    fn test_rejects_bad_classic_values() {
        let mut config = GameConfig::from_json(CLASSIC).unwrap();
        config.classic.as_mut().unwrap().rows_total = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveRowsTotal)
        ));

        let negative = CLASSIC.replace("\"advance_animation_ms\": 90", "\"advance_animation_ms\": -5");
        assert!(matches!(
            GameConfig::from_json(&negative),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_unsupported_format() {
        let mut config = endless();
        config.supported_formats.push("gif".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedFormat(f)) if f == "gif"
        ));
    }

    #[test]
    fn test_rejects_target_among_other_types() {
        let mut config = endless();
        config.other_types.push("cat".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TargetInOtherTypes(_))
        ));
    }

    #[test]
    fn test_rejects_bad_type_lists() {
        let mut config = endless();
        config.target_type = " ".into();
        assert!(matches!(config.validate(), Err(ConfigError::MissingTargetType)));

        let mut config = endless();
        config.other_types.push("dog".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateOtherType(t)) if t == "dog"
        ));
    }

    #[test]
    fn test_rejects_empty_formats() {
        let mut config = endless();
        config.supported_formats.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoFormats)));
    }

    #[test]
    fn test_rejects_bad_display() {
        let cases: [fn(&mut DisplayConfig); 6] = [
            |d| d.window_size = UVec2::new(3, 800),
            |d| d.rows_visible = 0,
            |d| d.rows_visible = 801,
            |d| d.hit_line_fraction = 0.0,
            |d| d.hit_line_fraction = 1.0,
            |d| d.miss_tolerance_px = -1.0,
        ];
        for break_display in cases {
            let mut config = endless();
            break_display(&mut config.display);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidDisplay(_))
            ));
        }
    }

    #[test]
    fn test_load_reads_file() {
        let path =
            std::env::temp_dir().join(format!("tile-tap-config-{}.json", std::process::id()));
        std::fs::write(&path, ENDLESS).unwrap();
        let config = GameConfig::load_validated(&path).unwrap();
        assert_eq!(config.target_type, "cat");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("tile-tap-no-such-config.json");
        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::Io { path: p, .. }) if p == path
        ));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let json = ENDLESS.replace("\"endless\"", "\"zen\"");
        assert!(matches!(
            GameConfig::from_json(&json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_all_types_target_first() {
        assert_eq!(endless().all_types(), vec!["cat", "dog", "bird"]);
    }
}
