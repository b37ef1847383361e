//! Startup error types
//!
//! Both kinds are fatal at startup. Gameplay failures (wrong tap, missed target)
//! are not errors; they are terminal engine states, see `sim::FailReason`.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::GameMode;

/// Malformed or inconsistent configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("lanes must be exactly {expected}, got {found}")]
    LaneCount { expected: usize, found: usize },

    #[error("target_type must be provided")]
    MissingTargetType,

    #[error("other_types must not contain the target type '{0}'")]
    TargetInOtherTypes(String),

    #[error("other_types lists '{0}' more than once")]
    DuplicateOtherType(String),

    #[error("supported_formats must not be empty")]
    NoFormats,

    #[error("unsupported image format '{0}' (allowed: png, jpg)")]
    UnsupportedFormat(String),

    #[error("controls.keys has {found} entries, expected one per lane ({expected})")]
    ControlKeyCount { expected: usize, found: usize },

    #[error("controls.keys contains a blank key name")]
    EmptyControlKey,

    #[error("controls.keys must be unique (case-insensitive), '{0}' repeats")]
    DuplicateControlKey(String),

    #[error("mode '{0}' requires its own config section")]
    MissingModeSection(GameMode),

    #[error("speed.{0} must be positive")]
    NonPositiveSpeed(&'static str),

    #[error("speed.accel_px_per_min must not be negative")]
    NegativeAcceleration,

    #[error("speed.max_px_per_sec ({max}) must be >= start_px_per_sec ({start})")]
    MaxBelowStart { start: f32, max: f32 },

    #[error("classic.rows_total must be positive")]
    NonPositiveRowsTotal,

    #[error("invalid display settings: {0}")]
    InvalidDisplay(&'static str),
}

/// Missing or unusable image assets.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing type directories: {0:?}")]
    MissingTypeDirs(Vec<String>),

    #[error("unexpected extra type directories in assets_root: {0:?}")]
    UnexpectedTypeDirs(Vec<String>),

    #[error("no images found for type '{type_name}' in {}", dir.display())]
    NoImages { type_name: String, dir: PathBuf },

    #[error("type '{0}' not loaded")]
    NotLoaded(String),
}

/// Anything that can stop a session from starting
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}
