// error.rs - Error taxonomy for the Life engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifeError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("ratio must lie in [0, 1], got {0}")]
    InvalidRatio(f64),

    #[error("step interval must be non-negative, got {0} ms")]
    NegativeInterval(i64),

    #[error("cell ({row}, {col}) is outside the {width}x{height} grid")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unexpected character {0:?} in grid text")]
    InvalidCell(char),

    #[error("cells cannot be edited while a run is in progress")]
    RunInProgress,

    #[error("unknown pattern {0:?}")]
    UnknownPattern(String),

    #[error("pattern {name:?} does not fit a {width}x{height} grid")]
    PatternTooLarge {
        name: String,
        width: usize,
        height: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("the step driver is no longer running")]
    DriverGone,
}

pub type Result<T> = std::result::Result<T, LifeError>;
