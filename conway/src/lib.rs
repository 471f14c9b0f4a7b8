//! Conway's Game of Life on a bounded, dead-bordered grid, stepped on a
//! timer until the run revisits a state or is stopped.

pub mod config;
pub mod driver;
pub mod error;
pub mod fingerprint;
pub mod grid;
pub mod patterns;
pub mod rule;
pub mod stability;

pub use config::Config;
pub use driver::{DriverHandle, Frame, FrameKind, PublishHook, RunState, StepDriver, TickOutcome};
pub use error::{LifeError, Result};
pub use fingerprint::Fingerprint;
pub use grid::Grid;
pub use stability::StabilityDetector;
