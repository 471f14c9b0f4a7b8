// config.rs - Run configuration

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{LifeError, Result};
use crate::grid::{check_dimensions, check_ratio};

pub const DEFAULT_WIDTH: usize = 20;
pub const DEFAULT_HEIGHT: usize = 20;
pub const DEFAULT_RATIO: f64 = 0.3;
pub const DEFAULT_INTERVAL_MS: i64 = 200;

/// Board size, fill ratio and pacing. Missing keys in a config file fall
/// back to the defaults above.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    /// Probability that a randomly filled cell starts alive.
    pub ratio: f64,
    /// Delay between generations in milliseconds.
    pub interval_ms: i64,
    /// Fixed RNG seed for reproducible fills.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            ratio: DEFAULT_RATIO,
            interval_ms: DEFAULT_INTERVAL_MS,
            seed: None,
        }
    }
}

pub(crate) fn check_interval(interval_ms: i64) -> Result<Duration> {
    u64::try_from(interval_ms)
        .map(Duration::from_millis)
        .map_err(|_| LifeError::NegativeInterval(interval_ms))
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        check_ratio(self.ratio)?;
        check_interval(self.interval_ms)?;
        Ok(())
    }

    /// Inter-tick delay. A negative value, which `validate` rejects, reads as zero.
    pub fn interval(&self) -> Duration {
        check_interval(self.interval_ms).unwrap_or(Duration::ZERO)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let base = Config::default();
        assert!(matches!(
            Config { width: 0, ..base.clone() }.validate(),
            Err(LifeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Config { ratio: -0.1, ..base.clone() }.validate(),
            Err(LifeError::InvalidRatio(_))
        ));
        assert!(matches!(
            Config { interval_ms: -5, ..base }.validate(),
            Err(LifeError::NegativeInterval(-5))
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("width = 40\nseed = 9").unwrap();
        assert_eq!(config.width, 40);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("conway-config-{}.toml", std::process::id()));
        std::fs::write(&path, "height = 12\nratio = 0.5\ninterval_ms = 50\n").unwrap();
        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!((config.width, config.height), (DEFAULT_WIDTH, 12));
        assert_eq!(config.interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let path = std::env::temp_dir().join(format!("conway-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "ratio = 2.0\n").unwrap();
        let result = Config::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(LifeError::InvalidRatio(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/conway.toml"));
        assert!(matches!(result, Err(LifeError::Io(_))));
    }
}
