// main.rs - Desktop front end for the bounded Game of Life engine

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use clap::Parser;
use conway::{Config, Frame, StepDriver};
use eframe::egui;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod ui;

use ui::LifeApp;

#[derive(Parser, Debug)]
#[command(name = "conway_coro", about = "Conway's Game of Life on a bounded grid")]
struct Cli {
    /// TOML config file (width, height, ratio, interval_ms, seed)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Probability that a cell starts alive (0-1)
    #[arg(short, long)]
    ratio: Option<f64>,

    /// Milliseconds between generations
    #[arg(short, long, allow_negative_numbers = true)]
    interval: Option<i64>,

    /// Seed for reproducible random fills
    #[arg(long)]
    seed: Option<u64>,

    /// Start from a named pattern instead of a random fill
    #[arg(short, long)]
    pattern: Option<String>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn resolve_config(&self) -> conway::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(ratio) = self.ratio {
            config.ratio = ratio;
        }
        if let Some(interval) = self.interval {
            config.interval_ms = interval;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.resolve_config()?;

    // One worker: generations are computed on a single logical stream.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    let (frames_tx, frames_rx) = mpsc::unbounded_channel();
    let repaint: Arc<OnceLock<egui::Context>> = Arc::new(OnceLock::new());
    let publish_repaint = Arc::clone(&repaint);
    let mut driver = StepDriver::new(
        config.clone(),
        Box::new(move |frame: &Frame| {
            let _ = frames_tx.send(frame.clone());
            if let Some(ctx) = publish_repaint.get() {
                ctx.request_repaint();
            }
        }),
    )?;
    if let Some(name) = &cli.pattern {
        driver.load_pattern(name)?;
    }

    let handle = {
        let _guard = runtime.enter();
        driver.spawn()
    };
    info!(
        width = config.width,
        height = config.height,
        ratio = config.ratio,
        interval_ms = config.interval_ms,
        "driver started"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 950.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |cc| {
            let _ = repaint.set(cc.egui_ctx.clone());
            Box::new(LifeApp::new(runtime, handle, frames_rx, &config))
        }),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from(["conway_coro", "--width", "40", "-r", "0.5", "-i", "75"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.width, 40);
        assert_eq!(config.height, conway::config::DEFAULT_HEIGHT);
        assert_eq!(config.ratio, 0.5);
        assert_eq!(config.interval_ms, 75);
    }

    #[test]
    fn test_negative_interval_rejected() {
        let cli = Cli::parse_from(["conway_coro", "--interval", "-20"]);
        assert!(matches!(
            cli.resolve_config(),
            Err(conway::LifeError::NegativeInterval(-20))
        ));
    }
}
