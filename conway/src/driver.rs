// driver.rs - Timed stepping of a run, one generation per tick

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::config::{Config, check_interval};
use crate::error::{LifeError, Result};
use crate::grid::{Grid, check_dimensions, check_ratio};
use crate::patterns;
use crate::rule;
use crate::stability::StabilityDetector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Why a frame was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// The grid was replaced (startup, configure, randomize, resize, clear, pattern).
    Reset,
    /// A cell was toggled.
    Edited,
    /// A run began from this grid.
    Started,
    /// A new generation was committed.
    Generation,
    /// The run stopped on a repeated state; the grid is the last committed one.
    Halted,
}

/// Snapshot handed to the publish hook.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub grid: Grid,
    pub generation: u64,
    pub kind: FrameKind,
}

pub type PublishHook = Box<dyn FnMut(&Frame) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No run was active; nothing happened.
    Idle,
    Committed,
    Halted,
}

/// Owns the grid and the state of the current run.
///
/// The synchronous methods are the whole state machine. [`StepDriver::spawn`]
/// puts the driver on a task that ticks it on a timer and applies commands
/// between ticks.
pub struct StepDriver {
    grid: Grid,
    config: Config,
    detector: StabilityDetector,
    generation: u64,
    state: watch::Sender<RunState>,
    publish: PublishHook,
    rng: StdRng,
}

impl StepDriver {
    /// A driver holding a random grid built from `config`.
    pub fn new(config: Config, publish: PublishHook) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = Grid::random(config.width, config.height, config.ratio, &mut rng)?;
        let (state, _) = watch::channel(RunState::Idle);
        Ok(Self {
            grid,
            config,
            detector: StabilityDetector::new(),
            generation: 0,
            state,
            publish,
            rng,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    fn emit(&mut self, kind: FrameKind) {
        let frame = Frame {
            grid: self.grid.clone(),
            generation: self.generation,
            kind,
        };
        (self.publish)(&frame);
    }

    /// Begin a run from the current grid. Does nothing if one is active.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.detector.reset();
        self.generation = 0;
        self.state.send_replace(RunState::Running);
        info!(
            width = self.grid.width(),
            height = self.grid.height(),
            population = self.grid.population(),
            "run started"
        );
        self.emit(FrameKind::Started);
    }

    /// End the active run, if any. Publishes nothing.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state.send_replace(RunState::Idle);
        info!(generation = self.generation, "run stopped");
        true
    }

    /// Advance the active run by one generation.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        let next = rule::step(&self.grid);
        self.generation += 1;

        if self.detector.observe(&next) {
            self.state.send_replace(RunState::Idle);
            info!(
                generation = self.generation,
                visited = self.detector.len(),
                "run halted: repeat detected"
            );
            self.emit(FrameKind::Halted);
            return TickOutcome::Halted;
        }

        self.grid = next;
        debug!(
            generation = self.generation,
            population = self.grid.population(),
            "generation committed"
        );
        self.emit(FrameKind::Generation);
        TickOutcome::Committed
    }

    /// Flip one cell. Only allowed between runs.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> Result<bool> {
        if self.is_running() {
            warn!(row, col, "cell edit rejected: run in progress");
            return Err(LifeError::RunInProgress);
        }
        let alive = self.grid.toggle(row, col).inspect_err(|err| {
            warn!(%err, "cell edit rejected");
        })?;
        self.emit(FrameKind::Edited);
        Ok(alive)
    }

    fn replace_grid(&mut self, grid: Grid) {
        self.stop();
        self.config.width = grid.width();
        self.config.height = grid.height();
        self.grid = grid;
        self.generation = 0;
        self.emit(FrameKind::Reset);
    }

    /// Replace the whole configuration and the grid with a fresh random one.
    pub fn configure(&mut self, config: Config) -> Result<()> {
        config.validate().inspect_err(|err| warn!(%err, "configuration rejected"))?;
        if let Some(seed) = config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        let grid = Grid::random(config.width, config.height, config.ratio, &mut self.rng)?;
        info!(
            width = config.width,
            height = config.height,
            ratio = config.ratio,
            interval_ms = config.interval_ms,
            "reconfigured"
        );
        self.config = config;
        self.replace_grid(grid);
        Ok(())
    }

    /// New random grid of the current size.
    pub fn randomize(&mut self, ratio: f64) -> Result<()> {
        check_ratio(ratio)?;
        let grid = Grid::random(self.config.width, self.config.height, ratio, &mut self.rng)?;
        self.config.ratio = ratio;
        self.replace_grid(grid);
        Ok(())
    }

    /// New random grid of the given size with the current ratio.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        check_dimensions(width, height)?;
        let grid = Grid::random(width, height, self.config.ratio, &mut self.rng)?;
        info!(width, height, "resized");
        self.replace_grid(grid);
        Ok(())
    }

    /// All cells dead.
    pub fn clear(&mut self) -> Result<()> {
        let grid = Grid::empty(self.config.width, self.config.height)?;
        self.replace_grid(grid);
        Ok(())
    }

    /// Dead grid of the current size carrying a named preset.
    pub fn load_pattern(&mut self, name: &str) -> Result<()> {
        let grid = patterns::find(name)?.place(self.config.width, self.config.height)?;
        info!(pattern = name, "pattern loaded");
        self.replace_grid(grid);
        Ok(())
    }

    /// Replace the grid with one supplied by the caller.
    pub fn load_grid(&mut self, grid: Grid) {
        self.replace_grid(grid);
    }

    /// Change the pacing. An active run keeps going; the new interval applies
    /// from the next scheduled tick.
    pub fn set_interval(&mut self, interval_ms: i64) -> Result<()> {
        check_interval(interval_ms)?;
        self.config.interval_ms = interval_ms;
        debug!(interval_ms, "interval changed");
        Ok(())
    }

    /// Move the driver onto its own task and return a handle to control it.
    ///
    /// Must be called from within a tokio runtime. The task publishes the
    /// current grid once on startup and exits when every handle is dropped.
    pub fn spawn(self) -> DriverHandle {
        let (commands, receiver) = mpsc::unbounded_channel();
        let state = self.state.subscribe();
        tokio::spawn(self.run(receiver));
        DriverHandle { commands, state }
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        self.emit(FrameKind::Reset);
        let mut next_tick: Option<Instant> = None;

        loop {
            // The interval is read when a tick is scheduled, not when it fires.
            next_tick = match next_tick {
                _ if !self.is_running() => None,
                Some(at) => Some(at),
                None => Some(Instant::now() + self.config.interval()),
            };

            let wake = match next_tick {
                Some(at) => tokio::select! {
                    biased;
                    command = commands.recv() => Wake::Command(command),
                    () = time::sleep_until(at) => Wake::Tick,
                },
                None => Wake::Command(commands.recv().await),
            };

            match wake {
                Wake::Tick => {
                    next_tick = None;
                    self.tick();
                }
                Wake::Command(Some(command)) => self.handle(command),
                Wake::Command(None) => break,
            }
        }
        debug!("step driver task finished");
    }

    fn handle(&mut self, command: Command) {
        // A dropped reply receiver only means the caller stopped waiting.
        match command {
            Command::Start(reply) => {
                self.start();
                let _ = reply.send(Ok(()));
            }
            Command::Stop(reply) => {
                self.stop();
                let _ = reply.send(Ok(()));
            }
            Command::Configure(config, reply) => {
                let _ = reply.send(self.configure(config));
            }
            Command::Randomize(ratio, reply) => {
                let _ = reply.send(self.randomize(ratio));
            }
            Command::Resize(width, height, reply) => {
                let _ = reply.send(self.resize(width, height));
            }
            Command::Clear(reply) => {
                let _ = reply.send(self.clear());
            }
            Command::LoadPattern(name, reply) => {
                let _ = reply.send(self.load_pattern(&name));
            }
            Command::LoadGrid(grid, reply) => {
                self.load_grid(grid);
                let _ = reply.send(Ok(()));
            }
            Command::SetInterval(interval_ms, reply) => {
                let _ = reply.send(self.set_interval(interval_ms));
            }
            Command::ToggleCell(row, col, reply) => {
                let _ = reply.send(self.toggle_cell(row, col));
            }
        }
    }
}

enum Wake {
    Tick,
    Command(Option<Command>),
}

type Reply<T> = oneshot::Sender<Result<T>>;

enum Command {
    Start(Reply<()>),
    Stop(Reply<()>),
    Configure(Config, Reply<()>),
    Randomize(f64, Reply<()>),
    Resize(usize, usize, Reply<()>),
    Clear(Reply<()>),
    LoadPattern(String, Reply<()>),
    LoadGrid(Grid, Reply<()>),
    SetInterval(i64, Reply<()>),
    ToggleCell(usize, usize, Reply<bool>),
}

/// Cloneable control surface for a spawned [`StepDriver`].
#[derive(Clone)]
pub struct DriverHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<RunState>,
}

impl DriverHandle {
    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .map_err(|_| LifeError::DriverGone)?;
        response.await.map_err(|_| LifeError::DriverGone)?
    }

    pub async fn start(&self) -> Result<()> {
        self.request(Command::Start).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.request(Command::Stop).await
    }

    pub async fn configure(&self, config: Config) -> Result<()> {
        self.request(|reply| Command::Configure(config, reply)).await
    }

    pub async fn randomize(&self, ratio: f64) -> Result<()> {
        self.request(|reply| Command::Randomize(ratio, reply)).await
    }

    pub async fn resize(&self, width: usize, height: usize) -> Result<()> {
        self.request(|reply| Command::Resize(width, height, reply))
            .await
    }

    pub async fn clear(&self) -> Result<()> {
        self.request(Command::Clear).await
    }

    pub async fn load_pattern(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.request(|reply| Command::LoadPattern(name, reply)).await
    }

    pub async fn load_grid(&self, grid: Grid) -> Result<()> {
        self.request(|reply| Command::LoadGrid(grid, reply)).await
    }

    pub async fn set_interval(&self, interval_ms: i64) -> Result<()> {
        self.request(|reply| Command::SetInterval(interval_ms, reply))
            .await
    }

    pub async fn toggle_cell(&self, row: usize, col: usize) -> Result<bool> {
        self.request(|reply| Command::ToggleCell(row, col, reply))
            .await
    }

    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Resolve once no run is active.
    pub async fn wait_idle(&self) -> Result<()> {
        let mut state = self.state.clone();
        state
            .wait_for(|s| *s == RunState::Idle)
            .await
            .map(|_| ())
            .map_err(|_| LifeError::DriverGone)
    }
}
