//! One complete run of the simulation, as driven by the binary.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use rubblerats_core::commands::DriverCommand;
use rubblerats_core::config::SwarmConfig;
use rubblerats_core::error::SwarmError;
use rubblerats_core::state::SwarmSnapshot;
use rubblerats_sim::{ManualClock, SwarmEngine};

use crate::game_loop::{run_stepped, spawn_game_loop, tick_duration};
use crate::options::Options;
use crate::state::{AppState, LoopCommand};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Swarm(#[from] SwarmError),
    #[error("failed to read command script {path}: {source}")]
    ScriptIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse command script: {0}")]
    ScriptParse(#[source] serde_json::Error),
    #[error("failed to start loop thread: {0}")]
    Thread(#[source] io::Error),
    #[error("loop thread panicked")]
    LoopPanicked,
    #[error("simulation already running")]
    AlreadyRunning,
}

/// Build the engine from `options`, run it and return the final snapshot.
pub fn run(options: &Options) -> Result<Option<SwarmSnapshot>, RunError> {
    let mut config = match &options.config {
        Some(path) => SwarmConfig::load(path)?,
        None => SwarmConfig::default(),
    };
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    let commands = match &options.commands {
        Some(path) => load_commands(path)?,
        None => Vec::new(),
    };
    let tick_rate = config.tick_rate;

    if options.realtime {
        let mut engine = SwarmEngine::new(config)?;
        prepare(&mut engine, options, commands)?;

        let state = AppState::new();
        let handle = start_loop(&state, engine, tick_rate)?;

        let ticks = u32::try_from(options.ticks).unwrap_or(u32::MAX);
        std::thread::sleep(tick_duration(tick_rate).saturating_mul(ticks) + Duration::from_millis(5));
        stop_loop(&state, handle)?;
        Ok(state.snapshot())
    } else {
        let clock = ManualClock::new(0);
        let mut engine = SwarmEngine::with_clock(config, Box::new(clock.clone()))?;
        prepare(&mut engine, options, commands)?;
        Ok(run_stepped(&mut engine, &clock, tick_rate, options.ticks))
    }
}

/// Spawn the loop thread and register it in `state`. Refuses to start a
/// second loop while one is running.
pub fn start_loop(
    state: &AppState,
    engine: SwarmEngine,
    tick_rate: u32,
) -> Result<JoinHandle<SwarmEngine>, RunError> {
    let mut running = state.running.lock().map_err(|_| RunError::LoopPanicked)?;
    if *running {
        return Err(RunError::AlreadyRunning);
    }

    let (tx, handle) = spawn_game_loop(engine, tick_rate, Arc::clone(&state.latest_snapshot))
        .map_err(RunError::Thread)?;
    let mut tx_lock = state.command_tx.lock().map_err(|_| RunError::LoopPanicked)?;
    *tx_lock = Some(tx);
    *running = true;

    Ok(handle)
}

/// Shut the loop down, wait for it and clear the running flag.
pub fn stop_loop(
    state: &AppState,
    handle: JoinHandle<SwarmEngine>,
) -> Result<SwarmEngine, RunError> {
    state.send(LoopCommand::Shutdown);
    let engine = handle.join().map_err(|_| RunError::LoopPanicked)?;
    if let Ok(mut tx_lock) = state.command_tx.lock() {
        *tx_lock = None;
    }
    if let Ok(mut running) = state.running.lock() {
        *running = false;
    }
    Ok(engine)
}

fn prepare(
    engine: &mut SwarmEngine,
    options: &Options,
    commands: Vec<DriverCommand>,
) -> Result<(), RunError> {
    if !options.empty {
        engine.populate()?;
    }
    info!(commands = commands.len(), "queueing command script");
    engine.queue_commands(commands);
    Ok(())
}

/// Read a JSON array of driver commands.
pub fn load_commands(path: &Path) -> Result<Vec<DriverCommand>, RunError> {
    let json = std::fs::read_to_string(path).map_err(|source| RunError::ScriptIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(RunError::ScriptParse)
}
