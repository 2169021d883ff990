//! Loop drivers for the swarm engine.
//!
//! `spawn_game_loop` runs the engine on its own thread at the configured
//! tick rate against the wall clock. Commands arrive over an `mpsc`
//! channel; the latest snapshot is published through shared state.
//! `run_stepped` drives the engine with a scripted clock instead, which
//! makes a run reproducible from its seed alone.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use rubblerats_core::state::SwarmSnapshot;
use rubblerats_sim::{ManualClock, SwarmEngine};

use crate::state::LoopCommand;

/// Nominal duration of one tick.
pub fn tick_duration(tick_rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(tick_rate.max(1)))
}

/// Spawn the engine loop on a new thread.
///
/// Returns the command sender and a handle that yields the engine back
/// once the loop stops.
pub fn spawn_game_loop(
    engine: SwarmEngine,
    tick_rate: u32,
    latest_snapshot: Arc<Mutex<Option<SwarmSnapshot>>>,
) -> io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<SwarmEngine>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();
    let period = tick_duration(tick_rate);

    let handle = std::thread::Builder::new()
        .name("rubblerats-loop".into())
        .spawn(move || run_game_loop(engine, cmd_rx, &latest_snapshot, period))?;

    Ok((cmd_tx, handle))
}

/// Runs until Shutdown or channel disconnect.
fn run_game_loop(
    mut engine: SwarmEngine,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<SwarmSnapshot>>,
    period: Duration,
) -> SwarmEngine {
    let mut next_tick_time = Instant::now();
    info!(period_ms = period.as_secs_f64() * 1000.0, "loop started");

    loop {
        // 1. Drain pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Driver(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(ticks = engine.time().tick, "loop stopped");
                    return engine;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick();

        // 3. Publish for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next tick
        next_tick_time += period;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > period * 2 {
            debug!("loop fell behind, resetting schedule");
            next_tick_time = now;
        }
    }
}

/// Run `ticks` ticks, advancing `clock` by one tick period before each.
/// Returns the last snapshot.
pub fn run_stepped(
    engine: &mut SwarmEngine,
    clock: &ManualClock,
    tick_rate: u32,
    ticks: u64,
) -> Option<SwarmSnapshot> {
    let step_ms = (1000 / u64::from(tick_rate.max(1))).max(1);
    let mut last = None;
    for _ in 0..ticks {
        clock.advance(step_ms);
        last = Some(engine.tick());
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubblerats_core::commands::DriverCommand;
    use rubblerats_core::config::SwarmConfig;
    use rubblerats_core::constants::MAX_TICK_RATE;

    fn stepped_engine() -> (SwarmEngine, ManualClock) {
        let clock = ManualClock::new(0);
        let engine = SwarmEngine::with_clock(SwarmConfig::default(), Box::new(clock.clone())).unwrap();
        (engine, clock)
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<LoopCommand>();
        tx.send(LoopCommand::Driver(DriverCommand::RecallAll)).unwrap();
        tx.send(LoopCommand::Driver(DriverCommand::PauseAll)).unwrap();
        tx.send(LoopCommand::Shutdown).unwrap();

        let commands: Vec<LoopCommand> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], LoopCommand::Driver(DriverCommand::RecallAll)));
        assert!(matches!(commands[1], LoopCommand::Driver(DriverCommand::PauseAll)));
        assert!(matches!(commands[2], LoopCommand::Shutdown));
    }

    #[test]
    fn test_tick_duration_constant() {
        // 30Hz = 33.333ms per tick
        assert_eq!(tick_duration(30).as_nanos(), (1_000_000_000u64 / 30) as u128);
        assert_eq!(tick_duration(0), tick_duration(1));
    }

    #[test]
    fn test_stepped_run_advances_clock_and_ticks() {
        let (mut engine, clock) = stepped_engine();
        engine.populate().unwrap();
        let snapshot = run_stepped(&mut engine, &clock, 30, 90).unwrap();
        assert_eq!(snapshot.time.tick, 90);
        assert_eq!(snapshot.time.now_ms, 90 * 33);
        assert_eq!(snapshot.probes.len(), 6);
        assert!(run_stepped(&mut engine, &clock, 30, 0).is_none());
    }

    #[test]
    fn test_stepped_clock_advances_at_max_tick_rate() {
        let (mut engine, clock) = stepped_engine();
        engine.populate().unwrap();
        let snapshot = run_stepped(&mut engine, &clock, MAX_TICK_RATE, 10).unwrap();
        assert_eq!(snapshot.time.now_ms, 10);

        // Out-of-range rates still move the clock.
        let snapshot = run_stepped(&mut engine, &clock, 5000, 10).unwrap();
        assert_eq!(snapshot.time.now_ms, 20);
    }

    #[test]
    fn test_snapshot_serialization_under_3ms() {
        let (mut engine, clock) = stepped_engine();
        engine.populate().unwrap();
        let snapshot = run_stepped(&mut engine, &clock, 30, 50).unwrap();

        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();
        assert!(
            elapsed < Duration::from_millis(3),
            "Snapshot serialization took {:?}, should be <3ms",
            elapsed
        );
        assert!(!json.is_empty());
    }

    #[test]
    fn test_loop_thread_shutdown_returns_engine() {
        let engine = SwarmEngine::new(SwarmConfig::default()).unwrap();
        let latest = Arc::new(Mutex::new(None));
        let (tx, handle) = spawn_game_loop(engine, 100, Arc::clone(&latest)).unwrap();

        tx.send(LoopCommand::Driver(DriverCommand::SpawnProbe {
            id: "RAT-01".into(),
            x: 0.0,
            y: 0.0,
            speed: None,
            battery: None,
        }))
        .unwrap();
        std::thread::sleep(Duration::from_millis(100));
        tx.send(LoopCommand::Shutdown).unwrap();

        let engine = handle.join().unwrap();
        assert!(engine.time().tick > 0);
        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.probes.len(), 1);
    }
}
