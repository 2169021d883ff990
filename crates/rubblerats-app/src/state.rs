//! State shared between the runner and the loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use rubblerats_core::commands::DriverCommand;
use rubblerats_core::state::SwarmSnapshot;

/// Messages sent from the runner to the loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A driver command to forward to the swarm engine.
    Driver(DriverCommand),
    /// Stop the loop thread after the current tick.
    Shutdown,
}

/// Handles held by whoever drives the loop thread.
///
/// `mpsc::Sender` is Send but not Sync, hence the `Mutex`.
pub struct AppState {
    /// `None` until the loop has been spawned.
    pub command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    /// Updated by the loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<SwarmSnapshot>>>,
    /// Set while a loop thread owns the engine; guards against a second start.
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a message to the loop. Returns `false` if no loop is running
    /// or it has already exited.
    pub fn send(&self, command: LoopCommand) -> bool {
        let Ok(guard) = self.command_tx.lock() else {
            return false;
        };
        match guard.as_ref() {
            Some(tx) => tx.send(command).is_ok(),
            None => false,
        }
    }

    /// Clone of the most recent snapshot, if any tick has run.
    pub fn snapshot(&self) -> Option<SwarmSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }
}
