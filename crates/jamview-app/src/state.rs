//! Application state shared between the command bridge and the player loop.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use jamview_core::commands::PlaybackCommand;
use jamview_core::state::UiSnapshot;

/// Messages sent from the command bridge to the player loop thread.
#[derive(Debug)]
pub enum PlayerLoopCommand {
    /// A control-surface command to queue on the controller.
    Playback(PlaybackCommand),
    /// Stop the player loop thread.
    Shutdown,
}

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in `Mutex` so the state is `Sync`
/// - `Option` fields are `None` until `start_player` is called
/// - the latest snapshot is shared with the loop thread through `Arc<Mutex<_>>`
pub struct AppState {
    /// Channel to the player loop. `None` before `start_player`.
    pub command_tx: Mutex<Option<mpsc::Sender<PlayerLoopCommand>>>,
    /// Snapshot of the most recent sync, for synchronous polling.
    pub latest_snapshot: Arc<Mutex<Option<UiSnapshot>>>,
    /// Player loop thread, joined by `stop_player`.
    pub worker: Mutex<Option<JoinHandle<()>>>,
    /// Whether the player loop is running.
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            worker: Mutex::new(None),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
