//! Command bridge between a control surface and the player loop.
//!
//! Every function returns `Result<_, String>` so a UI layer can show the
//! message as-is.

use jamview_core::commands::PlaybackCommand;
use jamview_core::log::SimulationLog;
use jamview_core::state::UiSnapshot;
use jamview_engine::config::PlaybackConfig;
use jamview_engine::scene::HeadlessScene;
use jamview_engine::PlaybackController;

use crate::player_loop;
use crate::state::{AppState, PlayerLoopCommand};

/// Start playback of `log`. Spawns the player loop if not already running.
pub fn start_player(
    state: &AppState,
    log: SimulationLog,
    config: PlaybackConfig,
    fps: u32,
) -> Result<(), String> {
    let mut running = state.running.lock().map_err(|e| e.to_string())?;

    if *running {
        return Err("Player already running".into());
    }

    let controller = PlaybackController::new(log, config, HeadlessScene::new());
    let (cmd_tx, handle) =
        player_loop::spawn_player_loop(controller, state.latest_snapshot.clone(), fps)
            .map_err(|e| format!("Failed to spawn player loop: {}", e))?;

    let mut tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;
    *tx_lock = Some(cmd_tx);
    let mut worker = state.worker.lock().map_err(|e| e.to_string())?;
    *worker = Some(handle);
    *running = true;

    Ok(())
}

/// Send a playback command to the player loop.
pub fn send_command(state: &AppState, command: PlaybackCommand) -> Result<(), String> {
    let tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;

    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(PlayerLoopCommand::Playback(command))
            .map_err(|e| format!("Failed to send command: {}", e)),
        None => Err("Player not started".into()),
    }
}

/// Get the latest snapshot synchronously (for polling / initial state).
pub fn get_snapshot(state: &AppState) -> Result<Option<UiSnapshot>, String> {
    let lock = state.latest_snapshot.lock().map_err(|e| e.to_string())?;
    Ok(lock.clone())
}

/// Stop the player loop and wait for its thread to finish.
pub fn stop_player(state: &AppState) -> Result<(), String> {
    let mut running = state.running.lock().map_err(|e| e.to_string())?;

    if !*running {
        return Err("Player not started".into());
    }

    if let Some(tx) = state.command_tx.lock().map_err(|e| e.to_string())?.take() {
        // A closed channel means the loop already exited.
        let _ = tx.send(PlayerLoopCommand::Shutdown);
    }
    if let Some(handle) = state.worker.lock().map_err(|e| e.to_string())?.take() {
        handle
            .join()
            .map_err(|_| "Player loop thread panicked".to_string())?;
    }
    *running = false;

    Ok(())
}
