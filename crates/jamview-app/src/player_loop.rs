//! Player loop thread. Runs the playback controller at a fixed frame rate.
//!
//! The controller is moved into this thread and never leaves it. Commands
//! arrive via `mpsc` channel and are queued on the controller, so they apply at
//! the start of the next frame. Snapshots are stored in shared state for
//! synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use jamview_core::scene::Scene;
use jamview_core::state::UiSnapshot;
use jamview_engine::PlaybackController;

use crate::state::PlayerLoopCommand;

/// Duration of one frame at `fps` frames per second.
pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1)))
}

/// Spawns the player loop in a new thread.
///
/// Returns the command sender for the bridge to use and the thread handle.
pub fn spawn_player_loop<S>(
    controller: PlaybackController<S>,
    latest_snapshot: Arc<Mutex<Option<UiSnapshot>>>,
    fps: u32,
) -> std::io::Result<(mpsc::Sender<PlayerLoopCommand>, JoinHandle<()>)>
where
    S: Scene + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<PlayerLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("jamview-player-loop".into())
        .spawn(move || {
            run_player_loop(controller, cmd_rx, &latest_snapshot, frame_duration(fps));
        })?;

    Ok((cmd_tx, handle))
}

/// The player loop. Runs until Shutdown or channel disconnect.
fn run_player_loop<S: Scene>(
    mut controller: PlaybackController<S>,
    cmd_rx: mpsc::Receiver<PlayerLoopCommand>,
    latest_snapshot: &Mutex<Option<UiSnapshot>>,
    frame: Duration,
) {
    tracing::info!(steps = controller.step_count(), ?frame, "player loop started");
    publish(latest_snapshot, controller.snapshot().cloned());

    let mut last_frame = Instant::now();
    let mut next_frame_time = last_frame;

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(PlayerLoopCommand::Playback(cmd)) => {
                    tracing::debug!(?cmd, "command queued");
                    controller.queue_command(cmd);
                }
                Ok(PlayerLoopCommand::Shutdown) => {
                    tracing::info!("player loop shut down");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::info!("command channel closed, player loop exiting");
                    return;
                }
            }
        }

        // 2. Run one frame with the real elapsed time
        let now = Instant::now();
        let elapsed = now - last_frame;
        last_frame = now;
        if let Some(snapshot) = controller.frame(elapsed) {
            publish(latest_snapshot, Some(snapshot));
        }

        // 3. Sleep until the next frame
        next_frame_time += frame;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > frame * 2 {
            // Too far behind; the clock already accounts for the real elapsed time.
            next_frame_time = now;
        }
    }
}

fn publish(latest_snapshot: &Mutex<Option<UiSnapshot>>, snapshot: Option<UiSnapshot>) {
    if let Ok(mut lock) = latest_snapshot.lock() {
        *lock = snapshot;
    }
}
