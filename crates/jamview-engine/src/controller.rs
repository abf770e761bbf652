//! Playback controller: the state machine behind the control surface.
//!
//! `PlaybackController` owns the log, the playback state, the clock and the
//! synchronizer, and is the only path by which the scene changes. Commands may
//! be applied directly or queued; queued commands are drained at the start of
//! the next frame, before the clock advances.

use std::collections::VecDeque;
use std::time::Duration;

use jamview_core::commands::PlaybackCommand;
use jamview_core::log::{SeriesPoint, SimulationLog};
use jamview_core::scene::Scene;
use jamview_core::state::{PlaybackState, UiSnapshot};

use crate::clock::PlaybackClock;
use crate::config::PlaybackConfig;
use crate::sync::SceneSynchronizer;

pub struct PlaybackController<S: Scene> {
    log: SimulationLog,
    config: PlaybackConfig,
    state: PlaybackState,
    clock: PlaybackClock,
    synchronizer: SceneSynchronizer,
    scene: S,
    command_queue: VecDeque<PlaybackCommand>,
    snapshot: Option<UiSnapshot>,
    sync_count: u64,
}

impl<S: Scene> PlaybackController<S> {
    /// Create a controller, populate the scene and sync step 0.
    ///
    /// Invalid config values fall back to their defaults.
    pub fn new(log: SimulationLog, config: PlaybackConfig, scene: S) -> Self {
        let config = config.sanitized();
        let state = PlaybackState {
            speed_multiplier: config.clamp_speed(config.initial_speed),
            show_links: config.show_links,
            show_trails: config.show_trails,
            ..Default::default()
        };
        let synchronizer = SceneSynchronizer::new(&log, config.trail_window);
        let mut controller = Self {
            clock: PlaybackClock::new(config.carry_fraction),
            log,
            config,
            state,
            synchronizer,
            scene,
            command_queue: VecDeque::new(),
            snapshot: None,
            sync_count: 0,
        };
        controller
            .synchronizer
            .populate(&controller.log, &controller.state, &mut controller.scene);
        controller.resync();
        controller
    }

    /// Queue a command for the next frame boundary.
    pub fn queue_command(&mut self, command: PlaybackCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlaybackCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply one command immediately and return the latest snapshot.
    pub fn apply(&mut self, command: PlaybackCommand) -> Option<UiSnapshot> {
        match command {
            PlaybackCommand::Seek { step } => self.seek(step),
            PlaybackCommand::Play => self.play(),
            PlaybackCommand::Pause => self.pause(),
            PlaybackCommand::Reset => self.reset(),
            PlaybackCommand::SetSpeed { speed } => self.set_speed(speed),
            PlaybackCommand::ToggleLinks { enabled } => self.toggle_links(enabled),
            PlaybackCommand::ToggleTrails { enabled } => self.toggle_trails(enabled),
        }
        self.snapshot.clone()
    }

    /// Run one animation frame.
    ///
    /// Drains queued commands, then advances playback by the whole steps that
    /// `elapsed` covers at the current speed, wrapping past the last step.
    /// Returns the snapshot if anything was synced during this frame.
    pub fn frame(&mut self, elapsed: Duration) -> Option<UiSnapshot> {
        let syncs_before = self.sync_count;

        while let Some(command) = self.command_queue.pop_front() {
            self.apply(command);
        }

        if self.state.is_playing && !self.log.is_empty() {
            let steps = self.clock.advance(
                elapsed.as_secs_f64(),
                self.state.speed_multiplier,
                self.log.dt(),
            );
            if steps > 0 {
                let n = self.log.step_count() as u64;
                let next = ((self.state.current_step as u64 + steps % n) % n) as usize;
                if next < self.state.current_step {
                    tracing::debug!(from = self.state.current_step, to = next, "playback wrapped");
                }
                self.state.current_step = next;
                self.resync();
            }
        }

        if self.sync_count > syncs_before {
            self.snapshot.clone()
        } else {
            None
        }
    }

    /// Jump to `step`, clamped to `[0, N-1]`. Keeps the play/pause state.
    pub fn seek(&mut self, step: i64) {
        let Some(last) = self.log.step_count().checked_sub(1) else {
            return;
        };
        let clamped = step.clamp(0, last as i64) as usize;
        if clamped as i64 != step {
            tracing::debug!(requested = step, clamped, "seek clamped");
        }
        self.state.current_step = clamped;
        self.clock.clear();
        self.resync();
    }

    pub fn play(&mut self) {
        if self.log.is_empty() {
            return;
        }
        if !self.state.is_playing {
            self.clock.clear();
            self.state.is_playing = true;
            self.refresh_snapshot_flags();
        }
    }

    pub fn pause(&mut self) {
        if self.log.is_empty() {
            return;
        }
        if self.state.is_playing {
            self.clock.clear();
            self.state.is_playing = false;
            self.refresh_snapshot_flags();
        }
    }

    /// Back to step 0, paused.
    pub fn reset(&mut self) {
        if self.log.is_empty() {
            return;
        }
        self.state.current_step = 0;
        self.state.is_playing = false;
        self.clock.clear();
        self.resync();
    }

    /// Set the speed multiplier, clamped into the configured bounds.
    pub fn set_speed(&mut self, speed: f64) {
        if self.log.is_empty() {
            return;
        }
        if speed.is_nan() {
            tracing::warn!("ignoring NaN speed multiplier");
            return;
        }
        self.state.speed_multiplier = self.config.clamp_speed(speed);
        self.refresh_snapshot_flags();
    }

    pub fn toggle_links(&mut self, enabled: bool) {
        if self.log.is_empty() {
            return;
        }
        self.state.show_links = enabled;
        self.resync();
    }

    /// Hiding keeps the existing trail geometry; showing recomputes it for
    /// the current step.
    pub fn toggle_trails(&mut self, enabled: bool) {
        if self.log.is_empty() {
            return;
        }
        if enabled && !self.state.show_trails {
            self.synchronizer.invalidate_trails();
        }
        self.state.show_trails = enabled;
        self.resync();
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn log(&self) -> &SimulationLog {
        &self.log
    }

    pub fn step_count(&self) -> usize {
        self.log.step_count()
    }

    /// Snapshot of the most recent sync.
    pub fn snapshot(&self) -> Option<&UiSnapshot> {
        self.snapshot.as_ref()
    }

    /// Metric history from step 0 through the current step.
    pub fn series(&self) -> Vec<SeriesPoint> {
        self.log.series_upto(self.state.current_step)
    }

    /// Number of syncs performed so far.
    pub fn sync_count(&self) -> u64 {
        self.sync_count
    }

    /// Accumulated sub-step progress of the clock.
    pub fn clock_carry(&self) -> f64 {
        self.clock.carry()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    /// Sync the current step to the scene.
    fn resync(&mut self) {
        if let Some(snapshot) = self
            .synchronizer
            .sync(&self.log, &self.state, &mut self.scene)
        {
            tracing::trace!(step = snapshot.step, jammed = snapshot.jammed_count, "synced");
            self.snapshot = Some(snapshot);
            self.sync_count += 1;
        }
    }

    /// Copy playback flags that do not need a sync into the cached snapshot.
    fn refresh_snapshot_flags(&mut self) {
        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.is_playing = self.state.is_playing;
            snapshot.speed_multiplier = self.state.speed_multiplier;
        }
    }
}
