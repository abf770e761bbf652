//! Playback state and the UI snapshot emitted after every synchronized step.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SPEED;

/// Mutable playback state, owned by the playback controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Always in `[0, N-1]` for a non-empty log.
    pub current_step: usize,
    pub is_playing: bool,
    pub speed_multiplier: f64,
    pub show_links: bool,
    pub show_trails: bool,
    /// Autoplay wraps to step 0 past the end. Always true.
    pub looping: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_step: 0,
            is_playing: false,
            speed_multiplier: DEFAULT_SPEED,
            show_links: true,
            show_trails: true,
            looping: true,
        }
    }
}

/// Display values for one synchronized step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiSnapshot {
    /// Simulation time of the step (seconds since start).
    pub time: f64,
    pub step: usize,
    pub step_count: usize,
    /// Average SINR across terminals (dB), as recorded in the log.
    pub avg_sinr: f64,
    /// Fraction of terminals jammed (0.0 - 1.0), as recorded in the log.
    pub jammed_rate: f64,
    pub jammed_count: u32,
    pub normal_count: u32,
    /// Number of interference link segments currently drawn.
    pub link_count: usize,
    pub is_playing: bool,
    pub speed_multiplier: f64,
    pub show_links: bool,
    pub show_trails: bool,
    /// Recorded outcome of every known terminal at this step, in result order.
    pub terminals: Vec<TerminalReading>,
}

/// One terminal's recorded outcome at a step, for per-terminal panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminalReading {
    pub gt_id: u32,
    pub is_jammed: bool,
    /// SINR in dB, when the log recorded it.
    pub sinr: Option<f64>,
}
