//! Playback commands sent from the control surface to the engine.
//!
//! One command per user action. Commands are queued and applied at the next
//! frame boundary, before the clock advances.

use serde::{Deserialize, Serialize};

/// All possible control-surface actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlaybackCommand {
    /// Jump to a step. Out-of-range values are clamped.
    Seek { step: i64 },
    /// Start autoplay.
    Play,
    /// Stop autoplay at the next frame boundary.
    Pause,
    /// Return to step 0 and pause.
    Reset,
    /// Set the speed multiplier. Out-of-range values are clamped.
    SetSpeed { speed: f64 },
    /// Show or hide interference links.
    ToggleLinks { enabled: bool },
    /// Show or hide entity trails.
    ToggleTrails { enabled: bool },
}
