//! Playback constants and display defaults.

/// Default number of positions kept in a trail.
pub const DEFAULT_TRAIL_WINDOW: usize = 50;

// --- Playback speed ---

/// Default speed multiplier (1.0 = one simulated `dt` per real `dt`).
pub const DEFAULT_SPEED: f64 = 1.0;

/// Lowest accepted speed multiplier; smaller requests are clamped up.
pub const MIN_SPEED: f64 = 0.1;

/// Highest accepted speed multiplier; larger requests are clamped down.
pub const MAX_SPEED: f64 = 5.0;

// --- Host loop ---

/// Animation frame rate of the host loop (Hz).
pub const FRAME_RATE: u32 = 60;

// --- Colors (0xRRGGBB) ---

/// Indicator color of a terminal that is communicating normally.
pub const NORMAL_COLOR: u32 = 0x00ff00;

/// Indicator color of a jammed terminal.
pub const JAMMED_COLOR: u32 = 0xff0000;

/// Color of interference link segments.
pub const LINK_COLOR: u32 = 0xff0000;

// --- Log consistency ---

/// Relative tolerance when checking `time[i] == start + i * dt`.
pub const TIME_DRIFT_TOLERANCE: f64 = 1e-6;
