//! Playback clock: wall-clock seconds to whole simulation steps.
//!
//! Playback is strictly discrete. There is no interpolation between steps.

/// Whole steps covered by `elapsed_secs` of wall time at `speed_multiplier`.
///
/// Returns 0 for anything below one step's worth and for non-positive or
/// non-finite inputs.
pub fn advance_steps(elapsed_secs: f64, speed_multiplier: f64, dt: f64) -> u64 {
    let progress = step_progress(elapsed_secs, speed_multiplier, dt);
    progress.floor() as u64
}

/// Fractional steps covered by a frame; 0.0 for unusable inputs.
fn step_progress(elapsed_secs: f64, speed_multiplier: f64, dt: f64) -> f64 {
    if !(dt.is_finite() && dt > 0.0) {
        return 0.0;
    }
    let progress = elapsed_secs * speed_multiplier / dt;
    if progress.is_finite() && progress > 0.0 {
        progress
    } else {
        0.0
    }
}

/// Stateful clock that optionally carries sub-step progress across frames.
///
/// Without the carry, frames shorter than one step never advance playback.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    carry_fraction: bool,
    carry: f64,
}

impl PlaybackClock {
    pub fn new(carry_fraction: bool) -> Self {
        Self {
            carry_fraction,
            carry: 0.0,
        }
    }

    /// Steps to advance for one frame.
    pub fn advance(&mut self, elapsed_secs: f64, speed_multiplier: f64, dt: f64) -> u64 {
        if !self.carry_fraction {
            return advance_steps(elapsed_secs, speed_multiplier, dt);
        }
        let total = self.carry + step_progress(elapsed_secs, speed_multiplier, dt);
        let steps = total.floor();
        self.carry = total - steps;
        steps as u64
    }

    /// Drop any accumulated sub-step progress.
    pub fn clear(&mut self) {
        self.carry = 0.0;
    }

    /// Accumulated sub-step progress, in `[0, 1)`.
    pub fn carry(&self) -> f64 {
        self.carry
    }
}
