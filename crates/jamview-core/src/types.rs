//! Fundamental geometric types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Earth-Centered, Earth-Fixed position in meters.
/// Serialized as a `[x, y, z]` array, matching the exported log.
pub type Ecef = DVec3;

/// A visual interference segment from a jammer to a victim terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkSegment {
    /// Jammer (UAV) position.
    pub from: Ecef,
    /// Jammed ground terminal position.
    pub to: Ecef,
}

impl LinkSegment {
    pub fn new(from: Ecef, to: Ecef) -> Self {
        Self { from, to }
    }

    /// Straight-line length of the segment in meters.
    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}
