//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

use crate::constants::{JAMMED_COLOR, NORMAL_COLOR};

/// Kind of a moving entity that carries a trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Satellite,
    Uav,
}

/// Jamming status of a ground terminal at one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalStatus {
    #[default]
    Normal,
    Jammed,
}

impl TerminalStatus {
    pub fn from_jammed(is_jammed: bool) -> Self {
        if is_jammed {
            Self::Jammed
        } else {
            Self::Normal
        }
    }

    /// Indicator color as 0xRRGGBB.
    pub fn color(self) -> u32 {
        match self {
            Self::Normal => NORMAL_COLOR,
            Self::Jammed => JAMMED_COLOR,
        }
    }
}

/// Scene layers whose visibility can be switched as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneLayer {
    Trails,
    Links,
}
