//! Playback engine for jamview.
//!
//! Owns playback state, turns wall-clock time into step indices, and drives
//! an injected [`Scene`](jamview_core::scene::Scene) from the simulation log.
//! Completely headless, enabling deterministic testing.

pub mod clock;
pub mod config;
pub mod controller;
pub mod links;
pub mod scene;
pub mod sync;
pub mod trail;

pub use controller::PlaybackController;
pub use jamview_core as core;

#[cfg(test)]
mod tests;
