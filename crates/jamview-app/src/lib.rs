//! jamview player host.
//!
//! Runs a playback controller on a dedicated frame-loop thread and bridges
//! control-surface commands to it over a channel.

pub mod control;
pub mod player_loop;
pub mod state;

pub use jamview_core as core;
