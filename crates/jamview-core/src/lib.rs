//! Core types and definitions for the jamview playback engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! the simulation-log schema, commands, playback state, UI snapshots,
//! the scene capability, and constants.
//! It has no dependency on any rendering backend or runtime framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod error;
pub mod log;
pub mod scene;
pub mod state;
pub mod types;
