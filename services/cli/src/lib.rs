//! Role-Play Tutor Command-Line Service
//!
//! Everything the `roleplay` binary needs: configuration, argument parsing,
//! command parsing, speech synthesis, audio playback and the interactive loop.
//! The binary in `bin/roleplay.rs` only wires these together.

pub mod args;
pub mod commands;
pub mod config;
pub mod playback;
pub mod repl;
pub mod speech;
