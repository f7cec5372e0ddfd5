//! CLI module for the playlist engine.

pub mod commands;

pub use commands::{handle_command, Cli, Commands};
