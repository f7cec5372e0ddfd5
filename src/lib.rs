//! Playlist generation engine: collects seeds from a Library Server,
//! expands them along a chosen strategy, filters/ranks/caps the result,
//! and publishes it as a playlist with a generated cover.

pub mod cli;
pub mod client;
pub mod context;
pub mod core;
pub mod domain;
pub mod expansion;
pub mod filter;
pub mod pipeline;
pub mod preset_loader;
pub mod publish;
pub mod seeds;
pub mod smoother;
