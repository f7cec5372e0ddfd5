//! Centralized error types for the playlist engine.

use std::fmt;

/// Top-level error taxonomy (spec §7). Each variant carries the exit code
/// it maps to in `main`.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Missing URL/token, unknown seed_mode, malformed preset. Fatal at load time.
    Config(String),
    /// Cannot reach the Library Server, or the configured music section is missing.
    Connect(String),
    /// The generation run produced zero tracks after filtering.
    EmptyResult(String),
    /// Creating/updating the playlist or uploading its cover failed.
    Publish(String),
}

impl EngineError {
    /// Process exit code for this error, per spec §6.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::Config(_) => 2,
            EngineError::Connect(_) => 3,
            EngineError::EmptyResult(_) => 5,
            EngineError::Publish(_) => 5,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Config(msg) => write!(f, "configuration error: {msg}"),
            EngineError::Connect(msg) => write!(f, "connection error: {msg}"),
            EngineError::EmptyResult(msg) => write!(f, "empty result: {msg}"),
            EngineError::Publish(msg) => write!(f, "publish error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        EngineError::Config(format!("malformed preset: {error}"))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        EngineError::Config(format!("could not read preset: {error}"))
    }
}

/// A single per-item fetch failure. Never fatal on its own — strategies log
/// and skip the item (spec §4.9, §7 "Transient fetch error").
#[derive(Debug, Clone)]
pub struct FetchError {
    pub what: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to fetch {}: {}", self.what, self.reason)
    }
}

impl std::error::Error for FetchError {}
