//! Logging utilities for the playlist engine.

use log::LevelFilter;

/// Initialize application logging with the specified level.
pub fn init_logging(level: LevelFilter) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.to_string()))
        .init();
}

const BAR_LEN: usize = 30;

/// Emits the `[bar] NN% message` progress lines required at stage boundaries
/// (spec §6). Mirrors the original script's `log_status`/`log_detail`/
/// `log_warning` helpers, but goes through `log` so `--json` runs can
/// suppress stdout narration independently of the log level.
pub struct ProgressReporter {
    quiet_stdout: bool,
}

impl ProgressReporter {
    pub fn new(quiet_stdout: bool) -> Self {
        Self { quiet_stdout }
    }

    /// A major stage boundary: start, seeds resolved, expanding candidates,
    /// filtering, smoothing, publishing, done.
    pub fn stage(&self, percent: u8, message: &str) {
        let percent = percent.min(100);
        let filled = (BAR_LEN * percent as usize) / 100;
        let bar = format!("{}{}", "=".repeat(filled), "-".repeat(BAR_LEN - filled));
        log::info!("[{bar}] {percent:3}% {message}");
        if !self.quiet_stdout {
            println!("[{bar}] {percent:3}% {message}");
        }
    }

    pub fn detail(&self, message: &str) {
        log::debug!("{message}");
        if !self.quiet_stdout {
            println!("Detail: {message}");
        }
    }

    pub fn warn(&self, message: &str) {
        log::warn!("{message}");
        if !self.quiet_stdout {
            println!("Warning: {message}");
        }
    }
}
