//! Tracing subscriber setup.
//!
//! Headless modes log to stderr. The TUI owns the terminal, so it logs to a
//! file under the cache directory instead.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "smart-resume-cli.log";

pub enum LogTarget {
    Stderr,
    /// Directory that receives `LOG_FILE_NAME`.
    #[cfg_attr(not(feature = "tui"), allow(dead_code))]
    File(PathBuf),
}

fn filter(verbose: bool, default_level: &str) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

pub fn init(verbose: bool, target: LogTarget) -> Result<()> {
    match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter(verbose, "warn"))
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("init logging: {e}")),
        LogTarget::File(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create log directory {}", dir.display()))?;
            let path = dir.join(LOG_FILE_NAME);
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter(verbose, "info"))
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!("init logging: {e}"))
        }
    }
}
