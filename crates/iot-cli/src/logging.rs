//! Run log setup.
//!
//! Records go to an append-only log file as `<timestamp> - <LEVEL> - <message>`.
//! `IOTFLOW_LOG` takes an `env_logger` filter and overrides the default level.

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Environment variable holding an optional log filter.
pub const LOG_ENV: &str = "IOTFLOW_LOG";

/// Installed logger. Flush it before the process exits.
#[derive(Debug)]
pub struct LogHandle {
    _installed: (),
}

impl LogHandle {
    pub fn flush(&self) {
        log::logger().flush();
    }
}

/// Open `path` for appending and install it as the global logger.
pub fn init(path: &Path, verbose: bool) -> Result<LogHandle> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(level)
        .parse_env(Env::new().filter(LOG_ENV))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to install logger")?;

    log::debug!("Logging to {}", path.display());
    Ok(LogHandle { _installed: () })
}
