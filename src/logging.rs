// File: ./src/logging.rs
//! Logger bootstrap for the command-line binary.
//!
//! Library code only talks to the `log` facade. Output goes to stderr so an
//! exported calendar written to stdout stays clean; an optional file logger
//! appends to `lunar-ics.log` in the data directory.
use crate::context::AppContext;
use anyhow::Result;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::OpenOptions;
use std::str::FromStr;

/// Environment variable that overrides the configured level.
pub const LOG_ENV_VAR: &str = "LUNAR_ICS_LOG";

/// Resolves the level from `LUNAR_ICS_LOG` first, then the config value.
pub fn resolve_level(configured: &str) -> LevelFilter {
    level_from(std::env::var(LOG_ENV_VAR).ok().as_deref(), configured)
}

/// Unparseable names fall through to the next source, then to `Info`.
pub fn level_from(env: Option<&str>, configured: &str) -> LevelFilter {
    env.and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .or_else(|| LevelFilter::from_str(configured.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

pub fn init(level: LevelFilter, to_file: bool, ctx: &dyn AppContext) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if to_file && let Some(path) = ctx.get_log_path() {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        loggers.push(WriteLogger::new(level, config, file));
    }

    CombinedLogger::init(loggers)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    Ok(())
}
