// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::storage;
use anyhow::{Error, Result};
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const MIN_START_YEAR: i32 = 1900;
pub const MAX_START_YEAR: i32 = 2200;
pub const MAX_YEARS: u32 = 60;

/// Offset of the export timezone (Asia/Taipei, no DST).
const TAIPEI_OFFSET_SECS: i32 = 8 * 3600;

fn default_calendar_name() -> String {
    "農曆提醒".to_string()
}

fn default_years() -> u32 {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,
    /// First year to generate; the current year when unset.
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default = "default_years")]
    pub years: u32,
    /// Event backup to export from; `events.json` in the data dir when unset.
    #[serde(default)]
    pub events_file: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calendar_name: default_calendar_name(),
            start_year: None,
            years: default_years(),
            events_file: None,
            log_level: default_log_level(),
            log_to_file: false,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        storage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            storage::atomic_write(&path, toml_str)?;
            Ok(())
        })
    }

    /// Start year to use, falling back to the current year in Taipei.
    pub fn resolved_start_year(&self, now: DateTime<Utc>) -> i32 {
        self.start_year
            .unwrap_or_else(|| match FixedOffset::east_opt(TAIPEI_OFFSET_SECS) {
                Some(offset) => now.with_timezone(&offset).year(),
                None => now.year(),
            })
    }

    pub fn events_path(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.events_file {
            Some(path) => Ok(path.clone()),
            None => ctx.get_events_path(),
        }
    }

    /// Checks the year range against the bounds the editor allows.
    pub fn validate_range(start_year: i32, years: u32) -> Result<()> {
        if !(MIN_START_YEAR..=MAX_START_YEAR).contains(&start_year) {
            anyhow::bail!(
                "Start year {} is outside {}..={}",
                start_year,
                MIN_START_YEAR,
                MAX_START_YEAR
            );
        }
        if !(1..=MAX_YEARS).contains(&years) {
            anyhow::bail!("Year count {} is outside 1..={}", years, MAX_YEARS);
        }
        Ok(())
    }
}
