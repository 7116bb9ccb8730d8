// File: ./src/backup.rs
//! `events.json`: the plain list-of-records snapshot of event definitions.
//!
//! The format is a bare JSON array (no version wrapper) so files written by
//! earlier editors keep loading. Parsing is strict about the outer shape and
//! lenient about missing keys, which fall back to the event defaults.
use crate::error::{LunarIcsError, Result};
use crate::model::EventDefinition;
use crate::storage;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn to_json_string(events: &[EventDefinition]) -> Result<String> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// Parses a snapshot. An empty array restores to one default event.
pub fn from_json_str(text: &str) -> Result<Vec<EventDefinition>> {
    let raw: Value = serde_json::from_str(text)
        .map_err(|e| LunarIcsError::InvalidBackupPayload(e.to_string()))?;
    let Value::Array(items) = raw else {
        return Err(LunarIcsError::InvalidBackupPayload(
            "JSON must be an array of events".to_string(),
        ));
    };
    if items.is_empty() {
        return Ok(vec![EventDefinition::default()]);
    }
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item).map_err(|e| {
                LunarIcsError::InvalidBackupPayload(format!("record {}: {}", idx + 1, e))
            })
        })
        .collect()
}

pub fn load(path: &Path) -> anyhow::Result<Vec<EventDefinition>> {
    let text = storage::with_lock(path, || Ok(fs::read_to_string(path)?)).map_err(|e| {
        anyhow::anyhow!("Failed to read events file '{}': {}", path.display(), e)
    })?;
    let events = from_json_str(&text)?;
    log::debug!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

pub fn save(path: &Path, events: &[EventDefinition]) -> anyhow::Result<()> {
    let json = to_json_string(events)?;
    storage::with_lock(path, || storage::atomic_write(path, &json))?;
    log::info!("Saved {} events to {}", events.len(), path.display());
    Ok(())
}

/// Writes the seeded starter list unless a file already exists.
/// Returns whether a file was created.
pub fn init_if_missing(path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save(path, &EventDefinition::seeded())?;
    Ok(true)
}
