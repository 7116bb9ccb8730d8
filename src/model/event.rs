// File: ./src/model/event.rs
use crate::error::{LunarIcsError, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "事件";
pub const UNTITLED_PLACEHOLDER: &str = "未命名事項";
pub const DEFAULT_TIME: &str = "09:00";
pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_ALARM_MINUTES: u32 = 1440;

/// A reminder anchored to a lunar month/day, independent of any year.
///
/// Field names follow the `events.json` backup layout, so a snapshot written
/// by the editor deserializes directly. Missing keys take the defaults below.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDefinition {
    pub title: String,
    pub lunar_month: u8,
    pub lunar_day: u8,
    pub is_leap_month: bool,
    /// Wall-clock `HH:MM` in the export timezone.
    #[serde(rename = "time")]
    pub time_of_day: String,
    pub duration_minutes: u32,
    /// `None` = no alarm, `Some(0)` = at start.
    pub alarm_minutes_before: Option<u32>,
    pub notes: String,
}

impl Default for EventDefinition {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            lunar_month: 1,
            lunar_day: 1,
            is_leap_month: false,
            time_of_day: DEFAULT_TIME.to_string(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            alarm_minutes_before: Some(DEFAULT_ALARM_MINUTES),
            notes: String::new(),
        }
    }
}

impl EventDefinition {
    /// The starter list shown to a user with no saved events.
    pub fn seeded() -> Vec<Self> {
        vec![Self {
            title: "媽祖生日".to_string(),
            lunar_month: 3,
            lunar_day: 23,
            notes: "準備供品/香燭".to_string(),
            ..Self::default()
        }]
    }

    /// Title used in output; blank titles fall back to a placeholder.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED_PLACEHOLDER
        } else {
            &self.title
        }
    }

    pub fn start_time(&self) -> Result<NaiveTime> {
        parse_time_hm(&self.time_of_day).ok_or_else(|| LunarIcsError::InvalidTimeFormat {
            event: self.display_title().to_string(),
            text: self.time_of_day.clone(),
        })
    }
}

/// Parses `HH:MM` (24h). Exactly two integer parts, 00:00 ~ 23:59.
pub fn parse_time_hm(text: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].trim().parse::<u32>().ok()?;
    let minute = parts[1].trim().parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}
