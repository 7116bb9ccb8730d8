// File: ./src/error.rs
//! Error types surfaced by the export core and the backup format.
use crate::lunar::ProjectionError;

/// Every failure the builder or the backup reader can report.
///
/// Variants carry enough of the offending input (event title, raw text,
/// target year) to be shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum LunarIcsError {
    /// The event's time of day is not `HH:MM` within 00:00 ~ 23:59.
    #[error("event '{event}': invalid time '{text}', expected HH:MM between 00:00 and 23:59")]
    InvalidTimeFormat { event: String, text: String },

    /// The lunar date does not exist in the requested year.
    #[error("event '{event}': no such lunar date in {year}: {source}")]
    InvalidLunarDate {
        event: String,
        year: i32,
        #[source]
        source: ProjectionError,
    },

    #[error("event '{event}': duration must be at least 1 minute")]
    InvalidDuration { event: String },

    #[error("year count must be at least 1")]
    InvalidYearCount,

    /// Restore data is not a JSON array of event records.
    #[error("invalid backup payload: {0}")]
    InvalidBackupPayload(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LunarIcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_format_message_names_event_and_text() {
        let e = LunarIcsError::InvalidTimeFormat {
            event: "媽祖生日".to_string(),
            text: "25:00".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("媽祖生日"));
        assert!(msg.contains("'25:00'"));
    }

    #[test]
    fn lunar_date_message_includes_year_and_reason() {
        let e = LunarIcsError::InvalidLunarDate {
            event: "清明".to_string(),
            year: 2026,
            source: ProjectionError::DayOutOfRange {
                month: 2,
                day: 30,
                days_in_month: 29,
            },
        };
        assert_eq!(
            e.to_string(),
            "event '清明': no such lunar date in 2026: month 2 has only 29 days, got day 30"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<LunarIcsError>();
    }
}
