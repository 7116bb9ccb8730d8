// File: ./src/model/occurrence.rs
use chrono::NaiveDateTime;

/// One concrete instance of an [`EventDefinition`](super::EventDefinition)
/// in one target year. Start and end are local wall time in the export
/// timezone.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Occurrence {
    /// Fresh per generation; only satisfies the format's uniqueness rule.
    pub uid: String,
    pub year: i32,
    pub title: String,
    pub notes: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub alarm_minutes_before: Option<u32>,
}
