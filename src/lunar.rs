// File: ./src/lunar.rs
//! Lunar → solar date projection.
//!
//! The lunisolar arithmetic (leap month placement, 29/30-day months) lives
//! behind [`LunisolarCalendar`]. [`ChineseCalendar`] answers those questions
//! with the ICU4X Chinese calendar; tests can substitute a fixed table.
//!
//! Years are lunar years numbered by the Gregorian year in which their first
//! month begins, so month 12 of lunar year 2026 falls in January 2027.
use chrono::{Datelike, NaiveDate};
use icu_calendar::cal::Chinese;
use icu_calendar::types::MonthCode;
use icu_calendar::{Date, DateError};
use std::fmt;
use tinystr::TinyAsciiStr;

/// A date in the lunisolar calendar.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct LunarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub is_leap_month: bool,
}

impl LunarDate {
    pub fn new(year: i32, month: u8, day: u8, is_leap_month: bool) -> Self {
        Self {
            year,
            month,
            day,
            is_leap_month,
        }
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}年 {}月{}日", self.year, self.month, self.day)?;
        if self.is_leap_month {
            write!(f, "（閏月）")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("lunar month must be between 1 and 12, got {0}")]
    InvalidMonth(u8),

    #[error("lunar day must be between 1 and 30, got {0}")]
    InvalidDay(u8),

    #[error("year has no leap month {month}")]
    NoLeapMonth { month: u8 },

    #[error("month {month} has only {days_in_month} days, got day {day}")]
    DayOutOfRange {
        month: u8,
        day: u8,
        days_in_month: u8,
    },

    #[error("year {0} is outside the supported range")]
    UnsupportedYear(i32),

    #[error("unrecognized lunar month code '{0}'")]
    UnknownMonthCode(String),
}

/// The lunisolar conversion capability consumed by the projector.
pub trait LunisolarCalendar: fmt::Debug {
    /// Gregorian date of `date`, or why it does not exist.
    fn to_solar(&self, date: LunarDate) -> Result<NaiveDate, ProjectionError>;

    /// Lunar date containing the Gregorian `date`.
    fn from_solar(&self, date: NaiveDate) -> Result<LunarDate, ProjectionError>;
}

/// Projects a lunar month/day onto the Gregorian calendar for `year`.
///
/// The same (month, day) lands on a different Gregorian date every year, so
/// callers must project once per target year.
pub fn project(
    calendar: &dyn LunisolarCalendar,
    year: i32,
    lunar_month: u8,
    lunar_day: u8,
    is_leap_month: bool,
) -> Result<NaiveDate, ProjectionError> {
    if !(1..=12).contains(&lunar_month) {
        return Err(ProjectionError::InvalidMonth(lunar_month));
    }
    if !(1..=30).contains(&lunar_day) {
        return Err(ProjectionError::InvalidDay(lunar_day));
    }
    calendar.to_solar(LunarDate::new(year, lunar_month, lunar_day, is_leap_month))
}

/// Reverse projection, the inverse of [`project`] for every valid input.
pub fn reverse_project(
    calendar: &dyn LunisolarCalendar,
    date: NaiveDate,
) -> Result<LunarDate, ProjectionError> {
    calendar.from_solar(date)
}

/// ICU4X-backed Chinese lunisolar calendar (UTC+8 observations).
#[derive(Debug, Clone)]
pub struct ChineseCalendar {
    inner: Chinese,
}

impl ChineseCalendar {
    pub fn new() -> Self {
        Self {
            inner: Chinese::new(),
        }
    }

    fn lunar_at(&self, day: NaiveDate) -> Result<Date<Chinese>, ProjectionError> {
        let iso = Date::try_new_iso(day.year(), day.month() as u8, day.day() as u8)
            .map_err(|_| ProjectionError::UnsupportedYear(day.year()))?;
        Ok(iso.to_calendar(self.inner.clone()))
    }
}

impl Default for ChineseCalendar {
    fn default() -> Self {
        Self::new()
    }
}

/// ICU month code for a lunar month: `M03`, or `M06L` for a leap month.
fn month_code(month: u8, is_leap_month: bool) -> Option<MonthCode> {
    let code = if is_leap_month {
        format!("M{:02}L", month)
    } else {
        format!("M{:02}", month)
    };
    TinyAsciiStr::try_from_str(&code).ok().map(MonthCode)
}

impl LunisolarCalendar for ChineseCalendar {
    fn to_solar(&self, date: LunarDate) -> Result<NaiveDate, ProjectionError> {
        let code = month_code(date.month, date.is_leap_month)
            .ok_or(ProjectionError::InvalidMonth(date.month))?;

        let lunar = Date::try_new_from_codes(None, date.year, code, date.day, self.inner.clone())
            .map_err(|e| match e {
                DateError::UnknownMonthCode(_) if date.is_leap_month => {
                    ProjectionError::NoLeapMonth { month: date.month }
                }
                DateError::UnknownMonthCode(code) => {
                    ProjectionError::UnknownMonthCode(code.0.as_str().to_string())
                }
                DateError::Range {
                    field: "day", max, ..
                } => ProjectionError::DayOutOfRange {
                    month: date.month,
                    day: date.day,
                    days_in_month: u8::try_from(max).unwrap_or(u8::MAX),
                },
                _ => ProjectionError::UnsupportedYear(date.year),
            })?;

        let iso = lunar.to_iso();
        NaiveDate::from_ymd_opt(
            iso.extended_year(),
            u32::from(iso.month().ordinal),
            u32::from(iso.day_of_month().0),
        )
        .ok_or(ProjectionError::UnsupportedYear(date.year))
    }

    fn from_solar(&self, date: NaiveDate) -> Result<LunarDate, ProjectionError> {
        let lunar = self.lunar_at(date)?;
        let code = lunar.month().standard_code;
        let (month, is_leap_month) = code
            .parsed()
            .ok_or_else(|| ProjectionError::UnknownMonthCode(code.0.as_str().to_string()))?;
        Ok(LunarDate {
            year: lunar.cyclic_year().related_iso,
            month,
            day: lunar.day_of_month().0,
            is_leap_month,
        })
    }
}
