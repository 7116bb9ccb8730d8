// File: ./src/ics.rs
//! Expands lunar event definitions into dated occurrences and serializes them
//! as one iCalendar document.
//!
//! The output layout (property order inside VEVENT, CRLF endings, TZID-qualified
//! local start/end, UTC DTSTAMP) is what phone and desktop calendar apps expect
//! on import, so it is assembled line by line rather than through a generic
//! component writer.
use crate::error::{LunarIcsError, Result};
use crate::lunar::{self, LunisolarCalendar};
use crate::model::{EventDefinition, Occurrence};
use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use uuid::Uuid;

/// The single civil timezone every occurrence is expressed in.
pub const TIMEZONE: &str = "Asia/Taipei";
pub const PRODUCT_ID: &str = "Lunar ICS Generator//lunar-ics";
pub const UID_DOMAIN: &str = "lunar-ics";

const CRLF: &str = "\r\n";
const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Escapes a free-text value (SUMMARY, DESCRIPTION, X-WR-CALNAME).
///
/// Carriage returns are folded into plain newlines first so no raw CR can
/// end up inside a content line.
pub fn escape_text(s: &str) -> String {
    s.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// Inverse of [`escape_text`] for escaped values.
pub fn unescape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other @ (',' | ';' | '\\')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Expands every event into one occurrence per year in
/// `[start_year, start_year + year_count)`, grouped by event then year.
///
/// Times, durations and the year count are all validated before the first
/// projection; a projection failure aborts the whole expansion.
pub fn expand(
    calendar: &dyn LunisolarCalendar,
    events: &[EventDefinition],
    start_year: i32,
    year_count: u32,
) -> Result<Vec<Occurrence>> {
    let span = i32::try_from(year_count)
        .ok()
        .filter(|n| *n > 0)
        .ok_or(LunarIcsError::InvalidYearCount)?;
    let end_year = start_year
        .checked_add(span)
        .ok_or(LunarIcsError::InvalidYearCount)?;

    let mut start_times: Vec<NaiveTime> = Vec::with_capacity(events.len());
    for ev in events {
        start_times.push(ev.start_time()?);
        if ev.duration_minutes == 0 {
            return Err(LunarIcsError::InvalidDuration {
                event: ev.display_title().to_string(),
            });
        }
    }

    log::debug!(
        "Expanding {} events over {} years starting {}",
        events.len(),
        year_count,
        start_year
    );

    let mut occurrences = Vec::new();
    for (ev, time) in events.iter().zip(start_times) {
        let duration = TimeDelta::minutes(i64::from(ev.duration_minutes));
        for year in start_year..end_year {
            let date = lunar::project(
                calendar,
                year,
                ev.lunar_month,
                ev.lunar_day,
                ev.is_leap_month,
            )
            .map_err(|source| LunarIcsError::InvalidLunarDate {
                event: ev.display_title().to_string(),
                year,
                source,
            })?;

            let start = date.and_time(time);
            let end = start
                .checked_add_signed(duration)
                .ok_or_else(|| LunarIcsError::InvalidDuration {
                    event: ev.display_title().to_string(),
                })?;

            occurrences.push(Occurrence {
                uid: Uuid::new_v4().to_string(),
                year,
                title: ev.display_title().to_string(),
                notes: ev.notes.clone(),
                start,
                end,
                alarm_minutes_before: ev.alarm_minutes_before,
            });
        }
    }
    Ok(occurrences)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str(CRLF);
}

fn push_occurrence(out: &mut String, occ: &Occurrence, dtstamp: &str) {
    push_line(out, "BEGIN:VEVENT");
    push_line(out, &format!("UID:{}@{}", occ.uid, UID_DOMAIN));
    push_line(out, &format!("DTSTAMP:{}", dtstamp));
    push_line(out, &format!("SUMMARY:{}", escape_text(&occ.title)));
    if !occ.notes.is_empty() {
        push_line(out, &format!("DESCRIPTION:{}", escape_text(&occ.notes)));
    }
    push_line(
        out,
        &format!("DTSTART;TZID={}:{}", TIMEZONE, occ.start.format(LOCAL_FORMAT)),
    );
    push_line(
        out,
        &format!("DTEND;TZID={}:{}", TIMEZONE, occ.end.format(LOCAL_FORMAT)),
    );

    if let Some(minutes) = occ.alarm_minutes_before {
        push_line(out, "BEGIN:VALARM");
        push_line(out, "ACTION:DISPLAY");
        push_line(out, &format!("DESCRIPTION:{}", escape_text(&occ.title)));
        push_line(out, &format!("TRIGGER:-PT{}M", minutes));
        push_line(out, "END:VALARM");
    }
    push_line(out, "END:VEVENT");
}

/// Serializes occurrences, in the given order, into a complete document.
pub fn render(
    occurrences: &[Occurrence],
    calendar_name: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let dtstamp = generated_at.format(UTC_FORMAT).to_string();
    let mut out = String::with_capacity(256 + occurrences.len() * 320);

    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:-//{}//ZH-TW", PRODUCT_ID));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");
    push_line(&mut out, &format!("X-WR-CALNAME:{}", escape_text(calendar_name)));
    push_line(&mut out, &format!("X-WR-TIMEZONE:{}", TIMEZONE));

    for occ in occurrences {
        push_occurrence(&mut out, occ, &dtstamp);
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

/// Builds the full document for `events`. Either the complete text is
/// returned or nothing is.
pub fn build_ics(
    calendar: &dyn LunisolarCalendar,
    events: &[EventDefinition],
    start_year: i32,
    year_count: u32,
    calendar_name: &str,
) -> Result<String> {
    let occurrences = expand(calendar, events, start_year, year_count)?;
    let text = render(&occurrences, calendar_name, Utc::now());
    log::info!(
        "Built calendar '{}' with {} events ({} bytes)",
        calendar_name,
        occurrences.len(),
        text.len()
    );
    Ok(text)
}
