// End-to-end export scenarios against the real Chinese calendar.
use chrono::NaiveDate;
use icalendar::{Calendar, CalendarComponent, Component};
use lunar_ics::LunarIcsError;
use lunar_ics::ics::{self, build_ics};
use lunar_ics::lunar::{self, ChineseCalendar, LunarDate, ProjectionError};
use lunar_ics::model::EventDefinition;

fn mazu() -> EventDefinition {
    EventDefinition::seeded().remove(0)
}

/// Replaces the per-run UID and DTSTAMP values so two builds can be compared.
fn mask_volatile(text: &str) -> String {
    text.split("\r\n")
        .map(|line| {
            if line.starts_with("UID:") {
                "UID:*"
            } else if line.starts_with("DTSTAMP:") {
                "DTSTAMP:*"
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\r\n")
}

#[test]
fn mazu_birthday_three_years() {
    let cal = ChineseCalendar::new();
    let ics = build_ics(&cal, &[mazu()], 2026, 3, "農曆提醒").unwrap();

    assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
    assert!(ics.ends_with("END:VCALENDAR\r\n"));
    assert!(ics.contains("PRODID:-//Lunar ICS Generator//lunar-ics//ZH-TW\r\n"));
    assert!(ics.contains("X-WR-CALNAME:農曆提醒\r\n"));
    assert!(ics.contains("X-WR-TIMEZONE:Asia/Taipei\r\n"));

    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 3);
    assert_eq!(ics.matches("BEGIN:VALARM").count(), 3);
    assert_eq!(ics.matches("TRIGGER:-PT1440M\r\n").count(), 3);
    assert_eq!(ics.matches("SUMMARY:媽祖生日\r\n").count(), 3);
    assert_eq!(ics.matches("DESCRIPTION:準備供品/香燭\r\n").count(), 3);

    assert!(ics.contains("DTSTART;TZID=Asia/Taipei:20260509T090000\r\n"));
    assert!(ics.contains("DTEND;TZID=Asia/Taipei:20260509T093000\r\n"));
    for line in ics.lines().filter(|l| l.starts_with("DTSTART")) {
        assert!(line.ends_with("T090000"), "{line}");
    }
    for line in ics.lines().filter(|l| l.starts_with("DTEND")) {
        assert!(line.ends_with("T093000"), "{line}");
    }
}

#[test]
fn every_line_ends_with_crlf() {
    let cal = ChineseCalendar::new();
    let ics = build_ics(&cal, &[mazu()], 2026, 2, "x").unwrap();
    let bare_lf = ics.matches('\n').count() - ics.matches("\r\n").count();
    assert_eq!(bare_lf, 0);
}

#[test]
fn occurrences_are_grouped_by_event_then_year() {
    let cal = ChineseCalendar::new();
    let moon = EventDefinition {
        title: "中秋".to_string(),
        lunar_month: 8,
        lunar_day: 15,
        time_of_day: "19:30".to_string(),
        alarm_minutes_before: None,
        ..EventDefinition::default()
    };
    let occurrences = ics::expand(&cal, &[mazu(), moon], 2024, 3).unwrap();

    let summary: Vec<(&str, i32)> = occurrences
        .iter()
        .map(|o| (o.title.as_str(), o.year))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("媽祖生日", 2024),
            ("媽祖生日", 2025),
            ("媽祖生日", 2026),
            ("中秋", 2024),
            ("中秋", 2025),
            ("中秋", 2026),
        ]
    );

    assert_eq!(
        occurrences[3].start.date(),
        NaiveDate::from_ymd_opt(2024, 9, 17).unwrap()
    );
    assert_eq!(
        occurrences[5].start.date(),
        NaiveDate::from_ymd_opt(2026, 9, 25).unwrap()
    );

    let mut uids: Vec<&str> = occurrences.iter().map(|o| o.uid.as_str()).collect();
    uids.sort_unstable();
    uids.dedup();
    assert_eq!(uids.len(), 6);
}

#[test]
fn no_alarm_and_alarm_at_start_differ() {
    let cal = ChineseCalendar::new();
    let silent = EventDefinition {
        alarm_minutes_before: None,
        ..mazu()
    };
    let at_start = EventDefinition {
        alarm_minutes_before: Some(0),
        ..mazu()
    };

    let ics = build_ics(&cal, &[silent], 2026, 1, "x").unwrap();
    assert!(!ics.contains("BEGIN:VALARM"));

    let ics = build_ics(&cal, &[at_start], 2026, 1, "x").unwrap();
    assert!(ics.contains("TRIGGER:-PT0M\r\n"));
}

#[test]
fn empty_notes_omit_description() {
    let cal = ChineseCalendar::new();
    let ev = EventDefinition {
        notes: String::new(),
        alarm_minutes_before: None,
        ..mazu()
    };
    let ics = build_ics(&cal, &[ev], 2026, 1, "x").unwrap();
    assert!(!ics.contains("DESCRIPTION"));
}

#[test]
fn invalid_time_fails_whole_build() {
    let cal = ChineseCalendar::new();
    let bad = EventDefinition {
        time_of_day: "25:00".to_string(),
        ..mazu()
    };
    let err = build_ics(&cal, &[mazu(), bad], 2026, 2, "x").unwrap_err();
    assert!(matches!(err, LunarIcsError::InvalidTimeFormat { ref text, .. } if text == "25:00"));
}

#[test]
fn missing_day_thirty_is_reported_with_year() {
    let cal = ChineseCalendar::new();
    let ev = EventDefinition {
        title: "二月底".to_string(),
        lunar_month: 2,
        lunar_day: 30,
        ..EventDefinition::default()
    };
    let err = build_ics(&cal, &[ev], 2026, 1, "x").unwrap_err();
    match err {
        LunarIcsError::InvalidLunarDate {
            event,
            year,
            source,
        } => {
            assert_eq!(event, "二月底");
            assert_eq!(year, 2026);
            assert_eq!(
                source,
                ProjectionError::DayOutOfRange {
                    month: 2,
                    day: 30,
                    days_in_month: 29
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn leap_month_event_fails_in_year_without_one() {
    let cal = ChineseCalendar::new();
    let ev = EventDefinition {
        lunar_month: 6,
        lunar_day: 1,
        is_leap_month: true,
        ..EventDefinition::default()
    };
    let occurrences = ics::expand(&cal, std::slice::from_ref(&ev), 2025, 1).unwrap();
    assert_eq!(
        occurrences[0].start.date(),
        NaiveDate::from_ymd_opt(2025, 7, 25).unwrap()
    );

    let err = ics::expand(&cal, &[ev], 2025, 2).unwrap_err();
    assert!(matches!(
        err,
        LunarIcsError::InvalidLunarDate {
            year: 2026,
            source: ProjectionError::NoLeapMonth { month: 6 },
            ..
        }
    ));
}

#[test]
fn special_characters_are_escaped() {
    let cal = ChineseCalendar::new();
    let ev = EventDefinition {
        title: "拜拜, 供品; 路徑\\".to_string(),
        notes: "第一行\r\n第二行".to_string(),
        alarm_minutes_before: None,
        ..mazu()
    };
    let ics = build_ics(&cal, &[ev], 2026, 1, "a,b").unwrap();
    assert!(ics.contains("SUMMARY:拜拜\\, 供品\\; 路徑\\\\\r\n"));
    assert!(ics.contains("DESCRIPTION:第一行\\n第二行\r\n"));
    assert!(ics.contains("X-WR-CALNAME:a\\,b\r\n"));
    assert_eq!(ics::unescape_text("第一行\\n第二行"), "第一行\n第二行");
}

#[test]
fn builds_are_identical_apart_from_uid_and_dtstamp() {
    let cal = ChineseCalendar::new();
    let events = EventDefinition::seeded();
    let a = build_ics(&cal, &events, 2026, 5, "農曆提醒").unwrap();
    let b = build_ics(&cal, &events, 2026, 5, "農曆提醒").unwrap();
    assert_ne!(a, b);
    assert_eq!(mask_volatile(&a), mask_volatile(&b));
}

#[test]
fn output_parses_as_icalendar() {
    let cal = ChineseCalendar::new();
    let ics = build_ics(&cal, &[mazu()], 2026, 3, "農曆提醒").unwrap();
    let parsed: Calendar = ics.parse().unwrap();

    let events: Vec<_> = parsed
        .components
        .iter()
        .filter_map(|c| match c {
            CalendarComponent::Event(e) => Some(e),
            _ => None,
        })
        .collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].get_summary(), Some("媽祖生日"));
    assert_eq!(events[0].property_value("DTSTART"), Some("20260509T090000"));
}

#[test]
fn reverse_projection_matches_forward() {
    let cal = ChineseCalendar::new();
    let solar = NaiveDate::from_ymd_opt(2026, 5, 9).unwrap();
    let back = lunar::reverse_project(&cal, solar).unwrap();
    assert_eq!(back, LunarDate::new(2026, 3, 23, false));
    assert_eq!(back.to_string(), "2026年 3月23日");
}
