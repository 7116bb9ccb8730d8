// File: ./src/cli.rs
//! Command-line front end: argument parsing, help text and command dispatch.
use crate::backup;
use crate::config::Config;
use crate::context::AppContext;
use crate::ics;
use crate::lunar::{self, ChineseCalendar, LunisolarCalendar};
use crate::model::{AlarmPreset, describe_alarm};
use crate::storage;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use icalendar::{Calendar, CalendarComponent, Component};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Export {
        events: Option<PathBuf>,
        start_year: Option<i32>,
        years: Option<u32>,
        name: Option<String>,
        output: Option<PathBuf>,
    },
    Preview {
        events: Option<PathBuf>,
        year: Option<i32>,
    },
    Lunar {
        date: NaiveDate,
    },
    Init {
        events: Option<PathBuf>,
    },
    Inspect {
        file: PathBuf,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub command: Command,
}

/// Pulls `--flag value` pairs for the flags a command accepts.
struct Flags {
    pairs: Vec<(String, String)>,
}

impl Flags {
    fn parse(args: &[String], allowed: &[&str]) -> Result<Self> {
        let mut pairs = Vec::new();
        let mut it = args.iter();
        while let Some(arg) = it.next() {
            if !allowed.contains(&arg.as_str()) {
                anyhow::bail!("Unexpected argument '{}'", arg);
            }
            let value = it
                .next()
                .ok_or_else(|| anyhow::anyhow!("Missing value for '{}'", arg))?;
            pairs.push((arg.clone(), value.clone()));
        }
        Ok(Self { pairs })
    }

    fn get(&self, flag: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == flag)
            .map(|(_, v)| v.as_str())
    }

    fn path(&self, flag: &str) -> Option<PathBuf> {
        self.get(flag).map(PathBuf::from)
    }

    fn number<T: std::str::FromStr>(&self, flag: &str) -> Result<Option<T>> {
        self.get(flag)
            .map(|v| {
                v.trim()
                    .parse::<T>()
                    .map_err(|_| anyhow::anyhow!("'{}' expects a number, got '{}'", flag, v))
            })
            .transpose()
    }
}

/// Parses arguments (without the binary name).
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut root = None;
    let mut rest = Vec::new();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-r" | "--root" => {
                let value = it
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("Missing value for '{}'", arg))?;
                root = Some(PathBuf::from(value));
            }
            _ => rest.push(arg.clone()),
        }
    }

    let Some((name, tail)) = rest.split_first() else {
        return Ok(CliArgs {
            root,
            command: Command::Help,
        });
    };

    let command = match name.as_str() {
        "-h" | "--help" | "help" => Command::Help,
        "export" => {
            let flags = Flags::parse(
                tail,
                &["--events", "--start-year", "--years", "--name", "--output"],
            )?;
            Command::Export {
                events: flags.path("--events"),
                start_year: flags.number("--start-year")?,
                years: flags.number("--years")?,
                name: flags.get("--name").map(str::to_string),
                output: flags.path("--output"),
            }
        }
        "preview" => {
            let flags = Flags::parse(tail, &["--events", "--year"])?;
            Command::Preview {
                events: flags.path("--events"),
                year: flags.number("--year")?,
            }
        }
        "lunar" => {
            let [date] = tail else {
                anyhow::bail!("Usage: lunar-ics lunar <YYYY-MM-DD>");
            };
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?;
            Command::Lunar { date }
        }
        "init" => {
            let flags = Flags::parse(tail, &["--events"])?;
            Command::Init {
                events: flags.path("--events"),
            }
        }
        "inspect" => {
            let [file] = tail else {
                anyhow::bail!("Usage: lunar-ics inspect <file.ics>");
            };
            Command::Inspect {
                file: PathBuf::from(file),
            }
        }
        other => anyhow::bail!("Unknown command '{}'. See 'lunar-ics --help'.", other),
    };

    Ok(CliArgs { root, command })
}

fn events_path(flag: Option<PathBuf>, config: &Config, ctx: &dyn AppContext) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(path),
        None => config.events_path(ctx),
    }
}

fn load_events(path: &Path) -> Result<Vec<crate::model::EventDefinition>> {
    if !path.exists() {
        anyhow::bail!(
            "No events file at '{}'. Run 'lunar-ics init' to create one.",
            path.display()
        );
    }
    backup::load(path)
}

/// Runs a parsed command, writing user-facing output to `out`.
pub fn execute(
    command: Command,
    ctx: &dyn AppContext,
    config: &Config,
    out: &mut dyn Write,
) -> Result<()> {
    let calendar = ChineseCalendar::new();
    match command {
        Command::Help => print_help(out)?,
        Command::Export {
            events,
            start_year,
            years,
            name,
            output,
        } => {
            let path = events_path(events, config, ctx)?;
            let events = load_events(&path)?;
            let start_year = start_year.unwrap_or_else(|| config.resolved_start_year(Utc::now()));
            let years = years.unwrap_or(config.years);
            Config::validate_range(start_year, years)?;
            let name = name.unwrap_or_else(|| config.calendar_name.clone());

            let text = ics::build_ics(&calendar, &events, start_year, years, &name)?;
            match output {
                Some(target) => {
                    if let Some(parent) = target.parent()
                        && !parent.as_os_str().is_empty()
                    {
                        fs::create_dir_all(parent)?;
                    }
                    storage::atomic_write(&target, &text)?;
                    log::info!(
                        "Wrote {} occurrences to {}",
                        events.len() * years as usize,
                        target.display()
                    );
                }
                None => out.write_all(text.as_bytes())?,
            }
        }
        Command::Preview { events, year } => {
            let path = events_path(events, config, ctx)?;
            let events = load_events(&path)?;
            let year = year.unwrap_or_else(|| config.resolved_start_year(Utc::now()));
            preview(&calendar, &events, year, out)?;
        }
        Command::Lunar { date } => {
            let lunar = lunar::reverse_project(&calendar, date)?;
            writeln!(out, "{}", lunar)?;
        }
        Command::Init { events } => {
            let path = events_path(events, config, ctx)?;
            if backup::init_if_missing(&path)? {
                writeln!(out, "Created {}", path.display())?;
            } else {
                writeln!(out, "{} already exists, left unchanged", path.display())?;
            }
        }
        Command::Inspect { file } => inspect(&file, out)?,
    }
    Ok(())
}

/// One line per event with its Gregorian date in `year`. A date that does
/// not exist that year is reported on its line instead of aborting.
pub fn preview(
    calendar: &dyn LunisolarCalendar,
    events: &[crate::model::EventDefinition],
    year: i32,
    out: &mut dyn Write,
) -> Result<()> {
    for (idx, ev) in events.iter().enumerate() {
        let leap = if ev.is_leap_month { "閏" } else { "" };
        let solar = match lunar::project(
            calendar,
            year,
            ev.lunar_month,
            ev.lunar_day,
            ev.is_leap_month,
        ) {
            Ok(date) => date.format("%Y-%m-%d").to_string(),
            Err(e) => format!("({})", e),
        };
        writeln!(
            out,
            "{}. {}  農曆{}{}月{}日 {}  → {} 年對應國曆：{}  提醒：{}",
            idx + 1,
            ev.display_title(),
            leap,
            ev.lunar_month,
            ev.lunar_day,
            ev.time_of_day,
            year,
            solar,
            describe_alarm(ev.alarm_minutes_before)
        )?;
    }
    Ok(())
}

/// Lists the events of an existing `.ics` file.
pub fn inspect(file: &Path, out: &mut dyn Write) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    let calendar: Calendar = text
        .parse()
        .map_err(|e| anyhow::anyhow!("Failed to parse ICS: {}", e))?;

    let mut count = 0;
    for component in &calendar.components {
        if let CalendarComponent::Event(event) = component {
            count += 1;
            writeln!(
                out,
                "{}  {}",
                event.property_value("DTSTART").unwrap_or("?"),
                event.get_summary().unwrap_or("")
            )?;
        }
    }
    writeln!(out, "{} events", count)?;
    Ok(())
}

pub fn print_help(out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "lunar-ics v{} - Lunar calendar reminders as importable .ics files",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out)?;
    writeln!(out, "USAGE:")?;
    writeln!(out, "    lunar-ics [--root <path>] <command> [options]")?;
    writeln!(out)?;
    writeln!(out, "COMMANDS:")?;
    writeln!(out, "    export      Build the .ics file (stdout unless --output)")?;
    writeln!(out, "        --events <file>       Events backup (default: data dir events.json)")?;
    writeln!(out, "        --start-year <year>   First year to generate (default: this year)")?;
    writeln!(out, "        --years <n>           Number of years, 1-60 (default: 20)")?;
    writeln!(out, "        --name <text>         Calendar display name")?;
    writeln!(out, "        --output <file>       Write to a file instead of stdout")?;
    writeln!(out, "    preview     Show each event's Gregorian date for a year")?;
    writeln!(out, "        --events <file>  --year <year>")?;
    writeln!(out, "    lunar <YYYY-MM-DD>   Convert a Gregorian date to the lunar calendar")?;
    writeln!(out, "    init        Create a starter events.json if none exists")?;
    writeln!(out, "    inspect <file.ics>   List the events in a generated file")?;
    writeln!(out)?;
    writeln!(out, "OPTIONS:")?;
    writeln!(out, "    -r, --root <path>     Use a different directory for config and data.")?;
    writeln!(out, "    -h, --help            Show this help message.")?;
    writeln!(out)?;
    writeln!(out, "ALARM PRESETS (alarm_minutes_before in events.json):")?;
    for preset in AlarmPreset::iter() {
        let value = match (preset, preset.minutes()) {
            (AlarmPreset::None, _) => "null".to_string(),
            (AlarmPreset::Custom, _) => "any other number".to_string(),
            (_, Some(mins)) => mins.to_string(),
            (_, None) => String::new(),
        };
        writeln!(out, "    {:<12} {}", preset.label(), value)?;
    }
    writeln!(out)?;
    writeln!(out, "ENVIRONMENT:")?;
    writeln!(out, "    {}         Log level (error, warn, info, debug, trace)", crate::logging::LOG_ENV_VAR)?;
    Ok(())
}
