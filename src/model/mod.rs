// File: ./src/model/mod.rs
pub mod alarm;
pub mod event;
pub mod occurrence;

pub use alarm::{AlarmPreset, describe_alarm};
pub use event::{EventDefinition, parse_time_hm};
pub use occurrence::Occurrence;
