// Crate root library declaration and module exports.
pub mod backup;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod ics;
pub mod logging;
pub mod lunar;
pub mod model;
pub mod storage;

pub use error::{LunarIcsError, Result};
