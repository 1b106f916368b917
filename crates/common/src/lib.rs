//! Cutaway Common
//!
//! Shared infrastructure for all Cutaway crates:
//! - **Errors:** the `CutawayError` taxonomy and `CutawayResult` alias
//! - **Config:** application configuration with editing defaults
//! - **Logging:** tracing subscriber initialization
//! - **Time:** timeline time/range arithmetic and timecode formatting

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use error::{CutawayError, CutawayResult};
pub use time::TimeRange;
