//! Cutaway Project Model
//!
//! Defines the core data contracts for Cutaway projects:
//! - **Project:** Top-level metadata, settings, tracks, markers
//! - **Tracks & Clips:** Typed timeline lanes and placed media references
//! - **Multicam:** Camera groups, angles, sync points, switch events
//! - **Documents:** Versioned JSON persistence format
//!
//! All timeline positions are floating-point seconds. The invariants
//! `end_time == start_time + duration` and `duration == trim_end - trim_start`
//! hold for every clip after every mutation.

pub mod clip;
pub mod document;
pub mod multicam;
pub mod project;
pub mod track;

pub use clip::*;
pub use document::*;
pub use multicam::*;
pub use project::*;
pub use track::*;
