//! Cutaway Smart Edit
//!
//! Analysis-driven editing passes. Every pass is pure: it takes clips
//! plus an analysis artifact (silence segments or a transcription) and
//! returns a new clip list, leaving inputs untouched. Callers wrap the
//! net timeline change as one history batch so a whole pass undoes in
//! one step.
//!
//! Analysis artifacts are ephemeral, keyed by clip id; they are never
//! persisted with the project.

pub mod cuts;
pub mod silence;
pub mod transcript_edit;

pub use cuts::{
    auto_remove_silence, perform_smart_cut, RemovedWindow, SmartCutOptions, SmartCutResult,
};
pub use silence::{detect_silence, SilenceOptions, SilenceSegment, SilenceSegmentKind};
pub use transcript_edit::{
    apply_speed_ramping, generate_jump_cuts, remove_filler_words, JumpCutOptions,
    SpeedRampOptions,
};
