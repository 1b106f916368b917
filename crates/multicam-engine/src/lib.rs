//! Cutaway Multicam Engine
//!
//! Groups timeline tracks into synchronized camera angles and operates
//! on them: creating and validating groups, switching the active angle
//! (recorded as an append-only switch log), aligning member tracks by
//! audio cross-correlation or embedded timecode, and the podcast layer
//! that maps speakers onto angles for one-key switching.

pub mod engine;
pub mod podcast;
pub mod sync;

pub use engine::{
    add_sync_point, add_track_to_group, create_multicam_group, remove_track_from_group,
    switch_angle, validate_group,
};
pub use podcast::{add_speaker, handle_quick_key, set_quick_switch_key, switch_to_speaker};
pub use sync::{apply_sync_to_tracks, auto_sync_tracks, AutoSyncOptions, AutoSyncResult, SyncMethod};
