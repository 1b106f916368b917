//! Cutaway Media Bridge
//!
//! Narrow interfaces to the collaborators the editing core depends on but
//! does not implement:
//! - **Media engine:** probing and audio decode for source files
//! - **Transcription backend:** speech-to-text with word timestamps
//! - **Persistence bridge:** project document save/load
//! - **Autosave:** periodic background saves with sanitized paths
//! - **Tasks:** progress reporting and cooperative cancellation
//!
//! Every interface has a required in-memory implementation so nothing in
//! the core silently skips a side effect when a host bridge is absent.

pub mod autosave;
pub mod media;
pub mod persist;
pub mod task;
pub mod transcribe;

pub use media::{AudioSamples, MediaEngine, MediaMetadata, NullMediaEngine};
pub use persist::{FsBridge, MemoryBridge, PersistenceBridge};
pub use task::{CancelToken, ProgressFn};
pub use transcribe::{
    TranscriptSegment, TranscriptSegmentKind, TranscriptWord, TranscriptionBackend,
    TranscriptionOptions, TranscriptionResult,
};
