//! Cutaway Editor State
//!
//! The canonical mutable state of an editing session:
//! - **Store:** exclusive owner of the project tree, with tolerant
//!   mutation operations (missing ids are no-ops, not errors)
//! - **History:** linear undo/redo over serializable action payloads
//! - **Selection:** tool, selection sets, and timeline viewport
//! - **Export:** export job progress and cancellation tracking
//! - **Notices:** append-only user-visible warnings and errors
//!
//! The store assumes a single writer: one mutation completes before the
//! next begins. All other components read and write the project only
//! through store operations, never through a separate copy.

pub mod export;
pub mod history;
pub mod notice;
pub mod selection;
pub mod store;

pub use export::{ExportJobState, ExportStage};
pub use history::{ActionKind, EditAction, History};
pub use notice::{NoticeLog, Severity, UserNotice};
pub use selection::{SelectionState, TimelineViewport, Tool};
pub use store::{ClipPatch, EditorStore, MulticamState, TrackPatch};
