//! Track types: ordered, typed lanes holding clip placements.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::Clip;

/// Track media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    /// Display label used for default track names.
    pub fn label(&self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
        }
    }
}

/// An ordered, typed lane on the timeline.
///
/// Clips are kept ordered by `start_time`, not insertion order; callers
/// that move clips must re-sort via [`Track::sort_clips`]. The model does
/// not reject overlapping clips — rendering resolves overlap by
/// `start_time` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier.
    pub id: Uuid,

    /// Human-readable name.
    pub name: String,

    /// Media kind of this lane.
    pub kind: TrackKind,

    /// Clips placed on this track, ordered by `start_time`.
    #[serde(default)]
    pub clips: Vec<Clip>,

    #[serde(default)]
    pub muted: bool,

    #[serde(default)]
    pub solo: bool,

    #[serde(default)]
    pub locked: bool,

    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Display height in timeline pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Display color as hex string (for example `#4a90d9`).
    #[serde(default)]
    pub color: Option<String>,

    /// Whether this track is a member of a multicam group.
    #[serde(default)]
    pub is_multicam_source: bool,

    /// Owning multicam group, when `is_multicam_source`.
    #[serde(default)]
    pub multicam_group_id: Option<Uuid>,

    /// Angle index within the owning multicam group.
    #[serde(default)]
    pub camera_angle: Option<usize>,

    /// Total sync offset applied by the multicam engine, in seconds.
    #[serde(default)]
    pub sync_offset: Option<f64>,
}

fn default_visible() -> bool {
    true
}

fn default_height() -> u32 {
    64
}

impl Track {
    /// Create an empty track.
    pub fn new(kind: TrackKind, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            clips: Vec::new(),
            muted: false,
            solo: false,
            locked: false,
            visible: true,
            height: default_height(),
            color: None,
            is_multicam_source: false,
            multicam_group_id: None,
            camera_angle: None,
            sync_offset: None,
        }
    }

    /// Re-sort clips ascending by `start_time`. Stable, so clips sharing a
    /// start keep their relative (insertion) order.
    pub fn sort_clips(&mut self) {
        self.clips
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    }

    /// Find a clip by id.
    pub fn clip(&self, clip_id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    /// Find a clip by id, mutably.
    pub fn clip_mut(&mut self, clip_id: Uuid) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == clip_id)
    }

    /// Whether any clip on this track carries audio.
    pub fn has_audio(&self) -> bool {
        self.kind == TrackKind::Audio || self.clips.iter().any(|c| c.kind.has_audio())
    }

    /// Timeline end of the last clip, 0.0 when empty.
    pub fn duration(&self) -> f64 {
        self.clips.iter().map(|c| c.end_time).fold(0.0, f64::max)
    }

    /// Clear multicam membership flags.
    pub fn clear_multicam_linkage(&mut self) {
        self.is_multicam_source = false;
        self.multicam_group_id = None;
        self.camera_angle = None;
    }
}
