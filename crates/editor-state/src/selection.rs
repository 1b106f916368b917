//! Selection, tool, and timeline viewport state.
//!
//! Data-only session state: which tool is active, which clips and tracks
//! are selected, an optional time-range selection, and the zoom/scroll
//! viewport over the timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cutaway_common::TimeRange;

/// Active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Razor,
    Hand,
    Zoom,
}

/// The current selection set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SelectionState {
    /// Selected clip ids.
    pub clips: Vec<Uuid>,
    /// Selected track ids.
    pub tracks: Vec<Uuid>,
    /// Optional in/out range selection on the timeline.
    pub time_range: Option<TimeRange>,
    /// Active tool.
    pub tool: Tool,
}

impl SelectionState {
    /// Select a clip. With `additive` false the previous clip selection
    /// is replaced.
    pub fn select_clip(&mut self, clip_id: Uuid, additive: bool) {
        if !additive {
            self.clips.clear();
        }
        if !self.clips.contains(&clip_id) {
            self.clips.push(clip_id);
        }
    }

    /// Select a track. With `additive` false the previous track selection
    /// is replaced.
    pub fn select_track(&mut self, track_id: Uuid, additive: bool) {
        if !additive {
            self.tracks.clear();
        }
        if !self.tracks.contains(&track_id) {
            self.tracks.push(track_id);
        }
    }

    pub fn deselect_clip(&mut self, clip_id: Uuid) {
        self.clips.retain(|id| *id != clip_id);
    }

    pub fn is_clip_selected(&self, clip_id: Uuid) -> bool {
        self.clips.contains(&clip_id)
    }

    pub fn is_track_selected(&self, track_id: Uuid) -> bool {
        self.tracks.contains(&track_id)
    }

    /// Clear all selection, keeping the active tool.
    pub fn clear(&mut self) {
        self.clips.clear();
        self.tracks.clear();
        self.time_range = None;
    }
}

/// Zoom and scroll state over the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineViewport {
    /// Horizontal zoom in pixels per second.
    pub zoom: f64,
    /// Horizontal scroll offset in seconds.
    pub scroll_x: f64,
    /// Vertical scroll offset in pixels.
    pub scroll_y: f64,
}

impl Default for TimelineViewport {
    fn default() -> Self {
        Self {
            zoom: 50.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

impl TimelineViewport {
    /// Set zoom, clamped to a usable range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(1.0, 2000.0);
    }

    /// Scroll horizontally, never before time zero.
    pub fn set_scroll_x(&mut self, scroll_x: f64) {
        self.scroll_x = scroll_x.max(0.0);
    }

    /// The visible time range for a viewport of `width_px` pixels.
    pub fn visible_range(&self, width_px: f64) -> TimeRange {
        TimeRange::new(self.scroll_x, self.scroll_x + width_px / self.zoom)
    }
}
