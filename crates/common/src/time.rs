//! Timeline time and range arithmetic.
//!
//! All timeline positions in Cutaway are floating-point seconds. Frame
//! indices are derived from the fractional second: `floor(fract * fps)`.
//! Negative inputs clamp to zero wherever a value is used as a playhead
//! or start position.

use serde::{Deserialize, Serialize};

/// A half-open time range `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl TimeRange {
    /// Create a range, clamping a negative start to zero and ensuring
    /// `end >= start`.
    pub fn new(start: f64, end: f64) -> Self {
        let start = start.max(0.0);
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Duration of this range in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` falls inside this range.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }

    /// Whether two ranges overlap (sharing only an endpoint does not count).
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The overlapping portion of two ranges, if any.
    pub fn intersection(&self, other: &TimeRange) -> Option<TimeRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(TimeRange { start, end })
        } else {
            None
        }
    }

    /// Shift the whole range by `offset` seconds. The result is clamped so
    /// the start never goes negative.
    pub fn shifted(&self, offset: f64) -> TimeRange {
        TimeRange::new(self.start + offset, self.end + offset)
    }
}

/// Round `time` to the nearest multiple of `grid` seconds.
///
/// A non-positive grid returns the input unchanged.
pub fn clamp_to_grid(time: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return time;
    }
    (time / grid).round() * grid
}

/// Format seconds as a timecode string.
///
/// Produces `H:MM:SS:FF` when the time reaches an hour, `MM:SS:FF`
/// otherwise. The frame field is `floor(fractional_seconds * frame_rate)`.
pub fn format_timecode(seconds: f64, frame_rate: f64) -> String {
    let seconds = seconds.max(0.0);
    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    let frames = (seconds.fract() * frame_rate.max(0.0)).floor() as u64;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}:{frames:02}")
    } else {
        format!("{minutes:02}:{secs:02}:{frames:02}")
    }
}
