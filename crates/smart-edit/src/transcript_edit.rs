//! Transcription-driven editing passes.
//!
//! Transcript times are clip-local: second 0 of the transcript is the
//! first frame of each processed clip's material, matching the audio
//! buffer handed to the transcription backend.

use serde::{Deserialize, Serialize};

use cutaway_media_bridge::transcribe::{TranscriptSegmentKind, TranscriptionResult};
use cutaway_project_model::{Clip, Effect, EffectKind};

use crate::cuts::cut_windows;

/// Options for [`generate_jump_cuts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpCutOptions {
    /// Padding kept around each speech range, in seconds.
    pub padding: f64,
}

impl Default for JumpCutOptions {
    fn default() -> Self {
        Self { padding: 0.1 }
    }
}

/// Options for [`apply_speed_ramping`]: speech-rate tier boundaries in
/// words per second and the playback factor per tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedRampOptions {
    /// Below this rate speech counts as slow.
    pub slow_rate: f64,
    /// Above this rate speech counts as fast.
    pub fast_rate: f64,
    pub slow_factor: f64,
    pub normal_factor: f64,
    pub fast_factor: f64,
}

impl Default for SpeedRampOptions {
    fn default() -> Self {
        Self {
            slow_rate: 1.5,
            fast_rate: 3.0,
            slow_factor: 1.5,
            normal_factor: 1.0,
            fast_factor: 0.85,
        }
    }
}

/// Keep only the sub-ranges of each clip that overlap `speech`
/// transcript segments, rippled left. Locked clips pass through; a
/// clip with no overlapping speech disappears.
pub fn generate_jump_cuts(
    clips: &[Clip],
    transcript: &TranscriptionResult,
    options: &JumpCutOptions,
) -> Vec<Clip> {
    let padding = options.padding.max(0.0);
    let mut out = Vec::new();
    for clip in clips {
        if clip.locked {
            out.push(clip.clone());
            continue;
        }
        let keep: Vec<(f64, f64)> = merge_ranges(
            transcript
                .segments
                .iter()
                .filter(|s| s.kind == TranscriptSegmentKind::Speech)
                .map(|s| {
                    (
                        (s.start - padding).max(0.0),
                        (s.end + padding).min(clip.duration),
                    )
                })
                .filter(|(start, end)| end > start)
                .collect(),
        );
        out.extend(cut_windows(clip, &complement(&keep, clip.duration)));
    }
    tracing::debug!(clips_in = clips.len(), clips_out = out.len(), "Jump cuts generated");
    out
}

/// Remove every word-level time range whose word matches the filler
/// list (case-insensitive, punctuation-stripped exact match), splitting
/// each clip around the removed ranges.
pub fn remove_filler_words(
    clips: &[Clip],
    transcript: &TranscriptionResult,
    filler_words: &[String],
) -> Vec<Clip> {
    let fillers: Vec<String> = filler_words.iter().map(|w| normalize_word(w)).collect();
    let mut out = Vec::new();
    let mut removed_count = 0usize;
    for clip in clips {
        if clip.locked {
            out.push(clip.clone());
            continue;
        }
        let windows: Vec<(f64, f64)> = merge_ranges(
            transcript
                .segments
                .iter()
                .flat_map(|s| s.words.iter())
                .filter(|w| fillers.contains(&normalize_word(&w.word)))
                .map(|w| (w.start.max(0.0), w.end.min(clip.duration)))
                .filter(|(start, end)| end > start)
                .collect(),
        );
        removed_count += windows.len();
        out.extend(cut_windows(clip, &windows));
    }
    tracing::debug!(removed = removed_count, "Filler words removed");
    out
}

/// Annotate each clip with a speed effect from its local speech rate.
///
/// The rate is total words in overlapping speech segments divided by
/// the overlapped speech time; clips with no overlapping speech keep
/// their speed. Clip boundaries are never re-timed here — the effect is
/// an annotation the renderer honors.
pub fn apply_speed_ramping(
    clips: &[Clip],
    transcript: &TranscriptionResult,
    options: &SpeedRampOptions,
) -> Vec<Clip> {
    clips
        .iter()
        .map(|clip| {
            if clip.locked {
                return clip.clone();
            }
            let mut words = 0usize;
            let mut speech_secs = 0.0;
            for segment in transcript.speech_segments() {
                let start = segment.start.max(0.0);
                let end = segment.end.min(clip.duration);
                if end <= start {
                    continue;
                }
                speech_secs += end - start;
                words += segment
                    .words
                    .iter()
                    .filter(|w| w.start >= start && w.end <= end)
                    .count();
            }
            if speech_secs <= 0.0 || words == 0 {
                return clip.clone();
            }

            let rate = words as f64 / speech_secs;
            let factor = if rate < options.slow_rate {
                options.slow_factor
            } else if rate > options.fast_rate {
                options.fast_factor
            } else {
                options.normal_factor
            };
            let mut ramped = clip.clone();
            if (factor - 1.0).abs() > f64::EPSILON {
                ramped
                    .effects
                    .push(Effect::new(EffectKind::SpeedRamp { factor }));
            }
            ramped
        })
        .collect()
}

fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Sort and merge overlapping or touching ranges.
fn merge_ranges(mut ranges: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged: Vec<(f64, f64)> = Vec::new();
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.0 <= last.1 => last.1 = last.1.max(range.1),
            _ => merged.push(range),
        }
    }
    merged
}

/// The gaps between sorted `keep` ranges over `[0, duration]`.
fn complement(keep: &[(f64, f64)], duration: f64) -> Vec<(f64, f64)> {
    let mut gaps = Vec::new();
    let mut cursor = 0.0;
    for (start, end) in keep {
        if *start > cursor {
            gaps.push((cursor, *start));
        }
        cursor = cursor.max(*end);
    }
    if cursor < duration {
        gaps.push((cursor, duration));
    }
    gaps
}
