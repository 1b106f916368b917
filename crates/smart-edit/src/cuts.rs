//! Silence-driven cutting.
//!
//! Windows to cut are expressed in clip-local time (seconds from the
//! clip's own start, matching the audio buffer the analysis ran on).
//! Cutting splits a clip into kept sub-clips that share the origin
//! clip's fields and source, with trims narrowed to each kept range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cutaway_common::{CutawayError, CutawayResult};
use cutaway_project_model::{Clip, Effect, EffectKind};

use crate::silence::SilenceSegment;

/// Smallest sub-clip worth keeping, in seconds.
const MIN_KEEP_SECS: f64 = 1e-3;

/// Options for silence cutting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartCutOptions {
    /// Padding retained on both sides of every cut, in seconds.
    pub keep_padding: f64,
    /// Hard-remove detected silence.
    pub remove_silence: bool,
    /// Speed through detected silence instead of removing it.
    /// Mutually exclusive with `remove_silence`.
    pub speed_up_silence: bool,
    /// Playback factor applied to silence when speeding up.
    pub silence_speed: f64,
}

impl Default for SmartCutOptions {
    fn default() -> Self {
        Self {
            keep_padding: 0.1,
            remove_silence: true,
            speed_up_silence: false,
            silence_speed: 4.0,
        }
    }
}

/// A window cut out by [`perform_smart_cut`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedWindow {
    pub clip_id: Uuid,
    /// Clip-local start of the removed span.
    pub start: f64,
    pub end: f64,
    pub reason: String,
}

/// Summary of a smart-cut pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartCutResult {
    pub clips: Vec<Clip>,
    pub removed: Vec<RemovedWindow>,
    /// Sum of input clip durations, in seconds.
    pub original_duration: f64,
    /// Playback duration after the pass.
    pub final_duration: f64,
    pub time_saved: f64,
}

/// Cut detected silence out of each analyzed clip.
///
/// `analyses` maps clip ids to silence segments in clip-local time;
/// clips without an entry pass through unchanged, as do locked clips.
/// Every silence window is shrunk by `keep_padding` on both sides
/// before cutting. Kept sub-clips ripple left so each clip's material
/// stays contiguous. The output never contains a clip with
/// `duration <= 0` and never exceeds the original total duration.
pub fn auto_remove_silence(
    clips: &[Clip],
    analyses: &BTreeMap<Uuid, Vec<SilenceSegment>>,
    options: &SmartCutOptions,
) -> Vec<Clip> {
    let mut out = Vec::new();
    for clip in clips {
        match analyses.get(&clip.id) {
            Some(segments) if !clip.locked => {
                let windows = padded_windows(segments, options.keep_padding, clip.duration);
                out.extend(cut_windows(clip, &windows));
            }
            _ => out.push(clip.clone()),
        }
    }
    out
}

/// Run a silence-cutting pass in one of two exclusive modes: hard
/// removal or speed-up annotation. With neither mode enabled the input
/// passes through unchanged.
pub fn perform_smart_cut(
    clips: &[Clip],
    analyses: &BTreeMap<Uuid, Vec<SilenceSegment>>,
    options: &SmartCutOptions,
) -> CutawayResult<SmartCutResult> {
    if options.remove_silence && options.speed_up_silence {
        return Err(CutawayError::smart_edit(
            "remove_silence and speed_up_silence are mutually exclusive",
        ));
    }
    let original_duration: f64 = clips.iter().map(|c| c.duration).sum();

    let (out, removed) = if options.remove_silence {
        let mut out = Vec::new();
        let mut removed = Vec::new();
        for clip in clips {
            match analyses.get(&clip.id) {
                Some(segments) if !clip.locked => {
                    let windows = padded_windows(segments, options.keep_padding, clip.duration);
                    for (start, end) in &windows {
                        removed.push(RemovedWindow {
                            clip_id: clip.id,
                            start: *start,
                            end: *end,
                            reason: "silence".to_string(),
                        });
                    }
                    out.extend(cut_windows(clip, &windows));
                }
                _ => out.push(clip.clone()),
            }
        }
        (out, removed)
    } else if options.speed_up_silence {
        (speed_up_silence(clips, analyses, options), Vec::new())
    } else {
        (clips.to_vec(), Vec::new())
    };

    let final_duration: f64 = out.iter().map(playback_duration).sum();
    let time_saved = (original_duration - final_duration).max(0.0);
    tracing::info!(
        clips_in = clips.len(),
        clips_out = out.len(),
        time_saved,
        "Smart cut finished"
    );
    Ok(SmartCutResult {
        clips: out,
        removed,
        original_duration,
        final_duration,
        time_saved,
    })
}

/// Split around silence windows and annotate the silent sub-clips with
/// a speed effect instead of removing them. Placement is preserved;
/// only playback time shrinks.
fn speed_up_silence(
    clips: &[Clip],
    analyses: &BTreeMap<Uuid, Vec<SilenceSegment>>,
    options: &SmartCutOptions,
) -> Vec<Clip> {
    let factor = options.silence_speed.max(1.0);
    let mut out = Vec::new();
    for clip in clips {
        let Some(segments) = analyses.get(&clip.id).filter(|_| !clip.locked) else {
            out.push(clip.clone());
            continue;
        };
        let windows = padded_windows(segments, options.keep_padding, clip.duration);
        if windows.is_empty() {
            out.push(clip.clone());
            continue;
        }

        // Alternating kept/silent sub-clips, all left in place.
        let mut cursor = 0.0;
        for (start, end) in &windows {
            if start - cursor > MIN_KEEP_SECS {
                out.push(sub_clip(clip, cursor, *start, clip.start_time + cursor));
            }
            let mut silent = sub_clip(clip, *start, *end, clip.start_time + start);
            silent
                .effects
                .push(Effect::new(EffectKind::SpeedRamp { factor }));
            out.push(silent);
            cursor = *end;
        }
        if clip.duration - cursor > MIN_KEEP_SECS {
            out.push(sub_clip(clip, cursor, clip.duration, clip.start_time + cursor));
        }
    }
    out
}

/// Effective playback duration, accounting for speed effects.
fn playback_duration(clip: &Clip) -> f64 {
    let factor = clip
        .effects
        .iter()
        .filter(|e| e.enabled)
        .filter_map(|e| match &e.kind {
            EffectKind::SpeedRamp { factor } => Some(*factor),
            _ => None,
        })
        .fold(1.0, |acc, f| acc * f.max(1e-6));
    clip.duration / factor
}

/// Shrink silence windows by `padding` on both sides, clamp them to the
/// clip, drop those the padding consumes, and merge the rest sorted.
fn padded_windows(
    segments: &[SilenceSegment],
    padding: f64,
    clip_duration: f64,
) -> Vec<(f64, f64)> {
    let padding = padding.max(0.0);
    let mut windows: Vec<(f64, f64)> = segments
        .iter()
        .map(|s| ((s.start + padding).max(0.0), (s.end - padding).min(clip_duration)))
        .filter(|(start, end)| end - start > MIN_KEEP_SECS)
        .collect();
    windows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f64, f64)> = Vec::new();
    for window in windows {
        match merged.last_mut() {
            Some(last) if window.0 <= last.1 => last.1 = last.1.max(window.1),
            _ => merged.push(window),
        }
    }
    merged
}

/// Cut the given clip-local windows out of a clip, returning the kept
/// sub-clips rippled left so the material stays contiguous.
pub(crate) fn cut_windows(clip: &Clip, windows: &[(f64, f64)]) -> Vec<Clip> {
    if windows.is_empty() {
        return vec![clip.clone()];
    }
    let mut kept = Vec::new();
    let mut cursor = 0.0;
    for (start, end) in windows {
        if start - cursor > MIN_KEEP_SECS {
            kept.push((cursor, *start));
        }
        cursor = cursor.max(*end);
    }
    if clip.duration - cursor > MIN_KEEP_SECS {
        kept.push((cursor, clip.duration));
    }

    let mut out = Vec::with_capacity(kept.len());
    let mut placed = clip.start_time;
    for (start, end) in kept {
        let sub = sub_clip(clip, start, end, placed);
        placed = sub.end_time;
        out.push(sub);
    }
    out
}

/// A copy of `clip` narrowed to the clip-local range `[from, to)`,
/// placed at `at` on the timeline.
pub(crate) fn sub_clip(clip: &Clip, from: f64, to: f64, at: f64) -> Clip {
    let mut sub = clip.clone();
    sub.id = Uuid::new_v4();
    sub.set_trim(clip.trim_start + from, clip.trim_start + to);
    sub.set_start_time(at);
    sub.transition_in = None;
    sub.transition_out = None;
    sub
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silence::SilenceSegmentKind;
    use cutaway_project_model::{AudioProps, SourceRef};
    use proptest::prelude::*;

    fn audio_clip(start: f64, duration: f64) -> Clip {
        Clip::audio(
            "mic",
            SourceRef::new("sources/mic.wav"),
            Uuid::new_v4(),
            start,
            duration,
            AudioProps {
                channels: 1,
                sample_rate: 48000,
                bit_rate: 192,
                waveform: vec![],
                gain_db: 0.0,
            },
        )
    }

    fn silence(start: f64, end: f64) -> SilenceSegment {
        SilenceSegment {
            start,
            end,
            kind: SilenceSegmentKind::Silence,
            confidence: 0.8,
        }
    }

    #[test]
    fn test_remove_silence_ripples_and_pads() {
        let clip = audio_clip(10.0, 10.0);
        let mut analyses = BTreeMap::new();
        analyses.insert(clip.id, vec![silence(4.0, 6.0)]);

        let options = SmartCutOptions {
            keep_padding: 0.5,
            ..SmartCutOptions::default()
        };
        let out = auto_remove_silence(&[clip.clone()], &analyses, &options);

        // Cut window shrinks to [4.5, 5.5]; two kept ranges remain.
        assert_eq!(out.len(), 2);
        assert!((out[0].start_time - 10.0).abs() < 1e-9);
        assert!((out[0].duration - 4.5).abs() < 1e-9);
        assert!((out[1].start_time - 14.5).abs() < 1e-9);
        assert!((out[1].duration - 4.5).abs() < 1e-9);
        assert!((out[1].trim_start - 5.5).abs() < 1e-9);
        for sub in &out {
            assert!(sub.invariant_violations().is_empty());
            assert_eq!(sub.source, clip.source);
        }
    }

    #[test]
    fn test_unanalyzed_and_locked_clips_pass_through() {
        let plain = audio_clip(0.0, 5.0);
        let mut locked = audio_clip(6.0, 5.0);
        locked.locked = true;

        let mut analyses = BTreeMap::new();
        analyses.insert(locked.id, vec![silence(1.0, 4.0)]);

        let out = auto_remove_silence(
            &[plain.clone(), locked.clone()],
            &analyses,
            &SmartCutOptions::default(),
        );
        assert_eq!(out, vec![plain, locked]);
    }

    #[test]
    fn test_smart_cut_remove_mode_logs_windows() {
        let clip = audio_clip(0.0, 10.0);
        let clip_id = clip.id;
        let mut analyses = BTreeMap::new();
        analyses.insert(clip_id, vec![silence(2.0, 4.0), silence(7.0, 9.0)]);

        let options = SmartCutOptions {
            keep_padding: 0.0,
            ..SmartCutOptions::default()
        };
        let result = perform_smart_cut(&[clip], &analyses, &options).unwrap();

        assert_eq!(result.removed.len(), 2);
        assert!(result.removed.iter().all(|w| w.reason == "silence"));
        assert_eq!(result.removed[0].clip_id, clip_id);
        assert!((result.original_duration - 10.0).abs() < 1e-9);
        assert!((result.final_duration - 6.0).abs() < 1e-9);
        assert!((result.time_saved - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_smart_cut_speed_mode_annotates_instead() {
        let clip = audio_clip(0.0, 10.0);
        let mut analyses = BTreeMap::new();
        analyses.insert(clip.id, vec![silence(4.0, 8.0)]);

        let options = SmartCutOptions {
            keep_padding: 0.0,
            remove_silence: false,
            speed_up_silence: true,
            silence_speed: 4.0,
        };
        let result = perform_smart_cut(&[clip], &analyses, &options).unwrap();

        assert!(result.removed.is_empty());
        assert_eq!(result.clips.len(), 3);
        let silent = &result.clips[1];
        assert!(silent
            .effects
            .iter()
            .any(|e| matches!(e.kind, EffectKind::SpeedRamp { factor } if factor == 4.0)));
        // Placement preserved; playback shrinks 4s -> 1s.
        assert!((silent.start_time - 4.0).abs() < 1e-9);
        assert!((silent.duration - 4.0).abs() < 1e-9);
        assert!((result.final_duration - 7.0).abs() < 1e-9);
        assert!((result.time_saved - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_smart_cut_modes_are_exclusive() {
        let options = SmartCutOptions {
            remove_silence: true,
            speed_up_silence: true,
            ..SmartCutOptions::default()
        };
        assert!(perform_smart_cut(&[], &BTreeMap::new(), &options).is_err());
    }

    #[test]
    fn test_fully_silent_clip_vanishes() {
        let clip = audio_clip(0.0, 5.0);
        let mut analyses = BTreeMap::new();
        analyses.insert(clip.id, vec![silence(0.0, 5.0)]);

        let options = SmartCutOptions {
            keep_padding: 0.0,
            ..SmartCutOptions::default()
        };
        assert!(auto_remove_silence(&[clip], &analyses, &options).is_empty());
    }

    proptest! {
        /// Cutting never emits non-positive durations and never exceeds
        /// the original clip's total duration.
        #[test]
        fn removal_bounds_hold(
            duration in 1.0..60.0f64,
            windows in proptest::collection::vec((0.0..60.0f64, 0.1..10.0f64), 0..6),
            padding in 0.0..1.0f64,
        ) {
            let clip = audio_clip(3.0, duration);
            let segments: Vec<SilenceSegment> = windows
                .iter()
                .map(|(start, len)| silence(*start, start + len))
                .collect();
            let mut analyses = BTreeMap::new();
            analyses.insert(clip.id, segments);

            let options = SmartCutOptions {
                keep_padding: padding,
                ..SmartCutOptions::default()
            };
            let out = auto_remove_silence(&[clip], &analyses, &options);

            let total: f64 = out.iter().map(|c| c.duration).sum();
            prop_assert!(total <= duration + 1e-6);
            for sub in &out {
                prop_assert!(sub.duration > 0.0);
                prop_assert!(sub.invariant_violations().is_empty());
            }
        }
    }
}
