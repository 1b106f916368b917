//! Automatic track alignment.
//!
//! Audio sync extracts a windowed-RMS envelope per track and
//! cross-correlates the reference track (first in the set) against every
//! other member; the best-scoring lag becomes that track's offset.
//! Timecode sync delegates to the media engine's embedded-timecode
//! reader and yields nothing when sources carry no timecode.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cutaway_common::{CutawayError, CutawayResult};
use cutaway_media_bridge::media::MediaEngine;
use cutaway_media_bridge::task::{report_progress, CancelToken, ProgressFn};
use cutaway_project_model::{SyncPoint, SyncPointKind, Track};

/// Alignment strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncMethod {
    #[default]
    Audio,
    Timecode,
}

/// Options for [`auto_sync_tracks`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSyncOptions {
    pub method: SyncMethod,
    /// Envelope window length in milliseconds. Also the offset
    /// resolution.
    pub envelope_window_ms: u32,
    /// Largest offset searched, in seconds.
    pub max_offset_secs: f64,
}

impl Default for AutoSyncOptions {
    fn default() -> Self {
        Self {
            method: SyncMethod::Audio,
            envelope_window_ms: 20,
            max_offset_secs: 30.0,
        }
    }
}

/// Outcome of an auto-sync run.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoSyncResult {
    pub sync_points: Vec<SyncPoint>,
    /// Wall-clock analysis time in seconds.
    pub elapsed_secs: f64,
    /// Mean of per-point confidences, 0.0 when no points were found.
    pub mean_confidence: f64,
}

/// Estimate per-track offsets aligning `tracks` to the first track.
///
/// Audio method: requires at least two audio-bearing tracks with at
/// least one clip each, otherwise fails with an insufficient-tracks
/// error. Produces one [`SyncPoint`] per reference/other pair at time
/// 0, offsets keyed by track id (reference at 0.0).
///
/// Timecode method: reads embedded timecode per track; tracks without
/// timecode are skipped and the result may be empty.
pub fn auto_sync_tracks(
    tracks: &[Track],
    media: &dyn MediaEngine,
    options: &AutoSyncOptions,
    progress: Option<&ProgressFn>,
    cancel: &CancelToken,
) -> CutawayResult<AutoSyncResult> {
    let started = Instant::now();
    let sync_points = match options.method {
        SyncMethod::Audio => audio_sync(tracks, media, options, progress, cancel)?,
        SyncMethod::Timecode => timecode_sync(tracks, media, cancel)?,
    };
    report_progress(progress, 100.0);

    let mean_confidence = if sync_points.is_empty() {
        0.0
    } else {
        sync_points
            .iter()
            .filter_map(|p| p.confidence)
            .sum::<f64>()
            / sync_points.len() as f64
    };
    tracing::info!(
        points = sync_points.len(),
        mean_confidence,
        "Auto-sync finished"
    );
    Ok(AutoSyncResult {
        sync_points,
        elapsed_secs: started.elapsed().as_secs_f64(),
        mean_confidence,
    })
}

fn audio_sync(
    tracks: &[Track],
    media: &dyn MediaEngine,
    options: &AutoSyncOptions,
    progress: Option<&ProgressFn>,
    cancel: &CancelToken,
) -> CutawayResult<Vec<SyncPoint>> {
    // One envelope per audio-bearing track, from its first clip's source.
    let mut envelopes: Vec<(Uuid, Vec<f32>)> = Vec::new();
    let usable: Vec<&Track> = tracks
        .iter()
        .filter(|t| t.has_audio() && !t.clips.is_empty())
        .collect();
    if usable.len() < 2 {
        return Err(CutawayError::multicam(format!(
            "insufficient tracks for audio sync: {} usable, need 2",
            usable.len()
        )));
    }

    for (i, track) in usable.iter().enumerate() {
        cancel.check()?;
        let audio = media.decode_audio(&track.clips[0].source)?;
        let envelope = rms_envelope(&audio.samples, audio.sample_rate, options.envelope_window_ms);
        envelopes.push((track.id, envelope));
        report_progress(progress, 50.0 * (i + 1) as f64 / usable.len() as f64);
    }

    let window_secs = options.envelope_window_ms as f64 / 1000.0;
    let max_lag = (options.max_offset_secs / window_secs).ceil() as isize;
    let (reference_id, reference) = &envelopes[0];

    let mut points = Vec::new();
    let pairs = envelopes.len() - 1;
    for (i, (track_id, envelope)) in envelopes.iter().skip(1).enumerate() {
        cancel.check()?;
        let (lag, score) = best_lag(reference, envelope, max_lag);
        // A positive lag means this track's content runs behind the
        // reference; shifting it earlier by the lag aligns the two.
        let offset = -(lag as f64) * window_secs;
        tracing::debug!(track_id = %track_id, offset, score, "Correlated track against reference");

        let mut offsets = BTreeMap::new();
        offsets.insert(*reference_id, 0.0);
        offsets.insert(*track_id, offset);
        points.push(SyncPoint {
            id: Uuid::new_v4(),
            time: 0.0,
            offsets,
            kind: SyncPointKind::Audio,
            confidence: Some(score.clamp(0.0, 1.0)),
        });
        report_progress(progress, 50.0 + 50.0 * (i + 1) as f64 / pairs as f64);
    }
    Ok(points)
}

fn timecode_sync(
    tracks: &[Track],
    media: &dyn MediaEngine,
    cancel: &CancelToken,
) -> CutawayResult<Vec<SyncPoint>> {
    let mut stamped: Vec<(Uuid, f64)> = Vec::new();
    for track in tracks.iter().filter(|t| !t.clips.is_empty()) {
        cancel.check()?;
        if let Some(timecode) = media.read_timecode(&track.clips[0].source)? {
            stamped.push((track.id, timecode));
        }
    }
    if stamped.len() < 2 {
        return Ok(Vec::new());
    }

    let (reference_id, reference_tc) = stamped[0];
    let mut points = Vec::new();
    for (track_id, timecode) in stamped.iter().skip(1) {
        let mut offsets = BTreeMap::new();
        offsets.insert(reference_id, 0.0);
        offsets.insert(*track_id, reference_tc - timecode);
        points.push(SyncPoint {
            id: Uuid::new_v4(),
            time: 0.0,
            offsets,
            kind: SyncPointKind::Timecode,
            confidence: Some(1.0),
        });
    }
    Ok(points)
}

/// Windowed RMS amplitude envelope.
fn rms_envelope(samples: &[f32], sample_rate: u32, window_ms: u32) -> Vec<f32> {
    let window = ((sample_rate as usize * window_ms as usize) / 1000).max(1);
    samples
        .chunks(window)
        .map(|chunk| {
            let energy: f32 = chunk.iter().map(|s| s * s).sum();
            (energy / chunk.len() as f32).sqrt()
        })
        .collect()
}

/// The lag of `other` relative to `reference` with the best normalized
/// cross-correlation, searched over `[-max_lag, max_lag]`.
fn best_lag(reference: &[f32], other: &[f32], max_lag: isize) -> (isize, f64) {
    let mut best = (0isize, f64::MIN);
    for lag in -max_lag..=max_lag {
        let score = normalized_correlation(reference, other, lag);
        if score > best.1 {
            best = (lag, score);
        }
    }
    if best.1 == f64::MIN {
        (0, 0.0)
    } else {
        best
    }
}

/// Pearson-style correlation of `reference[t]` against `other[t + lag]`
/// over their overlap. 0.0 when the overlap is empty or flat.
fn normalized_correlation(reference: &[f32], other: &[f32], lag: isize) -> f64 {
    let mut pairs = Vec::new();
    for (t, r) in reference.iter().enumerate() {
        let u = t as isize + lag;
        if u >= 0 && (u as usize) < other.len() {
            pairs.push((*r as f64, other[u as usize] as f64));
        }
    }
    if pairs.len() < 2 {
        return 0.0;
    }
    let n = pairs.len() as f64;
    let mean_r = pairs.iter().map(|(r, _)| r).sum::<f64>() / n;
    let mean_o = pairs.iter().map(|(_, o)| o).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_r = 0.0;
    let mut var_o = 0.0;
    for (r, o) in &pairs {
        cov += (r - mean_r) * (o - mean_o);
        var_r += (r - mean_r).powi(2);
        var_o += (o - mean_o).powi(2);
    }
    if var_r <= f64::EPSILON || var_o <= f64::EPSILON {
        return 0.0;
    }
    cov / (var_r.sqrt() * var_o.sqrt())
}

/// Apply sync point offsets to tracks, returning shifted copies.
///
/// Per-track offsets are summed across all sync points, each clip's
/// placement is shifted by the total (clamped at time zero), and the
/// total is recorded in [`Track::sync_offset`]. Inputs are not mutated.
pub fn apply_sync_to_tracks(tracks: &[Track], sync_points: &[SyncPoint]) -> Vec<Track> {
    let mut totals: BTreeMap<Uuid, f64> = BTreeMap::new();
    for point in sync_points {
        for (track_id, offset) in &point.offsets {
            *totals.entry(*track_id).or_insert(0.0) += offset;
        }
    }

    tracks
        .iter()
        .map(|track| {
            let mut shifted = track.clone();
            if let Some(total) = totals.get(&track.id) {
                for clip in &mut shifted.clips {
                    clip.set_start_time(clip.start_time + total);
                }
                shifted.sort_clips();
                shifted.sync_offset = Some(*total);
            }
            shifted
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutaway_media_bridge::media::{MediaMetadata, NullMediaEngine};
    use cutaway_project_model::{AudioProps, Clip, SourceRef, TrackKind};

    fn audio_track(name: &str, source: &str) -> Track {
        let mut track = Track::new(TrackKind::Audio, name);
        track.clips.push(Clip::audio(
            name,
            SourceRef::new(source),
            track.id,
            10.0,
            4.0,
            AudioProps {
                channels: 1,
                sample_rate: 48000,
                bit_rate: 192,
                waveform: vec![],
                gain_db: 0.0,
            },
        ));
        track
    }

    /// Quiet signal with a loud burst starting at `burst_at` seconds.
    fn burst_signal(total_secs: f64, burst_at: f64, sample_rate: u32) -> Vec<f32> {
        let total = (total_secs * sample_rate as f64) as usize;
        let start = (burst_at * sample_rate as f64) as usize;
        let len = sample_rate as usize / 2;
        let mut samples = vec![0.01f32; total];
        for (i, s) in samples.iter_mut().enumerate().skip(start).take(len) {
            *s = (i as f32 * 0.3).sin() * 0.9;
        }
        samples
    }

    #[test]
    fn test_audio_sync_recovers_known_delay() {
        let engine = NullMediaEngine::new();
        let a = audio_track("Cam A", "mem://a.wav");
        let b = audio_track("Cam B", "mem://b.wav");
        // Same burst, 0.5s later on track B.
        engine.register_audio(&a.clips[0].source, burst_signal(6.0, 1.0, 48000), 48000);
        engine.register_audio(&b.clips[0].source, burst_signal(6.0, 1.5, 48000), 48000);

        let result = auto_sync_tracks(
            &[a.clone(), b.clone()],
            &engine,
            &AutoSyncOptions::default(),
            None,
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(result.sync_points.len(), 1);
        let point = &result.sync_points[0];
        assert_eq!(point.kind, SyncPointKind::Audio);
        let offset = point.offsets[&b.id];
        assert!(
            (offset + 0.5).abs() < 0.05,
            "expected offset near -0.5, got {offset}"
        );
        assert!(result.mean_confidence > 0.5);
        assert!(result.elapsed_secs >= 0.0);
    }

    #[test]
    fn test_audio_sync_requires_two_usable_tracks() {
        let engine = NullMediaEngine::new();
        let a = audio_track("Solo", "mem://solo.wav");
        engine.register_audio(&a.clips[0].source, burst_signal(2.0, 0.5, 48000), 48000);

        let err = auto_sync_tracks(
            &[a],
            &engine,
            &AutoSyncOptions::default(),
            None,
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("insufficient tracks"));
    }

    #[test]
    fn test_audio_sync_honors_cancellation() {
        let engine = NullMediaEngine::new();
        let a = audio_track("A", "mem://a.wav");
        let b = audio_track("B", "mem://b.wav");
        engine.register_audio(&a.clips[0].source, vec![0.1; 48000], 48000);
        engine.register_audio(&b.clips[0].source, vec![0.1; 48000], 48000);

        let token = CancelToken::new();
        token.cancel();
        let err = auto_sync_tracks(
            &[a, b],
            &engine,
            &AutoSyncOptions::default(),
            None,
            &token,
        )
        .unwrap_err();
        assert!(matches!(err, CutawayError::Cancelled));
    }

    #[test]
    fn test_timecode_sync_uses_embedded_stamps() {
        let engine = NullMediaEngine::new();
        let a = audio_track("A", "mem://a.mov");
        let b = audio_track("B", "mem://b.mov");
        let meta = MediaMetadata {
            duration_secs: 10.0,
            width: None,
            height: None,
            frame_rate: None,
            channels: 1,
            sample_rate: 48000,
        };
        engine.register(&a.clips[0].source, meta.clone(), None, Some(3600.0));
        engine.register(&b.clips[0].source, meta, None, Some(3602.5));

        let options = AutoSyncOptions {
            method: SyncMethod::Timecode,
            ..AutoSyncOptions::default()
        };
        let result =
            auto_sync_tracks(&[a, b.clone()], &engine, &options, None, &CancelToken::new())
                .unwrap();
        assert_eq!(result.sync_points.len(), 1);
        assert_eq!(result.sync_points[0].kind, SyncPointKind::Timecode);
        assert!((result.sync_points[0].offsets[&b.id] + 2.5).abs() < 1e-9);
        assert_eq!(result.mean_confidence, 1.0);
    }

    #[test]
    fn test_timecode_sync_empty_without_stamps() {
        let engine = NullMediaEngine::new();
        let a = audio_track("A", "mem://a.mov");
        let meta = MediaMetadata {
            duration_secs: 10.0,
            width: None,
            height: None,
            frame_rate: None,
            channels: 1,
            sample_rate: 48000,
        };
        engine.register(&a.clips[0].source, meta, None, None);

        let options = AutoSyncOptions {
            method: SyncMethod::Timecode,
            ..AutoSyncOptions::default()
        };
        let result =
            auto_sync_tracks(&[a], &engine, &options, None, &CancelToken::new()).unwrap();
        assert!(result.sync_points.is_empty());
        assert_eq!(result.mean_confidence, 0.0);
    }

    #[test]
    fn test_apply_sync_shifts_clips_and_records_offset() {
        let a = audio_track("A", "mem://a.wav");
        let b = audio_track("B", "mem://b.wav");
        let mut offsets = BTreeMap::new();
        offsets.insert(a.id, 0.0);
        offsets.insert(b.id, -2.0);
        let point = SyncPoint {
            id: Uuid::new_v4(),
            time: 0.0,
            offsets,
            kind: SyncPointKind::Audio,
            confidence: Some(0.9),
        };

        let original_b_start = b.clips[0].start_time;
        let shifted = apply_sync_to_tracks(&[a.clone(), b.clone()], &[point]);

        // Inputs untouched, outputs shifted.
        assert!((b.clips[0].start_time - original_b_start).abs() < 1e-9);
        assert_eq!(shifted[0].clips[0].start_time, a.clips[0].start_time);
        assert!((shifted[1].clips[0].start_time - (original_b_start - 2.0)).abs() < 1e-9);
        assert_eq!(shifted[1].sync_offset, Some(-2.0));
        assert!(shifted[1].clips[0].invariant_violations().is_empty());
    }

    #[test]
    fn test_rms_envelope_window_count() {
        let envelope = rms_envelope(&vec![0.5; 48000], 48000, 20);
        // 1s of audio at 20ms windows.
        assert_eq!(envelope.len(), 50);
        assert!((envelope[0] - 0.5).abs() < 1e-6);
    }
}
