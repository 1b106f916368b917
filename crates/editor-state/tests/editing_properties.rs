//! Property and scenario tests over the store and history together.

use proptest::prelude::*;
use uuid::Uuid;

use cutaway_editor_state::{ActionKind, EditorStore, History};
use cutaway_project_model::{Clip, ProjectSettings, SourceRef, TrackKind, VideoProps};

fn video_clip(track_id: Uuid, start: f64, duration: f64) -> Clip {
    Clip::video(
        "clip",
        SourceRef::new("sources/cam.mp4"),
        track_id,
        start,
        duration,
        VideoProps {
            width: 1920,
            height: 1080,
            frame_rate: 30.0,
            codec: "h264".to_string(),
            has_audio: true,
            transform: Default::default(),
        },
    )
}

fn store_with_tracks(n: usize) -> (EditorStore, Vec<Uuid>) {
    let mut store = EditorStore::new();
    store.create_new_project("Prop", ProjectSettings::default());
    let tracks = (0..n)
        .map(|_| store.add_track(TrackKind::Video, None).unwrap())
        .collect();
    (store, tracks)
}

/// Assert the project validates cleanly: clip timing invariants, clip
/// ordering per track, marker ordering, track_id backrefs.
fn assert_valid(store: &EditorStore) {
    let problems = store.project().unwrap().validate();
    assert!(problems.is_empty(), "validation problems: {problems:?}");
}

/// A randomly generated editing step.
#[derive(Debug, Clone)]
enum Step {
    Add { track: usize, start: f64, duration: f64 },
    Move { clip: usize, track: usize, start: f64 },
    Trim { clip: usize, trim_start: f64, trim_len: f64 },
    Split { clip: usize, frac: f64 },
    Remove { clip: usize },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..3usize, 0.0..300.0f64, 0.5..30.0f64)
            .prop_map(|(track, start, duration)| Step::Add { track, start, duration }),
        (0..16usize, 0..3usize, 0.0..300.0f64)
            .prop_map(|(clip, track, start)| Step::Move { clip, track, start }),
        (0..16usize, 0.0..10.0f64, 0.5..20.0f64)
            .prop_map(|(clip, trim_start, trim_len)| Step::Trim { clip, trim_start, trim_len }),
        (0..16usize, 0.1..0.9f64).prop_map(|(clip, frac)| Step::Split { clip, frac }),
        (0..16usize).prop_map(|clip| Step::Remove { clip }),
    ]
}

fn all_clip_ids(store: &EditorStore) -> Vec<Uuid> {
    store
        .project()
        .unwrap()
        .tracks
        .iter()
        .flat_map(|t| t.clips.iter().map(|c| c.id))
        .collect()
}

proptest! {
    /// Any sequence of store operations leaves the project valid.
    #[test]
    fn arbitrary_edits_preserve_invariants(steps in proptest::collection::vec(step_strategy(), 1..40)) {
        let (mut store, tracks) = store_with_tracks(3);

        for step in steps {
            let clips = all_clip_ids(&store);
            match step {
                Step::Add { track, start, duration } => {
                    let track_id = tracks[track % tracks.len()];
                    store.add_clip(video_clip(track_id, start, duration), track_id, None);
                }
                Step::Move { clip, track, start } => {
                    if let Some(clip_id) = clips.get(clip % clips.len().max(1)) {
                        store.move_clip(*clip_id, tracks[track % tracks.len()], start);
                    }
                }
                Step::Trim { clip, trim_start, trim_len } => {
                    if let Some(clip_id) = clips.get(clip % clips.len().max(1)) {
                        store.trim_clip(*clip_id, trim_start, trim_start + trim_len);
                    }
                }
                Step::Split { clip, frac } => {
                    if let Some(clip_id) = clips.get(clip % clips.len().max(1)).copied() {
                        let (start, end) = {
                            let c = store.clip(clip_id).unwrap();
                            (c.start_time, c.end_time)
                        };
                        store.split_clip(clip_id, start + (end - start) * frac);
                    }
                }
                Step::Remove { clip } => {
                    if let Some(clip_id) = clips.get(clip % clips.len().max(1)) {
                        store.remove_clip(*clip_id);
                    }
                }
            }
            assert_valid(&store);
        }
    }

    /// A split exactly covers the original clip's placement and source range.
    #[test]
    fn split_exactly_covers_original(
        start in 0.0..100.0f64,
        duration in 1.0..60.0f64,
        trim_start in 0.0..20.0f64,
        frac in 0.05..0.95f64,
    ) {
        let (mut store, tracks) = store_with_tracks(1);
        let mut clip = video_clip(tracks[0], start, duration);
        clip.set_trim(trim_start, trim_start + duration);
        clip.set_start_time(start);
        let clip_id = store.add_clip(clip, tracks[0], None).unwrap();

        let original = store.clip(clip_id).unwrap().clone();
        let at = start + duration * frac;
        let (left_id, right_id) = store.split_clip(clip_id, at).unwrap();

        let left = store.clip(left_id).unwrap().clone();
        let right = store.clip(right_id).unwrap().clone();

        prop_assert!((left.start_time - original.start_time).abs() < 1e-9);
        prop_assert!((left.end_time - right.start_time).abs() < 1e-9);
        prop_assert!((right.end_time - original.end_time).abs() < 1e-9);
        prop_assert!((left.trim_start - original.trim_start).abs() < 1e-9);
        prop_assert!((left.trim_end - right.trim_start).abs() < 1e-9);
        prop_assert!((right.trim_end - original.trim_end).abs() < 1e-9);
        assert_valid(&store);
    }

    /// N undos then N redos reproduce the project bit-for-bit in its
    /// serialized form, for any N.
    #[test]
    fn undo_redo_roundtrip_is_exact(
        placements in proptest::collection::vec((0.0..200.0f64, 0.5..20.0f64), 1..12),
    ) {
        let (mut store, tracks) = store_with_tracks(2);
        let mut history = History::default();
        let baseline = serde_json::to_string(store.project().unwrap()).unwrap();

        for (i, (start, duration)) in placements.iter().enumerate() {
            let track_id = tracks[i % tracks.len()];
            let clip = video_clip(track_id, *start, *duration);
            history.execute(&mut store, "Add Clip", ActionKind::AddClip { clip });
        }
        let edited = serde_json::to_string(store.project().unwrap()).unwrap();
        let n = placements.len();

        for _ in 0..n {
            prop_assert!(history.undo(&mut store).is_some());
        }
        prop_assert!(!history.can_undo());
        prop_assert_eq!(
            serde_json::to_string(store.project().unwrap()).unwrap(),
            baseline
        );

        for _ in 0..n {
            prop_assert!(history.redo(&mut store).is_some());
        }
        prop_assert_eq!(
            serde_json::to_string(store.project().unwrap()).unwrap(),
            edited
        );
        assert_valid(&store);
    }
}

/// A realistic session: rough cut, reorder, split, then undo part of it.
#[test]
fn test_editing_session_scenario() {
    let mut store = EditorStore::new();
    let mut history = History::default();
    store.create_new_project("Interview", ProjectSettings::default());

    let cam = store.add_track(TrackKind::Video, Some("Cam A".to_string())).unwrap();
    let broll = store.add_track(TrackKind::Video, Some("B-roll".to_string())).unwrap();

    let intro = video_clip(cam, 0.0, 12.0);
    let intro_id = intro.id;
    history.execute(&mut store, "Add Intro", ActionKind::AddClip { clip: intro });

    let cutaway = video_clip(broll, 4.0, 3.0);
    let cutaway_id = cutaway.id;
    history.execute(&mut store, "Add B-roll", ActionKind::AddClip { clip: cutaway });

    // Split the intro where the guest starts talking.
    let before = store.clip(intro_id).unwrap().clone();
    let (left_id, right_id) = store.split_clip(intro_id, 5.0).unwrap();
    let left = store.clip(left_id).unwrap().clone();
    let right = store.clip(right_id).unwrap().clone();
    store.remove_clip(left_id);
    store.remove_clip(right_id);
    store.restore_clip(before.clone());
    history.execute(
        &mut store,
        "Split Clip",
        ActionKind::SplitClip { before, left, right },
    );

    assert_eq!(store.project().unwrap().track(cam).unwrap().clips.len(), 2);
    let problems = store.project().unwrap().validate();
    assert!(problems.is_empty(), "{problems:?}");

    // Undo the split, keep the b-roll.
    assert_eq!(history.undo(&mut store).as_deref(), Some("Split Clip"));
    assert_eq!(store.project().unwrap().track(cam).unwrap().clips.len(), 1);
    assert!(store.clip(cutaway_id).is_some());

    // A new edit after undo discards the redo tail.
    history.execute(
        &mut store,
        "Move B-roll",
        ActionKind::MoveClip {
            clip_id: cutaway_id,
            from_track: broll,
            to_track: broll,
            old_start: 4.0,
            new_start: 7.0,
        },
    );
    assert!(!history.can_redo());
    assert!((store.clip(cutaway_id).unwrap().start_time - 7.0).abs() < 1e-9);
}
