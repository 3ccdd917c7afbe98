use obscura_keyframe_core::{
    data::{Interpolation, PathPoint, Project, Track, TrackKind},
    params::Param,
    render_state::{
        build_render_state, render_state_digest, CanvasTransform, PreviewQuality,
    },
};

fn mk_project(tracks: Vec<Track>) -> Project {
    let mut project = Project::new("clip", 4000);
    project.tracks = tracks;
    project
}

fn mk_track(id: &str, z_index: i32) -> Track {
    let mut track = Track::new(id, TrackKind::Rectangle, z_index, 0);
    track.id = id.to_string();
    track
}

/// it should order tracks ascending by z-index, ties preserving input order
#[test]
fn z_order_stable_sort() {
    let project = mk_project(vec![
        mk_track("a", 5),
        mk_track("b", 1),
        mk_track("c", 3),
        mk_track("d", 1),
    ]);

    let state = build_render_state(
        &project,
        0.0,
        PreviewQuality::Medium,
        CanvasTransform::default(),
    );
    let ids: Vec<_> = state.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "d", "c", "a"]);
}

/// it should yield equal states and digests for identical inputs
#[test]
fn idempotent_for_identical_inputs() {
    let project = mk_project(vec![mk_track("a", 0), mk_track("b", 1)]);

    let s1 = build_render_state(
        &project,
        1234.0,
        PreviewQuality::Full,
        CanvasTransform::default(),
    );
    let s2 = build_render_state(
        &project,
        1234.0,
        PreviewQuality::Full,
        CanvasTransform::default(),
    );
    assert_eq!(s1, s2);
    assert_eq!(render_state_digest(&s1), render_state_digest(&s2));
}

/// it should ignore sub-millisecond playhead jitter in the digest
#[test]
fn digest_rounds_playhead() {
    let project = mk_project(vec![mk_track("a", 0)]);

    let canvas = CanvasTransform::default();
    let s1 = build_render_state(&project, 500.2, PreviewQuality::Medium, canvas);
    let s2 = build_render_state(&project, 500.4, PreviewQuality::Medium, canvas);
    let s3 = build_render_state(&project, 501.0, PreviewQuality::Medium, canvas);

    assert_eq!(render_state_digest(&s1), render_state_digest(&s2));
    assert_ne!(render_state_digest(&s1), render_state_digest(&s3));
}

/// it should change the digest when track visibility or values change
#[test]
fn digest_tracks_content() {
    let mut project = mk_project(vec![mk_track("a", 0)]);
    let canvas = CanvasTransform::default();
    let before = render_state_digest(&build_render_state(
        &project,
        0.0,
        PreviewQuality::Medium,
        canvas,
    ));

    project.tracks[0].visible = false;
    let hidden = render_state_digest(&build_render_state(
        &project,
        0.0,
        PreviewQuality::Medium,
        canvas,
    ));
    assert_ne!(before, hidden);

    project.tracks[0].visible = true;
    project.tracks[0].keyframes[0].touch(Param::Strength, 0.33);
    let edited = render_state_digest(&build_render_state(
        &project,
        0.0,
        PreviewQuality::Medium,
        canvas,
    ));
    assert_ne!(before, edited);
}

/// it should resolve values through keyframes at the requested playhead
#[test]
fn values_follow_playhead() {
    let mut track = mk_track("a", 0);
    track.keyframes[0].interpolation = Interpolation::Linear;
    track.keyframes[0].touch(Param::Opacity, 0.0);
    let mut second = track.keyframes[0].clone();
    second.id = "k1".into();
    second.time_ms = 1000;
    second.touch(Param::Opacity, 1.0);
    track.keyframes.push(second);
    let project = mk_project(vec![track]);

    let state = build_render_state(
        &project,
        500.0,
        PreviewQuality::Medium,
        CanvasTransform::default(),
    );
    assert!((state.tracks[0].values.opacity - 0.5).abs() < 1e-6);
}

/// it should copy path points by value with no aliasing back into the track
#[test]
fn snapshot_does_not_alias_source() {
    let mut track = mk_track("a", 0);
    track.kind = TrackKind::Path;
    track.path_points = vec![PathPoint { x: 0.1, y: 0.2 }];
    let project = mk_project(vec![track]);

    let mut state = build_render_state(
        &project,
        0.0,
        PreviewQuality::Medium,
        CanvasTransform::default(),
    );
    state.tracks[0].path_points.push(PathPoint { x: 0.9, y: 0.9 });
    state.tracks[0].values.opacity = 0.0;

    assert_eq!(project.tracks[0].path_points.len(), 1);
}

/// it should carry quality and canvas transform verbatim
#[test]
fn quality_and_canvas_copied() {
    let project = mk_project(vec![]);
    let canvas = CanvasTransform {
        zoom: 2.5,
        pan_x: -10.0,
        pan_y: 4.0,
    };
    let state = build_render_state(&project, 42.0, PreviewQuality::Low, canvas);
    assert_eq!(state.quality, PreviewQuality::Low);
    assert_eq!(state.canvas, canvas);
    assert_eq!(state.project_id, project.id);
}
