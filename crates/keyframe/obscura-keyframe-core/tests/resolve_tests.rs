use obscura_keyframe_core::{
    data::{BlendMode, Interpolation, Keyframe, Track, TrackKind},
    params::Param,
    resolve::{resolve_parameter, values_at_time},
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn mk_keyframe(time_ms: u32, interpolation: Interpolation, entries: &[(Param, f32)]) -> Keyframe {
    let mut kf = Keyframe::new(time_ms, 0);
    kf.interpolation = interpolation;
    for (param, value) in entries {
        kf.touch(*param, *value);
    }
    kf
}

fn mk_track(keyframes: Vec<Keyframe>) -> Track {
    Track {
        id: "t0".into(),
        name: "region".into(),
        kind: TrackKind::Rectangle,
        visible: true,
        locked: false,
        blend_mode: BlendMode::Normal,
        z_index: 0,
        path_points: Vec::new(),
        keyframes,
    }
}

/// it should fall back to the parameter default when no keyframe authors it
#[test]
fn default_fallback_for_unmasked_parameter() {
    // Value present but mask empty: the keyframe does not author strength.
    let mut kf = Keyframe::new(0, 0);
    kf.values.insert(Param::Strength, 0.1);
    let track = mk_track(vec![kf]);

    for t in [-500.0, 0.0, 250.0, 10_000.0] {
        approx(
            resolve_parameter(&track, Param::Strength, t),
            Param::Strength.default_value(),
            1e-6,
        );
    }
}

/// it should hold the first value backward and the last value forward
#[test]
fn hold_before_and_after_authored_range() {
    let track = mk_track(vec![
        mk_keyframe(100, Interpolation::Linear, &[(Param::Strength, 0.2)]),
        mk_keyframe(500, Interpolation::Linear, &[(Param::Strength, 0.8)]),
    ]);

    approx(resolve_parameter(&track, Param::Strength, 0.0), 0.2, 1e-6);
    approx(resolve_parameter(&track, Param::Strength, 1000.0), 0.8, 1e-6);
}

/// it should interpolate linearly between bracketing keyframes
#[test]
fn linear_midpoint() {
    let track = mk_track(vec![
        mk_keyframe(0, Interpolation::Linear, &[(Param::Opacity, 0.0)]),
        mk_keyframe(1000, Interpolation::Linear, &[(Param::Opacity, 1.0)]),
    ]);

    approx(resolve_parameter(&track, Param::Opacity, 500.0), 0.5, 1e-6);
    approx(resolve_parameter(&track, Param::Opacity, 250.0), 0.25, 1e-6);
}

/// it should apply cubic ease-in-out from the outgoing keyframe
#[test]
fn ease_in_out_segment() {
    let track = mk_track(vec![
        mk_keyframe(0, Interpolation::EaseInOut, &[(Param::X, 0.0)]),
        mk_keyframe(1000, Interpolation::Linear, &[(Param::X, 1.0)]),
    ]);

    // 4t^3 at t=0.25 -> 0.0625; symmetric midpoint stays 0.5.
    approx(resolve_parameter(&track, Param::X, 250.0), 0.0625, 1e-6);
    approx(resolve_parameter(&track, Param::X, 500.0), 0.5, 1e-6);
}

/// it should follow the damped-oscillation curve for spring segments
#[test]
fn spring_segment() {
    let track = mk_track(vec![
        mk_keyframe(0, Interpolation::Spring, &[(Param::Width, 0.0)]),
        mk_keyframe(1000, Interpolation::Linear, &[(Param::Width, 1.0)]),
    ]);

    // 1 - e^(-3.5)*cos(6) at the midpoint.
    approx(resolve_parameter(&track, Param::Width, 500.0), 0.971, 1e-3);
    approx(resolve_parameter(&track, Param::Width, 0.0), 0.0, 1e-6);
    approx(resolve_parameter(&track, Param::Width, 1000.0), 1.0, 1e-6);
}

/// it should snap on hold segments: previous value until the next keyframe's time
#[test]
fn hold_interpolation_snaps() {
    let track = mk_track(vec![
        mk_keyframe(0, Interpolation::Hold, &[(Param::Feather, 0.0)]),
        mk_keyframe(1000, Interpolation::Linear, &[(Param::Feather, 1.0)]),
    ]);

    approx(resolve_parameter(&track, Param::Feather, 999.0), 0.0, 1e-6);
    approx(resolve_parameter(&track, Param::Feather, 1000.0), 1.0, 1e-6);
}

/// it should stay finite and deterministic for coincident-time keyframes
#[test]
fn coincident_keyframes_deterministic() {
    let track = mk_track(vec![
        mk_keyframe(300, Interpolation::Linear, &[(Param::Strength, 0.2)]),
        mk_keyframe(300, Interpolation::Linear, &[(Param::Strength, 0.9)]),
    ]);

    // At the shared time the later-inserted keyframe wins as `previous`.
    let at = resolve_parameter(&track, Param::Strength, 300.0);
    assert!(at.is_finite());
    approx(at, 0.9, 1e-6);
    // Before it, the earlier-inserted one is the first `next`.
    approx(resolve_parameter(&track, Param::Strength, 299.0), 0.2, 1e-6);
    // After it the later-inserted one still holds forward.
    approx(resolve_parameter(&track, Param::Strength, 301.0), 0.9, 1e-6);
}

/// it should resolve parameters independently of each other
#[test]
fn per_parameter_independence() {
    let track = mk_track(vec![
        mk_keyframe(0, Interpolation::Linear, &[(Param::Strength, 0.5)]),
        mk_keyframe(1000, Interpolation::Linear, &[(Param::X, 0.9)]),
    ]);

    // Strength only sees the first keyframe: hold forward.
    approx(resolve_parameter(&track, Param::Strength, 800.0), 0.5, 1e-6);
    // X only sees the second: hold backward.
    approx(resolve_parameter(&track, Param::X, 800.0), 0.9, 1e-6);
}

/// it should behave sanely for negative queries and empty tracks
#[test]
fn negative_query_and_empty_track() {
    let track = mk_track(vec![mk_keyframe(
        100,
        Interpolation::Linear,
        &[(Param::Opacity, 0.3)],
    )]);
    approx(resolve_parameter(&track, Param::Opacity, -50.0), 0.3, 1e-6);

    let empty = mk_track(Vec::new());
    approx(
        resolve_parameter(&empty, Param::Opacity, 0.0),
        Param::Opacity.default_value(),
        1e-6,
    );
}

/// it should not require the keyframe list to be pre-sorted
#[test]
fn resolver_tolerates_unsorted_input() {
    let track = mk_track(vec![
        mk_keyframe(1000, Interpolation::Linear, &[(Param::Y, 1.0)]),
        mk_keyframe(0, Interpolation::Linear, &[(Param::Y, 0.0)]),
    ]);

    approx(resolve_parameter(&track, Param::Y, 500.0), 0.5, 1e-6);
}

/// it should produce a fully-populated value set with defaults filling gaps
#[test]
fn values_at_time_fully_populated() {
    let track = mk_track(vec![mk_keyframe(
        0,
        Interpolation::Linear,
        &[(Param::X, 0.1)],
    )]);

    let values = values_at_time(&track, 500.0);
    approx(values.x, 0.1, 1e-6);
    for param in Param::ALL {
        if param != Param::X {
            approx(values.get(param), param.default_value(), 1e-6);
        }
    }
}
