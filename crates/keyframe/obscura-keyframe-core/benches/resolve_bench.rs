use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use obscura_keyframe_core::data::{BlendMode, Interpolation, Keyframe, Track, TrackKind};
use obscura_keyframe_core::params::Param;
use obscura_keyframe_core::resolve::{resolve_parameter, values_at_time};

fn mk_dense_track(count: u32) -> Track {
    let mut keyframes = Vec::with_capacity(count as usize);
    for i in 0..count {
        let mut kf = Keyframe::new(i * 40, 0);
        kf.interpolation = Interpolation::EaseInOut;
        kf.touch(Param::X, (i % 100) as f32 / 100.0);
        kf.touch(Param::Strength, 0.8);
        keyframes.push(kf);
    }
    Track {
        id: "bench".into(),
        name: "bench".into(),
        kind: TrackKind::Rectangle,
        visible: true,
        locked: false,
        blend_mode: BlendMode::Normal,
        z_index: 0,
        path_points: Vec::new(),
        keyframes,
    }
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_parameter");
    let track = mk_dense_track(10_000);

    // Early, middle and late playheads over a 400s timeline.
    for &playhead in &[4_000.0, 200_000.0, 399_000.0] {
        group.bench_with_input(
            BenchmarkId::new("playhead", playhead as u64),
            &playhead,
            |b, &p| b.iter(|| resolve_parameter(&track, Param::X, p)),
        );
    }
    group.finish();

    c.bench_function("values_at_time", |b| {
        b.iter(|| values_at_time(&track, 200_000.0))
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
