//! Benchmarks for helmet geometry and SVG output

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use helmet_overlay::{
    config::StyleConfig,
    geometry::{build, HelmetGeometryBuilder},
    pose_estimation::Pose,
    sink::render_svg,
};

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");
    let builder = HelmetGeometryBuilder::new(StyleConfig::default());
    let pose = Pose::new(640.0, 360.0, 180.0, 0.1);

    for progress in [0.0, 0.5, 1.0] {
        group.bench_with_input(BenchmarkId::new("build", progress), &progress, |b, &progress| {
            b.iter(|| black_box(builder.build(black_box(&pose), progress)));
        });
    }

    let set = build(&pose, 0.5, &StyleConfig::default());
    group.bench_function("render_svg", |b| {
        b.iter(|| black_box(render_svg(1280, 720, Some(black_box(&set)))));
    });

    group.finish();
}

criterion_group!(benches, benchmark_build);
criterion_main!(benches);
