//! Benchmarks for smoothing filter performance

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use motion_assessment::filters::{angle::AngleFilter, one_euro::OneEuroFilter, NoFilter, SignalFilter};
use motion_assessment::filters::skeleton::SkeletonFilter;
use motion_assessment::landmark::{Landmark, PoseFrame};

fn benchmark_scalar_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_filters");

    // Simulated noisy landmark coordinate track at 30 fps
    let test_data: Vec<(f64, f64)> = (0..100)
        .map(|i| {
            let t = f64::from(i) / 30.0;
            let value = 0.05f64.mul_add((t * 40.0).sin(), 0.5 + 0.2 * t.sin());
            (t, value)
        })
        .collect();

    let filter_configs: Vec<(&str, Box<dyn SignalFilter>)> = vec![
        ("no_filter", Box::new(NoFilter)),
        ("one_euro_default", Box::new(OneEuroFilter::default())),
        ("one_euro_stiff", Box::new(OneEuroFilter::new(0.3, 0.05, 1.0))),
        ("angle", Box::new(AngleFilter::default())),
    ];

    for (name, mut filter) in filter_configs {
        group.bench_with_input(BenchmarkId::new("sequence_100", name), &test_data, |b, data| {
            b.iter(|| {
                filter.reset();
                for &(t, value) in data {
                    black_box(filter.filter(black_box(t), black_box(value)));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_skeleton_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("skeleton_filter");

    // A 33-landmark frame like a full-body pose model produces
    let frames: Vec<PoseFrame> = (0..30)
        .map(|i| {
            let t = f64::from(i) / 30.0;
            let landmarks = (0..33)
                .map(|idx| {
                    let phase = f64::from(idx) * 0.1;
                    Landmark::new(
                        0.5 + 0.1 * (t + phase).sin(),
                        0.5 + 0.1 * (t + phase).cos(),
                        0.02 * (t * 3.0 + phase).sin(),
                        0.9,
                        idx as usize,
                        format!("lm_{idx}"),
                    )
                })
                .collect();
            PoseFrame::new(t, landmarks)
        })
        .collect();

    let mut filter = SkeletonFilter::default();
    group.bench_function("frame_sequence_30", |b| {
        b.iter(|| {
            filter.reset();
            for frame in &frames {
                black_box(filter.filter_frame(black_box(frame)));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_scalar_filters, benchmark_skeleton_filter);
criterion_main!(benches);
