use intersection_sim_core::fuzzy::extension;
use intersection_sim_core::lane::Lane;
use intersection_sim_core::phase::Phase;
use intersection_sim_core::LaneId;

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

pub fn benchmark_fuzzy_extension(c: &mut Criterion) {
    c.bench_function("fuzzy_extension_grid", |b| {
        b.iter(|| {
            for queue in 0..=15 {
                for arrival in 0..=15 {
                    black_box(extension(black_box(queue as f64), black_box(arrival as f64)));
                }
            }
        })
    });
}

pub fn benchmark_lane_tick(c: &mut Criterion) {
    c.bench_function("lane_tick_green_saturated", |b| {
        b.iter(|| {
            let mut lane = Lane::new(LaneId(1), "bench", 15, 7);
            for _ in 0..15 {
                lane.append();
            }
            for _ in 0..30 {
                black_box(lane.tick(black_box(Phase::Green)).unwrap());
            }
        })
    });
}

criterion_group!(benches, benchmark_fuzzy_extension, benchmark_lane_tick);
criterion_main!(benches);
