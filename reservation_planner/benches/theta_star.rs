use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};

use reservation_planner::point::{point2, vec2};
use reservation_planner::{NoopLogger, OrientedPoint, ReservationMap, ReservationMapBuilder};

fn warehouse(size: f32) -> ReservationMap {
    let mut builder = ReservationMapBuilder::new()
        .with_size(size, size)
        .with_grid_resolution(0.5)
        .with_max_adjacency_distance(0.75)
        .with_logger(Arc::new(NoopLogger));

    // Rows of shelves with an aisle in the middle.
    let mut y = 3.0;
    while y < size - 2.0 {
        builder = builder
            .add_box(point2(size * 0.25, y), vec2(size * 0.3, 0.6), 0.0)
            .add_box(point2(size * 0.75, y), vec2(size * 0.3, 0.6), 0.0);
        y += 3.0;
    }

    builder.build().expect("benchmark map configuration is valid")
}

fn graph_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("map construction");
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    for size in [10.0, 20.0, 40.0] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| warehouse(size));
        });
    }

    group.finish();
}

fn planning(c: &mut Criterion) {
    let size = 30.0;
    let map = warehouse(size);

    // A few robots already crossing the aisle.
    for agent in 1..=5 {
        let x = agent as f32 * 4.0;
        let path = map
            .get_path(OrientedPoint::new(x, 1.0, 0.0), OrientedPoint::new(x, size - 1.0, 0.0), 0.0, 5.0, agent)
            .expect("benchmark route exists");
        map.add_reservations(path.generate_reservations(agent));
    }

    let mut group = c.benchmark_group("Theta*");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    group.bench_function("across the warehouse", |b| {
        b.iter(|| {
            map.get_path(
                OrientedPoint::new(1.0, 1.0, 0.0),
                OrientedPoint::new(size - 1.0, size - 1.0, 0.0),
                0.0,
                0.0,
                42,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, graph_construction, planning);
criterion_main!(benches);
