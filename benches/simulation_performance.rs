use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng};
use smart_assist::simulation::MetricLimits;
use smart_assist::{AppConfig, DashboardApp, MappingModel, SystemMetrics};
use std::time::{Duration, Instant};

const SEED: u64 = 42;

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("status");
    let limits = MetricLimits::default();

    group.bench_function("tick_metrics", |b| {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut metrics = SystemMetrics::default();
        b.iter(|| {
            metrics.tick(&mut rng, black_box(&limits));
        });
    });

    group.finish();
}

fn bench_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping");
    let now = Instant::now();

    group.bench_function("generate_default_map", |b| {
        let mut rng = StdRng::seed_from_u64(SEED);
        b.iter(|| {
            black_box(MappingModel::generate(
                &mut rng,
                500,
                20,
                Duration::from_secs(3),
                now,
            ))
        });
    });

    group.bench_function("generate_10000_points", |b| {
        let mut rng = StdRng::seed_from_u64(SEED);
        b.iter(|| {
            black_box(MappingModel::generate(
                &mut rng,
                10_000,
                200,
                Duration::from_secs(3),
                now,
            ))
        });
    });

    group.bench_function("tick_position", |b| {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut mapping =
            MappingModel::generate(&mut rng, 500, 20, Duration::from_secs(3), now);
        b.iter(|| mapping.tick(&mut rng));
    });

    group.finish();
}

fn bench_dashboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard");
    let config = AppConfig {
        seed: Some(SEED),
        ..AppConfig::default()
    };

    // every timer due on each poll
    group.bench_function("poll_all_due", |b| {
        b.iter_batched(
            || {
                let start = Instant::now();
                let mut app = DashboardApp::with_config(config.clone(), start);
                app.start_listening(start);
                (app, start + Duration::from_secs(3))
            },
            |(mut app, now)| black_box(app.poll_simulations(now)),
            BatchSize::SmallInput,
        );
    });

    // the common frame: nothing is due
    group.bench_function("poll_idle_frame", |b| {
        let start = Instant::now();
        let mut app = DashboardApp::with_config(config.clone(), start);
        b.iter(|| black_box(app.poll_simulations(start)));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = bench_metrics, bench_mapping, bench_dashboard
}
criterion_main!(benches);
