//! Benchmarks for fixbox2d
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fixbox2d::{collide, Body, Fix64, Scene, SolverConfig, Vec2};

// ============================================================================
// World step benchmarks
// ============================================================================

fn bench_scene_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_step");
    let dt = Fix64::from_ratio(1, 60);

    for scene in Scene::ALL {
        group.bench_function(format!("{:?}_60_steps", scene), |b| {
            b.iter(|| {
                let mut world = scene.build();
                for _ in 0..60 {
                    world.step(black_box(dt));
                }
                world.contact_count()
            });
        });
    }

    group.finish();
}

fn bench_solver_switches(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver_switches");
    let dt = Fix64::from_ratio(1, 60);

    let variants = [
        ("default", SolverConfig::default()),
        (
            "no_warm_start",
            SolverConfig {
                warm_starting: false,
                ..Default::default()
            },
        ),
        (
            "no_accumulation",
            SolverConfig {
                accumulate_impulses: false,
                warm_starting: false,
                position_correction: true,
            },
        ),
    ];

    for (name, solver) in variants {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut world = Scene::VerticalStack.build();
                world.solver = solver;
                for _ in 0..60 {
                    world.step(black_box(dt));
                }
                world.bodies()[10].position
            });
        });
    }

    group.finish();
}

// ============================================================================
// Narrow phase benchmarks
// ============================================================================

fn bench_collide(c: &mut Criterion) {
    let mut group = c.benchmark_group("collide");

    let a = Body::new(Vec2::from_int(2, 2), Fix64::ONE);
    let face = Body::new(Vec2::from_int(2, 2), Fix64::ONE).with_position(Vec2::from_int(1, 0));
    let corner = Body::new(Vec2::from_int(2, 2), Fix64::ONE)
        .with_position(Vec2::from_f64(1.2, 1.1))
        .with_rotation(Fix64::from_f64(0.7));
    let apart = Body::new(Vec2::from_int(2, 2), Fix64::ONE).with_position(Vec2::from_int(3, 0));

    group.bench_function("face_face", |b| {
        b.iter(|| collide(black_box(&a), black_box(&face)))
    });
    group.bench_function("rotated_corner", |b| {
        b.iter(|| collide(black_box(&a), black_box(&corner)))
    });
    group.bench_function("disjoint", |b| {
        b.iter(|| collide(black_box(&a), black_box(&apart)))
    });

    group.finish();
}

// ============================================================================
// Math operation benchmarks
// ============================================================================

fn bench_math_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("math_ops");

    let x = Fix64::from_f64(1.234_567);
    let y = Fix64::from_f64(0.765_432);

    group.bench_function("fix64_mul", |b| b.iter(|| black_box(x) * black_box(y)));
    group.bench_function("fix64_div", |b| b.iter(|| black_box(x) / black_box(y)));
    group.bench_function("fix64_sqrt", |b| b.iter(|| black_box(x).sqrt()));
    group.bench_function("fix64_sin_cos", |b| b.iter(|| black_box(x).sin_cos()));

    group.finish();
}

criterion_group!(
    benches,
    bench_scene_step,
    bench_solver_switches,
    bench_collide,
    bench_math_ops
);
criterion_main!(benches);
