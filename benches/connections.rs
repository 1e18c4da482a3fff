//! Benchmarks for CPU-side frame assembly.
//!
//! Run with: `cargo bench`

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use driftfield::{FieldConfig, FrameMesh, ParticleField, PointerFrame, Vec2, VisualConfig};

/// A seeded field sized so the area formula lands on `count` particles.
fn field_with(count: usize) -> ParticleField {
    let config = FieldConfig {
        max_particles: count,
        area_divisor: 1.0,
        seed: Some(99),
        ..FieldConfig::default()
    };
    ParticleField::new(config, 1920.0, 1080.0)
}

fn bench_mesh_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_build");
    let visuals = VisualConfig::default();

    for count in [50, 150, 300] {
        let field = field_with(count);
        let mut mesh = FrameMesh::new();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                mesh.build(black_box(&field), &visuals);
                black_box(mesh.lines.len())
            })
        });
    }
    group.finish();
}

fn bench_field_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_step");

    let pointer = PointerFrame {
        position: Some(Vec2::new(960.0, 540.0)),
        velocity: Vec2::new(4.0, 1.0),
        clicks: Vec::new(),
    };

    group.bench_function("150_particles_with_pointer", |b| {
        let mut field = field_with(150);
        let mut frame = 0u64;
        b.iter(|| {
            frame += 1;
            field.step(black_box(&pointer), Duration::from_millis(frame * 16));
        })
    });

    group.bench_function("150_particles_idle", |b| {
        let mut field = field_with(150);
        b.iter(|| field.step(black_box(&PointerFrame::default()), Duration::ZERO))
    });

    group.finish();
}

criterion_group!(benches, bench_mesh_build, bench_field_step);
criterion_main!(benches);
