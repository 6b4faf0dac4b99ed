use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use interpot::{
    analytic::Hernquist, InterpConfig, InterpSphericalPotential, RadialGrid, SphericalPotential,
};

/// Single-radius benchmarks against the closed-form model
fn bench_interp_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("single");

    let hernquist = Hernquist::new(1.0, 1.0);
    let model = InterpSphericalPotential::from_field(&hernquist, InterpConfig::default()).unwrap();
    let r = 1.7;

    group.bench_function("Hernquist_potential", |b| {
        b.iter(|| hernquist.spherical_potential(black_box(r)))
    });
    group.bench_function("interp_potential", |b| {
        b.iter(|| model.potential(black_box(r), 0.0))
    });
    group.bench_function("interp_force", |b| {
        b.iter(|| model.radial_force(black_box(r), 0.0))
    });
    group.bench_function("interp_r2deriv", |b| {
        b.iter(|| model.second_radial_derivative(black_box(r), 0.0))
    });
    group.bench_function("interp_tail", |b| {
        b.iter(|| model.potential(black_box(40.0), 0.0))
    });

    group.finish();
}

/// Radii spanning the grid and the point-mass tail
fn generate_radii(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.01 * (8.0_f64.ln() * 2.0 * (i as f64) / (n as f64)).exp())
        .collect()
}

/// Batch evaluation over many radii
fn bench_interp_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");

    let model =
        InterpSphericalPotential::from_field(&Hernquist::new(1.0, 1.0), InterpConfig::default())
            .unwrap();
    let n_radii = 10000;
    let radii = generate_radii(n_radii);

    group.bench_with_input(
        BenchmarkId::new("potential", n_radii),
        &radii,
        |b, radii| b.iter(|| model.potential(radii, 0.0)),
    );
    group.bench_with_input(
        BenchmarkId::new("radial_force", n_radii),
        &radii,
        |b, radii| b.iter(|| model.radial_force(radii, 0.0)),
    );

    group.finish();
}

/// Construction cost versus grid size
fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    let hernquist = Hernquist::new(1.0, 1.0);

    for n in [51, 101, 401] {
        let grid = RadialGrid::geometric(0.01, 20.0, n).unwrap();
        group.bench_with_input(BenchmarkId::new("Hernquist", n), &grid, |b, grid| {
            b.iter(|| {
                InterpSphericalPotential::from_field(
                    &hernquist,
                    InterpConfig::default().with_grid(grid.clone()),
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_interp_single,
    bench_interp_batch,
    bench_construction
);
criterion_main!(benches);
