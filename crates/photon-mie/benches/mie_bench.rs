// ─────────────────────────────────────────────────────────────────────
// SCPN Photon Core — Mie Engine Benchmarks
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use criterion::{criterion_group, criterion_main, Criterion};
use num_complex::Complex64;
use photon_mie::{cosine_grid, mie, mie_polydisperse, whittle_matern};
use std::hint::black_box;

/// Single-sphere evaluations across the size regimes: the small-x
/// closed form, a bead-sized series, and a large droplet.
fn bench_mie_single(c: &mut Criterion) {
    let mu = cosine_grid();
    let mut group = c.benchmark_group("mie_single");

    group.bench_function("small_particle_x0_05", |b| {
        b.iter(|| {
            let sol = mie(black_box(0.05), Complex64::new(1.5, 0.0), &mu).unwrap();
            black_box(sol.qsca);
        })
    });

    group.bench_function("series_x6_6", |b| {
        b.iter(|| {
            let sol = mie(black_box(6.6), Complex64::new(1.1955, 0.0), &mu).unwrap();
            black_box(sol.g);
        })
    });

    group.bench_function("series_x100_absorbing", |b| {
        b.iter(|| {
            let sol = mie(black_box(100.0), Complex64::new(1.33, -0.2), &mu).unwrap();
            black_box(sol.qsca);
        })
    });

    group.finish();
}

/// The full Gaussian size-distribution average (1001 Mie calls).
fn bench_polydisperse(c: &mut Criterion) {
    let mu = cosine_grid();
    c.bench_function("polydisperse_polystyrene", |b| {
        b.iter(|| {
            let sol = mie_polydisperse(
                black_box(0.5),
                0.05,
                1.33,
                0.633,
                Complex64::new(1.59 / 1.33, 0.0),
                &mu,
            )
            .unwrap();
            black_box(sol.g);
        })
    });
}

fn bench_whittle_matern(c: &mut Criterion) {
    let mu = cosine_grid();
    c.bench_function("whittle_matern_tissue", |b| {
        b.iter(|| {
            let (table, g) = whittle_matern(black_box(1.0), 2.5, 0.633, &mu).unwrap();
            black_box((table.s11[0], g));
        })
    });
}

criterion_group!(
    mie_benches,
    bench_mie_single,
    bench_polydisperse,
    bench_whittle_matern
);
criterion_main!(mie_benches);
