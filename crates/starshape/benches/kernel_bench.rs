//! Criterion benchmarks for the kernel query pipeline.
//! Focus sizes: face counts from a few dozen to a few thousand.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use starshape::geom3::{halfspaces_from_triangles, GeomCfg};
use starshape::kernel::{kernel_point, KernelCfg};
use starshape::rand3::{draw_star_mesh, ReplayToken, StarCfg};

fn star_mesh(stacks: usize, slices: usize) -> starshape::mesh::Mesh {
    let cfg = StarCfg {
        stacks,
        slices,
        ..StarCfg::default()
    };
    draw_star_mesh(cfg, ReplayToken { seed: 43, index: 0 })
}

fn bench_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel");
    for &(stacks, slices) in &[(4usize, 8usize), (8, 16), (16, 32), (32, 64)] {
        let faces = 2 * slices * (stacks - 1);

        group.bench_with_input(BenchmarkId::new("extract", faces), &faces, |b, _| {
            let geom = GeomCfg::default();
            b.iter_batched(
                || star_mesh(stacks, slices),
                |mesh| {
                    let _hs = halfspaces_from_triangles(mesh.triangles(), geom).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("kernel_point", faces), &faces, |b, _| {
            let cfg = KernelCfg::default();
            b.iter_batched(
                || star_mesh(stacks, slices),
                |mesh| {
                    let _res = kernel_point(&mesh, &cfg).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kernel);
criterion_main!(benches);
