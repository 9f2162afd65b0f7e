//! Benchmark Surface Nets generation on a sphere chunk.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use planet_mesh::{build_padded_grid, surface_nets, Aabb3, DensityGrid, SphereDensity};

/// Sphere chunk grid at the given resolution.
fn sphere_grid(resolution: u32) -> DensityGrid {
  let density = SphereDensity::new(10.0);
  let bounds = Aabb3::from_center_half_extent(Vec3::ZERO, 12.0);
  build_padded_grid(&density, bounds, resolution, 1)
    .expect("finite density")
    .expect("surface crossing")
}

fn bench_surface_nets(c: &mut Criterion) {
  let mut group = c.benchmark_group("surface_nets");

  for resolution in [16u32, 32, 64] {
    let grid = sphere_grid(resolution);
    group.bench_with_input(BenchmarkId::new("sphere", resolution), &grid, |b, grid| {
      b.iter(|| surface_nets::generate(black_box(grid)));
    });
  }

  group.finish();
}

fn bench_density_sampling(c: &mut Criterion) {
  let density = SphereDensity::new(10.0);
  let bounds = Aabb3::from_center_half_extent(Vec3::ZERO, 12.0);

  c.bench_function("build_padded_grid (32³ sphere)", |b| {
    b.iter(|| build_padded_grid(black_box(&density), bounds, 32, 1));
  });
}

criterion_group!(benches, bench_surface_nets, bench_density_sampling);
criterion_main!(benches);
