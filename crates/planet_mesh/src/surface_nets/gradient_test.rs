use glam::Vec3;

use super::*;
use crate::types::DensityGrid;

fn grid_from_fn(resolution: u32, f: impl Fn(Vec3) -> f32) -> DensityGrid {
  let padding = 1;
  let s = (resolution + 2 * padding) as usize;
  let voxel_size = 1.0;
  let origin = Vec3::splat(-(s as f32) * 0.5);

  let mut values = Vec::with_capacity(s * s * s);
  for x in 0..s {
    for y in 0..s {
      for z in 0..s {
        let pos = origin + Vec3::new(x as f32, y as f32, z as f32) * voxel_size;
        values.push(f(pos));
      }
    }
  }

  DensityGrid {
    values,
    resolution,
    padding,
    voxel_size,
    origin,
  }
}

#[test]
fn linear_field_gives_axis_normal() {
  let grid = grid_from_fn(8, |p| p.z);
  let s = grid.sample_size() as i32;

  for x in 0..s {
    for y in 0..s {
      for z in 0..s {
        let n = central_difference(&grid, x, y, z);
        assert!((n - Vec3::Z).length() < 1e-6, "normal {n:?} at ({x}, {y}, {z})");
      }
    }
  }
}

#[test]
fn sphere_field_gives_radial_normals() {
  let grid = grid_from_fn(8, |p| p.length() - 4.0);

  // Check interior lattice points away from the center singularity.
  for x in 1..9 {
    for y in 1..9 {
      for z in 1..9 {
        let pos = grid.world_pos(x, y, z);
        if pos.length() < 2.0 {
          continue;
        }
        let n = central_difference(&grid, x as i32, y as i32, z as i32);
        let radial = pos.normalize();
        assert!(
          n.dot(radial) > 0.9,
          "normal {n:?} not radial at {pos:?} (dot {})",
          n.dot(radial)
        );
      }
    }
  }
}

#[test]
fn normals_are_unit_length() {
  let grid = grid_from_fn(8, |p| p.length() - 4.0);
  let s = grid.sample_size() as i32;

  for x in 0..s {
    for y in 0..s {
      for z in 0..s {
        let n = central_difference(&grid, x, y, z);
        assert!((n.length() - 1.0).abs() < 1e-5);
      }
    }
  }
}

#[test]
fn flat_field_falls_back_without_panicking() {
  let grid = grid_from_fn(4, |_| 1.0);
  let n = central_difference(&grid, 2, 2, 2);
  assert!((n.length() - 1.0).abs() < 1e-6);
}

#[test]
fn border_coordinates_are_clamped() {
  let grid = grid_from_fn(4, |p| p.z);
  // Outside coordinates must not panic; clamping degrades to one-sided.
  let n = central_difference(&grid, -1, 0, 0);
  assert!(n.is_finite());
  let n = central_difference(&grid, 100, 100, 100);
  assert!(n.is_finite());
}
