//! Normal estimation from the density gradient.

use glam::Vec3;

use crate::types::DensityGrid;

/// Central-difference density gradient at a lattice coordinate, normalized.
///
/// Density is negative inside and positive outside, so the gradient - and
/// with it the returned normal - points from inside toward outside.
/// Coordinates are clamped at the grid border, degrading to a one-sided
/// difference in the outermost padding ring.
#[inline]
pub fn central_difference(grid: &DensityGrid, x: i32, y: i32, z: i32) -> Vec3 {
  let gx = grid.get_clamped(x + 1, y, z) - grid.get_clamped(x - 1, y, z);
  let gy = grid.get_clamped(x, y + 1, z) - grid.get_clamped(x, y - 1, z);
  let gz = grid.get_clamped(x, y, z + 1) - grid.get_clamped(x, y, z - 1);

  let gradient = Vec3::new(gx, gy, gz);
  let len_sq = gradient.length_squared();

  if len_sq < 1e-12 {
    return Vec3::Z; // Flat field, pick a stable fallback
  }

  gradient * len_sq.sqrt().recip()
}

#[cfg(test)]
#[path = "gradient_test.rs"]
mod gradient_test;
