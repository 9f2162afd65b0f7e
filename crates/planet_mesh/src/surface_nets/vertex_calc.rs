//! Vertex position estimation for Surface Nets.
//!
//! One vertex per surface-crossing cube, placed at the centroid of the
//! cube's edge/surface intersections.

pub use glam::Vec3A;

/// Lattice offsets of the 8 cube corners relative to the anchor corner.
/// Corner index bits: x = bit 0, y = bit 1, z = bit 2.
pub const CORNER_OFFSETS: [[usize; 3]; 8] = [
  [0, 0, 0], // 0b000
  [1, 0, 0], // 0b001
  [0, 1, 0], // 0b010
  [1, 1, 0], // 0b011
  [0, 0, 1], // 0b100
  [1, 0, 1], // 0b101
  [0, 1, 1], // 0b110
  [1, 1, 1], // 0b111
];

/// Corner positions within the unit cube, parallel to [`CORNER_OFFSETS`].
pub const CORNER_POSITIONS: [Vec3A; 8] = [
  Vec3A::new(0.0, 0.0, 0.0),
  Vec3A::new(1.0, 0.0, 0.0),
  Vec3A::new(0.0, 1.0, 0.0),
  Vec3A::new(1.0, 1.0, 0.0),
  Vec3A::new(0.0, 0.0, 1.0),
  Vec3A::new(1.0, 0.0, 1.0),
  Vec3A::new(0.0, 1.0, 1.0),
  Vec3A::new(1.0, 1.0, 1.0),
];

/// The 12 cube edges as pairs of corner indices.
pub const CUBE_EDGES: [[usize; 2]; 12] = [
  [0, 1], // X at y=0, z=0
  [2, 3], // X at y=1, z=0
  [4, 5], // X at y=0, z=1
  [6, 7], // X at y=1, z=1
  [0, 2], // Y at x=0, z=0
  [1, 3], // Y at x=1, z=0
  [4, 6], // Y at x=0, z=1
  [5, 7], // Y at x=1, z=1
  [0, 4], // Z at x=0, y=0
  [1, 5], // Z at x=1, y=0
  [2, 6], // Z at x=0, y=1
  [3, 7], // Z at x=1, y=1
];

/// True if the cube's corner samples straddle the surface.
///
/// Inside is `d <= 0`, outside is `d > 0`; a cube holds the surface iff
/// both appear among its corners.
#[inline]
pub fn has_crossing(samples: &[f32; 8]) -> bool {
  let mut any_outside = false;
  let mut any_inside = false;
  for &d in samples {
    any_outside |= d > 0.0;
    any_inside |= d <= 0.0;
  }
  any_outside && any_inside
}

/// Centroid of all edge/surface intersections in cube-local `[0,1]³`.
///
/// Each crossing edge contributes its linear zero crossing
/// `t = d0 / (d0 - d1)`, clamped against float drift near equal samples.
#[inline]
pub fn centroid_of_crossings(samples: &[f32; 8]) -> Vec3A {
  let mut sum = Vec3A::ZERO;
  let mut count = 0u32;

  for &[c0, c1] in &CUBE_EDGES {
    let d0 = samples[c0];
    let d1 = samples[c1];

    if (d0 > 0.0) == (d1 > 0.0) {
      continue;
    }

    let t = (d0 / (d0 - d1)).clamp(0.0, 1.0);
    let p0 = CORNER_POSITIONS[c0];
    let p1 = CORNER_POSITIONS[c1];
    sum += p0 + t * (p1 - p0);
    count += 1;
  }

  if count == 0 {
    return Vec3A::splat(0.5); // Fallback to center
  }

  sum / count as f32
}

#[cfg(test)]
#[path = "vertex_calc_test.rs"]
mod vertex_calc_test;
