//! Core data types shared by the density builder and the mesher.

use glam::Vec3;

/// Axis-aligned bounding box in world space.
///
/// Chunks are cubic, but the box keeps full min/max corners so callers can
/// intersect it against arbitrary regions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
  /// Minimum corner (inclusive).
  pub min: Vec3,
  /// Maximum corner (inclusive).
  pub max: Vec3,
}

impl Aabb3 {
  /// Create a new AABB from min and max corners.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y && min.z <= max.z,
      "AABB min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create an AABB from center and half-extent (cubic).
  pub fn from_center_half_extent(center: Vec3, half_extent: f32) -> Self {
    Self {
      min: center - Vec3::splat(half_extent),
      max: center + Vec3::splat(half_extent),
    }
  }

  /// Size of the box (max - min).
  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// Center of the box.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  /// Check if this AABB contains a point (boundary inclusive).
  #[inline]
  pub fn contains_point(&self, point: Vec3) -> bool {
    point.x >= self.min.x
      && point.x <= self.max.x
      && point.y >= self.min.y
      && point.y <= self.max.y
      && point.z >= self.min.z
      && point.z <= self.max.z
  }
}

/// Padded density field sampled over a chunk.
///
/// Samples form an `S×S×S` lattice with `S = resolution + 2 * padding`.
/// The padding ring is sampled so that adjacent chunks evaluate the same
/// world positions along their shared boundary; it never anchors output
/// geometry. The grid is produced once, consumed by the mesher, then
/// dropped.
#[derive(Clone, Debug)]
pub struct DensityGrid {
  /// Flat sample array, indexed x-major / z-innermost.
  pub values: Vec<f32>,
  /// Unit cubes per axis in the unpadded chunk interior.
  pub resolution: u32,
  /// Padding ring width in voxels on every side.
  pub padding: u32,
  /// World-space distance between adjacent samples.
  pub voxel_size: f32,
  /// World position of sample (0, 0, 0), i.e. the padded minimum corner.
  pub origin: Vec3,
}

impl DensityGrid {
  /// Samples per axis including padding.
  #[inline]
  pub fn sample_size(&self) -> usize {
    (self.resolution + 2 * self.padding) as usize
  }

  /// Flatten lattice coordinates into the sample array.
  #[inline]
  pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
    let s = self.sample_size();
    (x * s + y) * s + z
  }

  /// Sample at padded lattice coordinates.
  #[inline]
  pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
    self.values[self.index(x, y, z)]
  }

  /// Sample with coordinates clamped to the grid.
  ///
  /// Used by gradient stencils at the grid border.
  #[inline]
  pub fn get_clamped(&self, x: i32, y: i32, z: i32) -> f32 {
    let max = self.sample_size() as i32 - 1;
    self.get(
      x.clamp(0, max) as usize,
      y.clamp(0, max) as usize,
      z.clamp(0, max) as usize,
    )
  }

  /// World position of a padded lattice point.
  #[inline]
  pub fn world_pos(&self, x: usize, y: usize, z: usize) -> Vec3 {
    self.origin + Vec3::new(x as f32, y as f32, z as f32) * self.voxel_size
  }
}

/// Triangle mesh produced by the Surface Nets mesher.
///
/// `vertices` and `normals` are parallel arrays; `triangles` index into
/// both with consistent winding. Produced fresh per invocation, never
/// mutated incrementally.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceNetsMesh {
  /// Vertex positions in world space.
  pub vertices: Vec<Vec3>,
  /// Triangle vertex indices, three per face.
  pub triangles: Vec<[u32; 3]>,
  /// Per-vertex unit normals, parallel to `vertices`.
  pub normals: Vec<Vec3>,
}

impl SurfaceNetsMesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.triangles.len()
  }
}
