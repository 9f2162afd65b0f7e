//! OctreeConfig - world dimensions and the LOD policy.

use glam::Vec3;

/// Configuration for the octree and its refinement policy.
#[derive(Clone, Debug)]
pub struct OctreeConfig {
  /// World-space center of the root node.
  pub origin: Vec3,

  /// Edge length of the root node's cube.
  pub root_size: f32,

  /// Number of subdivision levels below the root. The root key holds this
  /// level; level 0 is the finest.
  pub max_depth: i32,

  /// Distance over which the required detail size doubles.
  pub subdivision_distance: f32,

  /// Hysteresis factor (> 1) separating the merge threshold from the
  /// subdivide threshold so a hovering viewer cannot flicker the tree.
  pub merge_hysteresis: f32,

  /// Voxel resolution of a level-0 chunk.
  pub base_resolution: u32,

  /// Resolution floor when halving per coarser level.
  pub min_resolution: u32,

  /// Padding ring width in voxels. The documented seam guarantee holds
  /// for 1.
  pub padding: u32,
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      origin: Vec3::ZERO,
      root_size: 4000.0,
      max_depth: 6,
      subdivision_distance: 400.0,
      merge_hysteresis: 2.0,
      base_resolution: 32,
      min_resolution: 8,
      padding: 1,
    }
  }
}

impl OctreeConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_origin(mut self, origin: Vec3) -> Self {
    self.origin = origin;
    self
  }

  pub fn with_root_size(mut self, root_size: f32) -> Self {
    self.root_size = root_size;
    self
  }

  pub fn with_max_depth(mut self, max_depth: i32) -> Self {
    self.max_depth = max_depth;
    self
  }

  pub fn with_subdivision_distance(mut self, distance: f32) -> Self {
    self.subdivision_distance = distance;
    self
  }

  pub fn with_merge_hysteresis(mut self, factor: f32) -> Self {
    self.merge_hysteresis = factor;
    self
  }

  pub fn with_resolution(mut self, base: u32, min: u32) -> Self {
    self.base_resolution = base;
    self.min_resolution = min;
    self
  }

  /// Edge length of a finest-level (level 0) node.
  #[inline]
  pub fn min_chunk_size(&self) -> f32 {
    self.root_size / 2f32.powi(self.max_depth)
  }

  /// Edge length of a node at the given level.
  #[inline]
  pub fn node_size(&self, level: i32) -> f32 {
    self.min_chunk_size() * 2f32.powi(level)
  }

  /// Exponential LOD curve before clamping: the node size the viewer
  /// needs at a given distance. Doubles every `subdivision_distance`.
  #[inline]
  pub fn required_size_raw(&self, distance: f32) -> f32 {
    self.min_chunk_size() * (distance / self.subdivision_distance).exp2()
  }

  /// Required node size at a distance, clamped to the representable range
  /// `[min_chunk_size, root_size]`.
  #[inline]
  pub fn required_size(&self, distance: f32) -> f32 {
    self
      .required_size_raw(distance)
      .clamp(self.min_chunk_size(), self.root_size)
  }

  /// A leaf splits when it is larger than the required size and can still
  /// go finer.
  #[inline]
  pub fn should_subdivide(&self, level: i32, size: f32, distance: f32) -> bool {
    level > 0 && size > self.required_size(distance)
  }

  /// A subdivided node releases its subtree only once the required size
  /// clears its own size by the hysteresis factor. The comparison uses
  /// the unclamped curve so nodes at or near the root size can still
  /// merge.
  #[inline]
  pub fn should_merge(&self, size: f32, distance: f32) -> bool {
    size * self.merge_hysteresis < self.required_size_raw(distance)
  }

  /// Chunk voxel resolution for a level: halves per coarser level down to
  /// the floor. Finer levels are therefore never coarser than their
  /// parents.
  #[inline]
  pub fn resolution_for_level(&self, level: i32) -> u32 {
    self
      .base_resolution
      .checked_shr(level as u32)
      .unwrap_or(0)
      .max(self.min_resolution)
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
