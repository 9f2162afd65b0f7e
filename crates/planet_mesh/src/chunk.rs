//! PlanetChunk - the render payload of an active octree leaf.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

use crate::error::ChunkError;
use crate::types::{Aabb3, SurfaceNetsMesh};

/// Counter backing [`ChunkId`] generation.
static CHUNK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generation identity of a chunk.
///
/// Monotonically increasing and never reused, so a mesh completion for a
/// chunk that was merged away can be recognized and dropped instead of
/// being written into a reused arena slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ChunkId(u64);

impl ChunkId {
  /// Allocate the next unique id.
  pub fn next() -> Self {
    Self(CHUNK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  /// Raw id value.
  pub fn raw(&self) -> u64 {
    self.0
  }
}

/// Lifecycle of a chunk's mesh.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ChunkState {
  /// No mesh; nothing requested yet (or generation failed).
  #[default]
  Empty,
  /// Generation is in flight on a worker.
  Generating,
  /// Generation finished; `mesh` is `None` when the region held no
  /// surface.
  Generated,
}

/// One renderable region owned by an active octree leaf.
#[derive(Debug)]
pub struct PlanetChunk {
  /// Generation identity, unique for the session.
  pub id: ChunkId,
  /// World-space center.
  pub position: Vec3,
  /// Edge length of the cubic region.
  pub size: f32,
  /// Octree level this chunk renders at (0 = finest).
  pub lod_level: i32,
  /// Voxels per axis for density sampling.
  pub resolution: u32,
  /// Mesh lifecycle state.
  pub state: ChunkState,
  /// Generated geometry, if any.
  pub mesh: Option<SurfaceNetsMesh>,
}

impl PlanetChunk {
  /// Create an empty chunk. Degenerate parameters are rejected here so
  /// they can never reach the mesher.
  pub fn new(position: Vec3, size: f32, lod_level: i32, resolution: u32) -> Result<Self, ChunkError> {
    if resolution < 2 || size <= 0.0 {
      return Err(ChunkError::DegenerateChunk { resolution, size });
    }

    Ok(Self {
      id: ChunkId::next(),
      position,
      size,
      lod_level,
      resolution,
      state: ChunkState::Empty,
      mesh: None,
    })
  }

  /// World bounds of the unpadded chunk region.
  pub fn bounds(&self) -> Aabb3 {
    Aabb3::from_center_half_extent(self.position, self.size * 0.5)
  }

  /// Distance between adjacent density samples.
  pub fn voxel_size(&self) -> f32 {
    self.size / self.resolution as f32
  }

  /// Drop any generated geometry and return to `Empty`.
  pub fn clear_mesh(&mut self) {
    self.mesh = None;
    self.state = ChunkState::Empty;
  }

  /// Planar-projected UVs for the current mesh: `(local_xy / size) + 0.5`.
  /// Cosmetic only.
  pub fn planar_uvs(&self) -> Vec<[f32; 2]> {
    let Some(mesh) = &self.mesh else {
      return Vec::new();
    };
    let inv_size = 1.0 / self.size;
    mesh
      .vertices
      .iter()
      .map(|v| {
        [
          (v.x - self.position.x) * inv_size + 0.5,
          (v.y - self.position.y) * inv_size + 0.5,
        ]
      })
      .collect()
  }
}
