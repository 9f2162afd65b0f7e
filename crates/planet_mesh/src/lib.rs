//! planet_mesh - engine-independent adaptive planet surface meshing.
//!
//! Generates a renderable surface for a continuous scalar density field
//! (negative = inside, positive = outside) and keeps mesh resolution
//! adapted to viewer distance.
//!
//! # Subsystems
//!
//! - **Surface Nets mesher**: padded 3-D density grid → watertight
//!   triangle mesh with per-vertex normals. One-voxel boundary padding
//!   makes independently meshed chunks stitch seamlessly.
//! - **Octree LOD manager**: sparse arena-backed hierarchy of chunks;
//!   subdivides toward a close viewer, merges behind a receding one.
//! - **Density field builder**: samples any [`DensityFunction`] over a
//!   chunk's padded lattice, skipping chunks with no surface crossing.
//! - **Mesh queue / world**: rayon workers generate chunk meshes off the
//!   coordinator thread; results return over a channel and stale results
//!   are dropped by chunk identity.
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec3;
//! use planet_mesh::{NoisySphereDensity, OctreeConfig, PlanetWorld};
//!
//! let config = OctreeConfig::new().with_root_size(4000.0).with_max_depth(6);
//! let mut world = PlanetWorld::new(config, NoisySphereDensity::new(1000.0));
//!
//! // Per frame:
//! world.update(viewer_position);
//! for chunk in world.visible_chunks() {
//!     // hand chunk.mesh to the renderer
//! }
//! ```

pub mod chunk;
pub mod density;
pub mod error;
pub mod mesh_queue;
pub mod octree;
pub mod surface_nets;
pub mod types;
pub mod world;

// Re-export commonly used items
pub use chunk::{ChunkId, ChunkState, PlanetChunk};
pub use density::noise::FractalNoise;
pub use density::samplers::{NoisySphereDensity, PlaneDensity, SphereDensity};
pub use density::{build_padded_grid, DensityFunction};
pub use error::ChunkError;
pub use mesh_queue::{MeshCompletion, MeshQueue, MeshRequest};
pub use octree::{
  NodeIndex, Octree, OctreeConfig, OctreeKey, OctreeNode, UpdateBudget, UpdateOutcome, UpdateStats,
};
pub use types::{Aabb3, DensityGrid, SurfaceNetsMesh};
pub use world::{sphere_shell_centers, PlanetWorld, WorldStats};
