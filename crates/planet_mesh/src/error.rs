//! Error types for chunk generation.
//!
//! An empty grid (no surface crossing) is not an error - the density
//! builder reports it as `Ok(None)`. Stale octree indices and stale mesh
//! completions are silent no-ops. Everything that remains is a hard
//! failure for a single chunk and lives here.

use thiserror::Error;

/// Failure while creating or generating a single chunk.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ChunkError {
  /// Chunk parameters cannot produce a mesh. Rejected at chunk creation,
  /// never reaches the mesher.
  #[error("degenerate chunk: resolution {resolution} with size {size}")]
  DegenerateChunk { resolution: u32, size: f32 },

  /// The density function returned NaN or infinity.
  #[error("density function returned non-finite value {value} at ({x}, {y}, {z})")]
  NonFiniteDensity { x: f32, y: f32, z: f32, value: f32 },

  /// The density function panicked while sampling.
  #[error("density function panicked while sampling the grid")]
  SamplerPanicked,
}
