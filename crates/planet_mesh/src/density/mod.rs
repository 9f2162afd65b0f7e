//! Density field sampling.
//!
//! A [`DensityFunction`] defines the volume implicitly: negative values are
//! inside, positive values are outside, and the surface lives at zero.
//! [`build_padded_grid`] samples a chunk's padded lattice from it and hands
//! the result to the mesher.
//!
//! Padding is what makes independently generated chunks stitch: each chunk
//! samples one extra voxel ring beyond its own bounds, so two neighbors
//! evaluate the density at identical world positions along their shared
//! boundary and reconstruct identical boundary vertices without ever seeing
//! each other.

pub mod noise;
pub mod samplers;

use glam::Vec3;

use crate::error::ChunkError;
use crate::types::{Aabb3, DensityGrid};

/// Scalar density field: negative = inside, positive = outside.
///
/// Implementations must be pure and deterministic so that repeated sampling
/// of the same position (from any thread) yields the same mesh. No other
/// contract is imposed on the shape - spheres, noise-perturbed spheres and
/// arbitrary SDFs all qualify.
pub trait DensityFunction: Send + Sync {
  /// Sample the field at a world-space position.
  fn sample(&self, position: Vec3) -> f32;
}

/// Blanket impl for boxed trait objects.
impl DensityFunction for Box<dyn DensityFunction> {
  fn sample(&self, position: Vec3) -> f32 {
    (**self).sample(position)
  }
}

/// Sample a chunk's padded density lattice.
///
/// The grid covers `resolution + 2 * padding` samples per axis with the
/// voxel size derived from the chunk bounds. Returns `Ok(None)` when the
/// sampled region contains no sign change - most chunks of a sparse volume
/// are fully inside or fully outside, and skipping the mesher for them is
/// what keeps large worlds affordable. The crossing check is folded into
/// the sampling loop itself so the empty case costs a single pass.
///
/// A non-finite sample or a panicking density function fails this one
/// chunk; neither may take down the octree update driving it.
pub fn build_padded_grid<D: DensityFunction + ?Sized>(
  density: &D,
  chunk_bounds: Aabb3,
  resolution: u32,
  padding: u32,
) -> Result<Option<DensityGrid>, ChunkError> {
  let size = chunk_bounds.size().x;
  if resolution < 2 || size <= 0.0 {
    return Err(ChunkError::DegenerateChunk { resolution, size });
  }

  let voxel_size = size / resolution as f32;
  let origin = chunk_bounds.min - Vec3::splat(padding as f32 * voxel_size);
  let s = (resolution + 2 * padding) as usize;

  let sampled = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    let mut values = Vec::with_capacity(s * s * s);
    let mut any_outside = false;
    let mut any_inside = false;

    for x in 0..s {
      for y in 0..s {
        for z in 0..s {
          let pos = origin + Vec3::new(x as f32, y as f32, z as f32) * voxel_size;
          let d = density.sample(pos);
          if !d.is_finite() {
            return Err(ChunkError::NonFiniteDensity {
              x: pos.x,
              y: pos.y,
              z: pos.z,
              value: d,
            });
          }
          any_outside |= d > 0.0;
          any_inside |= d <= 0.0;
          values.push(d);
        }
      }
    }

    Ok((values, any_outside && any_inside))
  }))
  .map_err(|_| ChunkError::SamplerPanicked)??;

  let (values, has_crossing) = sampled;
  if !has_crossing {
    return Ok(None);
  }

  Ok(Some(DensityGrid {
    values,
    resolution,
    padding,
    voxel_size,
    origin,
  }))
}
