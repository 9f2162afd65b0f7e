//! Work queue for off-thread chunk mesh generation.
//!
//! Enqueue → workers → drain: requests fan out onto rayon's pool, each
//! worker samples and meshes one chunk, and completed results flow back to
//! the coordinator through an MPSC channel. Workers never touch the octree
//! arena; routing results back into nodes (and discarding stale ones) is
//! the coordinator's job.
//!
//! [`generate`] is the same code path invoked synchronously, for callers
//! that want a mesh on the current thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use web_time::Instant;

use crate::chunk::ChunkId;
use crate::density::{build_padded_grid, DensityFunction};
use crate::error::ChunkError;
use crate::surface_nets;
use crate::types::{Aabb3, SurfaceNetsMesh};

/// Request to generate one chunk's mesh.
#[derive(Clone, Copy, Debug)]
pub struct MeshRequest {
  /// Identity of the chunk this mesh is for.
  pub chunk: ChunkId,
  /// Unpadded world bounds of the chunk.
  pub bounds: Aabb3,
  /// Voxels per axis.
  pub resolution: u32,
  /// Padding ring width.
  pub padding: u32,
}

/// Completed mesh result.
pub struct MeshCompletion {
  /// Chunk this completion belongs to.
  pub chunk: ChunkId,
  /// `Ok(None)` when the chunk contained no surface crossing.
  pub result: Result<Option<SurfaceNetsMesh>, ChunkError>,
  /// Sampling + meshing time in microseconds.
  pub mesh_time_us: u64,
}

/// Sample and mesh one chunk synchronously.
pub fn generate<D: DensityFunction + ?Sized>(density: &D, request: &MeshRequest) -> MeshCompletion {
  let start = Instant::now();
  let result = build_padded_grid(density, request.bounds, request.resolution, request.padding)
    .map(|grid| grid.map(|grid| surface_nets::generate(&grid)));

  MeshCompletion {
    chunk: request.chunk,
    result,
    mesh_time_us: start.elapsed().as_micros() as u64,
  }
}

/// Coordinator-owned mesh generation queue.
///
/// Cloning is cheap and shares the channel, the density function and the
/// in-flight counter.
pub struct MeshQueue<D: DensityFunction + 'static> {
  density: Arc<D>,
  sender: Sender<MeshCompletion>,
  receiver: Receiver<MeshCompletion>,
  in_flight: Arc<AtomicUsize>,
}

impl<D: DensityFunction + 'static> MeshQueue<D> {
  /// Create a queue over a shared density function.
  pub fn new(density: Arc<D>) -> Self {
    let (sender, receiver) = unbounded();
    Self {
      density,
      sender,
      receiver,
      in_flight: Arc::new(AtomicUsize::new(0)),
    }
  }

  /// The density function this queue samples.
  pub fn density(&self) -> &Arc<D> {
    &self.density
  }

  /// Submit a request to rayon's pool (non-blocking).
  pub fn enqueue(&self, request: MeshRequest) {
    self.in_flight.fetch_add(1, Ordering::SeqCst);

    let density = Arc::clone(&self.density);
    let sender = self.sender.clone();
    let in_flight = Arc::clone(&self.in_flight);

    rayon::spawn(move || {
      let completion = generate(density.as_ref(), &request);
      // A dropped receiver means the world shut down; nothing to deliver.
      let _ = sender.send(completion);
      in_flight.fetch_sub(1, Ordering::SeqCst);
    });
  }

  /// Take everything the workers have finished so far (non-blocking).
  pub fn drain_completions(&self) -> Vec<MeshCompletion> {
    self.receiver.try_iter().collect()
  }

  /// Requests submitted but not yet delivered to the channel.
  pub fn in_flight(&self) -> usize {
    self.in_flight.load(Ordering::SeqCst)
  }

  /// True when no work is running and no completion is waiting.
  pub fn is_idle(&self) -> bool {
    self.in_flight() == 0 && self.receiver.is_empty()
  }

  /// Block until all in-flight work has finished or the timeout elapses.
  /// Completions stay drainable afterwards. Intended for shutdown.
  pub fn wait_idle(&self, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while self.in_flight() > 0 {
      if Instant::now() >= deadline {
        return false;
      }
      std::thread::sleep(Duration::from_millis(1));
    }
    true
  }
}

impl<D: DensityFunction + 'static> Clone for MeshQueue<D> {
  fn clone(&self) -> Self {
    Self {
      density: Arc::clone(&self.density),
      sender: self.sender.clone(),
      receiver: self.receiver.clone(),
      in_flight: Arc::clone(&self.in_flight),
    }
  }
}

#[cfg(test)]
#[path = "mesh_queue_test.rs"]
mod mesh_queue_test;
