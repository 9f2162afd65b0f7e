//! PlanetWorld - coordinator tying the octree, the mesh queue and the
//! density function together.
//!
//! The octree update runs synchronously on the caller's thread (it needs
//! exclusive access to the arena); mesh generation fans out to workers and
//! comes back through the queue's channel. Completions for chunks that
//! were merged away while their mesh was in flight are recognized by
//! [`ChunkId`] and dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;

use crate::chunk::{ChunkId, ChunkState, PlanetChunk};
use crate::density::DensityFunction;
use crate::mesh_queue::{self, MeshCompletion, MeshQueue, MeshRequest};
use crate::octree::{NodeIndex, Octree, OctreeConfig, UpdateBudget, UpdateStats};

/// Counters from one [`PlanetWorld::update`] call.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorldStats {
  /// Octree refinement counters (zero when the update was throttled).
  pub update: UpdateStats,
  /// Mesh requests submitted this call.
  pub enqueued: usize,
  /// Completions that delivered geometry.
  pub meshed: usize,
  /// Completions for chunks with no surface crossing.
  pub empty: usize,
  /// Completions that failed (chunk reset to `Empty`).
  pub failed: usize,
  /// Completions dropped because their chunk no longer exists.
  pub stale_discarded: usize,
}

/// Adaptive planet surface: octree LOD + asynchronous chunk meshing.
pub struct PlanetWorld<D: DensityFunction + 'static> {
  octree: Octree,
  queue: MeshQueue<D>,
  budget: UpdateBudget,
  /// Routes completions back to the leaf that requested them.
  chunk_nodes: HashMap<ChunkId, NodeIndex>,
  last_viewer: Option<Vec3>,
  /// Minimum viewer movement before refinement re-runs.
  min_viewer_move: f32,
}

impl<D: DensityFunction + 'static> PlanetWorld<D> {
  pub fn new(config: OctreeConfig, density: D) -> Self {
    Self {
      octree: Octree::new(config),
      queue: MeshQueue::new(Arc::new(density)),
      budget: UpdateBudget::default(),
      chunk_nodes: HashMap::new(),
      last_viewer: None,
      min_viewer_move: 10.0,
    }
  }

  pub fn with_budget(mut self, budget: UpdateBudget) -> Self {
    self.budget = budget;
    self
  }

  pub fn with_min_viewer_move(mut self, distance: f32) -> Self {
    self.min_viewer_move = distance;
    self
  }

  pub fn octree(&self) -> &Octree {
    &self.octree
  }

  /// Run one frame: refine the octree for the viewer position, enqueue
  /// newly activated chunks, and apply whatever the workers finished.
  ///
  /// Refinement is skipped (but completions still applied) while the
  /// viewer has moved less than `min_viewer_move` since the last run.
  pub fn update(&mut self, viewer: Vec3) -> WorldStats {
    let mut stats = WorldStats::default();

    if self.viewer_moved(viewer) {
      let activated = self.refine(viewer, &mut stats);
      for idx in activated {
        self.enqueue_chunk(idx, &mut stats);
      }
    }

    for completion in self.queue.drain_completions() {
      self.apply_completion(completion, &mut stats);
    }

    stats
  }

  /// Like [`update`](Self::update), but generates every newly activated
  /// chunk synchronously before returning. Useful for startup, tests and
  /// offline capture; never throttled.
  pub fn update_blocking(&mut self, viewer: Vec3) -> WorldStats {
    let mut stats = WorldStats::default();

    self.last_viewer = Some(viewer);
    let activated = self.refine(viewer, &mut stats);

    for idx in activated {
      let Some(request) = self.request_for(idx) else {
        continue;
      };
      self.chunk_nodes.insert(request.chunk, idx);
      stats.enqueued += 1;
      let completion = mesh_queue::generate(self.queue.density().as_ref(), &request);
      self.apply_completion(completion, &mut stats);
    }

    // Pick up stragglers from earlier asynchronous updates too.
    for completion in self.queue.drain_completions() {
      self.apply_completion(completion, &mut stats);
    }

    stats
  }

  /// Chunks that currently have renderable geometry.
  pub fn visible_chunks(&self) -> impl Iterator<Item = &PlanetChunk> {
    self.octree.active_chunks().filter_map(|(_, chunk)| {
      if chunk.state == ChunkState::Generated && chunk.mesh.is_some() {
        Some(chunk)
      } else {
        None
      }
    })
  }

  /// Number of active leaf chunks, generated or not.
  pub fn active_chunk_count(&self) -> usize {
    self.octree.active_chunks().count()
  }

  /// Mesh requests still running on workers.
  pub fn in_flight(&self) -> usize {
    self.queue.in_flight()
  }

  /// Bounded shutdown wait for in-flight generation.
  pub fn wait_idle(&self, timeout: Duration) -> bool {
    self.queue.wait_idle(timeout)
  }

  fn viewer_moved(&mut self, viewer: Vec3) -> bool {
    let moved = self
      .last_viewer
      .map_or(true, |last| last.distance(viewer) >= self.min_viewer_move);
    if moved {
      self.last_viewer = Some(viewer);
    }
    moved
  }

  /// Run octree refinement and drop routing entries for released chunks,
  /// so their in-flight completions are recognized as stale on arrival.
  fn refine(&mut self, viewer: Vec3, stats: &mut WorldStats) -> Vec<NodeIndex> {
    let outcome = self.octree.update(viewer, &self.budget);
    stats.update = outcome.stats;

    for id in &outcome.released {
      self.chunk_nodes.remove(id);
    }

    outcome.activated
  }

  fn enqueue_chunk(&mut self, idx: NodeIndex, stats: &mut WorldStats) {
    let Some(request) = self.request_for(idx) else {
      return;
    };
    self.chunk_nodes.insert(request.chunk, idx);
    if let Some(chunk) = self.octree.chunk_mut(idx) {
      chunk.state = ChunkState::Generating;
    }
    self.queue.enqueue(request);
    stats.enqueued += 1;
  }

  fn request_for(&self, idx: NodeIndex) -> Option<MeshRequest> {
    let node = self.octree.get(idx)?;
    let chunk = node.chunk.as_ref()?;
    Some(MeshRequest {
      chunk: chunk.id,
      bounds: chunk.bounds(),
      resolution: chunk.resolution,
      padding: self.octree.config().padding,
    })
  }

  fn apply_completion(&mut self, completion: MeshCompletion, stats: &mut WorldStats) {
    let Some(&idx) = self.chunk_nodes.get(&completion.chunk) else {
      tracing::debug!(chunk = completion.chunk.raw(), "discarding stale mesh completion");
      stats.stale_discarded += 1;
      return;
    };

    let stale = match self.octree.chunk_mut(idx) {
      Some(chunk) if chunk.id == completion.chunk => {
        match completion.result {
          Ok(mesh) => {
            if mesh.is_some() {
              stats.meshed += 1;
            } else {
              stats.empty += 1;
            }
            chunk.mesh = mesh;
            chunk.state = ChunkState::Generated;
          }
          Err(err) => {
            tracing::warn!(%err, chunk = completion.chunk.raw(), "chunk generation failed");
            chunk.clear_mesh();
            stats.failed += 1;
          }
        }
        false
      }
      _ => true,
    };

    if stale {
      // The node was cleared or re-chunked while the mesh was in flight.
      tracing::debug!(chunk = completion.chunk.raw(), "discarding stale mesh completion");
      self.chunk_nodes.remove(&completion.chunk);
      stats.stale_discarded += 1;
    }
  }
}

/// Chunk centers of a fixed grid that might intersect a planet's shell.
///
/// Lays `chunks_per_axis³` cubic chunks around the planet center and keeps
/// only those whose diagonal reach can touch the sphere surface - a cheap
/// prefilter for bulk seeding that skips the deep interior and empty
/// space.
pub fn sphere_shell_centers(
  planet_center: Vec3,
  planet_radius: f32,
  chunk_size: f32,
  chunks_per_axis: u32,
) -> Vec<Vec3> {
  let total = chunks_per_axis as f32 * chunk_size;
  let start = planet_center - Vec3::splat(total * 0.5);
  let chunk_reach = chunk_size * 3f32.sqrt();

  let mut centers = Vec::new();
  for x in 0..chunks_per_axis {
    for y in 0..chunks_per_axis {
      for z in 0..chunks_per_axis {
        let center = start
          + Vec3::new(
            (x as f32 + 0.5) * chunk_size,
            (y as f32 + 0.5) * chunk_size,
            (z as f32 + 0.5) * chunk_size,
          );
        let distance = (center - planet_center).length();
        if distance < planet_radius + chunk_reach && distance > planet_radius - chunk_reach {
          centers.push(center);
        }
      }
    }
  }

  centers
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::density::samplers::SphereDensity;
  use crate::types::Aabb3;

  fn test_config() -> OctreeConfig {
    OctreeConfig::new()
      .with_root_size(100.0)
      .with_max_depth(3)
      .with_subdivision_distance(30.0)
      .with_resolution(16, 8)
  }

  fn sphere_world() -> PlanetWorld<SphereDensity> {
    PlanetWorld::new(test_config(), SphereDensity::new(30.0))
  }

  #[test]
  fn blocking_update_generates_visible_chunks() {
    let mut world = sphere_world();
    let stats = world.update_blocking(Vec3::new(30.0, 0.0, 0.0));

    assert!(stats.enqueued > 0);
    assert_eq!(stats.enqueued, stats.meshed + stats.empty + stats.failed);
    assert_eq!(stats.failed, 0);
    assert!(stats.meshed > 0, "a sphere world must produce geometry");
    assert!(world.visible_chunks().count() > 0);

    // Every active chunk has been settled by the blocking path.
    for (_, chunk) in world.octree().active_chunks() {
      assert_eq!(chunk.state, ChunkState::Generated);
    }
  }

  #[test]
  fn non_crossing_chunks_stay_meshless() {
    let mut world = sphere_world();
    world.update_blocking(Vec3::new(30.0, 0.0, 0.0));

    // Chunks fully inside or outside the planet are Generated but empty.
    let empty = world
      .octree()
      .active_chunks()
      .filter(|(_, c)| c.state == ChunkState::Generated && c.mesh.is_none())
      .count();
    assert!(empty > 0, "a sphere world has non-surface chunks");
  }

  #[test]
  fn async_update_settles_after_drain() {
    let mut world = sphere_world();
    let stats = world.update(Vec3::new(30.0, 0.0, 0.0));
    assert!(stats.enqueued > 0);

    assert!(world.wait_idle(Duration::from_secs(10)), "workers stalled");
    let stats = world.update(Vec3::new(30.0, 0.0, 0.1)); // below move threshold
    assert_eq!(stats.update.total_transitions(), 0, "throttled refinement ran");
    assert_eq!(stats.enqueued, 0);
    assert!(stats.meshed > 0);

    for (_, chunk) in world.octree().active_chunks() {
      assert_eq!(chunk.state, ChunkState::Generated);
    }
  }

  #[test]
  fn completions_for_merged_chunks_are_discarded() {
    let mut world = sphere_world().with_min_viewer_move(0.0);

    let stats = world.update(Vec3::ZERO);
    assert!(stats.enqueued > 0);
    assert!(world.wait_idle(Duration::from_secs(10)), "workers stalled");

    // Merge everything away before draining: the finished meshes now
    // reference chunks that no longer exist.
    let stats = world.update(Vec3::new(1e6, 0.0, 0.0));
    assert!(stats.update.merges > 0);
    assert!(stats.stale_discarded > 0, "stale completions must be dropped");

    // Only the root survives; the stale results were not written into it.
    assert_eq!(world.active_chunk_count(), 1);
  }

  #[test]
  fn failing_density_marks_chunks_empty_without_crashing() {
    struct NanDensity;
    impl DensityFunction for NanDensity {
      fn sample(&self, _position: Vec3) -> f32 {
        f32::NAN
      }
    }

    let mut world = PlanetWorld::new(test_config(), NanDensity);
    let stats = world.update_blocking(Vec3::ZERO);

    assert!(stats.failed > 0);
    assert_eq!(stats.meshed, 0);
    for (_, chunk) in world.octree().active_chunks() {
      assert_eq!(chunk.state, ChunkState::Empty);
      assert!(chunk.mesh.is_none());
    }
  }

  #[test]
  fn shell_centers_skip_interior_and_empty_space() {
    let radius = 100.0;
    let chunk_size = 20.0;
    let centers = sphere_shell_centers(Vec3::ZERO, radius, chunk_size, 16);

    assert!(!centers.is_empty());
    assert!(
      centers.len() < 16 * 16 * 16,
      "prefilter must reject most of the grid"
    );

    let reach = chunk_size * 3f32.sqrt();
    for center in centers {
      let d = center.length();
      assert!(d > radius - reach && d < radius + reach, "center {center:?} off the shell");
    }
  }

  #[test]
  fn shell_chunks_actually_contain_surface() {
    let density = SphereDensity::new(100.0);
    let chunk_size = 20.0;
    let centers = sphere_shell_centers(Vec3::ZERO, 100.0, chunk_size, 16);

    // At least the on-axis chunks straddle the surface for real.
    let crossing = centers
      .iter()
      .filter(|center| {
        let bounds = Aabb3::from_center_half_extent(**center, chunk_size * 0.5);
        crate::density::build_padded_grid(&density, bounds, 8, 1)
          .expect("sampling succeeds")
          .is_some()
      })
      .count();
    assert!(crossing > 0);
  }
}
