//! Octree arena and the distance-driven refinement pass.

use std::collections::{HashMap, VecDeque};

use glam::Vec3;
use smallvec::SmallVec;

use super::budget::{UpdateBudget, UpdateStats};
use super::config::OctreeConfig;
use super::key::OctreeKey;
use super::node::{NodeIndex, OctreeNode};
use crate::chunk::{ChunkId, PlanetChunk};
use crate::error::ChunkError;

/// Result of one [`Octree::update`] pass.
pub struct UpdateOutcome {
  /// Counters for this pass.
  pub stats: UpdateStats,
  /// Leaves that received a fresh chunk and need mesh generation.
  pub activated: Vec<NodeIndex>,
  /// Chunks discarded by subdivide/merge/deactivation. Any in-flight
  /// generation for these ids is stale and must be dropped on arrival.
  pub released: Vec<ChunkId>,
}

/// Sparse LOD octree over an arena of nodes.
///
/// All structural mutation happens inside [`update`](Self::update), which
/// requires exclusive access; workers never touch the arena and hand their
/// results back through the mesh queue instead.
pub struct Octree {
  config: OctreeConfig,
  nodes: Vec<OctreeNode>,
  index: HashMap<OctreeKey, NodeIndex>,
  root: NodeIndex,
}

impl Octree {
  /// Create an octree with a single root leaf.
  pub fn new(config: OctreeConfig) -> Self {
    let root_key = OctreeKey::root(config.max_depth);
    let root_node = OctreeNode::new(root_key, config.origin, config.root_size, None);

    let root = NodeIndex::new(0);
    let mut index = HashMap::new();
    index.insert(root_key, root);

    Self {
      config,
      nodes: vec![root_node],
      index,
      root,
    }
  }

  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  pub fn root(&self) -> NodeIndex {
    self.root
  }

  /// Total arena slots, including cleared ones. Monotonic per session.
  pub fn arena_len(&self) -> usize {
    self.nodes.len()
  }

  /// Number of live nodes.
  pub fn live_count(&self) -> usize {
    self.index.len()
  }

  /// An index is live while the key map still points at its slot. Indices
  /// cleared by an ancestor merge fail this check and all operations on
  /// them become no-ops.
  pub fn is_live(&self, idx: NodeIndex) -> bool {
    self
      .nodes
      .get(idx.index())
      .is_some_and(|node| self.index.get(&node.key) == Some(&idx))
  }

  /// Borrow a live node, `None` for stale indices.
  pub fn get(&self, idx: NodeIndex) -> Option<&OctreeNode> {
    if self.is_live(idx) {
      Some(&self.nodes[idx.index()])
    } else {
      None
    }
  }

  /// Look up a node by key.
  pub fn find(&self, key: &OctreeKey) -> Option<NodeIndex> {
    self.index.get(key).copied()
  }

  /// Mutable access to a live leaf's chunk, `None` for stale indices.
  pub fn chunk_mut(&mut self, idx: NodeIndex) -> Option<&mut PlanetChunk> {
    if !self.is_live(idx) {
      return None;
    }
    self.nodes[idx.index()].chunk.as_mut()
  }

  /// Iterate live nodes.
  pub fn live_nodes(&self) -> impl Iterator<Item = (NodeIndex, &OctreeNode)> {
    self.index.values().map(|&idx| (idx, &self.nodes[idx.index()]))
  }

  /// Iterate active leaves and their chunks.
  pub fn active_chunks(&self) -> impl Iterator<Item = (NodeIndex, &PlanetChunk)> {
    self.live_nodes().filter_map(|(idx, node)| {
      if node.is_active {
        node.chunk.as_ref().map(|chunk| (idx, chunk))
      } else {
        None
      }
    })
  }

  /// One refinement pass: breadth-first from the root, subdividing nodes
  /// that are too coarse for their distance and merging subtrees the
  /// viewer has left behind, then an activity pass that settles which
  /// leaves own chunks.
  ///
  /// Children created by a subdivision join the same pass's queue, so a
  /// close viewer drives a full descent in one call (budget permitting).
  /// A merge clears whole subtrees; descendants already queued become
  /// stale indices and are skipped when popped.
  pub fn update(&mut self, viewer: Vec3, budget: &UpdateBudget) -> UpdateOutcome {
    let mut stats = UpdateStats::default();
    let mut released = Vec::new();

    let mut queue = VecDeque::new();
    queue.push_back(self.root);

    while let Some(idx) = queue.pop_front() {
      if !self.is_live(idx) {
        tracing::debug!(index = idx.index(), "skipping stale octree index");
        stats.stale_skips += 1;
        continue;
      }

      let i = idx.index();
      let distance = self.nodes[i].center.distance(viewer);
      self.nodes[i].distance_to_viewer = distance;

      let size = self.nodes[i].size;
      let level = self.nodes[i].key.level;

      if self.nodes[i].is_leaf() {
        if self.config.should_subdivide(level, size, distance)
          && budget.can_subdivide(stats.subdivisions)
        {
          let children = self.subdivide(idx, &mut released);
          stats.subdivisions += 1;
          queue.extend(children);
        }
      } else if self.config.should_merge(size, distance) && budget.can_merge(stats.merges) {
        self.merge(idx, &mut released);
        stats.merges += 1;
      } else if let Some(children) = self.nodes[i].children {
        queue.extend(children);
      }
    }

    // Strictly after all structural changes: settle activity and chunks.
    let activated = self.activity_pass(&mut released);

    stats.activated = activated.len();
    stats.released = released.len();
    tracing::debug!(
      subdivisions = stats.subdivisions,
      merges = stats.merges,
      activated = stats.activated,
      released = stats.released,
      stale_skips = stats.stale_skips,
      live = self.live_count(),
      "octree update complete"
    );

    UpdateOutcome {
      stats,
      activated,
      released,
    }
  }

  /// Split a leaf into 8 children at the octant centers. The parent is
  /// deactivated immediately and its chunk discarded; the finer children
  /// now cover its region.
  fn subdivide(&mut self, idx: NodeIndex, released: &mut Vec<ChunkId>) -> SmallVec<[NodeIndex; 8]> {
    let i = idx.index();
    let parent_key = self.nodes[i].key;
    let center = self.nodes[i].center;
    let child_size = self.nodes[i].size * 0.5;
    let offset = child_size * 0.5;

    let mut children: SmallVec<[NodeIndex; 8]> = SmallVec::new();
    for octant in 0..8u8 {
      let Some(child_key) = parent_key.child(octant) else {
        continue; // level 0, rejected by should_subdivide
      };
      let child_center = center
        + Vec3::new(
          if octant & 1 != 0 { offset } else { -offset },
          if octant & 2 != 0 { offset } else { -offset },
          if octant & 4 != 0 { offset } else { -offset },
        );
      children.push(self.allocate(child_key, child_center, child_size, idx));
    }

    if children.len() != 8 {
      return children;
    }

    let mut links = [children[0]; 8];
    links.copy_from_slice(&children);

    let node = &mut self.nodes[i];
    node.children = Some(links);
    node.is_active = false;
    if let Some(chunk) = node.chunk.take() {
      released.push(chunk.id);
    }

    children
  }

  /// Collapse a subtree: clear every descendant and return the node to a
  /// leaf. The activity pass re-activates it and rebuilds its chunk.
  fn merge(&mut self, idx: NodeIndex, released: &mut Vec<ChunkId>) {
    let i = idx.index();
    if let Some(children) = self.nodes[i].children.take() {
      for child in children {
        self.clear_subtree(child, released);
      }
    }
  }

  fn clear_subtree(&mut self, idx: NodeIndex, released: &mut Vec<ChunkId>) {
    let i = idx.index();
    if let Some(children) = self.nodes[i].children.take() {
      for child in children {
        self.clear_subtree(child, released);
      }
    }
    if let Some(chunk) = self.nodes[i].chunk.take() {
      released.push(chunk.id);
    }
    self.index.remove(&self.nodes[i].key);
    self.nodes[i].reset();
  }

  /// Append a node to the arena and register its key.
  fn allocate(&mut self, key: OctreeKey, center: Vec3, size: f32, parent: NodeIndex) -> NodeIndex {
    let idx = NodeIndex::new(self.nodes.len());
    self.nodes.push(OctreeNode::new(key, center, size, Some(parent)));
    self.index.insert(key, idx);
    idx
  }

  /// Make every childless live node an active leaf with a chunk, and
  /// every subdivided node inactive and chunkless.
  fn activity_pass(&mut self, released: &mut Vec<ChunkId>) -> Vec<NodeIndex> {
    let mut activated = Vec::new();

    for i in 0..self.nodes.len() {
      let idx = NodeIndex::new(i);
      if !self.is_live(idx) {
        continue;
      }

      if self.nodes[i].has_children() {
        self.nodes[i].is_active = false;
        if let Some(chunk) = self.nodes[i].chunk.take() {
          released.push(chunk.id);
        }
      } else {
        self.nodes[i].is_active = true;
        if self.nodes[i].chunk.is_none() {
          match self.build_chunk(i) {
            Ok(chunk) => {
              self.nodes[i].chunk = Some(chunk);
              activated.push(idx);
            }
            Err(err) => {
              tracing::warn!(%err, level = self.nodes[i].key.level, "chunk creation rejected");
            }
          }
        }
      }
    }

    activated
  }

  fn build_chunk(&self, i: usize) -> Result<PlanetChunk, ChunkError> {
    let node = &self.nodes[i];
    let level = node.key.level;
    PlanetChunk::new(
      node.center,
      node.size,
      level,
      self.config.resolution_for_level(level),
    )
  }
}

#[cfg(test)]
#[path = "update_test.rs"]
mod update_test;
