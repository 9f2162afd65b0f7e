//! Arena node storage.
//!
//! Nodes live in a single growable vector addressed by [`NodeIndex`];
//! parent/child links are indices, never pointers, so arena growth cannot
//! invalidate them. Slots are reset in place when a subtree is cleared and
//! the arena only ever appends.

use glam::Vec3;

use super::key::OctreeKey;
use crate::chunk::PlanetChunk;

/// Handle into the octree arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeIndex(u32);

impl NodeIndex {
  pub(crate) fn new(index: usize) -> Self {
    Self(index as u32)
  }

  /// Position in the arena vector.
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// One octree node.
///
/// For a live node exactly one of {leaf-and-active, has-children} holds
/// once an update pass completes; a node with children never owns a chunk
/// and an active leaf owns exactly one.
#[derive(Debug)]
pub struct OctreeNode {
  /// Unique spatial address; the key map is the source of truth for
  /// whether this slot is live.
  pub key: OctreeKey,
  /// World-space center of the node's cube.
  pub center: Vec3,
  /// Edge length of the node's cube.
  pub size: f32,
  /// Parent slot, `None` for the root.
  pub parent: Option<NodeIndex>,
  /// Child slots, `None` for leaves.
  pub children: Option<[NodeIndex; 8]>,
  /// True when this leaf should render and owns a chunk.
  pub is_active: bool,
  /// Distance to the viewer from the last update.
  pub distance_to_viewer: f32,
  /// Render payload for active leaves.
  pub chunk: Option<PlanetChunk>,
}

impl OctreeNode {
  pub(crate) fn new(key: OctreeKey, center: Vec3, size: f32, parent: Option<NodeIndex>) -> Self {
    Self {
      key,
      center,
      size,
      parent,
      children: None,
      is_active: false,
      distance_to_viewer: 0.0,
      chunk: None,
    }
  }

  /// True when this node has no children.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  /// True when this node has been subdivided.
  #[inline]
  pub fn has_children(&self) -> bool {
    self.children.is_some()
  }

  /// Reset the slot to its empty state. The caller unregisters the key.
  pub(crate) fn reset(&mut self) {
    *self = Self::new(OctreeKey::root(0), Vec3::ZERO, 0.0, None);
  }
}
