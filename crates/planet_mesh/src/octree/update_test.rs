use glam::Vec3;

use super::*;
use crate::chunk::ChunkState;
use crate::types::Aabb3;

fn test_config() -> OctreeConfig {
  OctreeConfig::new()
    .with_root_size(1000.0)
    .with_max_depth(4)
    .with_subdivision_distance(150.0)
    .with_merge_hysteresis(2.0)
}

/// Check the structural invariants that must hold after every update.
fn assert_invariants(octree: &Octree) {
  for (idx, node) in octree.live_nodes() {
    assert!(
      !(node.has_children() && node.is_active),
      "node {idx:?} is subdivided and active at once"
    );
    if node.has_children() {
      assert!(node.chunk.is_none(), "subdivided node {idx:?} owns a chunk");
    } else {
      assert!(node.is_active, "leaf {idx:?} left inactive");
      let chunk = node.chunk.as_ref().expect("active leaf without chunk");
      assert_eq!(chunk.size, node.size, "chunk not sized to its node");
      assert_eq!(chunk.lod_level, node.key.level);
    }
  }
}

/// Smallest live leaf containing a position.
fn leaf_level_at(octree: &Octree, position: Vec3) -> Option<i32> {
  octree
    .live_nodes()
    .filter(|(_, node)| node.is_leaf())
    .filter(|(_, node)| {
      Aabb3::from_center_half_extent(node.center, node.size * 0.5).contains_point(position)
    })
    .map(|(_, node)| node.key.level)
    .min()
}

#[test]
fn new_octree_has_a_single_root_leaf() {
  let octree = Octree::new(test_config());
  assert_eq!(octree.live_count(), 1);
  let root = octree.get(octree.root()).expect("root is live");
  assert!(root.is_leaf());
  assert_eq!(root.key.level, 4);
  assert_eq!(root.size, 1000.0);
}

#[test]
fn first_update_activates_the_root() {
  let mut octree = Octree::new(test_config());
  // Far viewer: no subdivision, root becomes the single active chunk.
  let outcome = octree.update(Vec3::new(1e6, 0.0, 0.0), &UpdateBudget::UNLIMITED);

  assert_eq!(outcome.stats.subdivisions, 0);
  assert_eq!(outcome.activated.len(), 1);
  assert_invariants(&octree);
}

#[test]
fn close_viewer_descends_to_level_zero() {
  let mut octree = Octree::new(test_config());
  let viewer = Vec3::ZERO; // root center
  octree.update(viewer, &UpdateBudget::UNLIMITED);

  assert_invariants(&octree);
  assert_eq!(leaf_level_at(&octree, viewer), Some(0), "viewer path must reach the finest level");

  // Far branches stay coarse: the opposite corner is ~1300 away.
  let far_corner = Vec3::splat(490.0);
  let far_level = leaf_level_at(&octree, far_corner).expect("corner is covered");
  assert!(far_level >= 2, "far branch over-refined to level {far_level}");
}

#[test]
fn every_update_preserves_invariants() {
  let mut octree = Octree::new(test_config());
  let positions = [
    Vec3::ZERO,
    Vec3::new(400.0, 0.0, 0.0),
    Vec3::new(-300.0, 250.0, 100.0),
    Vec3::new(5000.0, 0.0, 0.0),
    Vec3::new(-10.0, -10.0, -10.0),
  ];
  for viewer in positions {
    octree.update(viewer, &UpdateBudget::UNLIMITED);
    assert_invariants(&octree);
  }
}

#[test]
fn receding_viewer_merges_back_to_the_root() {
  let mut octree = Octree::new(test_config());
  octree.update(Vec3::ZERO, &UpdateBudget::UNLIMITED);
  assert!(octree.live_count() > 1);

  let outcome = octree.update(Vec3::new(1e6, 0.0, 0.0), &UpdateBudget::UNLIMITED);
  assert!(outcome.stats.merges > 0);
  assert_eq!(octree.live_count(), 1, "only the root survives");
  assert_invariants(&octree);
}

#[test]
fn merging_releases_descendant_chunks() {
  let mut octree = Octree::new(test_config());
  let first = octree.update(Vec3::ZERO, &UpdateBudget::UNLIMITED);
  let activated = first.activated.len();
  assert!(activated > 8);

  let outcome = octree.update(Vec3::new(1e6, 0.0, 0.0), &UpdateBudget::UNLIMITED);
  // Every previously active chunk is released; the root gets a fresh one.
  assert_eq!(outcome.released.len(), activated);
  assert_eq!(outcome.activated.len(), 1);
}

#[test]
fn subdividing_releases_the_parent_chunk() {
  let mut octree = Octree::new(test_config());
  octree.update(Vec3::new(1e6, 0.0, 0.0), &UpdateBudget::UNLIMITED);
  let root_chunk_id = octree
    .get(octree.root())
    .and_then(|n| n.chunk.as_ref())
    .map(|c| c.id)
    .expect("root chunk");

  let outcome = octree.update(Vec3::ZERO, &UpdateBudget::UNLIMITED);
  assert!(outcome.released.contains(&root_chunk_id));
}

#[test]
fn stale_indices_are_noops() {
  let mut octree = Octree::new(test_config());
  octree.update(Vec3::ZERO, &UpdateBudget::UNLIMITED);

  // Grab a deep leaf, then merge everything away.
  let (deep_idx, _) = octree
    .live_nodes()
    .find(|(_, node)| node.key.level == 0)
    .expect("level-0 leaf exists");
  octree.update(Vec3::new(1e6, 0.0, 0.0), &UpdateBudget::UNLIMITED);

  assert!(!octree.is_live(deep_idx));
  assert!(octree.get(deep_idx).is_none());
  assert!(octree.chunk_mut(deep_idx).is_none());
}

#[test]
fn hysteresis_prevents_flicker() {
  // Two-level tree: root 1000 at level 1, children 500 at level 0.
  let config = OctreeConfig::new()
    .with_root_size(1000.0)
    .with_max_depth(1)
    .with_subdivision_distance(100.0)
    .with_merge_hysteresis(2.0);
  let mut octree = Octree::new(config);

  // Subdivide threshold: required(d) < 1000 until d = 100.
  // Merge threshold: raw required(d) > 2000 from d = 200.
  let near = Vec3::new(50.0, 0.0, 0.0);
  let between = Vec3::new(150.0, 0.0, 0.0);

  let outcome = octree.update(near, &UpdateBudget::UNLIMITED);
  assert_eq!(outcome.stats.subdivisions, 1);

  // Oscillating inside the dead zone: no further transitions either way.
  for viewer in [between, near, between, near, between] {
    let outcome = octree.update(viewer, &UpdateBudget::UNLIMITED);
    assert_eq!(outcome.stats.total_transitions(), 0, "tree flickered at {viewer:?}");
  }

  // Leaving the dead zone does merge.
  let outcome = octree.update(Vec3::new(400.0, 0.0, 0.0), &UpdateBudget::UNLIMITED);
  assert_eq!(outcome.stats.merges, 1);
}

#[test]
fn budget_caps_subdivisions_per_update() {
  let mut octree = Octree::new(test_config());
  let budget = UpdateBudget {
    max_subdivisions: 2,
    max_merges: 0,
  };

  let outcome = octree.update(Vec3::ZERO, &budget);
  assert_eq!(outcome.stats.subdivisions, 2);
  assert_invariants(&octree);

  // Subsequent updates keep refining within the cap until settled.
  let outcome = octree.update(Vec3::ZERO, &budget);
  assert!(outcome.stats.subdivisions > 0);
  assert_invariants(&octree);
}

#[test]
fn chunks_carry_level_resolution() {
  let mut octree = Octree::new(test_config().with_resolution(32, 8));
  octree.update(Vec3::ZERO, &UpdateBudget::UNLIMITED);

  for (_, chunk) in octree.active_chunks() {
    let expected = octree.config().resolution_for_level(chunk.lod_level);
    assert_eq!(chunk.resolution, expected);
    assert_eq!(chunk.state, ChunkState::Empty, "octree never generates meshes itself");
  }
}

#[test]
fn arena_is_append_only() {
  let mut octree = Octree::new(test_config());
  octree.update(Vec3::ZERO, &UpdateBudget::UNLIMITED);
  let arena_after_descent = octree.arena_len();

  octree.update(Vec3::new(1e6, 0.0, 0.0), &UpdateBudget::UNLIMITED);
  // Merging clears slots but never shrinks the arena.
  assert_eq!(octree.arena_len(), arena_after_descent);
  assert_eq!(octree.live_count(), 1);
}

#[test]
fn find_resolves_keys_for_live_nodes_only() {
  let mut octree = Octree::new(test_config());
  octree.update(Vec3::ZERO, &UpdateBudget::UNLIMITED);

  let root_key = OctreeKey::root(4);
  assert_eq!(octree.find(&root_key), Some(octree.root()));

  octree.update(Vec3::new(1e6, 0.0, 0.0), &UpdateBudget::UNLIMITED);
  let child_key = root_key.child(0).expect("root has child keys");
  assert_eq!(octree.find(&child_key), None, "merged keys are unregistered");
}
