//! OctreeKey - globally unique, hashable node address.
//!
//! Coordinates are integer grid positions at the key's own level, which
//! keeps parent/child math to shifts. Levels decrease toward the leaves:
//! the root holds the maximum level and level 0 is the finest detail.

use glam::IVec3;

/// Address of an octree node: `(level, grid coordinates at that level)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OctreeKey {
  /// Level of detail: 0 = finest, root = maximum.
  pub level: i32,
  /// Grid position at this level.
  pub coords: IVec3,
}

impl OctreeKey {
  pub fn new(level: i32, coords: IVec3) -> Self {
    Self { level, coords }
  }

  /// Key of the tree root at the given maximum level.
  pub fn root(level: i32) -> Self {
    Self::new(level, IVec3::ZERO)
  }

  /// Unit offset of an octant. Bits: 0 = +X, 1 = +Y, 2 = +Z.
  pub fn octant_offset(octant: u8) -> IVec3 {
    IVec3::new(
      (octant & 1) as i32,
      ((octant >> 1) & 1) as i32,
      ((octant >> 2) & 1) as i32,
    )
  }

  /// Child key one level finer, or `None` at level 0.
  pub fn child(&self, octant: u8) -> Option<Self> {
    if self.level <= 0 {
      return None;
    }
    let base = IVec3::new(self.coords.x << 1, self.coords.y << 1, self.coords.z << 1);
    Some(Self::new(self.level - 1, base + Self::octant_offset(octant)))
  }

  /// Parent key one level coarser, or `None` at `max_level`.
  ///
  /// Arithmetic shift floors negative coordinates, so the mapping stays
  /// the inverse of [`child`](Self::child) everywhere in the grid.
  pub fn parent(&self, max_level: i32) -> Option<Self> {
    if self.level >= max_level {
      return None;
    }
    Some(Self::new(
      self.level + 1,
      IVec3::new(self.coords.x >> 1, self.coords.y >> 1, self.coords.z >> 1),
    ))
  }
}

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;
