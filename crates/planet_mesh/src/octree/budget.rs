//! Rate limiting for octree updates.
//!
//! Caps structural transitions per update so a fast-moving viewer cannot
//! trigger unbounded cascades in a single frame.

/// Per-update transition caps. 0 = unlimited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateBudget {
  /// Maximum subdivisions per update (0 = unlimited).
  pub max_subdivisions: usize,
  /// Maximum merges per update (0 = unlimited).
  pub max_merges: usize,
}

impl UpdateBudget {
  /// No caps: one update settles the tree completely.
  pub const UNLIMITED: Self = Self {
    max_subdivisions: 0,
    max_merges: 0,
  };

  /// Frame-friendly caps for interactive use.
  pub const INTERACTIVE: Self = Self {
    max_subdivisions: 32,
    max_merges: 32,
  };

  /// Check if another subdivision fits the budget.
  #[inline]
  pub fn can_subdivide(&self, performed: usize) -> bool {
    self.max_subdivisions == 0 || performed < self.max_subdivisions
  }

  /// Check if another merge fits the budget.
  #[inline]
  pub fn can_merge(&self, performed: usize) -> bool {
    self.max_merges == 0 || performed < self.max_merges
  }
}

impl Default for UpdateBudget {
  fn default() -> Self {
    Self::UNLIMITED
  }
}

/// Counters from one octree update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
  /// Leaves split into 8 children.
  pub subdivisions: usize,
  /// Subtrees collapsed back into their parent.
  pub merges: usize,
  /// Leaves that received a fresh chunk in the activity pass.
  pub activated: usize,
  /// Chunks released by subdivide/merge/deactivation.
  pub released: usize,
  /// Queued indices skipped because an earlier merge cleared them.
  pub stale_skips: usize,
}

impl UpdateStats {
  /// Total structural transitions this update.
  #[inline]
  pub fn total_transitions(&self) -> usize {
    self.subdivisions + self.merges
  }
}
