//! Changeset of one committed write transaction
//! 单个已提交写事务的变更集

use std::collections::HashSet;

use sdb_base::{Diff, Key};

/// Immutable record of keys touched by one commit, tagged with the snapshot after it
/// 一次提交涉及键的不可变记录，标记为提交后的快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
  pub snap: u64,
  pub changed: HashSet<Key>,
  pub inserted: HashSet<Key>,
  pub removed: HashSet<Key>,
}

impl ChangeSet {
  #[inline]
  pub fn new(snap: u64, diff: Diff) -> Self {
    Self {
      snap,
      changed: diff.changed,
      inserted: diff.inserted,
      removed: diff.removed,
    }
  }

  /// Every key of the three sets
  /// 三个集合中的所有键
  pub fn keys(&self) -> impl Iterator<Item = &Key> {
    self
      .changed
      .iter()
      .chain(self.inserted.iter())
      .chain(self.removed.iter())
  }

  #[inline]
  pub fn contains(&self, key: &Key) -> bool {
    self.changed.contains(key) || self.inserted.contains(key) || self.removed.contains(key)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.changed.len() + self.inserted.len() + self.removed.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
