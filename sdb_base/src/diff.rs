//! Key-level diff produced by an engine commit
//! 引擎提交产生的键级差异

use std::collections::HashSet;

use crate::Key;

/// Keys touched by one committed write transaction
/// 一次已提交写事务涉及的键
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
  /// Existing rows overwritten (value or metadata)
  /// 被覆盖的已有行（值或元数据）
  pub changed: HashSet<Key>,
  /// Rows that did not exist before
  /// 之前不存在的行
  pub inserted: HashSet<Key>,
  /// Rows deleted
  /// 被删除的行
  pub removed: HashSet<Key>,
}

impl Diff {
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.changed.is_empty() && self.inserted.is_empty() && self.removed.is_empty()
  }

  /// Total key count (a key appears in at most one set)
  /// 键总数（每个键至多出现在一个集合中）
  #[inline]
  pub fn len(&self) -> usize {
    self.changed.len() + self.inserted.len() + self.removed.len()
  }

  /// Iterate all keys of the three sets
  /// 迭代三个集合中的所有键
  pub fn keys(&self) -> impl Iterator<Item = &Key> {
    self
      .changed
      .iter()
      .chain(self.inserted.iter())
      .chain(self.removed.iter())
  }
}
