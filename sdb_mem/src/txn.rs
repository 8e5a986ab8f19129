//! Engine transaction
//! 引擎事务

use std::collections::BTreeMap;

use sdb_base::{Key, Mode, Row};

/// Snapshot-pinned transaction with buffered writes
/// 固定快照并缓冲写入的事务
///
/// `None` in the buffer is a delete.
/// 缓冲中的 `None` 表示删除。
#[derive(Debug)]
pub struct Txn {
  pub(crate) mode: Mode,
  pub(crate) snap: u64,
  pub(crate) buf: BTreeMap<Key, Option<Row>>,
}

impl Txn {
  #[inline]
  pub fn mode(&self) -> Mode {
    self.mode
  }

  #[inline]
  pub fn snap(&self) -> u64 {
    self.snap
  }

  /// Buffered write count
  /// 缓冲写入数
  #[inline]
  pub fn pending(&self) -> usize {
    self.buf.len()
  }
}
