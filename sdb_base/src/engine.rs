//! Storage engine trait
//! 存储引擎 trait
//!
//! The connection layer only needs snapshot-addressed transactions, row reads and writes,
//! and a commit that reports which keys changed. Durability and on-disk layout are the
//! engine's concern.
//! 连接层只需要按快照寻址的事务、行读写，以及报告变更键的提交。
//! 持久性与磁盘布局由引擎负责。

use std::error::Error;

use crate::{Diff, Key, Row};

/// Transaction mode
/// 事务模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Read,
  Write,
}

/// Tier of precompiled statements to release
/// 释放预编译语句的层级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
  /// Only infrequently used handles
  /// 仅不常用的句柄
  Uncommon,
  /// Every handle
  /// 全部句柄
  All,
}

/// Backing storage engine
/// 后端存储引擎
///
/// Write transactions are serialized by the caller: at most one is open at any time,
/// and its `commit` is called with `snap + 1` where `snap` is the snapshot it began at.
/// 写事务由调用方串行化：任意时刻至多一个写事务，
/// 其 `commit` 以 `snap + 1` 调用，`snap` 为开始时的快照。
pub trait Engine: Send + Sync {
  type Txn: Send;
  type Error: Error + Send + Sync + 'static;

  /// Begin transaction observing state as of `snap`
  /// 开始事务，观察 `snap` 时的状态
  fn begin(&self, mode: Mode, snap: u64) -> Result<Self::Txn, Self::Error>;

  /// Read row; write transactions see their own writes
  /// 读取行；写事务可见自身写入
  fn read(&self, txn: &mut Self::Txn, key: &Key) -> Result<Option<Row>, Self::Error>;

  /// Insert or replace row
  /// 插入或替换行
  fn write(&self, txn: &mut Self::Txn, key: Key, row: Row) -> Result<(), Self::Error>;

  /// Delete row
  /// 删除行
  fn rm(&self, txn: &mut Self::Txn, key: &Key) -> Result<(), Self::Error>;

  /// Commit as snapshot `snap`, report touched keys
  /// 以快照 `snap` 提交，返回涉及的键
  fn commit(&self, txn: Self::Txn, snap: u64) -> Result<Diff, Self::Error>;

  /// Discard transaction (read end or write abort)
  /// 丢弃事务（读结束或写中止）
  fn rollback(&self, txn: Self::Txn);

  /// Release precompiled statement handles
  /// 释放预编译语句句柄
  fn release(&self, tier: Release);
}
