//! Snapshot clock and bounded change log
//! 快照时钟与有界变更日志
//!
//! Changesets are appended in clock order and trimmed from the front only, so retained
//! snapshots are always contiguous: `li[i].snap == oldest + i`.
//! 变更集按时钟顺序追加，只从头部裁剪，因此保留的快照总是连续的：`li[i].snap == oldest + i`。

use std::{
  collections::{HashSet, VecDeque},
  sync::Arc,
};

use log::warn;
use sdb_base::{Diff, Key};

use crate::ChangeSet;

/// Monotonic snapshot counter, starts at 0
/// 单调快照计数器，从 0 开始
#[derive(Debug, Default)]
pub struct Clock(u64);

impl Clock {
  #[inline]
  pub fn now(&self) -> u64 {
    self.0
  }

  #[inline]
  fn tick(&mut self) -> u64 {
    self.0 += 1;
    self.0
  }
}

/// Keys changed since a snapshot
/// 自某快照以来变更的键
#[derive(Debug, PartialEq, Eq)]
pub enum Since {
  /// Union of every changeset in (snap, now]
  /// (snap, now] 内所有变更集的并集
  Keys(HashSet<Key>),
  /// History trimmed past snap, caller must drop everything
  /// 历史已裁剪越过 snap，调用方须全部丢弃
  Full,
}

/// Recent changesets, oldest first
/// 近期变更集，最旧在前
#[derive(Debug)]
pub struct ChangeLog {
  clock: Clock,
  li: VecDeque<Arc<ChangeSet>>,
  cap: usize,
}

impl ChangeLog {
  /// Create with retention bound (min 1)
  /// 创建，指定保留上限（最小 1）
  pub fn new(cap: usize) -> Self {
    Self {
      clock: Clock::default(),
      li: VecDeque::new(),
      cap: cap.max(1),
    }
  }

  #[inline]
  pub fn now(&self) -> u64 {
    self.clock.now()
  }

  #[inline]
  pub fn cap(&self) -> usize {
    self.cap
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.li.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.li.is_empty()
  }

  /// Snapshot of the oldest retained changeset
  /// 最旧保留变更集的快照
  #[inline]
  pub fn oldest(&self) -> Option<u64> {
    self.li.front().map(|c| c.snap)
  }

  /// Advance clock, stamp and append the diff
  /// 推进时钟，标记并追加差异
  ///
  /// Caller must hold the write admission token.
  /// 调用方须持有写准入令牌。
  pub fn commit(&mut self, diff: Diff) -> Arc<ChangeSet> {
    let snap = self.clock.tick();
    let cs = Arc::new(ChangeSet::new(snap, diff));
    self.li.push_back(Arc::clone(&cs));
    if self.li.len() > self.cap {
      let n = self.li.len() - self.cap;
      self.li.drain(..n);
      warn!(
        "change log over {}, dropped {n}, lagging connections before {} will fully invalidate",
        self.cap,
        self.oldest().unwrap_or(snap)
      );
    }
    cs
  }

  /// Keys changed in (snap, now]
  /// (snap, now] 内变更的键
  pub fn since(&self, snap: u64) -> Since {
    let now = self.now();
    if snap >= now {
      return Since::Keys(HashSet::new());
    }
    let Some(oldest) = self.oldest() else {
      return Since::Full;
    };
    if oldest > snap + 1 {
      return Since::Full;
    }
    let start = (snap + 1 - oldest) as usize;
    let mut keys = HashSet::new();
    for cs in self.li.range(start..) {
      keys.extend(cs.keys().cloned());
    }
    Since::Keys(keys)
  }

  /// Drop changesets every live connection has already passed
  /// 丢弃所有存活连接都已越过的变更集
  pub fn trim_upto(&mut self, snap: u64) -> usize {
    let mut n = 0;
    while self.li.front().is_some_and(|c| c.snap <= snap) {
      self.li.pop_front();
      n += 1;
    }
    n
  }
}
