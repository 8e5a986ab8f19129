//! In-memory multi-version engine
//! 内存多版本引擎

use std::{
  collections::BTreeMap,
  sync::atomic::{AtomicBool, Ordering::Relaxed},
};

use log::{debug, trace};
use parking_lot::RwLock;
use sdb_base::{Diff, Engine, Key, Mode, Release, Row};

use crate::{Error, Result, Stmts, Txn};

/// One committed version of a row, `None` is a tombstone
/// 行的一个已提交版本，`None` 为删除标记
#[derive(Debug, Clone)]
struct Ver {
  snap: u64,
  row: Option<Row>,
}

#[derive(Default)]
struct Store {
  /// Versions ascending by snapshot
  /// 按快照升序的版本
  map: BTreeMap<Key, Vec<Ver>>,
  /// Last committed snapshot
  /// 最后提交的快照
  last: u64,
}

impl Store {
  fn at(&self, key: &Key, snap: u64) -> Option<&Row> {
    self
      .map
      .get(key)?
      .iter()
      .rev()
      .find(|v| v.snap <= snap)?
      .row
      .as_ref()
  }

  fn exists(&self, key: &Key) -> bool {
    self
      .map
      .get(key)
      .and_then(|li| li.last())
      .is_some_and(|v| v.row.is_some())
  }
}

/// In-memory engine addressed by snapshot
/// 按快照寻址的内存引擎
///
/// Readers pinned at an older snapshot keep seeing old versions until `prune`.
/// 固定在旧快照的读者在 `prune` 之前始终可见旧版本。
#[derive(Default)]
pub struct MemEngine {
  store: RwLock<Store>,
  stmt: Stmts,
  fault: AtomicBool,
}

impl MemEngine {
  pub fn new() -> Self {
    Self::default()
  }

  /// Last committed snapshot
  /// 最后提交的快照
  #[inline]
  pub fn last(&self) -> u64 {
    self.store.read().last
  }

  /// Distinct keys with at least one version
  /// 至少有一个版本的不同键数
  #[inline]
  pub fn key_count(&self) -> usize {
    self.store.read().map.len()
  }

  /// Total stored versions
  /// 存储版本总数
  pub fn ver_count(&self) -> usize {
    self.store.read().map.values().map(Vec::len).sum()
  }

  /// Make the next commit fail with `Error::Fault`
  /// 使下一次提交以 `Error::Fault` 失败
  #[inline]
  pub fn fail_next_commit(&self) {
    self.fault.store(true, Relaxed);
  }

  #[inline]
  pub fn stmt(&self) -> &Stmts {
    &self.stmt
  }

  /// Drop versions no reader at or after `snap` can see
  /// 丢弃快照 `snap` 及之后的读者不可见的版本
  pub fn prune(&self, snap: u64) -> usize {
    let mut store = self.store.write();
    let mut dropped = 0;
    store.map.retain(|_, li| {
      // newest version visible at snap
      let keep = li.iter().rposition(|v| v.snap <= snap).unwrap_or(0);
      dropped += keep;
      li.drain(..keep);
      if li.len() == 1 && li[0].row.is_none() && li[0].snap <= snap {
        dropped += 1;
        return false;
      }
      true
    });
    debug!("prune at {snap}: {dropped} versions");
    dropped
  }
}

impl Engine for MemEngine {
  type Txn = Txn;
  type Error = Error;

  fn begin(&self, mode: Mode, snap: u64) -> Result<Txn> {
    self.stmt.prepare("begin");
    let last = self.store.read().last;
    if snap > last {
      return Err(Error::Future { snap, last });
    }
    Ok(Txn {
      mode,
      snap,
      buf: BTreeMap::new(),
    })
  }

  fn read(&self, txn: &mut Txn, key: &Key) -> Result<Option<Row>> {
    self.stmt.prepare("read");
    if let Some(op) = txn.buf.get(key) {
      return Ok(op.clone());
    }
    Ok(self.store.read().at(key, txn.snap).cloned())
  }

  fn write(&self, txn: &mut Txn, key: Key, row: Row) -> Result<()> {
    if txn.mode != Mode::Write {
      return Err(Error::ReadOnly);
    }
    self.stmt.prepare("write");
    txn.buf.insert(key, Some(row));
    Ok(())
  }

  fn rm(&self, txn: &mut Txn, key: &Key) -> Result<()> {
    if txn.mode != Mode::Write {
      return Err(Error::ReadOnly);
    }
    self.stmt.prepare("rm");
    txn.buf.insert(key.clone(), None);
    Ok(())
  }

  fn commit(&self, txn: Txn, snap: u64) -> Result<Diff> {
    if txn.mode != Mode::Write {
      return Err(Error::ReadOnly);
    }
    self.stmt.prepare("commit");
    if self.fault.swap(false, Relaxed) {
      return Err(Error::Fault);
    }

    let mut store = self.store.write();
    let expect = store.last + 1;
    if snap != expect {
      return Err(Error::SnapOrder { expect, got: snap });
    }

    let mut diff = Diff::default();
    for (key, op) in txn.buf {
      let existed = store.exists(&key);
      match (&op, existed) {
        (Some(_), true) => diff.changed.insert(key.clone()),
        (Some(_), false) => diff.inserted.insert(key.clone()),
        (None, true) => diff.removed.insert(key.clone()),
        // delete of a missing row
        (None, false) => continue,
      };
      store.map.entry(key).or_default().push(Ver { snap, row: op });
    }
    store.last = snap;

    trace!(
      "commit {snap}: changed {} inserted {} removed {}",
      diff.changed.len(),
      diff.inserted.len(),
      diff.removed.len()
    );
    Ok(diff)
  }

  fn rollback(&self, txn: Txn) {
    if !txn.buf.is_empty() {
      trace!("rollback {} buffered writes at {}", txn.buf.len(), txn.snap);
    }
  }

  fn release(&self, tier: Release) {
    let n = self.stmt.release(tier);
    debug!("release {tier:?}: {n} statements");
  }
}
