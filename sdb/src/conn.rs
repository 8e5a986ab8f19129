//! Connection: private caches pinned to one snapshot at a time
//! 连接：每次固定于一个快照的私有缓存
//!
//! Every transaction begins with synchronization: the connection jumps to the latest
//! snapshot and drops exactly the cached keys changed in between, or everything when
//! the change log no longer reaches back far enough.
//! 每个事务以同步开始：连接跳到最新快照，只丢弃期间变更的缓存键；
//! 若变更日志已回溯不到，则全部丢弃。

use std::{
  collections::HashMap,
  sync::{Arc, atomic::Ordering::Relaxed},
};

use log::{debug, warn};
use sdb_base::{Engine, Key, Mode, Release};
use sdb_lru::{Cache, Lru, Stat};

use crate::{
  ChangeSet, Codec, ConnConf, Error, ReadTxn, Result, Since, Trim, WriteTxn,
  conf::{DEFAULT_META_LIMIT, DEFAULT_OBJ_LIMIT},
  db::{Peer, Shared},
  txn::{Ctx, Pending},
};

/// Per-connection cache counters
/// 连接级缓存计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnStat {
  pub obj: Stat,
  pub meta: Stat,
}

/// Object cache + metadata cache
/// 对象缓存 + 元数据缓存
///
/// The metadata cache stores `None` for rows that exist without metadata.
/// 元数据缓存对存在但无元数据的行存 `None`。
pub(crate) struct Caches<V, M> {
  pub obj: Lru<Key, Arc<V>>,
  pub meta: Lru<Key, Option<Arc<M>>>,
}

impl<V, M> Caches<V, M> {
  fn new() -> Self {
    Self {
      obj: Lru::new(DEFAULT_OBJ_LIMIT),
      meta: Lru::new(DEFAULT_META_LIMIT),
    }
  }

  pub fn conf(&mut self, conf: &[ConnConf]) {
    for c in conf {
      match *c {
        ConnConf::ObjCache(on) => self.obj.set_enabled(on),
        ConnConf::ObjLimit(n) => self.obj.set_limit(n),
        ConnConf::MetaCache(on) => self.meta.set_enabled(on),
        ConnConf::MetaLimit(n) => self.meta.set_limit(n),
      }
    }
  }

  fn invalidate(&mut self, since: &Since) {
    match since {
      Since::Keys(keys) => {
        self.obj.rm_all(keys);
        self.meta.rm_all(keys);
      }
      Since::Full => {
        self.obj.clear();
        self.meta.clear();
      }
    }
  }

  /// Apply own commit: drop touched keys, then write through what this transaction wrote
  /// 应用自身提交：丢弃涉及的键，再写穿本事务写入的值
  fn apply(&mut self, cs: &ChangeSet, pending: HashMap<Key, Pending<V, M>>) {
    self.obj.rm_all(cs.keys());
    self.meta.rm_all(cs.keys());
    for (key, p) in pending {
      match p {
        Pending::Put { val, meta } => {
          self.obj.set(key.clone(), val);
          self.meta.set(key, meta);
        }
        Pending::Meta(meta) => self.meta.set(key, meta),
        Pending::Rm => {}
      }
    }
  }

  fn trim(&mut self, level: Trim) {
    self.obj.clear();
    let limit = self.meta.limit();
    if limit > 0 {
      self.meta.set_limit((limit / 2).max(1));
    }
    if level >= Trim::Moderate {
      self.meta.clear();
    }
  }
}

/// Client handle with its own snapshot and caches
/// 拥有独立快照与缓存的客户端句柄
///
/// Holds a strong reference to the database state.
/// 持有数据库状态的强引用。
pub struct Conn<E: Engine, C: Codec> {
  db: Arc<Shared<E, C>>,
  peer: Arc<Peer>,
  snap: u64,
  cache: Caches<C::Val, C::Meta>,
}

impl<E: Engine, C: Codec> Conn<E, C> {
  pub(crate) fn new(db: Arc<Shared<E, C>>, peer: Arc<Peer>) -> Self {
    let snap = peer.snap.load(Relaxed);
    let mut cache = Caches::new();
    cache.conf(db.conn_conf());
    Self {
      db,
      peer,
      snap,
      cache,
    }
  }

  #[inline]
  pub fn id(&self) -> u64 {
    self.peer.id
  }

  /// Snapshot the connection is synchronized to
  /// 连接已同步到的快照
  #[inline]
  pub fn snap(&self) -> u64 {
    self.snap
  }

  /// Apply configuration items
  /// 应用配置项
  #[inline]
  pub fn conf(&mut self, conf: &[ConnConf]) {
    self.cache.conf(conf);
  }

  #[inline]
  pub fn obj_enabled(&self) -> bool {
    self.cache.obj.is_enabled()
  }

  #[inline]
  pub fn obj_limit(&self) -> usize {
    self.cache.obj.limit()
  }

  #[inline]
  pub fn meta_enabled(&self) -> bool {
    self.cache.meta.is_enabled()
  }

  #[inline]
  pub fn meta_limit(&self) -> usize {
    self.cache.meta.limit()
  }

  #[inline]
  pub fn obj_len(&self) -> usize {
    self.cache.obj.len()
  }

  #[inline]
  pub fn meta_len(&self) -> usize {
    self.cache.meta.len()
  }

  /// Is the object of `key` cached (no recency change)
  /// `key` 的对象是否已缓存（不改变最近使用顺序）
  #[inline]
  pub fn obj_cached(&self, key: &Key) -> bool {
    self.cache.obj.contains(key)
  }

  #[inline]
  pub fn meta_cached(&self, key: &Key) -> bool {
    self.cache.meta.contains(key)
  }

  #[inline]
  pub fn stat(&self) -> ConnStat {
    ConnStat {
      obj: self.cache.obj.stat(),
      meta: self.cache.meta.stat(),
    }
  }

  /// Release memory under pressure, never touches snapshot state
  /// 内存压力下释放内存，不改变快照状态
  pub fn trim(&mut self, level: Trim) {
    self.cache.trim(level);
    match level {
      Trim::Mild => {}
      Trim::Moderate => self.db.engine.release(Release::Uncommon),
      Trim::Full => self.db.engine.release(Release::All),
    }
    debug!(
      "conn {} trim {level:?}: meta limit {}",
      self.peer.id,
      self.cache.meta.limit()
    );
  }

  /// Jump to the latest snapshot, dropping cached keys changed in between
  /// 跳到最新快照，丢弃期间变更的缓存键
  fn sync(&mut self) {
    let Some((now, since)) = self.db.sync(&self.peer, self.snap) else {
      return;
    };
    match &since {
      Since::Full => warn!(
        "conn {} at {} fell behind change log, full invalidation to {now}",
        self.peer.id, self.snap
      ),
      Since::Keys(keys) => debug!(
        "conn {} sync {} -> {now}: {} keys",
        self.peer.id,
        self.snap,
        keys.len()
      ),
    }
    self.cache.invalidate(&since);
    self.snap = now;
  }

  /// Run `f` in a read transaction at the latest snapshot
  /// 在最新快照的读事务中运行 `f`
  ///
  /// Commits by other connections during `f` are not visible inside it.
  /// `f` 运行期间其他连接的提交在其中不可见。
  pub fn read<R>(&mut self, f: impl FnOnce(&mut ReadTxn<'_, E, C>) -> Result<R>) -> Result<R> {
    self.sync();
    let db = &*self.db;
    let mut txn = db.engine.begin(Mode::Read, self.snap).map_err(Error::store)?;
    let r = f(&mut ReadTxn::new(Ctx {
      db,
      cache: &mut self.cache,
      txn: &mut txn,
      snap: self.snap,
    }));
    db.engine.rollback(txn);
    r
  }

  /// Run `f` in the single database-wide write transaction
  /// 在数据库唯一的写事务中运行 `f`
  ///
  /// Blocks until write admission is granted. On error from `f` or the engine nothing
  /// is published and the caches and snapshot stay as they were.
  /// 阻塞直到获得写准入。`f` 或引擎出错时不发布任何内容，缓存与快照保持不变。
  pub fn write<R>(&mut self, f: impl FnOnce(&mut WriteTxn<'_, E, C>) -> Result<R>) -> Result<R> {
    let db = Arc::clone(&self.db);
    let _token = db.admit()?;
    self.sync();

    let snap = self.snap;
    let mut txn = db.engine.begin(Mode::Write, snap).map_err(Error::store)?;
    let mut w = WriteTxn::new(Ctx {
      db: &db,
      cache: &mut self.cache,
      txn: &mut txn,
      snap,
    });
    let r = f(&mut w);
    let pending = w.into_pending();

    let r = match r {
      Ok(r) => r,
      Err(e) => {
        db.engine.rollback(txn);
        debug!("conn {} abort write at {snap}: {e}", self.peer.id);
        return Err(e);
      }
    };

    let diff = db.engine.commit(txn, snap + 1).map_err(Error::store)?;
    let cs = db.commit(&self.peer, diff);
    self.cache.apply(&cs, pending);
    self.snap = cs.snap;
    Ok(r)
  }
}

impl<E: Engine, C: Codec> Drop for Conn<E, C> {
  fn drop(&mut self) {
    self.db.deregister(self.peer.id);
    debug!("conn {} closed at {}", self.peer.id, self.snap);
  }
}
