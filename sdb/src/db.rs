//! Database: snapshot clock, change log, write admission and connection registry
//! 数据库：快照时钟、变更日志、写准入与连接注册表

use std::{
  collections::HashMap,
  sync::{
    Arc, Weak,
    atomic::{
      AtomicU64,
      Ordering::{Acquire, Relaxed, Release},
    },
  },
};

use log::{debug, error, trace};
use parking_lot::{Mutex, MutexGuard};
use sdb_base::{Diff, Engine};

use crate::{
  ChangeLog, ChangeSet, Codec, Conf, Conn, Error, Result, Since,
  conf::{ConnConf, DbConf},
};

/// Registry entry of a live connection
/// 存活连接的注册项
///
/// The registry only holds `Weak<Peer>`, it never keeps a connection alive.
/// 注册表只持有 `Weak<Peer>`，从不延长连接的生命周期。
#[derive(Debug)]
pub(crate) struct Peer {
  pub id: u64,
  /// Snapshot the connection has synchronized to, drives change log retention
  /// 连接已同步到的快照，决定变更日志的保留
  pub snap: AtomicU64,
  /// Latest snapshot pushed by a commit
  /// 提交推送的最新快照
  pub notified: AtomicU64,
}

impl Peer {
  fn new(id: u64, snap: u64) -> Self {
    Self {
      id,
      snap: AtomicU64::new(snap),
      notified: AtomicU64::new(snap),
    }
  }
}

/// State shared across connections, guarded by one mutex
/// 连接间共享的状态，由一把互斥锁保护
struct State {
  log: ChangeLog,
  peers: HashMap<u64, Weak<Peer>>,
}

impl State {
  /// Trim changesets every registered connection has passed
  /// 裁剪所有已注册连接都已越过的变更集
  fn trim(&mut self) {
    let min = self
      .peers
      .values()
      .filter_map(Weak::upgrade)
      .map(|p| p.snap.load(Relaxed))
      .min()
      .unwrap_or_else(|| self.log.now());
    let n = self.log.trim_upto(min);
    if n > 0 {
      trace!("change log trimmed {n} up to {min}");
    }
  }
}

pub(crate) struct Shared<E: Engine, C: Codec> {
  pub engine: E,
  pub codec: C,
  conf: DbConf,
  state: Mutex<State>,
  /// Single-writer admission token
  /// 单写者准入令牌
  admit: Mutex<()>,
  next_id: AtomicU64,
}

impl<E: Engine, C: Codec> Shared<E, C> {
  /// Acquire write admission, blocking or bounded by `Conf::AdmitTimeout`
  /// 获取写准入，阻塞或受 `Conf::AdmitTimeout` 限时
  pub fn admit(&self) -> Result<MutexGuard<'_, ()>> {
    match self.conf.admit_timeout {
      None => Ok(self.admit.lock()),
      Some(d) => self.admit.try_lock_for(d).ok_or(Error::AdmitTimeout(d)),
    }
  }

  /// Resolve what a connection at `local` must drop to reach the latest snapshot
  /// 计算处于 `local` 的连接到达最新快照须丢弃的内容
  ///
  /// Returns `None` when already current.
  /// 已是最新时返回 `None`。
  pub fn sync(&self, peer: &Peer, local: u64) -> Option<(u64, Since)> {
    if peer.notified.load(Acquire) == local {
      return None;
    }
    let mut state = self.state.lock();
    let now = state.log.now();
    if now == local {
      return None;
    }
    let since = state.log.since(local);
    peer.snap.store(now, Relaxed);
    state.trim();
    Some((now, since))
  }

  /// Stamp and append the diff, push the new snapshot to every other connection
  /// 标记并追加差异，向其他所有连接推送新快照
  ///
  /// Caller holds the admission token and has committed the diff to the engine.
  /// 调用方持有准入令牌，且已将差异提交到引擎。
  pub fn commit(&self, from: &Peer, diff: Diff) -> Arc<ChangeSet> {
    let mut state = self.state.lock();
    let cs = state.log.commit(diff);
    let snap = cs.snap;

    // committer applies its own diff in place
    from.snap.store(snap, Relaxed);
    from.notified.store(snap, Release);

    let mut notified = 0usize;
    state.peers.retain(|&id, w| match w.upgrade() {
      Some(p) => {
        if id != from.id {
          p.notified.fetch_max(snap, Release);
          notified += 1;
        }
        true
      }
      None => false,
    });
    state.trim();
    debug!(
      "commit {snap} by conn {}: {} keys, notified {notified}",
      from.id,
      cs.len()
    );
    cs
  }

  /// Register a connection at the latest snapshot
  /// 在最新快照注册连接
  fn register(&self) -> Arc<Peer> {
    let mut state = self.state.lock();
    let id = self.next_id.fetch_add(1, Relaxed);
    let peer = Arc::new(Peer::new(id, state.log.now()));
    state.peers.insert(id, Arc::downgrade(&peer));
    peer
  }

  pub fn deregister(&self, id: u64) {
    let mut state = self.state.lock();
    state.peers.remove(&id);
    state.trim();
  }

  pub fn conn_conf(&self) -> &[ConnConf] {
    &self.conf.conn
  }

  fn conn_count(&self) -> usize {
    self
      .state
      .lock()
      .peers
      .values()
      .filter(|w| w.strong_count() > 0)
      .count()
  }
}

/// Database handle
/// 数据库句柄
///
/// Connections hold strong references to the shared state, so it outlives every
/// connection. Closing or dropping the handle while connections are alive is a
/// programming error and is reported.
/// 连接持有共享状态的强引用，因此共享状态比所有连接活得久。
/// 仍有连接存活时关闭或丢弃句柄属于编程错误，会被报告。
pub struct Db<E: Engine, C: Codec> {
  shared: Arc<Shared<E, C>>,
  reported: bool,
}

impl<E: Engine, C: Codec> Db<E, C> {
  /// Open database over an engine
  /// 基于引擎打开数据库
  ///
  /// The clock starts at 0, the engine must not hold commits yet.
  /// 时钟从 0 开始，引擎尚不应有提交。
  pub fn open(engine: E, codec: C, conf: &[Conf]) -> Self {
    let conf = DbConf::from_items(conf);
    let log = ChangeLog::new(conf.log_cap);
    debug!(
      "open db: log cap {}, admit timeout {:?}",
      log.cap(),
      conf.admit_timeout
    );
    Self {
      shared: Arc::new(Shared {
        engine,
        codec,
        conf,
        state: Mutex::new(State {
          log,
          peers: HashMap::new(),
        }),
        admit: Mutex::new(()),
        next_id: AtomicU64::new(1),
      }),
      reported: false,
    }
  }

  /// Open a new connection at the latest snapshot
  /// 在最新快照打开新连接
  pub fn conn(&self) -> Conn<E, C> {
    let peer = self.shared.register();
    debug!("conn {} opened at {}", peer.id, peer.snap.load(Relaxed));
    Conn::new(Arc::clone(&self.shared), peer)
  }

  /// Latest committed snapshot
  /// 最新提交的快照
  #[inline]
  pub fn now(&self) -> u64 {
    self.shared.state.lock().log.now()
  }

  /// Live connection count
  /// 存活连接数
  #[inline]
  pub fn conn_count(&self) -> usize {
    self.shared.conn_count()
  }

  /// Retained changeset count
  /// 保留的变更集数
  #[inline]
  pub fn log_len(&self) -> usize {
    self.shared.state.lock().log.len()
  }

  #[inline]
  pub fn engine(&self) -> &E {
    &self.shared.engine
  }

  /// Tear down, fails while any connection is alive
  /// 关闭，仍有连接存活时失败
  pub fn close(mut self) -> Result<()> {
    let n = self.conn_count();
    if n > 0 {
      self.reported = true;
      return Err(Error::ConnAlive(n));
    }
    debug!("db closed");
    Ok(())
  }
}

impl<E: Engine, C: Codec> Drop for Db<E, C> {
  fn drop(&mut self) {
    if self.reported {
      return;
    }
    let n = self.conn_count();
    if n > 0 {
      error!("db dropped with {n} live connection(s), state kept until they close");
    }
  }
}
