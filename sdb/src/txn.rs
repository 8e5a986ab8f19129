//! Read and read-write transaction scopes
//! 读事务与读写事务作用域

use std::{collections::HashMap, sync::Arc};

use log::trace;
use sdb_base::{Engine, Key, Row};
use sdb_lru::Cache;

use crate::{Codec, ConnConf, Error, Result, conn::Caches, db::Shared};

/// Everything a transaction body touches
/// 事务体访问的全部内容
pub(crate) struct Ctx<'a, E: Engine, C: Codec> {
  pub db: &'a Shared<E, C>,
  pub cache: &'a mut Caches<C::Val, C::Meta>,
  pub txn: &'a mut E::Txn,
  pub snap: u64,
}

impl<E: Engine, C: Codec> Ctx<'_, E, C> {
  #[inline]
  fn row(&mut self, key: &Key) -> Result<Option<Row>> {
    self.db.engine.read(self.txn, key).map_err(Error::store)
  }

  fn get(&mut self, key: &Key) -> Result<Option<Arc<C::Val>>> {
    if let Some(val) = self.cache.obj.get(key) {
      trace!("obj hit {key}");
      return Ok(Some(Arc::clone(val)));
    }
    trace!("obj miss {key}");
    let Some(row) = self.row(key)? else {
      return Ok(None);
    };
    let val = Arc::new(self.db.codec.val_decode(&row.val).map_err(Error::Codec)?);
    self.cache.obj.set(key.clone(), Arc::clone(&val));
    Ok(Some(val))
  }

  fn meta(&mut self, key: &Key) -> Result<Option<Arc<C::Meta>>> {
    if let Some(meta) = self.cache.meta.get(key) {
      trace!("meta hit {key}");
      return Ok(meta.clone());
    }
    trace!("meta miss {key}");
    let Some(row) = self.row(key)? else {
      return Ok(None);
    };
    let meta = match row.meta {
      Some(bin) => Some(Arc::new(
        self.db.codec.meta_decode(&bin).map_err(Error::Codec)?,
      )),
      None => None,
    };
    self.cache.meta.set(key.clone(), meta.clone());
    Ok(meta)
  }

  fn has(&mut self, key: &Key) -> Result<bool> {
    // cached entries only exist for existing rows
    if self.cache.obj.contains(key) || self.cache.meta.contains(key) {
      return Ok(true);
    }
    Ok(self.row(key)?.is_some())
  }
}

/// Read transaction, pinned to the snapshot it began at
/// 读事务，固定在开始时的快照
pub struct ReadTxn<'a, E: Engine, C: Codec>(Ctx<'a, E, C>);

impl<'a, E: Engine, C: Codec> ReadTxn<'a, E, C> {
  #[inline]
  pub(crate) fn new(ctx: Ctx<'a, E, C>) -> Self {
    Self(ctx)
  }

  #[inline]
  pub fn snap(&self) -> u64 {
    self.0.snap
  }

  /// Get deserialized value
  /// 获取反序列化后的值
  #[inline]
  pub fn get(&mut self, key: impl Into<Key>) -> Result<Option<Arc<C::Val>>> {
    self.0.get(&key.into())
  }

  /// Get deserialized metadata, `None` if the row is missing or has none
  /// 获取反序列化后的元数据，行不存在或无元数据时为 `None`
  #[inline]
  pub fn meta(&mut self, key: impl Into<Key>) -> Result<Option<Arc<C::Meta>>> {
    self.0.meta(&key.into())
  }

  #[inline]
  pub fn has(&mut self, key: impl Into<Key>) -> Result<bool> {
    self.0.has(&key.into())
  }

  /// Reconfigure the connection caches
  /// 重新配置连接缓存
  #[inline]
  pub fn conf(&mut self, conf: &[ConnConf]) {
    self.0.cache.conf(conf);
  }
}

/// Uncommitted write, applied to the own caches only after commit
/// 未提交的写入，仅在提交后应用到自身缓存
pub(crate) enum Pending<V, M> {
  Put { val: Arc<V>, meta: Option<Arc<M>> },
  Meta(Option<Arc<M>>),
  Rm,
}

/// Read-write transaction, holds the database write admission
/// 读写事务，持有数据库写准入
pub struct WriteTxn<'a, E: Engine, C: Codec> {
  ctx: Ctx<'a, E, C>,
  pending: HashMap<Key, Pending<C::Val, C::Meta>>,
}

impl<'a, E: Engine, C: Codec> WriteTxn<'a, E, C> {
  #[inline]
  pub(crate) fn new(ctx: Ctx<'a, E, C>) -> Self {
    Self {
      ctx,
      pending: HashMap::new(),
    }
  }

  #[inline]
  pub(crate) fn into_pending(self) -> HashMap<Key, Pending<C::Val, C::Meta>> {
    self.pending
  }

  /// Snapshot this transaction began at, commit publishes `snap + 1`
  /// 本事务开始时的快照，提交发布 `snap + 1`
  #[inline]
  pub fn snap(&self) -> u64 {
    self.ctx.snap
  }

  /// Get value, own writes first
  /// 获取值，优先本事务的写入
  pub fn get(&mut self, key: impl Into<Key>) -> Result<Option<Arc<C::Val>>> {
    let key = key.into();
    match self.pending.get(&key) {
      Some(Pending::Put { val, .. }) => Ok(Some(Arc::clone(val))),
      Some(Pending::Rm) => Ok(None),
      Some(Pending::Meta(_)) | None => self.ctx.get(&key),
    }
  }

  pub fn meta(&mut self, key: impl Into<Key>) -> Result<Option<Arc<C::Meta>>> {
    let key = key.into();
    match self.pending.get(&key) {
      Some(Pending::Put { meta, .. } | Pending::Meta(meta)) => Ok(meta.clone()),
      Some(Pending::Rm) => Ok(None),
      None => self.ctx.meta(&key),
    }
  }

  pub fn has(&mut self, key: impl Into<Key>) -> Result<bool> {
    let key = key.into();
    match self.pending.get(&key) {
      Some(Pending::Put { .. } | Pending::Meta(_)) => Ok(true),
      Some(Pending::Rm) => Ok(false),
      None => self.ctx.has(&key),
    }
  }

  /// Insert or replace value and metadata
  /// 插入或替换值与元数据
  pub fn set(&mut self, key: impl Into<Key>, val: C::Val, meta: Option<C::Meta>) -> Result<()> {
    let key = key.into();
    let codec = &self.ctx.db.codec;
    let row = Row::new(
      codec.val_encode(&val).map_err(Error::Codec)?,
      match &meta {
        Some(m) => Some(codec.meta_encode(m).map_err(Error::Codec)?.into()),
        None => None,
      },
    );
    self
      .ctx
      .db
      .engine
      .write(self.ctx.txn, key.clone(), row)
      .map_err(Error::store)?;
    self.pending.insert(
      key,
      Pending::Put {
        val: Arc::new(val),
        meta: meta.map(Arc::new),
      },
    );
    Ok(())
  }

  /// Replace metadata of an existing row, returns false if the row is missing
  /// 替换已有行的元数据，行不存在时返回 false
  pub fn set_meta(&mut self, key: impl Into<Key>, meta: Option<C::Meta>) -> Result<bool> {
    let key = key.into();
    let Some(row) = self.ctx.row(&key)? else {
      return Ok(false);
    };
    let bin = match &meta {
      Some(m) => Some(self.ctx.db.codec.meta_encode(m).map_err(Error::Codec)?.into()),
      None => None,
    };
    self
      .ctx
      .db
      .engine
      .write(self.ctx.txn, key.clone(), Row::new(row.val, bin))
      .map_err(Error::store)?;

    let meta = meta.map(Arc::new);
    let p = match self.pending.remove(&key) {
      Some(Pending::Put { val, .. }) => Pending::Put { val, meta },
      _ => Pending::Meta(meta),
    };
    self.pending.insert(key, p);
    Ok(true)
  }

  /// Delete row
  /// 删除行
  pub fn rm(&mut self, key: impl Into<Key>) -> Result<()> {
    let key = key.into();
    self
      .ctx
      .db
      .engine
      .rm(self.ctx.txn, &key)
      .map_err(Error::store)?;
    self.pending.insert(key, Pending::Rm);
    Ok(())
  }

  #[inline]
  pub fn conf(&mut self, conf: &[ConnConf]) {
    self.ctx.cache.conf(conf);
  }
}
