//! LRU (Least Recently Used) cache
//! LRU（最近最少使用）缓存
//!
//! # Complexity
//! 复杂度
//!
//! - get: O(1)
//! - set: O(1)
//! - rm: O(1)
//! - set_limit: O(evicted)
//!
//! Based on hashlink::LruCache with linked list for O(1) access order tracking.
//! 基于 hashlink::LruCache，用链表实现 O(1) 访问顺序跟踪。

use std::hash::Hash;

use hashlink::LruCache;

use crate::{Cache, Stat};

/// Map limit to hashlink capacity, 0 = unbounded
/// 限额映射为 hashlink 容量，0 = 无上限
#[inline(always)]
const fn cap(limit: usize) -> usize {
  if limit == 0 { usize::MAX } else { limit }
}

/// LRU cache with runtime limit and on/off switch
/// 运行时可调限额且可开关的 LRU 缓存
///
/// Evicts least recently used items when full.
/// 满时淘汰最近最少使用的条目。
pub struct Lru<K: Hash + Eq, V> {
  map: LruCache<K, V>,
  limit: usize,
  on: bool,
  stat: Stat,
}

impl<K: Hash + Eq, V> Lru<K, V> {
  /// Create with limit (0 = unbounded), enabled
  /// 创建，指定限额（0 = 无上限），默认启用
  #[inline]
  pub fn new(limit: usize) -> Self {
    Self {
      map: LruCache::new(cap(limit)),
      limit,
      on: true,
      stat: Stat::default(),
    }
  }

  #[inline]
  pub fn limit(&self) -> usize {
    self.limit
  }

  /// Change limit, evicting down to it immediately
  /// 修改限额，立即淘汰至新限额
  pub fn set_limit(&mut self, limit: usize) {
    let before = self.map.len();
    self.map.set_capacity(cap(limit));
    self.stat.evict += (before - self.map.len()) as u64;
    self.limit = limit;
  }

  #[inline]
  pub fn is_enabled(&self) -> bool {
    self.on
  }

  /// Enable or disable; disabling drops every entry
  /// 启用或禁用；禁用时丢弃所有条目
  pub fn set_enabled(&mut self, on: bool) {
    if !on {
      self.map.clear();
    }
    self.on = on;
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.map.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }

  /// Check presence without touching recency or stats
  /// 检查是否存在，不影响最近使用顺序与统计
  #[inline]
  pub fn contains(&self, key: &K) -> bool {
    self.map.contains_key(key)
  }

  /// Keys from least to most recently used
  /// 从最久到最近使用的键
  #[inline]
  pub fn keys(&self) -> impl Iterator<Item = &K> {
    self.map.iter().map(|(k, _)| k)
  }

  #[inline]
  pub fn stat(&self) -> Stat {
    self.stat
  }

  #[inline]
  pub fn reset_stat(&mut self) {
    self.stat = Stat::default();
  }
}

impl<K: Hash + Eq, V> Cache<K, V> for Lru<K, V> {
  #[inline]
  fn get(&mut self, key: &K) -> Option<&V> {
    if !self.on {
      self.stat.miss += 1;
      return None;
    }
    let r = self.map.get(key);
    if r.is_some() {
      self.stat.hit += 1;
    } else {
      self.stat.miss += 1;
    }
    r
  }

  #[inline]
  fn set(&mut self, key: K, val: V) {
    if !self.on {
      return;
    }
    if self.limit != 0 && self.map.len() >= self.limit && !self.map.contains_key(&key) {
      self.stat.evict += 1;
    }
    self.map.insert(key, val);
  }

  #[inline]
  fn rm(&mut self, key: &K) {
    self.map.remove(key);
  }

  #[inline]
  fn clear(&mut self) {
    self.map.clear();
  }
}
