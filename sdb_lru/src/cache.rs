//! Cache trait definition
//! 缓存 trait 定义

/// Cache trait for basic operations
/// 缓存基本操作 trait
///
/// # Complexity
/// 复杂度
///
/// All implementations should provide:
/// 所有实现应提供：
/// - get: O(1)
/// - set: O(1) amortized
/// - rm: O(1)
/// - rm_all: O(n) in the number of keys given, not in cache size
///   O(n)，n 为传入键数，与缓存大小无关
///
/// Every operation is total, none can fail.
/// 所有操作都是全函数，不会失败。
pub trait Cache<K, V> {
  /// Get value by key, counts as use
  /// 按键获取值，计为一次使用
  fn get(&mut self, key: &K) -> Option<&V>;

  /// Insert key-value pair, counts as use
  /// 插入键值对，计为一次使用
  fn set(&mut self, key: K, val: V);

  /// Remove by key
  /// 按键删除
  fn rm(&mut self, key: &K);

  /// Remove every given key
  /// 删除所有给定的键
  fn rm_all<'a, I>(&mut self, keys: I)
  where
    I: IntoIterator<Item = &'a K>,
    K: 'a,
  {
    for key in keys {
      self.rm(key);
    }
  }

  /// Remove everything
  /// 清空
  fn clear(&mut self);
}
