//! Prepared statement table
//! 预编译语句表
//!
//! Each engine operation goes through a named statement; the use count decides which
//! statements are uncommon and can be dropped under mild memory pressure.
//! 每个引擎操作都经过一个具名语句；使用次数决定哪些语句不常用，可在轻度内存压力下释放。

use std::collections::HashMap;

use parking_lot::Mutex;
use sdb_base::Release;

/// Below this use count a statement is uncommon
/// 使用次数低于此值的语句视为不常用
pub const COMMON_USES: u64 = 8;

#[derive(Default)]
pub struct Stmts(Mutex<HashMap<&'static str, u64>>);

impl Stmts {
  /// Prepare (or reuse) statement
  /// 预编译（或复用）语句
  #[inline]
  pub fn prepare(&self, name: &'static str) {
    *self.0.lock().entry(name).or_default() += 1;
  }

  pub fn release(&self, tier: Release) -> usize {
    let mut map = self.0.lock();
    let before = map.len();
    match tier {
      Release::Uncommon => map.retain(|_, uses| *uses >= COMMON_USES),
      Release::All => map.clear(),
    }
    before - map.len()
  }

  pub fn len(&self) -> usize {
    self.0.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn uses(&self, name: &str) -> u64 {
    self.0.lock().get(name).copied().unwrap_or(0)
  }
}
