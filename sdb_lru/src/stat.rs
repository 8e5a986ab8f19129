//! Cache counters
//! 缓存计数器

use std::ops::AddAssign;

/// Hit / miss / evict counters
/// 命中 / 未命中 / 淘汰计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stat {
  pub hit: u64,
  pub miss: u64,
  /// Capacity evictions only, invalidation and clear are not counted
  /// 仅容量淘汰，失效与清空不计入
  pub evict: u64,
}

impl Stat {
  /// Hit ratio in [0, 1], 0 when nothing was looked up
  /// 命中率 [0, 1]，无查询时为 0
  pub fn hit_ratio(&self) -> f64 {
    let total = self.hit + self.miss;
    if total == 0 {
      0.0
    } else {
      self.hit as f64 / total as f64
    }
  }
}

impl AddAssign for Stat {
  fn add_assign(&mut self, rhs: Self) {
    self.hit += rhs.hit;
    self.miss += rhs.miss;
    self.evict += rhs.evict;
  }
}
