//! Memory trim levels
//! 内存清理级别

use crate::Error;

/// Memory pressure response, strictly increasing in aggressiveness
/// 内存压力响应，激进程度严格递增
///
/// - Mild: clear object cache, halve a limited metadata cache
/// - Moderate: Mild + clear metadata cache + release uncommon statements
/// - Full: clear both caches + release all statements
///
/// - Mild：清空对象缓存，有限额的元数据缓存限额减半
/// - Moderate：Mild + 清空元数据缓存 + 释放不常用语句
/// - Full：清空两个缓存 + 释放所有语句
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Trim {
  Mild = 0,
  Moderate = 1,
  Full = 2,
}

impl TryFrom<i64> for Trim {
  type Error = Error;

  fn try_from(level: i64) -> Result<Self, Error> {
    Ok(match level {
      0 => Self::Mild,
      1 => Self::Moderate,
      2 => Self::Full,
      _ => return Err(Error::TrimLevel(level)),
    })
  }
}
