//! Row key (collection + key)
//! 行键（集合 + 键）

use std::fmt;

use hipstr::HipStr;

/// Row identifier: collection + key
/// 行标识：集合 + 键
///
/// Empty collection is the default namespace.
/// 空集合即默认命名空间。
///
/// Ordered by collection first, then key.
/// 先按集合排序，再按键排序。
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Key {
  pub col: HipStr<'static>,
  pub key: HipStr<'static>,
}

impl Key {
  /// Create key in collection
  /// 在集合中创建键
  #[inline]
  pub fn new(col: impl Into<HipStr<'static>>, key: impl Into<HipStr<'static>>) -> Self {
    Self {
      col: col.into(),
      key: key.into(),
    }
  }

  /// Create key in default namespace
  /// 在默认命名空间创建键
  #[inline]
  pub fn bare(key: impl Into<HipStr<'static>>) -> Self {
    Self {
      col: HipStr::new(),
      key: key.into(),
    }
  }

  #[inline]
  pub fn col(&self) -> &str {
    self.col.as_str()
  }

  #[inline]
  pub fn key(&self) -> &str {
    self.key.as_str()
  }
}

impl From<&str> for Key {
  #[inline]
  fn from(key: &str) -> Self {
    Self::bare(key)
  }
}

impl From<String> for Key {
  #[inline]
  fn from(key: String) -> Self {
    Self::bare(key)
  }
}

impl From<&Key> for Key {
  #[inline]
  fn from(key: &Key) -> Self {
    key.clone()
  }
}

impl From<(&str, &str)> for Key {
  #[inline]
  fn from((col, key): (&str, &str)) -> Self {
    Self::new(col, key)
  }
}

impl fmt::Debug for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{self}")
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.col.is_empty() {
      f.write_str(&self.key)
    } else {
      write!(f, "{}/{}", self.col, self.key)
    }
  }
}
