//! Stored row: serialized value + optional serialized metadata
//! 存储行：序列化值 + 可选序列化元数据

use crate::Bin;

/// Serialized row as persisted by the engine
/// 引擎持久化的序列化行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
  pub val: Bin,
  pub meta: Option<Bin>,
}

impl Row {
  #[inline]
  pub fn new(val: impl Into<Bin>, meta: Option<Bin>) -> Self {
    Self {
      val: val.into(),
      meta,
    }
  }

  /// Row without metadata
  /// 无元数据的行
  #[inline]
  pub fn val(val: impl Into<Bin>) -> Self {
    Self::new(val, None)
  }
}
