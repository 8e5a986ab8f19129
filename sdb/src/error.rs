//! Error types for sdb
//! sdb 错误类型定义

use std::time::Duration;

use thiserror::Error;

/// Boxed source error from an engine or codec
/// 来自引擎或编解码器的装箱错误
pub type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// Write admission not granted in time
  /// 写准入未在时限内获得
  #[error("write admission timeout after {0:?} / 写准入超时")]
  AdmitTimeout(Duration),

  /// Backing store failure, source kept intact for downcast
  /// 后端存储失败，保留原始错误以便 downcast
  #[error("store: {0}")]
  Store(#[source] BoxErr),

  #[error("codec: {0}")]
  Codec(#[source] BoxErr),

  /// Raw trim level outside 0..=2
  /// 原始清理级别不在 0..=2
  #[error("invalid trim level {0}, expect 0, 1 or 2")]
  TrimLevel(i64),

  /// Database closed while connections are alive
  /// 仍有连接存活时关闭数据库
  #[error("{0} connection(s) still alive / 仍有连接存活")]
  ConnAlive(usize),
}

impl Error {
  #[inline]
  pub(crate) fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }

  /// Downcast store failure to the engine error type
  /// 将存储错误 downcast 为引擎错误类型
  pub fn as_store<E: std::error::Error + 'static>(&self) -> Option<&E> {
    match self {
      Self::Store(e) => e.downcast_ref(),
      _ => None,
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
