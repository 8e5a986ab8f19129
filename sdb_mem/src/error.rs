//! Error types
//! 错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Write issued in a read transaction
  /// 在读事务中写入
  #[error("write in read transaction / 读事务中写入")]
  ReadOnly,

  /// Begin at a snapshot not committed yet
  /// 在尚未提交的快照开始事务
  #[error("snapshot {snap} not committed, last is {last}")]
  Future { snap: u64, last: u64 },

  /// Commit snapshot is not the successor of the last one
  /// 提交快照不是上一快照的后继
  #[error("commit as snapshot {got}, expect {expect}")]
  SnapOrder { expect: u64, got: u64 },

  /// Injected by `MemEngine::fail_next_commit`
  /// 由 `MemEngine::fail_next_commit` 注入
  #[error("injected commit fault / 注入的提交故障")]
  Fault,
}

pub type Result<T> = std::result::Result<T, Error>;
