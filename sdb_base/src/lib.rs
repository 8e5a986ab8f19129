#![cfg_attr(docsrs, feature(doc_cfg))]

//! sdb_base - Shared types for sdb
//! sdb 共享类型
//!
//! Contains Key, Row, Diff and the Engine trait consumed by the connection layer.
//! 包含 Key、Row、Diff 以及连接层使用的 Engine trait。

mod diff;
mod engine;
mod key;
mod row;

pub use diff::Diff;
pub use engine::{Engine, Mode, Release};
pub use key::Key;
pub use row::Row;

/// Byte buffer alias (immutable, compact)
/// 字节缓冲别名（不可变、紧凑）
pub type Bin = Box<[u8]>;
