#![cfg_attr(docsrs, feature(doc_cfg))]

//! sdb_mem - In-memory multi-version engine
//! sdb_mem - 内存多版本引擎
//!
//! Reference `Engine` for sdb: rows are versioned by snapshot, writes are buffered per
//! transaction and published atomically on commit.
//! sdb 的参考 `Engine`：行按快照分版本，写入按事务缓冲，提交时原子发布。

mod error;
mod mem;
mod stmt;
mod txn;

pub use error::{Error, Result};
pub use mem::MemEngine;
pub use stmt::{COMMON_USES, Stmts};
pub use txn::Txn;
