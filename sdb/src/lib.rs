#![cfg_attr(docsrs, feature(doc_cfg))]

//! sdb - Snapshot-isolated connections over a pluggable KV engine
//! sdb - 基于可插拔 KV 引擎的快照隔离连接
//!
//! One writer at a time advances the database snapshot; every connection keeps its own
//! caches of deserialized values and metadata, kept coherent by changesets pulled at
//! transaction begin.
//! 同一时刻只有一个写者推进数据库快照；每个连接持有自己的反序列化值与元数据缓存，
//! 在事务开始时拉取变更集保持一致。

mod change;
mod change_log;
mod codec;
mod conf;
mod conn;
mod db;
mod error;
mod trim;
mod txn;

pub use change::ChangeSet;
pub use change_log::{ChangeLog, Clock, Since};
pub use codec::{Bitcode, Codec};
pub use conf::{Conf, ConnConf, DEFAULT_LOG_CAP, DEFAULT_META_LIMIT, DEFAULT_OBJ_LIMIT};
pub use conn::{Conn, ConnStat};
pub use db::Db;
pub use error::{BoxErr, Error, Result};
pub use sdb_base::{Diff, Engine, Key, Mode, Release, Row};
pub use trim::Trim;
pub use txn::{ReadTxn, WriteTxn};
