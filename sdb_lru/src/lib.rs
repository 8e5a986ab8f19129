#![cfg_attr(docsrs, feature(doc_cfg))]

//! sdb_lru - Per-connection LRU cache
//! sdb_lru - 连接级 LRU 缓存
//!
//! Limit 0 is unbounded. Disabling clears the cache and turns every operation into a miss
//! or a no-op until re-enabled.
//! 限额 0 表示无上限。禁用会清空缓存，重新启用前所有操作均为未命中或空操作。

mod cache;
mod lru;
mod stat;

pub use cache::Cache;
pub use lru::Lru;
pub use stat::Stat;
