//! Database and connection configuration
//! 数据库与连接配置

use std::time::Duration;

/// Default change log retention (changesets)
/// 默认变更日志保留数（变更集）
pub const DEFAULT_LOG_CAP: usize = 1024;

/// Default object cache limit
/// 默认对象缓存限额
pub const DEFAULT_OBJ_LIMIT: usize = 40;

/// Default metadata cache limit, 0 = unbounded
/// 默认元数据缓存限额，0 = 无上限
pub const DEFAULT_META_LIMIT: usize = 0;

/// Database configuration
/// 数据库配置
#[derive(Debug, Clone, Copy)]
pub enum Conf {
  /// Max changesets kept for incremental sync, default 1024 (min 1)
  /// 增量同步保留的最大变更集数，默认 1024（最小 1）
  LogCap(usize),
  /// Bound on waiting for write admission, default unbounded
  /// 等待写准入的时限，默认无限
  AdmitTimeout(Duration),
  /// Initial configuration of every connection opened afterwards
  /// 之后打开的每个连接的初始配置
  Conn(ConnConf),
}

/// Connection configuration, may change at any time (also inside transactions)
/// 连接配置，可随时修改（包括事务内）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnConf {
  /// Object cache on/off, default on
  /// 对象缓存开关，默认开
  ObjCache(bool),
  /// Object cache limit, 0 = unbounded, default 40
  /// 对象缓存限额，0 = 无上限，默认 40
  ObjLimit(usize),
  /// Metadata cache on/off, default on
  /// 元数据缓存开关，默认开
  MetaCache(bool),
  /// Metadata cache limit, 0 = unbounded, default 0
  /// 元数据缓存限额，0 = 无上限，默认 0
  MetaLimit(usize),
}

/// Folded database configuration
/// 合并后的数据库配置
#[derive(Debug, Clone)]
pub(crate) struct DbConf {
  pub log_cap: usize,
  pub admit_timeout: Option<Duration>,
  pub conn: Vec<ConnConf>,
}

impl DbConf {
  pub fn from_items(conf: &[Conf]) -> Self {
    let mut log_cap = DEFAULT_LOG_CAP;
    let mut admit_timeout = None;
    let mut conn = Vec::new();

    for c in conf {
      match c {
        Conf::LogCap(v) => log_cap = (*v).max(1),
        Conf::AdmitTimeout(v) => admit_timeout = Some(*v),
        Conf::Conn(c) => conn.push(*c),
      }
    }

    Self {
      log_cap,
      admit_timeout,
      conn,
    }
  }
}
