use aok::{OK, Void};
use log::info;
use sdb::{Bitcode, Conf, ConnConf, Db, Error, Trim};
use sdb_mem::MemEngine;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn s(v: &str) -> String {
  v.to_string()
}

#[test]
fn test_trim_tiers() -> Void {
  info!("> 三级内存清理");

  let db: Db<MemEngine, Bitcode<String, String>> = Db::open(
    MemEngine::new(),
    Bitcode::new(),
    &[Conf::Conn(ConnConf::MetaLimit(8))],
  );
  let mut a = db.conn();
  a.write(|w| {
    for i in 0..8 {
      w.set(format!("k{i}"), s("v"), Some(s("m")))?;
    }
    Ok(())
  })?;
  assert_eq!(a.obj_len(), 8);
  assert_eq!(a.meta_len(), 8);
  let stmt = db.engine().stmt();
  // begin, write, commit
  assert_eq!(stmt.len(), 3);

  a.trim(Trim::Mild);
  assert_eq!(a.obj_len(), 0);
  assert_eq!(a.meta_limit(), 4);
  assert_eq!(a.meta_len(), 4);
  assert_eq!(stmt.len(), 3);

  a.trim(Trim::Moderate);
  assert_eq!(a.meta_len(), 0);
  assert_eq!(a.meta_limit(), 2);
  // only the statement used 8 times survives
  assert_eq!(stmt.len(), 1);
  assert_eq!(stmt.uses("write"), 8);

  let v = a.read(|t| Ok(t.meta("k3")?.map(|m| (*m).clone())))?;
  assert_eq!(v, Some(s("m")));
  assert_eq!(a.meta_len(), 1);

  a.trim(Trim::Full);
  assert_eq!(a.obj_len(), 0);
  assert_eq!(a.meta_len(), 0);
  assert!(stmt.is_empty());

  // snapshot state untouched
  assert_eq!(a.snap(), 1);
  assert_eq!(db.now(), 1);
  assert!(a.obj_enabled() && a.meta_enabled());
  OK
}

#[test]
fn test_mild_keeps_unbounded_meta() -> Void {
  info!("> 无上限的元数据缓存不受轻度清理影响");

  let db: Db<MemEngine, Bitcode<String, String>> =
    Db::open(MemEngine::new(), Bitcode::new(), &[]);
  let mut a = db.conn();
  a.write(|w| {
    for i in 0..6 {
      w.set(format!("k{i}"), s("v"), Some(s("m")))?;
    }
    Ok(())
  })?;

  let mut b = db.conn();
  b.read(|t| {
    for i in 0..6 {
      t.meta(format!("k{i}"))?;
      t.get(format!("k{i}"))?;
    }
    Ok(())
  })?;
  assert_eq!(b.meta_len(), 6);

  b.trim(Trim::Mild);
  assert_eq!(b.obj_len(), 0);
  assert_eq!(b.meta_limit(), 0);
  assert_eq!(b.meta_len(), 6);

  // limit 1 stays 1
  b.conf(&[ConnConf::MetaLimit(1)]);
  assert_eq!(b.meta_len(), 1);
  b.trim(Trim::Mild);
  assert_eq!(b.meta_limit(), 1);
  assert_eq!(b.meta_len(), 1);

  // caches still coherent after trim
  a.write(|w| w.set("k5", s("v2"), Some(s("m2"))))?;
  let (v, m) = b.read(|t| {
    Ok((
      t.get("k5")?.map(|v| (*v).clone()),
      t.meta("k5")?.map(|m| (*m).clone()),
    ))
  })?;
  assert_eq!(v, Some(s("v2")));
  assert_eq!(m, Some(s("m2")));
  OK
}

#[test]
fn test_trim_level_from_raw() -> Void {
  assert_eq!(Trim::try_from(0i64)?, Trim::Mild);
  assert_eq!(Trim::try_from(1i64)?, Trim::Moderate);
  assert_eq!(Trim::try_from(2i64)?, Trim::Full);
  assert!(matches!(Trim::try_from(3i64), Err(Error::TrimLevel(3))));
  assert!(matches!(Trim::try_from(-1i64), Err(Error::TrimLevel(-1))));
  assert!(Trim::Mild < Trim::Moderate && Trim::Moderate < Trim::Full);
  OK
}
