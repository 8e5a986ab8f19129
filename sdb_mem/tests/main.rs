use std::collections::BTreeMap;

use aok::{OK, Void};
use log::info;
use proptest::prelude::*;
use sdb_base::{Engine, Key, Mode, Release, Row};
use sdb_mem::{COMMON_USES, Error, MemEngine};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn row(v: &str) -> Row {
  Row::val(v.as_bytes().to_vec())
}

fn put(e: &MemEngine, kv: &[(&str, &str)]) -> sdb_base::Diff {
  let snap = e.last();
  let mut txn = e.begin(Mode::Write, snap).unwrap();
  for (k, v) in kv {
    e.write(&mut txn, Key::bare(*k), row(v)).unwrap();
  }
  e.commit(txn, snap + 1).unwrap()
}

#[test]
fn test_snapshot_read() -> Void {
  info!("> 按快照读取");

  let e = MemEngine::new();
  put(&e, &[("a", "1")]);
  put(&e, &[("a", "2")]);

  let k = Key::bare("a");
  let mut t0 = e.begin(Mode::Read, 0)?;
  let mut t1 = e.begin(Mode::Read, 1)?;
  let mut t2 = e.begin(Mode::Read, 2)?;
  assert_eq!(e.read(&mut t0, &k)?, None);
  assert_eq!(e.read(&mut t1, &k)?, Some(row("1")));
  assert_eq!(e.read(&mut t2, &k)?, Some(row("2")));

  assert!(matches!(
    e.begin(Mode::Read, 3),
    Err(Error::Future { snap: 3, last: 2 })
  ));
  OK
}

#[test]
fn test_diff_kinds() -> Void {
  info!("> 提交差异分类");

  let e = MemEngine::new();
  put(&e, &[("a", "1"), ("b", "1")]);

  let mut txn = e.begin(Mode::Write, 1)?;
  e.write(&mut txn, Key::bare("a"), row("2"))?;
  e.rm(&mut txn, &Key::bare("b"))?;
  e.write(&mut txn, Key::bare("c"), row("1"))?;
  e.rm(&mut txn, &Key::bare("missing"))?;

  // Own writes visible before commit
  assert_eq!(e.read(&mut txn, &Key::bare("a"))?, Some(row("2")));
  assert_eq!(e.read(&mut txn, &Key::bare("b"))?, None);

  let diff = e.commit(txn, 2)?;
  assert!(diff.changed.contains(&Key::bare("a")));
  assert!(diff.removed.contains(&Key::bare("b")));
  assert!(diff.inserted.contains(&Key::bare("c")));
  assert_eq!(diff.len(), 3);
  OK
}

#[test]
fn test_commit_errors() -> Void {
  let e = MemEngine::new();

  let mut r = e.begin(Mode::Read, 0)?;
  assert!(matches!(
    e.write(&mut r, Key::bare("a"), row("1")),
    Err(Error::ReadOnly)
  ));

  let txn = e.begin(Mode::Write, 0)?;
  assert!(matches!(
    e.commit(txn, 5),
    Err(Error::SnapOrder { expect: 1, got: 5 })
  ));

  e.fail_next_commit();
  let mut txn = e.begin(Mode::Write, 0)?;
  e.write(&mut txn, Key::bare("a"), row("1"))?;
  assert!(matches!(e.commit(txn, 1), Err(Error::Fault)));
  assert_eq!(e.last(), 0);
  assert_eq!(e.key_count(), 0);

  // Fault is one-shot
  put(&e, &[("a", "1")]);
  assert_eq!(e.last(), 1);
  OK
}

#[test]
fn test_prune() -> Void {
  let e = MemEngine::new();
  put(&e, &[("a", "1")]);
  put(&e, &[("a", "2")]);
  let snap = e.last();
  let mut txn = e.begin(Mode::Write, snap)?;
  e.rm(&mut txn, &Key::bare("a"))?;
  e.commit(txn, snap + 1)?;
  assert_eq!(e.ver_count(), 3);

  assert_eq!(e.prune(2), 1);
  let mut t2 = e.begin(Mode::Read, 2)?;
  assert_eq!(e.read(&mut t2, &Key::bare("a"))?, Some(row("2")));

  assert_eq!(e.prune(3), 2);
  assert_eq!(e.key_count(), 0);
  OK
}

#[test]
fn test_release_tiers() -> Void {
  let e = MemEngine::new();
  for i in 0..COMMON_USES {
    let mut t = e.begin(Mode::Read, 0)?;
    e.read(&mut t, &Key::bare(i.to_string()))?;
    e.rollback(t);
  }
  put(&e, &[("a", "1")]);

  // begin + read are hot, write + commit are rare
  assert!(e.stmt().uses("read") >= COMMON_USES);
  assert_eq!(e.stmt().len(), 4);

  e.release(Release::Uncommon);
  assert_eq!(e.stmt().len(), 2);
  assert_eq!(e.stmt().uses("write"), 0);

  e.release(Release::All);
  assert!(e.stmt().is_empty());
  OK
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  /// A read at any snapshot sees exactly what was committed up to it, before and after prune
  /// 任意快照的读取恰好看到截至该快照的提交，剪枝前后一致
  #[test]
  fn prop_snapshot_view(
    commits in prop::collection::vec(
      prop::collection::vec((0u8..8, prop::option::of(0u8..100)), 0..4),
      1..20,
    ),
    prune_at in 0usize..20,
  ) {
    let e = MemEngine::new();
    let mut hist = vec![BTreeMap::new()];
    for li in &commits {
      let mut next: BTreeMap<u8, u8> = hist[hist.len() - 1].clone();
      let snap = e.last();
      let mut txn = e.begin(Mode::Write, snap).unwrap();
      for &(k, v) in li {
        let key = Key::bare(k.to_string());
        match v {
          Some(v) => {
            e.write(&mut txn, key, Row::val(vec![v])).unwrap();
            next.insert(k, v);
          }
          None => {
            e.rm(&mut txn, &key).unwrap();
            next.remove(&k);
          }
        }
      }
      e.commit(txn, snap + 1).unwrap();
      hist.push(next);
    }

    let prune_at = (prune_at as u64).min(e.last());
    e.prune(prune_at);
    for (snap, want) in hist.iter().enumerate().skip(prune_at as usize) {
      let mut txn = e.begin(Mode::Read, snap as u64).unwrap();
      for k in 0u8..8 {
        let got = e.read(&mut txn, &Key::bare(k.to_string())).unwrap();
        prop_assert_eq!(got.map(|r| r.val[0]), want.get(&k).copied());
      }
    }
  }
}
