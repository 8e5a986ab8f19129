use std::{
  sync::{
    atomic::{AtomicBool, Ordering::SeqCst},
    mpsc,
  },
  thread,
  time::Duration,
};

use aok::{OK, Void};
use log::info;
use sdb::{Bitcode, Conf, Db, Error};
use sdb_mem::MemEngine;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn s(v: &str) -> String {
  v.to_string()
}

#[test]
fn test_second_writer_waits() -> Void {
  info!("> 第二个写者等待第一个写者提交");

  let db: Db<MemEngine, Bitcode<String>> = Db::open(MemEngine::new(), Bitcode::new(), &[]);
  let mut w1 = db.conn();
  let mut w2 = db.conn();
  let (held_tx, held_rx) = mpsc::channel::<()>();
  let (go_tx, go_rx) = mpsc::channel::<()>();
  let done = AtomicBool::new(false);

  let (r1, r2) = thread::scope(|sc| {
    let w1 = &mut w1;
    let h1 = sc.spawn(move || {
      w1.write(|w| {
        w.set("k", s("1"), None)?;
        held_tx.send(()).expect("held");
        go_rx.recv().expect("go");
        Ok(())
      })
    });
    held_rx.recv().expect("w1 holds admission");

    let w2 = &mut w2;
    let done = &done;
    let h2 = sc.spawn(move || {
      let r = w2.write(|w| w.set("k", s("2"), None));
      done.store(true, SeqCst);
      r
    });

    thread::sleep(Duration::from_millis(50));
    assert!(!done.load(SeqCst));
    go_tx.send(()).expect("go");

    (h1.join().expect("w1"), h2.join().expect("w2"))
  });
  r1?;
  r2?;

  assert!(done.load(SeqCst));
  assert_eq!(db.now(), 2);
  assert_eq!(w1.snap(), 1);
  assert_eq!(w2.snap(), 2);
  for c in [&mut w1, &mut w2] {
    let v = c.read(|t| Ok(t.get("k")?.map(|v| (*v).clone())))?;
    assert_eq!(v.as_deref(), Some("2"));
  }
  OK
}

#[test]
fn test_admit_timeout() -> Void {
  info!("> 写准入超时");

  let timeout = Duration::from_millis(20);
  let db: Db<MemEngine, Bitcode<String>> = Db::open(
    MemEngine::new(),
    Bitcode::new(),
    &[Conf::AdmitTimeout(timeout)],
  );
  let mut a = db.conn();
  let mut b = db.conn();

  a.write(|w| {
    w.set("k", s("a"), None)?;
    let r = b.write(|w| w.set("k", s("b"), None));
    assert!(matches!(r, Err(Error::AdmitTimeout(d)) if d == timeout));
    Ok(())
  })?;
  assert_eq!(b.snap(), 0);

  b.write(|w| w.set("k", s("b"), None))?;
  assert_eq!(db.now(), 2);
  OK
}

#[test]
fn test_counter_threads() -> Void {
  info!("> 多线程读改写计数");

  const THREAD: u64 = 4;
  const ROUND: u64 = 200;

  let db: Db<MemEngine, Bitcode<u64>> = Db::open(MemEngine::new(), Bitcode::new(), &[]);
  let mut conns: Vec<_> = (0..THREAD).map(|_| db.conn()).collect();

  thread::scope(|sc| {
    for c in conns.iter_mut() {
      sc.spawn(move || {
        let mut last = 0;
        for _ in 0..ROUND {
          // read-modify-write through the cache
          let n = c
            .write(|w| {
              let n = w.get("n")?.map_or(0, |v| *v) + 1;
              w.set("n", n, None)?;
              Ok(n)
            })
            .expect("write");
          assert!(n > last);
          last = n;
          if fastrand::u8(..) < 64 {
            thread::yield_now();
          }

          let seen = c
            .read(|t| Ok(t.get("n")?.map_or(0, |v| *v)))
            .expect("read");
          assert!(seen >= n);
        }
      });
    }
  });

  assert_eq!(db.now(), THREAD * ROUND);
  let mut c = db.conn();
  let n = c.read(|t| Ok(t.get("n")?.map_or(0, |v| *v)))?;
  assert_eq!(n, THREAD * ROUND);
  drop(conns);
  drop(c);
  assert_eq!(db.log_len(), 0);
  OK
}
