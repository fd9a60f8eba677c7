use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use reader_writer::{Database, Holder, Snapshot};
use sim_core::Console;

const WAIT_LIMIT: Duration = Duration::from_secs(10);

fn wait_for_line(console: &Console, line: &str) {
    let start = Instant::now();
    while !console.lines().iter().any(|l| l == line) {
        assert!(start.elapsed() < WAIT_LIMIT, "never saw {line:?}");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_readers_overlap() {
    const N: usize = 3;

    let db = Database::new(Arc::new(Console::capture()));
    let barrier = Arc::new(Barrier::new(N));
    let (tx, rx) = mpsc::channel();

    let mut v = Vec::new();
    for id in 1..=N {
        let db = db.clone();
        let barrier = barrier.clone();
        let tx = tx.clone();
        v.push(thread::spawn(move || {
            let guard = db.enter_read(id);
            // 全員が同時に読み込み区間にいないとここを抜けられない
            barrier.wait();
            guard.exit();
            tx.send(id).unwrap();
        }));
    }

    for _ in 0..N {
        rx.recv_timeout(WAIT_LIMIT).expect("readers blocked each other");
    }
    for t in v {
        t.join().unwrap();
    }
    assert_eq!(db.snapshot().readers, 0);
}

#[test]
fn test_writer_waits_for_active_readers() {
    let console = Arc::new(Console::capture());
    let db = Database::new(console.clone());

    let r1 = db.enter_read(1);
    let r2 = db.enter_read(2);

    let (entered_tx, entered_rx) = mpsc::channel();
    let (leave_tx, leave_rx) = mpsc::channel::<()>();
    let writer = {
        let db = db.clone();
        thread::spawn(move || {
            let guard = db.enter_write(1);
            entered_tx.send(guard.snapshot()).unwrap();
            leave_rx.recv().unwrap();
            guard.exit();
        })
    };

    wait_for_line(&console, "Writer 1 is waiting... (active readers)");
    assert!(entered_rx.recv_timeout(Duration::from_millis(100)).is_err());

    r1.exit();
    assert!(entered_rx.recv_timeout(Duration::from_millis(100)).is_err());
    assert_eq!(db.snapshot().readers, 1);

    r2.exit();
    let snapshot = entered_rx.recv_timeout(WAIT_LIMIT).unwrap();
    assert_eq!(
        snapshot,
        Snapshot {
            readers: 0,
            holder: Holder::Writer(1)
        }
    );

    // 書き込み中に来た reader は reader 数のロックで待たされ、
    // writer が抜けるまで最初の reader にはなれない
    let (read_tx, read_rx) = mpsc::channel();
    let reader = {
        let db = db.clone();
        thread::spawn(move || {
            let guard = db.enter_read(3);
            read_tx.send(()).unwrap();
            guard.exit();
        })
    };
    wait_for_line(&console, "Reader 3 is trying to access the reader count.");
    assert!(read_rx.recv_timeout(Duration::from_millis(100)).is_err());
    assert!(!console
        .lines()
        .iter()
        .any(|l| l.starts_with("Reader 3 is the first one")));

    leave_tx.send(()).unwrap();
    writer.join().unwrap();
    read_rx.recv_timeout(WAIT_LIMIT).unwrap();
    reader.join().unwrap();
    assert_eq!(
        console.lines().last().unwrap(),
        "Reader 3 is the first one, locking writers out of the database."
    );

    assert_eq!(
        db.snapshot(),
        Snapshot {
            readers: 0,
            holder: Holder::None
        }
    );
}

#[test]
fn test_writers_serialize() {
    let db = Database::new(Arc::new(Console::capture()));
    let w1 = db.enter_write(1);

    let (tx, rx) = mpsc::channel();
    let t = {
        let db = db.clone();
        thread::spawn(move || {
            let guard = db.enter_write(2);
            tx.send(()).unwrap();
            guard.exit();
        })
    };

    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    w1.exit();
    rx.recv_timeout(WAIT_LIMIT).unwrap();
    t.join().unwrap();
}

#[test]
fn test_exclusive_access_under_contention() {
    const READERS: usize = 4;
    const WRITERS: usize = 3;
    const ROUNDS: usize = 200;

    let db = Database::new(Arc::new(Console::capture()));
    let reading = Arc::new(AtomicUsize::new(0));
    let writing = Arc::new(AtomicUsize::new(0));
    let max_reading = Arc::new(AtomicUsize::new(0));
    let mut v = Vec::new();

    for id in 1..=READERS {
        let (db, reading, writing, max_reading) =
            (db.clone(), reading.clone(), writing.clone(), max_reading.clone());
        v.push(thread::spawn(move || {
            let mut rng = rand::thread_rng();
            for _ in 0..ROUNDS {
                let guard = db.enter_read(id);
                let n = reading.fetch_add(1, Ordering::SeqCst) + 1;
                max_reading.fetch_max(n, Ordering::SeqCst);
                assert_eq!(writing.load(Ordering::SeqCst), 0);
                thread::sleep(Duration::from_micros(rng.gen_range(0..100)));
                reading.fetch_sub(1, Ordering::SeqCst);
                guard.exit();
            }
        }));
    }

    for id in 1..=WRITERS {
        let (db, reading, writing) = (db.clone(), reading.clone(), writing.clone());
        v.push(thread::spawn(move || {
            let mut rng = rand::thread_rng();
            for _ in 0..ROUNDS {
                thread::sleep(Duration::from_micros(rng.gen_range(0..100)));
                let guard = db.enter_write(id);
                assert_eq!(writing.fetch_add(1, Ordering::SeqCst), 0);
                assert_eq!(reading.load(Ordering::SeqCst), 0);
                thread::sleep(Duration::from_micros(rng.gen_range(0..50)));
                writing.fetch_sub(1, Ordering::SeqCst);
                guard.exit();
            }
        }));
    }

    for t in v {
        t.join().unwrap();
    }

    assert!(max_reading.load(Ordering::SeqCst) >= 1);
    assert_eq!(
        db.snapshot(),
        Snapshot {
            readers: 0,
            holder: Holder::None
        }
    );
}
