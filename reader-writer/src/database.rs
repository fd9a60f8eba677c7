use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use sim_core::{emit, Console};

use crate::access::{Holder, ResourceAccess};

/// ある時点の reader 数とアクセス権の保持者
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub readers: usize,
    pub holder: Holder,
}

/// reader-writer のコーディネータ
///
/// reader 数は専用のロックで守る。最初の reader がアクセス権を取り、
/// 最後の reader が返す。writer は読み込み中の reader がいなくなるまで
/// 条件変数で待ってからアクセス権を取る。
///
/// reader 優先でも writer 優先でもない。reader が途切れなく来ると
/// writer は飢餓になりうる。
#[derive(Clone)]
pub struct Database {
    readers: Arc<Mutex<usize>>, // 読み込み中の reader 数
    no_readers: Arc<Condvar>,   // reader が 0 人になったことを writer に通知
    access: Arc<ResourceAccess>,
    console: Arc<Console>,
}

/// 読み込み区間。drop で exit_read する
pub struct ReadGuard<'a> {
    db: &'a Database,
    id: usize,
}

/// 書き込み区間。drop で exit_write する
///
/// 書き込みが終わるまで reader 数のロックも保持し続ける。
pub struct WriteGuard<'a> {
    db: &'a Database,
    id: usize,
    readers: MutexGuard<'a, usize>,
}

impl Database {
    pub fn new(console: Arc<Console>) -> Self {
        Database {
            readers: Arc::new(Mutex::new(0)),
            no_readers: Arc::new(Condvar::new()),
            access: Arc::new(ResourceAccess::new()),
            console,
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.readers
            .lock()
            .expect("reader count lock poisoned by a panicking worker")
    }

    // reader 数のロックを保持した状態で呼ぶ
    fn check(&self, readers: usize) {
        let holder = self.access.holder();
        let ok = match holder {
            Holder::Readers => readers > 0,
            Holder::Writer(_) | Holder::None => readers == 0,
        };
        assert!(
            ok,
            "inconsistent: {readers} active readers while access is held by {holder}"
        );
    }

    /// 読み込みを始める
    ///
    /// 最初の reader は writer が書き込み中ならアクセス権が空くまで待つ。
    /// 読み込み自体はロックを持たずに行うので、reader 同士は並行に読める。
    pub fn enter_read(&self, id: usize) -> ReadGuard<'_> {
        emit!(self.console, "Reader {id} is trying to access the reader count.");
        let mut readers = self.lock();
        *readers += 1;

        if *readers == 1 {
            emit!(
                self.console,
                "Reader {id} is the first one, locking writers out of the database."
            );
            self.access.acquire(Holder::Readers);
            log::debug!("reader {id} locked writers out");
        }
        self.check(*readers);

        ReadGuard { db: self, id }
    }

    fn exit_read(&self, id: usize) {
        let mut readers = self.lock();
        *readers = readers
            .checked_sub(1)
            .unwrap_or_else(|| panic!("inconsistent: reader {id} left with no active readers"));

        if *readers == 0 {
            // 最後の reader がアクセス権を返し、待っている writer を全員起こす
            self.access.release(Holder::Readers);
            self.no_readers.notify_all();
            log::debug!("reader {id} was the last one, writers woken");
        }
        self.check(*readers);
    }

    /// 書き込みを始める
    ///
    /// 読み込み中の reader がいる間は待ち、reader 数のロックを持ったまま
    /// アクセス権を取る。ロックは exit_write でアクセス権を返した後に
    /// 手放すので、書き込み中に来た reader は reader 数のロックで待たされる。
    pub fn enter_write(&self, id: usize) -> WriteGuard<'_> {
        emit!(
            self.console,
            "Writer {id} is trying to gain access to the database to write."
        );
        let mut readers = self.lock();

        // 起こされても reader がいなくなったとは限らないので確認し直す
        while *readers > 0 {
            emit!(self.console, "Writer {id} is waiting... (active readers)");
            readers = self
                .no_readers
                .wait(readers)
                .expect("reader count lock poisoned by a panicking worker");
        }

        self.access.acquire(Holder::Writer(id));
        self.check(*readers);
        log::debug!("writer {id} holds the database");

        WriteGuard {
            db: self,
            id,
            readers,
        }
    }

    // アクセス権だけを返す。reader 数のロックは WriteGuard の drop で外れる
    fn exit_write(&self, id: usize) {
        self.access.release(Holder::Writer(id));
        log::debug!("writer {id} released the database");
    }

    /// reader 数のロック内で状態のコピーをとる
    ///
    /// 書き込み中や、最初の reader がアクセス権を待っている間はロックが
    /// 空かないので、その間は戻らない。書き込み中の状態は
    /// `WriteGuard::snapshot` でとる。
    pub fn snapshot(&self) -> Snapshot {
        let readers = self.lock();
        Snapshot {
            readers: *readers,
            holder: self.access.holder(),
        }
    }
}

impl ReadGuard<'_> {
    pub fn exit(self) {}
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.db.exit_read(self.id);
    }
}

impl WriteGuard<'_> {
    /// 書き込み中の状態。保持している reader 数のロックを使う
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            readers: *self.readers,
            holder: self.db.access.holder(),
        }
    }

    pub fn exit(self) {}
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        // アクセス権を返した後、フィールドの readers が drop されてロックが外れる
        self.db.exit_write(self.id);
    }
}
