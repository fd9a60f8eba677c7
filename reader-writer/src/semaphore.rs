use std::sync::{Condvar, Mutex};

/// 条件変数で実装したカウンティングセマフォ
///
/// 同時に `max` 個までのスレッドが wait を抜けられる。
pub struct Semaphore {
    mutex: Mutex<usize>, // wait を抜けて post していない数
    cond: Condvar,
    max: usize,
}

impl Semaphore {
    pub fn new(max: usize) -> Self {
        assert!(max > 0);
        Semaphore {
            mutex: Mutex::new(0),
            cond: Condvar::new(),
            max,
        }
    }

    pub fn wait(&self) {
        let mut cnt = self.mutex.lock().expect("semaphore lock poisoned");
        // 上限に達していれば post されるまで待機
        while *cnt >= self.max {
            cnt = self.cond.wait(cnt).expect("semaphore lock poisoned");
        }
        *cnt += 1;
    }

    pub fn post(&self) {
        let mut cnt = self.mutex.lock().expect("semaphore lock poisoned");
        *cnt = cnt
            .checked_sub(1)
            .expect("inconsistent: semaphore posted more than waited");
        self.cond.notify_one();
    }
}
