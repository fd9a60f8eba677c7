use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use sim_core::{emit, Console, SimError};

/// 哲学者の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Thinking,
    Hungry,
    Eating,
}

impl State {
    pub fn symbol(self) -> &'static str {
        match self {
            State::Thinking => "[P]",
            State::Hungry => "[F]",
            State::Eating => "[C]",
        }
    }
}

// 卓の共有状態。Table のロック内でのみ操作される
// フォークは明示的に持たず、隣の状態から所有を判断する
#[derive(Debug)]
struct Seats {
    state: Vec<State>,
    meals: Vec<usize>, // 各哲学者が食事した回数
}

impl Seats {
    fn new(n: usize) -> Self {
        Seats {
            state: vec![State::Thinking; n],
            meals: vec![0; n],
        }
    }

    fn len(&self) -> usize {
        self.state.len()
    }

    fn left(&self, i: usize) -> usize {
        (i + self.len() - 1) % self.len()
    }

    fn right(&self, i: usize) -> usize {
        (i + 1) % self.len()
    }

    // j が空腹で、両隣が食事中でなければ食事中にする
    // 2 本のフォークはロック内で同時に取得されるので、片方だけ持って待つことはない
    fn try_promote(&mut self, j: usize) -> bool {
        if self.state[j] == State::Hungry
            && self.state[self.left(j)] != State::Eating
            && self.state[self.right(j)] != State::Eating
        {
            self.state[j] = State::Eating;
            self.meals[j] += 1;
            true
        } else {
            false
        }
    }

    // 隣り合う 2 人が同時に食事中になっていれば、コーディネータのバグ
    fn check(&self) {
        for i in 0..self.len() {
            if self.state[i] == State::Eating {
                assert!(
                    self.state[self.left(i)] != State::Eating
                        && self.state[self.right(i)] != State::Eating,
                    "inconsistent: philosopher {} and a neighbour are both eating: {:?}",
                    i + 1,
                    self.state
                );
            }
        }
    }
}

/// ある時点の卓の状態のコピー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub states: Vec<State>,
    pub meals: Vec<usize>,
}

impl Snapshot {
    pub fn eating(&self) -> impl Iterator<Item = usize> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == State::Eating)
            .map(|(i, _)| i)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Table ===")?;
        write!(f, "Philosophers:")?;
        for s in &self.states {
            write!(f, " {}", s.symbol())?;
        }
        writeln!(f)?;
        write!(f, "=============")
    }
}

/// 哲学者のコーディネータ
///
/// 状態配列を 1 つのロックで守り、哲学者ごとに 1 つの条件変数を持つ。
/// 空腹の哲学者は自分の条件変数で待ち、隣がフォークを返したときに
/// 食事中へ昇格されてから起こされる。
///
/// 公平性は保証しない。両隣が交互に食べ続けると飢餓になりうる。
#[derive(Clone)]
pub struct Table {
    seats: Arc<Mutex<Seats>>,
    slots: Arc<Vec<Condvar>>,
    console: Arc<Console>,
}

impl Table {
    pub fn new(n: usize, console: Arc<Console>) -> Result<Self, SimError> {
        if n < 2 {
            return Err(SimError::InvalidConfig(format!(
                "need at least 2 philosophers, got {n}"
            )));
        }

        Ok(Table {
            seats: Arc::new(Mutex::new(Seats::new(n))),
            slots: Arc::new((0..n).map(|_| Condvar::new()).collect()),
            console,
        })
    }

    /// 卓についている哲学者の数
    pub fn philosophers(&self) -> usize {
        self.slots.len()
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    fn lock(&self) -> MutexGuard<'_, Seats> {
        self.seats
            .lock()
            .expect("table lock poisoned by a panicking philosopher")
    }

    /// 空腹になり、両隣のフォークが空くまで待つ
    ///
    /// 戻ったときには i は食事中になっている。
    pub fn request_eat(&self, i: usize) {
        let mut seats = self.lock();
        assert!(i < seats.len(), "no philosopher {} at this table", i + 1);
        assert_eq!(
            seats.state[i],
            State::Thinking,
            "philosopher {} requested to eat twice",
            i + 1
        );

        seats.state[i] = State::Hungry;
        emit!(
            self.console,
            ">>> Philosopher {} is HUNGRY and trying to take the forks.",
            i + 1
        );

        if self.try_promote(&mut seats, i) {
            log::debug!("philosopher {} took the forks at once", i + 1);
        }

        // 起こされても昇格済みとは限らないので、必ず条件を確認し直す
        while seats.state[i] != State::Eating {
            log::trace!("philosopher {} waits for the forks", i + 1);
            seats = self.slots[i]
                .wait(seats)
                .expect("table lock poisoned by a panicking philosopher");
        }
    }

    /// フォークを返して考える状態に戻り、両隣を昇格できるか確認する
    pub fn finish_eat(&self, i: usize) {
        let mut seats = self.lock();
        assert!(i < seats.len(), "no philosopher {} at this table", i + 1);
        assert_eq!(
            seats.state[i],
            State::Eating,
            "philosopher {} returned forks it does not hold",
            i + 1
        );

        seats.state[i] = State::Thinking;
        emit!(
            self.console,
            "<<< Philosopher {} RETURNED the forks and went back to thinking.",
            i + 1
        );

        let (left, right) = (seats.left(i), seats.right(i));
        self.try_promote(&mut seats, left);
        self.try_promote(&mut seats, right);
    }

    // ロックを保持した状態で呼ぶ
    fn try_promote(&self, seats: &mut MutexGuard<'_, Seats>, j: usize) -> bool {
        let promoted = seats.try_promote(j);
        seats.check();
        if promoted {
            log::debug!("philosopher {} promoted to eating", j + 1);
            self.slots[j].notify_one();
        }
        promoted
    }

    /// 状態のコピーをとる。同期プロトコルには関与しない
    pub fn snapshot(&self) -> Snapshot {
        let seats = self.lock();
        Snapshot {
            states: seats.state.clone(),
            meals: seats.meals.clone(),
        }
    }

    /// 卓の状態を 1 つのメッセージとして表示する
    pub fn show(&self) {
        let snapshot = self.snapshot();
        self.console.emit(&snapshot.to_string());
    }
}
