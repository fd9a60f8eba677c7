use sim_core::{emit, Pace};

use crate::table::Table;

/// 1 人の哲学者。スレッド 1 本で動く
pub struct Philosopher {
    id: usize,
    table: Table,
    pace: Pace,
}

impl Philosopher {
    pub fn new(id: usize, table: Table, pace: Pace) -> Self {
        Philosopher { id, table, pace }
    }

    // 共有状態には触れない
    fn think(&self) {
        emit!(self.table.console(), "Philosopher {} is THINKING.", self.id + 1);
        self.pace.phase();
    }

    fn eat(&self) {
        emit!(self.table.console(), "Philosopher {} is EATING.", self.id + 1);
        self.pace.phase();
    }

    fn observe(&self) {
        self.pace.settle();
        self.table.show();
        self.pace.settle();
    }

    /// think → 空腹 → eat → フォークを返す、を n 回繰り返す
    pub fn dine(&self, n: usize) {
        for round in 0..n {
            log::trace!("philosopher {} round {}", self.id + 1, round + 1);
            self.think();
            self.observe();

            self.table.request_eat(self.id);
            self.eat();
            self.observe();

            self.table.finish_eat(self.id);
        }
    }
}
