use sim_core::{emit, Pace};

use crate::database::Database;

/// 読み込みを繰り返すワーカー
pub struct Reader {
    id: usize,
    db: Database,
    pace: Pace,
}

/// 書き込みを繰り返すワーカー
pub struct Writer {
    id: usize,
    db: Database,
    pace: Pace,
}

impl Reader {
    pub fn new(id: usize, db: Database, pace: Pace) -> Self {
        Reader { id, db, pace }
    }

    /// 読み込みを n 回行い、行った回数を返す
    pub fn run(&self, n: usize) -> usize {
        let console = self.db.console();
        for _ in 0..n {
            let guard = self.db.enter_read(self.id);
            emit!(console, "Reader {} is reading the database...", self.id);
            self.pace.phase();
            guard.exit();

            emit!(
                console,
                "============================\nReader {} finished reading.\n============================",
                self.id
            );
            self.pace.phase();
        }
        n
    }
}

impl Writer {
    pub fn new(id: usize, db: Database, pace: Pace) -> Self {
        Writer { id, db, pace }
    }

    /// 書き込みを n 回行い、行った回数を返す
    pub fn run(&self, n: usize) -> usize {
        let console = self.db.console();
        for _ in 0..n {
            emit!(console, "Writer {} is thinking...", self.id);
            self.pace.pre_think();

            let guard = self.db.enter_write(self.id);
            self.pace.phase();
            emit!(console, "Writer {} is writing to the database...", self.id);
            self.pace.phase();
            emit!(
                console,
                "===============================\nWriter {} finished writing\n===============================",
                self.id
            );
            guard.exit();

            self.pace.phase();
        }
        n
    }
}
