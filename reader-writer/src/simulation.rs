use std::sync::Arc;

use sim_core::{Console, Pace, SimError, Workers};

use crate::database::Database;
use crate::worker::{Reader, Writer};

#[derive(Debug, Clone)]
pub struct RwConfig {
    pub readers: usize,
    pub writers: usize,
    pub iterations: usize,
    pub pace: Pace,
}

impl Default for RwConfig {
    fn default() -> Self {
        RwConfig {
            readers: 3,
            writers: 3,
            iterations: 5,
            pace: Pace::default(),
        }
    }
}

/// 完了した読み込みと書き込みの回数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RwReport {
    pub reads: usize,
    pub writes: usize,
}

enum Done {
    Reads(usize),
    Writes(usize),
}

/// reader と writer をそれぞれ 1 スレッドずつ立て、全員の終了を待つ
pub fn run(config: &RwConfig, console: Arc<Console>) -> Result<RwReport, SimError> {
    if config.readers == 0 && config.writers == 0 {
        return Err(SimError::InvalidConfig(
            "need at least one reader or writer".to_string(),
        ));
    }
    log::info!(
        "reader-writer: {} readers, {} writers, {} iterations, {:?}",
        config.readers,
        config.writers,
        config.iterations,
        config.pace
    );

    let db = Database::new(console.clone());
    let n = config.iterations;
    let mut workers = Workers::new();

    for id in 1..=config.readers {
        let r = Reader::new(id, db.clone(), config.pace);
        workers.spawn(format!("reader-{id}"), move || Done::Reads(r.run(n)))?;
    }
    for id in 1..=config.writers {
        let w = Writer::new(id, db.clone(), config.pace);
        workers.spawn(format!("writer-{id}"), move || Done::Writes(w.run(n)))?;
    }

    let mut report = RwReport::default();
    for done in workers.join()? {
        match done {
            Done::Reads(k) => report.reads += k,
            Done::Writes(k) => report.writes += k,
        }
    }

    log::debug!("final state: {:?}", db.snapshot());
    console.emit("Simulation finished.");
    Ok(report)
}
