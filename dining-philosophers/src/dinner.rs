use std::sync::Arc;

use sim_core::{emit, Console, Pace, SimError, Workers};

use crate::philosopher::Philosopher;
use crate::table::Table;

#[derive(Debug, Clone)]
pub struct DinnerConfig {
    pub philosophers: usize,
    pub iterations: usize,
    pub pace: Pace,
}

impl Default for DinnerConfig {
    fn default() -> Self {
        DinnerConfig {
            philosophers: 5,
            iterations: 5,
            pace: Pace::default(),
        }
    }
}

/// 各哲学者が食事した回数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DinnerReport {
    pub meals: Vec<usize>,
}

/// 哲学者ごとにスレッドを立て、全員が規定回数食べ終わるまで待つ
pub fn run(config: &DinnerConfig, console: Arc<Console>) -> Result<DinnerReport, SimError> {
    let table = Table::new(config.philosophers, console.clone())?;
    log::info!(
        "dinner: {} philosophers, {} iterations, {:?}",
        config.philosophers,
        config.iterations,
        config.pace
    );

    for i in 0..table.philosophers() {
        emit!(console, "Philosopher {} is THINKING.", i + 1);
        console.emit("----------------------------");
    }

    let mut workers = Workers::new();
    for i in 0..table.philosophers() {
        let p = Philosopher::new(i, table.clone(), config.pace);
        let n = config.iterations;
        workers.spawn(format!("philosopher-{}", i + 1), move || p.dine(n))?;
    }
    workers.join()?;

    let report = DinnerReport {
        meals: table.snapshot().meals,
    };
    for (i, meals) in report.meals.iter().enumerate() {
        emit!(console, "Philosopher {} ate {} times.", i + 1, meals);
    }
    console.emit("Simulation finished.");

    Ok(report)
}
