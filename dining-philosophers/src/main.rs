use std::sync::Arc;

use clap::Parser;
use eyre::{Result, WrapErr};

use dining_philosophers::{run, DinnerConfig};
use sim_core::{setup_logging, Console, Pace, PaceArgs};

/// Dining philosophers: one lock over the table, one wait slot per philosopher
#[derive(Debug, Parser)]
#[command(name = "dining-philosophers", version)]
struct Cli {
    /// Number of philosophers around the table
    #[arg(long, default_value_t = 5)]
    philosophers: usize,

    /// Meals each philosopher eats before leaving
    #[arg(long, default_value_t = 5)]
    iterations: usize,

    /// Pause before and after each table snapshot in milliseconds
    #[arg(long, default_value_t = 2000)]
    settle_ms: u64,

    #[command(flatten)]
    pace: PaceArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.pace.verbose).wrap_err("failed to set up logging")?;

    let config = DinnerConfig {
        philosophers: cli.philosophers,
        iterations: cli.iterations,
        pace: Pace::from_millis(cli.pace.delay_ms, cli.settle_ms, 0),
    };

    let console = Arc::new(Console::stdout());
    let report = run(&config, console).wrap_err("dinner aborted")?;
    log::debug!("meals: {:?}", report.meals);
    Ok(())
}
