use std::sync::Arc;

use clap::Parser;
use eyre::{Result, WrapErr};

use reader_writer::{run, RwConfig};
use sim_core::{setup_logging, Console, Pace, PaceArgs};

/// Readers-writers: shared reads, exclusive writes
#[derive(Debug, Parser)]
#[command(name = "reader-writer", version)]
struct Cli {
    /// Number of reader threads
    #[arg(long, default_value_t = 3)]
    readers: usize,

    /// Number of writer threads
    #[arg(long, default_value_t = 3)]
    writers: usize,

    /// Reads or writes each worker performs
    #[arg(long, default_value_t = 5)]
    iterations: usize,

    /// Time a writer thinks before each write in milliseconds
    #[arg(long, default_value_t = 1000)]
    writer_think_ms: u64,

    #[command(flatten)]
    pace: PaceArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.pace.verbose).wrap_err("failed to set up logging")?;

    let config = RwConfig {
        readers: cli.readers,
        writers: cli.writers,
        iterations: cli.iterations,
        pace: Pace::from_millis(cli.pace.delay_ms, 0, cli.writer_think_ms),
    };

    let console = Arc::new(Console::stdout());
    let report = run(&config, console).wrap_err("simulation aborted")?;
    log::debug!("reads: {}, writes: {}", report.reads, report.writes);
    Ok(())
}
