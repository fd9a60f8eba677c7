use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reader_writer::{run, RwConfig, RwReport};
use sim_core::{Console, Pace, SimError};

fn run_bounded(config: RwConfig, console: Arc<Console>) -> Result<RwReport, SimError> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(run(&config, console));
    });
    rx.recv_timeout(Duration::from_secs(30))
        .expect("simulation did not finish in time (deadlock?)")
}

#[test]
fn test_three_readers_three_writers_terminate() {
    let console = Arc::new(Console::capture());
    let config = RwConfig {
        pace: Pace::none(),
        ..Default::default()
    };

    let report = run_bounded(config, console.clone()).unwrap();
    assert_eq!(report, RwReport { reads: 15, writes: 15 });

    let lines = console.lines();
    assert_eq!(lines.last().unwrap(), "Simulation finished.");
    let reads = lines.iter().filter(|l| l.ends_with("finished reading.")).count();
    let writes = lines.iter().filter(|l| l.ends_with("finished writing")).count();
    assert_eq!(reads, 15);
    assert_eq!(writes, 15);
}

#[test]
fn test_paced_simulation_terminates() {
    let console = Arc::new(Console::capture());
    let config = RwConfig {
        readers: 3,
        writers: 1,
        iterations: 3,
        pace: Pace::from_millis(2, 0, 1),
    };

    let report = run_bounded(config, console).unwrap();
    assert_eq!(report, RwReport { reads: 9, writes: 3 });
}

#[test]
fn test_writers_only() {
    let console = Arc::new(Console::capture());
    let config = RwConfig {
        readers: 0,
        writers: 4,
        iterations: 10,
        pace: Pace::none(),
    };

    let report = run_bounded(config, console).unwrap();
    assert_eq!(report, RwReport { reads: 0, writes: 40 });
}

#[test]
fn test_rejects_empty_simulation() {
    let config = RwConfig {
        readers: 0,
        writers: 0,
        ..Default::default()
    };
    assert!(matches!(
        run(&config, Arc::new(Console::capture())),
        Err(SimError::InvalidConfig(_))
    ));
}
