use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_runs_to_completion() {
    Command::cargo_bin("reader-writer")
        .unwrap()
        .args(["--delay-ms", "0", "--writer-think-ms", "0", "--iterations", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reader 3 finished reading."))
        .stdout(predicate::str::contains("Writer 3 finished writing"))
        .stdout(predicate::str::ends_with("Simulation finished.\n"));
}

#[test]
fn test_no_workers_fails() {
    Command::cargo_bin("reader-writer")
        .unwrap()
        .args(["--readers", "0", "--writers", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one reader or writer"));
}
