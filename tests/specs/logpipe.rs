use crate::prelude::foreman;
use predicates::prelude::*;

#[test]
fn every_line_reaches_the_destination() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("aggregate.log");

    foreman()
        .args(["logpipe", "--producers", "3", "--lines", "40", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "delivered 120 lines from 3 producers",
        ));

    let contents = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 120);

    // Producer 1's lines appear in emission order.
    let p1: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| line.starts_with("P01"))
        .collect();
    let expected: Vec<String> = (0..40).map(|j| format!("P01 L{j:04}")).collect();
    assert_eq!(p1, expected);
}
