use crate::prelude::foreman;
use predicates::prelude::*;

#[test]
fn synchronized_counter_is_exact() {
    foreman()
        .args(["counter", "--actors", "4", "--increments", "5000"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "final count: 20000 (expected 20000)",
        ));
}

#[test]
fn racy_counter_still_reports_against_the_true_total() {
    // Lost updates are probabilistic; the demo must exit cleanly and
    // report against the known-correct total either way.
    foreman()
        .args(["counter", "--racy", "--actors", "4", "--increments", "5000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("expected 20000"));
}
