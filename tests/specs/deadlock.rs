use crate::prelude::foreman;
use predicates::prelude::*;

#[test]
fn ordered_acquisition_completes() {
    foreman()
        .args(["deadlock", "--resources", "4", "--hold", "10ms"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "both actors finished without deadlock",
        ));
}

#[test]
fn unordered_acquisition_times_out() {
    foreman()
        .args([
            "deadlock",
            "--unordered",
            "--wait",
            "500ms",
            "--stagger",
            "50ms",
            "--hold",
            "10ms",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("lock timeout"));
}
