use crate::prelude::foreman;
use predicates::prelude::*;

#[test]
fn factorials_report_exact_values() {
    foreman()
        .args(["batch", "--workers", "2", "5", "10"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("5! = 120")
                .and(predicate::str::contains("10! = 3628800")),
        );
}

#[test]
fn large_factorials_report_digit_counts() {
    foreman()
        .args(["batch", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25! has 26 digits"));
}

#[test]
fn range_sums_report_a_grand_total() {
    foreman()
        .args(["batch", "--sum-ranges", "100", "100", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total: 45150"));
}
