//! Behavioral specifications for the foreman CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/batch.rs"]
mod batch;
#[path = "specs/counter.rs"]
mod counter;
#[path = "specs/deadlock.rs"]
mod deadlock;
#[path = "specs/logpipe.rs"]
mod logpipe;
